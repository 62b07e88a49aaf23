//! Surface creation errors

use thiserror::Error;

use crate::window::backend::{PlatformError, WindowId};

/// Recoverable creation failure
///
/// Returned when a surface cannot be set up. The host keeps running; the
/// caller must discard the instance before trying again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoverableError {
    /// `create` called on an instance that is already bound
    #[error("surface is already bound to {0}")]
    AlreadyBound(WindowId),

    /// Window class registration failed
    #[error("window class registration failed: {0}")]
    ClassRegistration(#[source] PlatformError),

    /// The platform could not create the window
    #[error("window creation failed: {0}")]
    WindowCreation(#[source] PlatformError),
}

/// Result type for surface creation
pub type SurfaceResult<T> = Result<T, RecoverableError>;
