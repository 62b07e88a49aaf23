//! Message routing
//!
//! Platform backends deliver every message addressed to a window they created
//! through [`dispatch`]. The surface decides whether a message is handled or
//! falls through to the platform's default processing.

use crate::window::backend::WindowId;

/// Native id of the first-creation notification (`WM_NCCREATE`)
pub const MSG_NC_CREATE: u32 = 0x0081;
/// Native id of the close request (`WM_CLOSE`)
pub const MSG_CLOSE: u32 = 0x0010;
/// Native id of the destroy notification (`WM_DESTROY`)
pub const MSG_DESTROY: u32 = 0x0002;

/// Messages the routing policy distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowMessage {
    /// First message a new window receives, before creation completes
    Create,
    /// User asked to close the window
    Close,
    /// Window is being destroyed
    Destroy,
    /// Anything else, by native id
    Other(u32),
}

impl WindowMessage {
    /// Classify a native message id
    pub const fn from_raw(id: u32) -> Self {
        match id {
            MSG_NC_CREATE => Self::Create,
            MSG_CLOSE => Self::Close,
            MSG_DESTROY => Self::Destroy,
            other => Self::Other(other),
        }
    }

    /// Native message id
    pub const fn raw(self) -> u32 {
        match self {
            Self::Create => MSG_NC_CREATE,
            Self::Close => MSG_CLOSE,
            Self::Destroy => MSG_DESTROY,
            Self::Other(id) => id,
        }
    }
}

/// Outcome of routing a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Consumed; the value is the native message result
    Handled(isize),
    /// Hand the message to the platform's default processing
    Default,
}

/// Receiver side of the routing entry point
///
/// Implemented by the surface state. Backends hold it weakly so a discarded
/// surface never keeps its own window alive.
pub trait MessageHandler {
    /// React to a message addressed to `window`
    fn handle_message(&self, window: WindowId, message: WindowMessage) -> Routing;
}

/// Routing entry point every platform backend calls
///
/// `handler` is the instance associated with `window` at its first-creation
/// message, if any. Windows without one go straight to default processing.
pub fn dispatch(
    handler: Option<&dyn MessageHandler>,
    window: WindowId,
    message: WindowMessage,
) -> Routing {
    match handler {
        Some(handler) => handler.handle_message(window, message),
        None => {
            log::trace!("No surface associated with {}; {:?} routed to default", window, message);
            Routing::Default
        }
    }
}
