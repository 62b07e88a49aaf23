//! Surface window subsystem
//!
//! Layering, top to bottom:
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │  Rendering subsystem / shell    │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!       ┌───────▼────────┐
//!       │ SurfaceWindow  │ ← Ownership + message policy (handle.rs)
//!       └───────┬────────┘
//!               │ Calls         ▲ dispatch() (message.rs)
//!      ┌────────▼───────────────┴┐
//!      │ WindowPlatform trait    │ ← Platform contract (backend.rs)
//!      └────────┬────────────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ platform::win32       │
//!   │ platform::headless    │
//!   └───────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - **`handle`**: [`SurfaceWindow`], the public façade
//! - **`backend`**: [`WindowPlatform`] and the types crossing it
//! - **`message`**: message kinds and the routing entry point
//! - **`geometry`**: default size and centering
//! - **`style`**: window and class style flags
//! - **`error`**: [`RecoverableError`]

pub mod backend;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod message;
pub mod style;

pub use backend::{ModuleHandle, PlatformError, WindowId, WindowPlatform};
pub use error::{RecoverableError, SurfaceResult};
pub use geometry::Rect;
pub use handle::SurfaceWindow;
pub use message::{dispatch, Routing, WindowMessage};
pub use style::WindowStyle;
