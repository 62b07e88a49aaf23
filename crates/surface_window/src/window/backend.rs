//! Platform windowing contract
//!
//! This module defines the trait every windowing backend implements. The
//! surface never talks to the window system directly; it asks a
//! [`WindowPlatform`] for each primitive and applies its own policy on top.
//!
//! # Thread Safety
//! Backends are driven from the thread that owns the platform message loop.
//! Nothing here is `Send` and no operation is guarded against concurrent use.

use std::fmt;
use std::num::NonZeroU64;
use std::rc::Weak;

use raw_window_handle::RawWindowHandle;
use thiserror::Error;

use crate::window::geometry::Rect;
use crate::window::message::MessageHandler;
use crate::window::style::{ClassStyle, WindowStyle};

/// Class name registered for every surface window in the process
pub const SURFACE_CLASS_NAME: &str = "SurfaceWindow";

/// Opaque platform window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(NonZeroU64);

impl WindowId {
    /// Wrap a raw platform handle; `None` for the null handle
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Raw platform handle value
    pub const fn as_raw(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window {:#x}", self.0.get())
    }
}

/// Module (application instance) identifier supplied at class registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModuleHandle(pub u64);

impl ModuleHandle {
    /// Raw module handle value
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Window class registration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClass {
    /// Class name, unique per module
    pub name: &'static str,
    /// Module the class is registered under
    pub module: ModuleHandle,
    /// Class style bits
    pub style: ClassStyle,
}

impl WindowClass {
    /// The surface window class for `module`
    pub const fn surface(module: ModuleHandle) -> Self {
        Self {
            name: SURFACE_CLASS_NAME,
            module,
            style: ClassStyle::surface(),
        }
    }
}

/// Everything the platform needs to create a top-level window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    /// Registered class to instantiate
    pub class: WindowClass,
    /// Initial title text
    pub title: String,
    /// Window style bits
    pub style: WindowStyle,
    /// Outer window bounds, decoration included
    pub bounds: Rect,
}

/// Visibility request passed to [`WindowPlatform::show_window`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    /// Show restored (not minimized or maximized)
    ShowNormal,
    /// Hide without destroying
    Hide,
}

/// Failure reported by a platform primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Native call failed with an OS error code
    #[error("{operation} failed with OS error {code}")]
    Os {
        /// Native call that failed
        operation: &'static str,
        /// OS error code
        code: u32,
    },

    /// Handle does not name a live window
    #[error("{0} does not exist")]
    UnknownWindow(WindowId),

    /// Class is already registered under this module
    #[error("window class {0} is already registered")]
    ClassAlreadyExists(&'static str),

    /// Class has not been registered under this module
    #[error("window class {0} is not registered")]
    ClassNotRegistered(&'static str),

    /// Platform refused the request
    #[error("{0} was rejected by the platform")]
    Rejected(&'static str),
}

/// Result type for platform primitives
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Windowing subsystem primitives consumed by the surface
///
/// Implementations must call [`dispatch`](crate::window::message::dispatch)
/// for every message addressed to a window created through
/// [`create_window`](Self::create_window), passing the handler associated at
/// the first-creation message. Dispatch may re-enter the surface, which in
/// turn calls back into the platform.
pub trait WindowPlatform {
    /// Module identifier used for class registration
    fn module_handle(&self) -> ModuleHandle;

    /// Whether `class_name` is registered under `module`
    fn is_class_registered(&self, module: ModuleHandle, class_name: &str) -> bool;

    /// Register a window class; fails if it already exists
    fn register_class(&self, class: &WindowClass) -> PlatformResult<()>;

    /// Create a window and associate `handler` with it
    ///
    /// The first-creation message must be dispatched to `handler` before this
    /// returns. The association lasts until the window is destroyed.
    fn create_window(
        &self,
        descriptor: &WindowDescriptor,
        handler: Weak<dyn MessageHandler>,
    ) -> PlatformResult<WindowId>;

    /// Destroy a window, delivering its destroy notification
    fn destroy_window(&self, window: WindowId) -> PlatformResult<()>;

    /// Bring the window to the foreground and give it focus
    fn set_foreground(&self, window: WindowId) -> PlatformResult<()>;

    /// Change the window's visibility
    fn show_window(&self, window: WindowId, command: ShowCommand);

    /// Repaint the window immediately
    fn update_window(&self, window: WindowId) -> PlatformResult<()>;

    /// Current style bits
    fn window_style(&self, window: WindowId) -> WindowStyle;

    /// Replace the style bits
    fn set_window_style(&self, window: WindowId, style: WindowStyle);

    /// Re-apply the frame after a style change without moving, resizing,
    /// reordering, or activating the window
    fn refresh_frame(&self, window: WindowId) -> PlatformResult<()>;

    /// Detach any menu from the window
    fn remove_menu(&self, window: WindowId) -> PlatformResult<()>;

    /// Client-area bounds in client coordinates
    fn client_rect(&self, window: WindowId) -> PlatformResult<Rect>;

    /// Bounds of the desktop
    fn desktop_rect(&self) -> Rect;

    /// Whether the session is displayed remotely
    fn is_remote_session(&self) -> bool;

    /// Grow a client rectangle to the outer bounds a window of `style`
    /// (without menu) needs
    fn adjust_window_rect(&self, client: Rect, style: WindowStyle) -> Rect;

    /// Replace the title text
    fn set_window_text(&self, window: WindowId, text: &str) -> PlatformResult<()>;

    /// Native handle a renderer can build a swapchain surface from
    ///
    /// `None` when the platform has no native window behind `window`.
    fn raw_window_handle(&self, window: WindowId) -> Option<RawWindowHandle>;
}

/// Register `class` unless the platform already knows it
///
/// Returns `true` when this call performed the registration. Classes are never
/// unregistered; they live as long as the process.
pub fn ensure_class_registered<P: WindowPlatform + ?Sized>(
    platform: &P,
    class: &WindowClass,
) -> PlatformResult<bool> {
    if platform.is_class_registered(class.module, class.name) {
        return Ok(false);
    }

    platform.register_class(class)?;
    log::debug!("Registered window class {}", class.name);
    Ok(true)
}
