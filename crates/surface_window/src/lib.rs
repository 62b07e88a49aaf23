//! # Surface Window
//!
//! Lifecycle manager for the single native window a graphics output module
//! renders into.
//!
//! ## Features
//!
//! - **Create or Attach**: own a new window, or observe one the host created
//! - **Message Policy**: close hides, destroy never quits, the rest is default
//! - **Frame Stripping**: drop the title bar and sizing border in place
//! - **Render Handle**: hand a `raw-window-handle` to the renderer
//! - **Headless Backend**: run everything without a display
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use surface_window::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut surface = SurfaceWindow::new(NativePlatform::default());
//!     surface.create("Output", 0, 0)?;
//!     surface.show();
//!
//!     // ... render into surface.raw_window_handle() ...
//!
//!     surface.detach();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod platform;
pub mod window;

pub use window::{RecoverableError, SurfaceWindow};

/// Common imports for surface users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SurfaceConfig},
        platform::{HeadlessPlatform, NativePlatform},
        window::{Rect, RecoverableError, SurfaceWindow, WindowId, WindowPlatform},
    };
}
