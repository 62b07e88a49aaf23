//! Windowing platform backends
//!
//! - **`headless`**: in-memory desktop, available everywhere
//! - **`win32`**: native `user32` backend on 64-bit Windows
//!
//! [`NativePlatform`] names whichever backend the build target supports.

pub mod headless;
#[cfg(all(windows, target_pointer_width = "64"))]
pub mod win32;

pub use headless::HeadlessPlatform;
#[cfg(all(windows, target_pointer_width = "64"))]
pub use win32::Win32Platform;

/// Native windowing backend for this target
#[cfg(all(windows, target_pointer_width = "64"))]
pub type NativePlatform = Win32Platform;

/// Native windowing backend for this target
#[cfg(not(all(windows, target_pointer_width = "64")))]
pub type NativePlatform = HeadlessPlatform;
