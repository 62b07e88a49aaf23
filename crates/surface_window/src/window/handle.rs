//! Surface window handle
//!
//! [`SurfaceWindow`] owns (or observes) the single native window a graphics
//! output module renders into. It keeps three pieces of state: the bound
//! platform handle, whether this instance manages that handle's lifecycle, and
//! whether the decoration frame is still shown. Title text and geometry stay
//! with the platform and are never cached here.
//!
//! # Ownership
//! - **Managed**: created by [`SurfaceWindow::create`] or attached with
//!   `managed = true`. Presentation calls act on the window and
//!   [`SurfaceWindow::detach`] destroys it.
//! - **Unmanaged**: attached with `managed = false`. Presentation calls are
//!   ignored and detaching leaves the window alive.
//!
//! # Message Policy
//! Windows created here route their messages back to the instance:
//! close requests hide the window, destroy notifications are swallowed so the
//! host never sees a quit request, and everything else goes to the platform
//! default.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use raw_window_handle::RawWindowHandle;

use crate::config::SurfaceConfig;
use crate::window::backend::{
    ensure_class_registered, ShowCommand, WindowClass, WindowDescriptor, WindowId, WindowPlatform,
};
use crate::window::error::{RecoverableError, SurfaceResult};
use crate::window::geometry::{centered_on, resolve_surface_size, Rect};
use crate::window::message::{MessageHandler, Routing, WindowMessage};
use crate::window::style::WindowStyle;

/// Display surface backed by a single native window
///
/// Not `Send`: every call must happen on the thread running the platform
/// message loop.
pub struct SurfaceWindow<P: WindowPlatform + 'static> {
    state: Rc<SurfaceState<P>>,
}

/// State shared between the public handle and the platform's message routing
struct SurfaceState<P> {
    platform: P,
    handle: Cell<Option<WindowId>>,
    managed: Cell<bool>,
    frame_visible: Cell<bool>,
}

impl<P: WindowPlatform> SurfaceState<P> {
    /// Handle to act on, if this instance controls presentation
    fn presentable(&self) -> Option<WindowId> {
        if self.managed.get() {
            self.handle.get()
        } else {
            None
        }
    }

    fn show(&self) {
        let Some(window) = self.presentable() else {
            return;
        };

        if let Err(e) = self.platform.set_foreground(window) {
            log::warn!("Could not bring {} to the foreground: {}", window, e);
        }
        self.platform.show_window(window, ShowCommand::ShowNormal);
        if let Err(e) = self.platform.update_window(window) {
            log::warn!("Could not repaint {}: {}", window, e);
        }
    }

    fn hide(&self) {
        if let Some(window) = self.presentable() {
            self.platform.show_window(window, ShowCommand::Hide);
        }
    }
}

impl<P: WindowPlatform> MessageHandler for SurfaceState<P> {
    fn handle_message(&self, window: WindowId, message: WindowMessage) -> Routing {
        match message {
            WindowMessage::Create => {
                self.handle.set(Some(window));
                Routing::Default
            }
            WindowMessage::Close => {
                match self.handle.get() {
                    Some(bound) if bound != window => {
                        log::debug!("Close requested for {}; hiding bound {}", window, bound);
                    }
                    _ => log::debug!("Close requested for {}; hiding it", window),
                }
                self.hide();
                Routing::Handled(0)
            }
            WindowMessage::Destroy => {
                log::debug!("Destroy notification for {} swallowed", window);
                Routing::Handled(0)
            }
            WindowMessage::Other(_) => Routing::Default,
        }
    }
}

impl<P: WindowPlatform + 'static> SurfaceWindow<P> {
    /// Create an unbound surface on `platform`
    pub fn new(platform: P) -> Self {
        Self {
            state: Rc::new(SurfaceState {
                platform,
                handle: Cell::new(None),
                managed: Cell::new(true),
                frame_visible: Cell::new(true),
            }),
        }
    }

    /// Create a managed window and bind it
    ///
    /// Non-positive `width` or `height`, or a remote session, selects the
    /// default size derived from the desktop width. The window is centered on
    /// the desktop and starts hidden.
    ///
    /// # Errors
    /// [`RecoverableError::AlreadyBound`] if a window is already bound,
    /// otherwise the registration or creation failure reported by the
    /// platform. Retrying on the same instance is not supported.
    pub fn create(&mut self, title: &str, width: i32, height: i32) -> SurfaceResult<()> {
        if let Some(window) = self.state.handle.get() {
            return Err(RecoverableError::AlreadyBound(window));
        }

        self.state.managed.set(true);

        let platform = &self.state.platform;
        let class = WindowClass::surface(platform.module_handle());
        ensure_class_registered(platform, &class).map_err(RecoverableError::ClassRegistration)?;

        let style = WindowStyle::surface();
        let desktop = platform.desktop_rect();
        let (width, height) =
            resolve_surface_size(width, height, &desktop, platform.is_remote_session());
        let bounds = platform.adjust_window_rect(centered_on(&desktop, width, height), style);

        let descriptor = WindowDescriptor {
            class,
            title: title.to_owned(),
            style,
            bounds,
        };
        let handler: Weak<SurfaceState<P>> = Rc::downgrade(&self.state);

        match platform.create_window(&descriptor, handler) {
            Ok(window) => {
                self.state.handle.set(Some(window));
                log::info!(
                    "Created surface {} ({}x{} client) \"{}\"",
                    window,
                    width,
                    height,
                    title
                );
                Ok(())
            }
            Err(e) => {
                // The first-creation message may already have bound a handle
                self.state.handle.set(None);
                Err(RecoverableError::WindowCreation(e))
            }
        }
    }

    /// Create a window from a [`SurfaceConfig`] and apply its presentation options
    ///
    /// # Errors
    /// Same as [`create`](Self::create).
    pub fn create_from_config(&mut self, config: &SurfaceConfig) -> SurfaceResult<()> {
        self.create(&config.title, config.width, config.height)?;

        if config.hide_frame {
            self.hide_frame();
        }
        if config.show_on_create {
            self.show();
        }

        Ok(())
    }

    /// Bind an existing window created elsewhere
    ///
    /// The handle is not validated; a stale handle shows up later as platform
    /// failures. No message routing is installed for attached windows.
    pub fn attach(&mut self, window: WindowId, managed: bool) {
        if let Some(previous) = self.state.handle.get() {
            log::warn!("Attaching {} replaces bound {} without detaching it", window, previous);
        }

        self.state.handle.set(Some(window));
        self.state.managed.set(managed);
        log::info!("Attached surface {} (managed: {})", window, managed);
    }

    /// Release the bound window
    ///
    /// A managed window is destroyed; an unmanaged one is left untouched.
    /// Either way the instance returns to the unbound, managed state. The
    /// frame state is kept.
    pub fn detach(&mut self) {
        if let Some(window) = self.state.handle.get() {
            if self.state.managed.get() {
                if let Err(e) = self.state.platform.destroy_window(window) {
                    log::warn!("Failed to destroy {}: {}", window, e);
                }
                log::info!("Detached and destroyed surface {}", window);
            } else {
                log::info!("Detached from unmanaged surface {}", window);
            }
        }

        self.state.handle.set(None);
        self.state.managed.set(true);
    }

    /// Client-area bounds of the bound window
    ///
    /// Returns an empty rectangle when unbound or when the platform query fails.
    pub fn client_rect(&self) -> Rect {
        let Some(window) = self.state.handle.get() else {
            return Rect::default();
        };

        self.state.platform.client_rect(window).unwrap_or_else(|e| {
            log::warn!("Client rect query for {} failed: {}", window, e);
            Rect::default()
        })
    }

    /// Update the title text
    ///
    /// Returns `false` without touching the window when this instance does not
    /// manage it. Otherwise the title is updated and the result is
    /// [`frame_visible`](Self::frame_visible): callers treat `false` as "no
    /// visible title bar to show it in".
    pub fn set_title(&mut self, text: &str) -> bool {
        let Some(window) = self.state.presentable() else {
            return false;
        };

        if let Err(e) = self.state.platform.set_window_text(window, text) {
            log::warn!("Failed to set title of {}: {}", window, e);
        }

        self.state.frame_visible.get()
    }

    /// Focus, restore, and repaint the window
    pub fn show(&mut self) {
        self.state.show();
    }

    /// Hide the window without destroying it
    pub fn hide(&mut self) {
        self.state.hide();
    }

    /// Strip the title bar, sizing border, and menu
    ///
    /// There is no way back; the frame stays hidden for the life of the
    /// instance.
    pub fn hide_frame(&mut self) {
        let Some(window) = self.state.presentable() else {
            return;
        };

        let platform = &self.state.platform;
        let style = platform.window_style(window).difference(WindowStyle::frame());
        platform.set_window_style(window, style);
        if let Err(e) = platform.refresh_frame(window) {
            log::warn!("Failed to re-apply frame of {}: {}", window, e);
        }
        if let Err(e) = platform.remove_menu(window) {
            log::warn!("Failed to remove menu of {}: {}", window, e);
        }

        self.state.frame_visible.set(false);
        log::debug!("Frame hidden on {}", window);
    }

    /// Bound platform handle, if any
    pub fn handle(&self) -> Option<WindowId> {
        self.state.handle.get()
    }

    /// Whether a window is bound
    pub fn is_bound(&self) -> bool {
        self.state.handle.get().is_some()
    }

    /// Whether this instance owns the bound window's lifecycle
    pub fn is_managed(&self) -> bool {
        self.state.managed.get()
    }

    /// Whether the decoration frame is still shown
    pub fn frame_visible(&self) -> bool {
        self.state.frame_visible.get()
    }

    /// Platform this surface runs on
    pub fn platform(&self) -> &P {
        &self.state.platform
    }

    /// Native handle for building a render surface
    ///
    /// `None` when unbound or when the platform has no native window to hand
    /// out (the headless backend).
    pub fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        let window = self.state.handle.get()?;
        self.state.platform.raw_window_handle(window)
    }
}

impl<P: WindowPlatform + 'static> Drop for SurfaceWindow<P> {
    fn drop(&mut self) {
        if self.is_bound() {
            self.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{DecorationMetrics, HeadlessPlatform};
    use crate::window::backend::SURFACE_CLASS_NAME;

    fn created(platform: &HeadlessPlatform) -> SurfaceWindow<HeadlessPlatform> {
        let mut surface = SurfaceWindow::new(platform.clone());
        surface.create("Surface", 800, 600).unwrap();
        surface
    }

    #[test]
    fn test_new_surface_is_unbound() {
        let surface = SurfaceWindow::new(HeadlessPlatform::new());

        assert!(!surface.is_bound());
        assert!(surface.is_managed());
        assert!(surface.frame_visible());
        assert_eq!(surface.client_rect(), Rect::default());
        assert!(surface.raw_window_handle().is_none());
    }

    #[test]
    fn test_create_binds_managed_hidden_window() {
        let platform = HeadlessPlatform::new();
        let surface = created(&platform);

        let window = surface.handle().unwrap();
        let native = platform.window(window).unwrap();
        assert!(surface.is_managed());
        assert_eq!(native.class_name, SURFACE_CLASS_NAME);
        assert_eq!(native.title, "Surface");
        assert_eq!(native.style, WindowStyle::surface());
        assert!(!native.visible);
    }

    #[test]
    fn test_create_twice_fails_with_already_bound() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);
        let window = surface.handle().unwrap();

        let result = surface.create("Again", 800, 600);

        assert_eq!(result, Err(RecoverableError::AlreadyBound(window)));
        assert_eq!(surface.handle(), Some(window));
        assert_eq!(platform.window_count(), 1);
    }

    #[test]
    fn test_create_after_detach_succeeds() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);

        surface.detach();
        surface.create("Again", 800, 600).unwrap();

        assert!(surface.is_bound());
        assert_eq!(platform.window_count(), 1);
    }

    #[test]
    fn test_class_is_registered_once_per_process() {
        let platform = HeadlessPlatform::new();
        let _first = created(&platform);
        let _second = created(&platform);

        assert_eq!(platform.class_registrations(), 1);
    }

    #[test]
    fn test_class_registration_failure_is_recoverable() {
        let platform = HeadlessPlatform::new();
        platform.fail_class_registration(true);
        let mut surface = SurfaceWindow::new(platform.clone());

        let result = surface.create("Surface", 800, 600);

        assert!(matches!(result, Err(RecoverableError::ClassRegistration(_))));
        assert!(!surface.is_bound());
        assert_eq!(platform.window_count(), 0);
    }

    #[test]
    fn test_window_creation_failure_is_recoverable() {
        let platform = HeadlessPlatform::new();
        platform.fail_window_creation(true);
        let mut surface = SurfaceWindow::new(platform.clone());

        let result = surface.create("Surface", 800, 600);

        assert!(matches!(result, Err(RecoverableError::WindowCreation(_))));
        assert!(!surface.is_bound());
    }

    #[test]
    fn test_explicit_size_is_centered_and_expanded_for_decoration() {
        let platform = HeadlessPlatform::new();
        let surface = created(&platform);

        let native = platform.window(surface.handle().unwrap()).unwrap();
        // 800x600 centered on 1920x1080, grown by an 8px sizing border and 23px title bar
        assert_eq!(native.bounds, Rect::new(552, 209, 1368, 848));
        assert_eq!(surface.client_rect(), Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn test_default_size_doubles_on_local_session() {
        let local = HeadlessPlatform::new();
        let mut surface = SurfaceWindow::new(local.clone());
        surface.create("Local", 0, 0).unwrap();
        assert_eq!(surface.client_rect(), Rect::new(0, 0, 1280, 960));

        let remote = HeadlessPlatform::new();
        remote.set_remote_session(true);
        let mut surface = SurfaceWindow::new(remote.clone());
        surface.create("Remote", 0, 0).unwrap();
        assert_eq!(surface.client_rect(), Rect::new(0, 0, 640, 480));
    }

    #[test]
    fn test_remote_session_ignores_requested_size() {
        let platform = HeadlessPlatform::new();
        platform.set_remote_session(true);
        let mut surface = SurfaceWindow::new(platform.clone());

        surface.create("Remote", 1024, 768).unwrap();

        assert_eq!(surface.client_rect(), Rect::new(0, 0, 640, 480));
    }

    #[test]
    fn test_unmanaged_surface_ignores_presentation_calls() {
        let platform = HeadlessPlatform::new();
        let host = platform.spawn_external_window("Host");
        let before = platform.window(host).unwrap();
        let mut surface = SurfaceWindow::new(platform.clone());

        surface.attach(host, false);
        surface.show();
        surface.hide();
        surface.hide_frame();
        let titled = surface.set_title("Replaced");

        assert!(!titled);
        assert!(surface.frame_visible());
        assert_eq!(platform.window(host).unwrap(), before);
        assert_ne!(platform.foreground(), Some(host));
    }

    #[test]
    fn test_hide_frame_is_irreversible_and_idempotent() {
        let platform = HeadlessPlatform::new();
        let host = platform.spawn_external_window("Host");
        let mut surface = SurfaceWindow::new(platform.clone());
        surface.attach(host, true);

        surface.hide_frame();
        assert!(!surface.frame_visible());

        surface.hide_frame();
        surface.show();
        assert!(!surface.frame_visible());

        let native = platform.window(host).unwrap();
        assert!(!native.style.intersects(WindowStyle::frame()));
        assert!(!native.has_menu);
        assert_eq!(native.frame_refreshes, 2);
    }

    #[test]
    fn test_hide_frame_grows_client_area() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);

        surface.hide_frame();

        assert_eq!(surface.client_rect(), Rect::new(0, 0, 816, 639));
    }

    #[test]
    fn test_set_title_reports_frame_visibility() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);
        let window = surface.handle().unwrap();

        assert!(surface.set_title("Framed"));
        assert_eq!(platform.window(window).unwrap().title, "Framed");

        surface.hide_frame();
        assert!(!surface.set_title("Frameless"));
        assert_eq!(platform.window(window).unwrap().title, "Frameless");
    }

    #[test]
    fn test_set_title_unbound_is_noop() {
        let mut surface = SurfaceWindow::new(HeadlessPlatform::new());
        assert!(!surface.set_title("Nobody"));
    }

    #[test]
    fn test_show_focuses_restores_and_repaints() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);
        let window = surface.handle().unwrap();

        surface.show();

        let native = platform.window(window).unwrap();
        assert!(native.visible);
        assert_eq!(native.repaints, 1);
        assert_eq!(platform.foreground(), Some(window));

        surface.hide();
        assert!(!platform.window(window).unwrap().visible);
        assert!(platform.is_alive(window));
    }

    #[test]
    fn test_detach_destroys_managed_window() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);
        let window = surface.handle().unwrap();

        surface.detach();

        assert!(!platform.is_alive(window));
        assert!(!surface.is_bound());
        assert!(surface.is_managed());
    }

    #[test]
    fn test_detach_leaves_unmanaged_window_alive() {
        let platform = HeadlessPlatform::new();
        let host = platform.spawn_external_window("Host");
        let mut surface = SurfaceWindow::new(platform.clone());
        surface.attach(host, false);

        surface.detach();

        assert!(platform.is_alive(host));
        assert!(!surface.is_bound());
        assert!(surface.is_managed());
    }

    #[test]
    fn test_detach_keeps_frame_state() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);

        surface.hide_frame();
        surface.detach();

        assert!(!surface.frame_visible());
    }

    #[test]
    fn test_attached_managed_window_is_destroyed_on_detach() {
        let platform = HeadlessPlatform::new();
        let host = platform.spawn_external_window("Host");
        let mut surface = SurfaceWindow::new(platform.clone());
        surface.attach(host, true);

        surface.detach();

        assert!(!platform.is_alive(host));
    }

    #[test]
    fn test_close_request_hides_without_destroying() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);
        let window = surface.handle().unwrap();
        surface.show();

        let routed = platform.send_message(window, WindowMessage::Close);

        assert_eq!(routed, Routing::Handled(0));
        assert!(platform.is_alive(window));
        assert!(!platform.window(window).unwrap().visible);

        surface.show();
        assert!(platform.window(window).unwrap().visible);
    }

    #[test]
    fn test_destroy_notification_is_swallowed() {
        let platform = HeadlessPlatform::new();
        let surface = created(&platform);
        let window = surface.handle().unwrap();

        // The first-creation message already went to default handling
        let baseline = platform.window(window).unwrap().default_handled;

        let routed = platform.send_message(window, WindowMessage::Destroy);

        assert_eq!(routed, Routing::Handled(0));
        assert_eq!(platform.window(window).unwrap().default_handled, baseline);
        assert!(platform.is_alive(window));
        assert!(surface.is_bound());
    }

    #[test]
    fn test_other_messages_reach_default_handling() {
        let platform = HeadlessPlatform::new();
        let surface = created(&platform);
        let window = surface.handle().unwrap();
        // The first-creation message already went to default handling
        let baseline = platform.window(window).unwrap().default_handled;

        let routed = platform.send_message(window, WindowMessage::Other(0x000F));

        assert_eq!(routed, Routing::Default);
        assert_eq!(platform.window(window).unwrap().default_handled, baseline + 1);
    }

    #[test]
    fn test_close_on_unassociated_window_uses_default_handling() {
        let platform = HeadlessPlatform::new();
        let host = platform.spawn_external_window("Host");
        let mut surface = SurfaceWindow::new(platform.clone());
        surface.attach(host, true);

        let routed = platform.send_message(host, WindowMessage::Close);

        // Attached windows have no routing; the platform default closes them
        assert_eq!(routed, Routing::Default);
        assert!(!platform.is_alive(host));
    }

    #[test]
    fn test_messages_after_drop_use_default_handling() {
        let platform = HeadlessPlatform::new();
        let host = platform.spawn_external_window("Host");
        let window = {
            let mut surface = created(&platform);
            let window = surface.handle().unwrap();
            // Rebinding to an unmanaged window keeps the created one alive past drop
            surface.attach(host, false);
            window
        };

        assert!(platform.is_alive(window));
        assert_eq!(platform.send_message(window, WindowMessage::Destroy), Routing::Default);
    }

    #[test]
    fn test_drop_destroys_managed_window() {
        let platform = HeadlessPlatform::new();
        let window = created(&platform).handle().unwrap();

        assert!(!platform.is_alive(window));
    }

    #[test]
    fn test_create_from_config_applies_presentation() {
        let platform = HeadlessPlatform::new();
        let mut surface = SurfaceWindow::new(platform.clone());
        let config = SurfaceConfig {
            title: "Configured".to_string(),
            width: 640,
            height: 480,
            hide_frame: true,
            show_on_create: true,
        };

        surface.create_from_config(&config).unwrap();

        let native = platform.window(surface.handle().unwrap()).unwrap();
        assert_eq!(native.title, "Configured");
        assert!(native.visible);
        assert!(!native.style.has_caption());
        assert!(!surface.frame_visible());
    }

    #[test]
    fn test_headless_surface_has_no_render_handle() {
        let platform = HeadlessPlatform::new();
        let mut surface = created(&platform);
        assert!(surface.is_bound());
        assert!(surface.raw_window_handle().is_none());

        let host = platform.spawn_external_window("Host");
        surface.attach(host, false);
        assert!(surface.raw_window_handle().is_none());
    }

    #[test]
    fn test_close_on_replaced_window_hides_bound_window() {
        let platform = HeadlessPlatform::new();
        let host = platform.spawn_external_window("Host");
        let mut surface = created(&platform);
        let window = surface.handle().unwrap();
        surface.attach(host, true);

        let routed = platform.send_message(window, WindowMessage::Close);

        assert_eq!(routed, Routing::Handled(0));
        assert!(platform.is_alive(window));
        assert!(platform.is_alive(host));
        assert!(!platform.window(host).unwrap().visible);
    }

    #[test]
    fn test_custom_decoration_metrics_shape_window_bounds() {
        let platform = HeadlessPlatform::new();
        platform.set_metrics(DecorationMetrics {
            sizing_border: 4,
            thin_border: 1,
            caption: 20,
        });
        let surface = created(&platform);

        let native = surface.platform().window(surface.handle().unwrap()).unwrap();
        // 800x600 centered on 1920x1080, grown by a 4px sizing border and 20px title bar
        assert_eq!(native.bounds, Rect::new(556, 216, 1364, 844));
        assert_eq!(surface.client_rect(), Rect::new(0, 0, 800, 600));
    }
}
