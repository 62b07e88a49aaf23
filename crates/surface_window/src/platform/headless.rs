//! In-memory windowing platform
//!
//! `HeadlessPlatform` keeps every window in a slot map and models just enough
//! of a desktop window system for the surface to run without a display:
//! class registration, decoration metrics, visibility, focus, and synchronous
//! message delivery. Clones share the same desktop, so a test can hand one
//! clone to a surface and inspect the result through another.
//!
//! Default processing mirrors a desktop window system: a close request that
//! nobody handles destroys the window, everything else is counted and ignored.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use raw_window_handle::RawWindowHandle;
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::window::backend::{
    ModuleHandle, PlatformError, PlatformResult, ShowCommand, WindowClass, WindowDescriptor,
    WindowId, WindowPlatform,
};
use crate::window::geometry::{Insets, Rect};
use crate::window::message::{dispatch, MessageHandler, Routing, WindowMessage};
use crate::window::style::WindowStyle;

new_key_type! {
    struct WindowKey;
}

/// Module handle reported by every headless platform
pub const HEADLESS_MODULE: ModuleHandle = ModuleHandle(0x0040_0000);

/// Decoration thickness used for rect adjustment and client-area queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationMetrics {
    /// Sizing border on each edge (`THICK_FRAME`)
    pub sizing_border: i32,
    /// Thin border on each edge (`BORDER` or `DLG_FRAME` without `THICK_FRAME`)
    pub thin_border: i32,
    /// Title bar height (`CAPTION`)
    pub caption: i32,
}

impl Default for DecorationMetrics {
    fn default() -> Self {
        Self {
            sizing_border: 8,
            thin_border: 1,
            caption: 23,
        }
    }
}

impl DecorationMetrics {
    /// Per-edge decoration for a window of `style`
    pub fn insets(&self, style: WindowStyle) -> Insets {
        let edge = if style.contains(WindowStyle::THICK_FRAME) {
            self.sizing_border
        } else if style.intersects(WindowStyle::CAPTION) {
            self.thin_border
        } else {
            0
        };

        let mut insets = Insets::uniform(edge);
        if style.has_caption() {
            insets.top += self.caption;
        }
        insets
    }
}

/// Snapshot of one headless window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    /// Class the window was created from
    pub class_name: String,
    /// Title text
    pub title: String,
    /// Current style bits
    pub style: WindowStyle,
    /// Outer bounds, decoration included
    pub bounds: Rect,
    /// Shown or hidden
    pub visible: bool,
    /// Whether a menu is attached
    pub has_menu: bool,
    /// Immediate repaints requested
    pub repaints: u32,
    /// Frame re-applications requested
    pub frame_refreshes: u32,
    /// Messages that fell through to default processing
    pub default_handled: u32,
}

struct Slot {
    window: HeadlessWindow,
    handler: Option<Weak<dyn MessageHandler>>,
}

struct Desktop {
    bounds: Rect,
    remote: bool,
    metrics: DecorationMetrics,
    windows: SlotMap<WindowKey, Slot>,
    classes: HashSet<(ModuleHandle, String)>,
    class_registrations: usize,
    foreground: Option<WindowId>,
    fail_class_registration: bool,
    fail_window_creation: bool,
}

/// Windowing platform without a display
#[derive(Clone)]
pub struct HeadlessPlatform {
    desktop: Rc<RefCell<Desktop>>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn window_id(key: WindowKey) -> WindowId {
    // Slot map keys carry a non-zero version in their upper half
    WindowId::from_raw(key.data().as_ffi())
        .unwrap_or_else(|| unreachable!("slot map key is never zero"))
}

fn window_key(window: WindowId) -> WindowKey {
    KeyData::from_ffi(window.as_raw()).into()
}

impl HeadlessPlatform {
    /// Local 1920x1080 desktop with default decoration metrics
    pub fn new() -> Self {
        Self::with_desktop(Rect::new(0, 0, 1920, 1080))
    }

    /// Local desktop with the given bounds
    pub fn with_desktop(bounds: Rect) -> Self {
        Self {
            desktop: Rc::new(RefCell::new(Desktop {
                bounds,
                remote: false,
                metrics: DecorationMetrics::default(),
                windows: SlotMap::with_key(),
                classes: HashSet::new(),
                class_registrations: 0,
                foreground: None,
                fail_class_registration: false,
                fail_window_creation: false,
            })),
        }
    }

    /// Mark the session as remote (or local)
    pub fn set_remote_session(&self, remote: bool) {
        self.desktop.borrow_mut().remote = remote;
    }

    /// Replace the decoration metrics
    pub fn set_metrics(&self, metrics: DecorationMetrics) {
        self.desktop.borrow_mut().metrics = metrics;
    }

    /// Make class registration fail until cleared
    pub fn fail_class_registration(&self, fail: bool) {
        self.desktop.borrow_mut().fail_class_registration = fail;
    }

    /// Make window creation fail until cleared
    pub fn fail_window_creation(&self, fail: bool) {
        self.desktop.borrow_mut().fail_window_creation = fail;
    }

    /// Create a visible, framed window with a menu and no message routing,
    /// standing in for a window owned by the host application
    pub fn spawn_external_window(&self, title: &str) -> WindowId {
        let mut desktop = self.desktop.borrow_mut();
        let bounds = desktop.bounds;
        let key = desktop.windows.insert(Slot {
            window: HeadlessWindow {
                class_name: "HostWindow".to_string(),
                title: title.to_string(),
                style: WindowStyle::OVERLAPPED_WINDOW,
                bounds,
                visible: true,
                has_menu: true,
                repaints: 0,
                frame_refreshes: 0,
                default_handled: 0,
            },
            handler: None,
        });
        window_id(key)
    }

    /// Deliver a message as the platform's dispatch loop would
    ///
    /// Messages for unknown windows are dropped and report [`Routing::Default`].
    pub fn send_message(&self, window: WindowId, message: WindowMessage) -> Routing {
        let Some(handler) = self.with_slot(window, |slot| slot.handler.clone()) else {
            log::trace!("{:?} sent to missing {}", message, window);
            return Routing::Default;
        };

        // No borrow is held here: the handler calls back into the platform
        let handler = handler.and_then(|handler| handler.upgrade());
        let routed = dispatch(handler.as_deref(), window, message);

        if routed == Routing::Default {
            self.default_processing(window, message);
        }
        routed
    }

    /// Snapshot of a live window
    pub fn window(&self, window: WindowId) -> Option<HeadlessWindow> {
        self.with_slot(window, |slot| slot.window.clone())
    }

    /// Whether the window exists
    pub fn is_alive(&self, window: WindowId) -> bool {
        self.desktop.borrow().windows.contains_key(window_key(window))
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.desktop.borrow().windows.len()
    }

    /// Number of successful class registrations
    pub fn class_registrations(&self) -> usize {
        self.desktop.borrow().class_registrations
    }

    /// Window holding the foreground, if any
    pub fn foreground(&self) -> Option<WindowId> {
        self.desktop.borrow().foreground
    }

    fn with_slot<T>(&self, window: WindowId, f: impl FnOnce(&Slot) -> T) -> Option<T> {
        self.desktop.borrow().windows.get(window_key(window)).map(f)
    }

    fn with_slot_mut<T>(
        &self,
        window: WindowId,
        f: impl FnOnce(&mut Slot) -> T,
    ) -> PlatformResult<T> {
        self.desktop
            .borrow_mut()
            .windows
            .get_mut(window_key(window))
            .map(f)
            .ok_or(PlatformError::UnknownWindow(window))
    }

    fn default_processing(&self, window: WindowId, message: WindowMessage) {
        if self.with_slot_mut(window, |slot| slot.window.default_handled += 1).is_err() {
            return;
        }

        if message == WindowMessage::Close {
            if let Err(e) = self.destroy_window(window) {
                log::warn!("Default close of {} failed: {}", window, e);
            }
        }
    }
}

impl WindowPlatform for HeadlessPlatform {
    fn module_handle(&self) -> ModuleHandle {
        HEADLESS_MODULE
    }

    fn is_class_registered(&self, module: ModuleHandle, class_name: &str) -> bool {
        self.desktop
            .borrow()
            .classes
            .contains(&(module, class_name.to_string()))
    }

    fn register_class(&self, class: &WindowClass) -> PlatformResult<()> {
        let mut desktop = self.desktop.borrow_mut();
        if desktop.fail_class_registration {
            return Err(PlatformError::Rejected("RegisterClass"));
        }
        if !desktop.classes.insert((class.module, class.name.to_string())) {
            return Err(PlatformError::ClassAlreadyExists(class.name));
        }

        desktop.class_registrations += 1;
        Ok(())
    }

    fn create_window(
        &self,
        descriptor: &WindowDescriptor,
        handler: Weak<dyn MessageHandler>,
    ) -> PlatformResult<WindowId> {
        let window = {
            let mut desktop = self.desktop.borrow_mut();
            if desktop.fail_window_creation {
                return Err(PlatformError::Rejected("CreateWindow"));
            }
            let class = &descriptor.class;
            if !desktop.classes.contains(&(class.module, class.name.to_string())) {
                return Err(PlatformError::ClassNotRegistered(class.name));
            }

            let key = desktop.windows.insert(Slot {
                window: HeadlessWindow {
                    class_name: class.name.to_string(),
                    title: descriptor.title.clone(),
                    style: descriptor.style,
                    bounds: descriptor.bounds,
                    visible: false,
                    has_menu: false,
                    repaints: 0,
                    frame_refreshes: 0,
                    default_handled: 0,
                },
                handler: Some(handler),
            });
            window_id(key)
        };

        self.send_message(window, WindowMessage::Create);
        Ok(window)
    }

    fn destroy_window(&self, window: WindowId) -> PlatformResult<()> {
        if !self.is_alive(window) {
            return Err(PlatformError::UnknownWindow(window));
        }

        self.send_message(window, WindowMessage::Destroy);

        let mut desktop = self.desktop.borrow_mut();
        desktop.windows.remove(window_key(window));
        if desktop.foreground == Some(window) {
            desktop.foreground = None;
        }
        Ok(())
    }

    fn set_foreground(&self, window: WindowId) -> PlatformResult<()> {
        self.with_slot_mut(window, |_| ())?;
        self.desktop.borrow_mut().foreground = Some(window);
        Ok(())
    }

    fn show_window(&self, window: WindowId, command: ShowCommand) {
        let visible = command == ShowCommand::ShowNormal;
        if self.with_slot_mut(window, |slot| slot.window.visible = visible).is_err() {
            log::trace!("Show request for missing {} ignored", window);
        }
    }

    fn update_window(&self, window: WindowId) -> PlatformResult<()> {
        self.with_slot_mut(window, |slot| slot.window.repaints += 1)
    }

    fn window_style(&self, window: WindowId) -> WindowStyle {
        self.with_slot(window, |slot| slot.window.style)
            .unwrap_or_else(WindowStyle::empty)
    }

    fn set_window_style(&self, window: WindowId, style: WindowStyle) {
        if self.with_slot_mut(window, |slot| slot.window.style = style).is_err() {
            log::trace!("Style change for missing {} ignored", window);
        }
    }

    fn refresh_frame(&self, window: WindowId) -> PlatformResult<()> {
        self.with_slot_mut(window, |slot| slot.window.frame_refreshes += 1)
    }

    fn remove_menu(&self, window: WindowId) -> PlatformResult<()> {
        self.with_slot_mut(window, |slot| slot.window.has_menu = false)
    }

    fn client_rect(&self, window: WindowId) -> PlatformResult<Rect> {
        let metrics = self.desktop.borrow().metrics;
        let (bounds, style) = self
            .with_slot(window, |slot| (slot.window.bounds, slot.window.style))
            .ok_or(PlatformError::UnknownWindow(window))?;

        let client = bounds.shrink(metrics.insets(style));
        Ok(Rect::new(0, 0, client.width(), client.height()))
    }

    fn desktop_rect(&self) -> Rect {
        self.desktop.borrow().bounds
    }

    fn is_remote_session(&self) -> bool {
        self.desktop.borrow().remote
    }

    fn adjust_window_rect(&self, client: Rect, style: WindowStyle) -> Rect {
        client.expand(self.desktop.borrow().metrics.insets(style))
    }

    fn set_window_text(&self, window: WindowId, text: &str) -> PlatformResult<()> {
        self.with_slot_mut(window, |slot| slot.window.title = text.to_string())
    }

    fn raw_window_handle(&self, _window: WindowId) -> Option<RawWindowHandle> {
        // No native window exists to render into
        None
    }
}
