//! Win32 windowing platform
//!
//! Thin wrappers over `user32`. The only logic of its own is the static window
//! procedure, which finds the owning surface through `GWLP_USERDATA`:
//!
//! - `WM_NCCREATE` moves the handler passed to `CreateWindowExW` into a heap
//!   slot stored in the window's user data.
//! - Every message is routed through [`dispatch`]; [`Routing::Default`] falls
//!   through to `DefWindowProcW`.
//! - `WM_NCDESTROY` clears the user data and frees the slot.
#![allow(unsafe_code)]

use std::cell::Cell;
use std::ffi::c_void;
use std::ptr;
use std::rc::Weak;

use raw_window_handle::{RawWindowHandle, Win32WindowHandle};
use windows_sys::Win32::Foundation::{GetLastError, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows_sys::Win32::Graphics::Gdi::{GetStockObject, UpdateWindow, BLACK_BRUSH};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRect, CreateWindowExW, DefWindowProcW, DestroyWindow, GetClassInfoW,
    GetClientRect, GetDesktopWindow, GetSystemMetrics, GetWindowLongPtrW, GetWindowLongW,
    GetWindowRect, LoadCursorW, RegisterClassW, SetForegroundWindow, SetMenu, SetWindowLongPtrW,
    SetWindowLongW, SetWindowPos, SetWindowTextW, ShowWindow, CREATESTRUCTW, GWLP_USERDATA,
    GWL_STYLE, IDC_ARROW, SM_REMOTESESSION, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, SWP_NOZORDER, SW_HIDE, SW_SHOWNORMAL, WM_NCCREATE, WM_NCDESTROY, WNDCLASSW,
};

use crate::window::backend::{
    ModuleHandle, PlatformError, PlatformResult, ShowCommand, WindowClass, WindowDescriptor,
    WindowId, WindowPlatform,
};
use crate::window::geometry::Rect;
use crate::window::message::{dispatch, MessageHandler, Routing, WindowMessage};
use crate::window::style::WindowStyle;

type HandlerSlot = Weak<dyn MessageHandler>;

/// Null-terminated UTF-16 copy of `text`
fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

const fn hwnd(window: WindowId) -> HWND {
    window.as_raw() as HWND
}

const fn to_rect(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

const fn from_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

fn os_error(operation: &'static str) -> PlatformError {
    // SAFETY: reads the calling thread's last-error value
    let code = unsafe { GetLastError() };
    PlatformError::Os { operation, code }
}

fn check(operation: &'static str, result: i32) -> PlatformResult<()> {
    if result == 0 {
        Err(os_error(operation))
    } else {
        Ok(())
    }
}

/// Window procedure shared by every surface window
unsafe extern "system" fn surface_window_proc(
    hwnd: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let slot = if message == WM_NCCREATE {
        // SAFETY: for WM_NCCREATE, lparam points at the CREATESTRUCTW whose
        // lpCreateParams is the Cell passed by `create_window`, which outlives
        // the CreateWindowExW call delivering this message.
        let pending = unsafe {
            let create = &*(lparam as *const CREATESTRUCTW);
            &*create.lpCreateParams.cast::<Cell<Option<HandlerSlot>>>()
        };
        match pending.take() {
            Some(handler) => {
                let slot = Box::into_raw(Box::new(handler));
                // SAFETY: hwnd is the window being created
                unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, slot as isize) };
                slot
            }
            None => ptr::null_mut(),
        }
    } else {
        // SAFETY: user data is either zero or a slot stored at WM_NCCREATE
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut HandlerSlot }
    };

    // SAFETY: a non-null slot stays valid until WM_NCDESTROY frees it below
    let handler = unsafe { slot.as_ref() }.and_then(Weak::upgrade);

    if message == WM_NCDESTROY && !slot.is_null() {
        // SAFETY: the slot was leaked from a Box at WM_NCCREATE and is only freed here
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Box::from_raw(slot));
        }
    }

    let routed = match WindowId::from_raw(hwnd as u64) {
        Some(window) => dispatch(handler.as_deref(), window, WindowMessage::from_raw(message)),
        None => Routing::Default,
    };

    match routed {
        Routing::Handled(result) => result,
        // SAFETY: forwarding the unmodified message to the default procedure
        Routing::Default => unsafe { DefWindowProcW(hwnd, message, wparam, lparam) },
    }
}

/// Native Win32 windowing platform
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Platform;

impl Win32Platform {
    /// Platform bound to the current process module
    pub const fn new() -> Self {
        Self
    }
}

impl WindowPlatform for Win32Platform {
    fn module_handle(&self) -> ModuleHandle {
        // SAFETY: a null name returns the handle of the calling executable
        let module = unsafe { GetModuleHandleW(ptr::null()) };
        ModuleHandle(module as u64)
    }

    fn is_class_registered(&self, module: ModuleHandle, class_name: &str) -> bool {
        let name = wide(class_name);
        // SAFETY: WNDCLASSW is plain data; zeroed is a valid out-parameter
        let mut class: WNDCLASSW = unsafe { std::mem::zeroed() };
        // SAFETY: name is null-terminated and outlives the call
        unsafe { GetClassInfoW(module.as_raw() as isize, name.as_ptr(), &mut class) != 0 }
    }

    fn register_class(&self, class: &WindowClass) -> PlatformResult<()> {
        let name = wide(class.name);
        let module = class.module.as_raw() as isize;

        // SAFETY: stock objects and system cursors need no cleanup
        let (cursor, background) =
            unsafe { (LoadCursorW(0, IDC_ARROW), GetStockObject(BLACK_BRUSH)) };

        let wc = WNDCLASSW {
            style: class.style.bits(),
            lpfnWndProc: Some(surface_window_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: module,
            hIcon: 0,
            hCursor: cursor,
            hbrBackground: background,
            lpszMenuName: ptr::null(),
            lpszClassName: name.as_ptr(),
        };

        // SAFETY: wc and the class name it points to are valid for the call;
        // the system copies the name during registration
        if unsafe { RegisterClassW(&wc) } == 0 {
            return Err(os_error("RegisterClassW"));
        }
        Ok(())
    }

    fn create_window(
        &self,
        descriptor: &WindowDescriptor,
        handler: Weak<dyn MessageHandler>,
    ) -> PlatformResult<WindowId> {
        let class_name = wide(descriptor.class.name);
        let title = wide(&descriptor.title);
        let bounds = descriptor.bounds;
        // Taken by the window procedure at WM_NCCREATE
        let pending: Cell<Option<HandlerSlot>> = Cell::new(Some(handler));

        // SAFETY: every pointer argument outlives the call, and `pending` is
        // only read synchronously from within it
        let hwnd = unsafe {
            CreateWindowExW(
                0,
                class_name.as_ptr(),
                title.as_ptr(),
                descriptor.style.bits(),
                bounds.left,
                bounds.top,
                bounds.width(),
                bounds.height(),
                0,
                0,
                descriptor.class.module.as_raw() as isize,
                ptr::addr_of!(pending).cast::<c_void>(),
            )
        };

        WindowId::from_raw(hwnd as u64).ok_or_else(|| os_error("CreateWindowExW"))
    }

    fn destroy_window(&self, window: WindowId) -> PlatformResult<()> {
        // SAFETY: destroying an invalid handle fails without side effects
        check("DestroyWindow", unsafe { DestroyWindow(hwnd(window)) })
    }

    fn set_foreground(&self, window: WindowId) -> PlatformResult<()> {
        // SAFETY: plain handle argument
        check("SetForegroundWindow", unsafe { SetForegroundWindow(hwnd(window)) })
    }

    fn show_window(&self, window: WindowId, command: ShowCommand) {
        let command = match command {
            ShowCommand::ShowNormal => SW_SHOWNORMAL,
            ShowCommand::Hide => SW_HIDE,
        };
        // SAFETY: plain handle argument; the result is the previous visibility
        unsafe { ShowWindow(hwnd(window), command) };
    }

    fn update_window(&self, window: WindowId) -> PlatformResult<()> {
        // SAFETY: plain handle argument
        check("UpdateWindow", unsafe { UpdateWindow(hwnd(window)) })
    }

    fn window_style(&self, window: WindowId) -> WindowStyle {
        // SAFETY: plain handle argument
        let bits = unsafe { GetWindowLongW(hwnd(window), GWL_STYLE) };
        WindowStyle::from_bits_retain(bits as u32)
    }

    fn set_window_style(&self, window: WindowId, style: WindowStyle) {
        // SAFETY: plain handle argument
        unsafe { SetWindowLongW(hwnd(window), GWL_STYLE, style.bits() as i32) };
    }

    fn refresh_frame(&self, window: WindowId) -> PlatformResult<()> {
        let flags = SWP_NOSIZE | SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED;
        // SAFETY: plain handle arguments
        check("SetWindowPos", unsafe { SetWindowPos(hwnd(window), 0, 0, 0, 0, 0, flags) })
    }

    fn remove_menu(&self, window: WindowId) -> PlatformResult<()> {
        // SAFETY: a null menu detaches the current one
        check("SetMenu", unsafe { SetMenu(hwnd(window), 0) })
    }

    fn client_rect(&self, window: WindowId) -> PlatformResult<Rect> {
        let mut rect = from_rect(Rect::default());
        // SAFETY: rect is a valid out-parameter
        check("GetClientRect", unsafe { GetClientRect(hwnd(window), &mut rect) })?;
        Ok(to_rect(rect))
    }

    fn desktop_rect(&self) -> Rect {
        let mut rect = from_rect(Rect::default());
        // SAFETY: the desktop window always exists; rect is a valid out-parameter
        if unsafe { GetWindowRect(GetDesktopWindow(), &mut rect) } == 0 {
            log::warn!("Desktop bounds query failed: {}", os_error("GetWindowRect"));
        }
        to_rect(rect)
    }

    fn is_remote_session(&self) -> bool {
        // SAFETY: no arguments besides the metric index
        unsafe { GetSystemMetrics(SM_REMOTESESSION) != 0 }
    }

    fn adjust_window_rect(&self, client: Rect, style: WindowStyle) -> Rect {
        let mut rect = from_rect(client);
        // SAFETY: rect is a valid in/out parameter
        if unsafe { AdjustWindowRect(&mut rect, style.bits(), 0) } == 0 {
            log::warn!("Window rect adjustment failed: {}", os_error("AdjustWindowRect"));
            return client;
        }
        to_rect(rect)
    }

    fn set_window_text(&self, window: WindowId, text: &str) -> PlatformResult<()> {
        let text = wide(text);
        // SAFETY: text is null-terminated and outlives the call
        check("SetWindowTextW", unsafe { SetWindowTextW(hwnd(window), text.as_ptr()) })
    }

    fn raw_window_handle(&self, window: WindowId) -> Option<RawWindowHandle> {
        let mut handle = Win32WindowHandle::empty();
        handle.hwnd = hwnd(window) as *mut c_void;
        handle.hinstance = self.module_handle().as_raw() as isize as *mut c_void;
        Some(RawWindowHandle::Win32(handle))
    }
}
