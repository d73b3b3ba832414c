//! Win32 windowing backend
//!
//! The window procedure does no translation of its own. It stamps every
//! message with the current modifier state and buffers it for the owning
//! thread; [`Win32::drain_messages`] runs the message loop and hands the buffer
//! to the window layer. Messages sent synchronously outside the loop, such as
//! the size notification raised by `SetWindowPos`, land in the same buffer and
//! are delivered on the next drain.

#![allow(unsafe_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::ffi::{c_void, CStr, OsStr};
use std::iter;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::ptr;

use log::{debug, warn};
use raw_window_handle::{RawDisplayHandle, RawWindowHandle, Win32WindowHandle, WindowsDisplayHandle};
use winapi::shared::minwindef::{BOOL, DWORD, FALSE, HINSTANCE, LPARAM, LRESULT, TRUE, UINT, WPARAM};
use winapi::shared::windef::{HDC, HGLRC, HICON, HWND, POINT, RECT};
use winapi::shared::winerror::ERROR_CLASS_ALREADY_EXISTS;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi::{GetModuleHandleA, GetModuleHandleW, GetProcAddress};
use winapi::um::wingdi::{
    wglCreateContext, wglDeleteContext, wglGetProcAddress, wglMakeCurrent, ChoosePixelFormat, CreateBitmap,
    DeleteObject, SetPixelFormat, SwapBuffers, PFD_DOUBLEBUFFER, PFD_DRAW_TO_WINDOW, PFD_MAIN_PLANE,
    PFD_SUPPORT_OPENGL, PFD_TYPE_RGBA, PIXELFORMATDESCRIPTOR,
};
use winapi::um::winuser::*;

use crate::error::{WindowError, WindowResult};
use crate::event::Modifiers;
use crate::message::{low_word, RawMessage};
use crate::style::WindowStyle;

use super::class::SharedClass;
use super::{Dispatched, IconImage, NativeHandle, Platform, PresentationPlatform, WindowDesc};

const CLASS_NAME: &str = "native_window_class";

static CLASS: SharedClass = SharedClass::new();

thread_local! {
    static PENDING: RefCell<Vec<Dispatched>> = RefCell::new(Vec::new());
    static HIDDEN_CURSOR: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// The native Win32 platform
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32;

/// An owned `HICON`
#[derive(Debug)]
pub struct Win32Icon(HICON);

/// An owned WGL context and the device context it is bound to
#[derive(Debug)]
pub struct Win32Context {
    hdc: HDC,
    hglrc: HGLRC,
}

fn wide(text: &str) -> Vec<u16> {
    OsStr::new(text).encode_wide().chain(iter::once(0)).collect()
}

fn hwnd(handle: NativeHandle) -> HWND {
    handle.as_raw() as HWND
}

fn instance() -> HINSTANCE {
    unsafe { GetModuleHandleW(ptr::null()) }
}

fn last_error() -> u32 {
    unsafe { GetLastError() }
}

fn key_down(vk: i32) -> bool {
    unsafe { GetKeyState(vk) < 0 }
}

fn key_toggled(vk: i32) -> bool {
    unsafe { GetKeyState(vk) & 1 != 0 }
}

fn current_modifiers() -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, key_down(VK_SHIFT));
    modifiers.set(Modifiers::CONTROL, key_down(VK_CONTROL));
    modifiers.set(Modifiers::ALT, key_down(VK_MENU));
    modifiers.set(Modifiers::SUPER, key_down(VK_LWIN) || key_down(VK_RWIN));
    modifiers.set(Modifiers::CAPS_LOCK, key_toggled(VK_CAPITAL));
    modifiers.set(Modifiers::NUM_LOCK, key_toggled(VK_NUMLOCK));
    modifiers
}

fn window_styles(style: WindowStyle) -> (DWORD, DWORD) {
    let mut ws = WS_CLIPCHILDREN | WS_CLIPSIBLINGS;
    if style.has_title_bar() {
        ws |= WS_OVERLAPPED | WS_CAPTION | WS_MINIMIZEBOX;
    } else {
        ws |= WS_POPUP | WS_BORDER;
    }
    if style.is_resizable() {
        ws |= WS_THICKFRAME | WS_MAXIMIZEBOX;
    }
    if style.has_close_button() {
        ws |= WS_SYSMENU;
    }
    (ws, WS_EX_APPWINDOW)
}

/// Outer window size for a client area of `width` x `height`
fn outer_size(hwnd: HWND, width: i32, height: i32) -> (i32, i32) {
    let mut rect = RECT { left: 0, top: 0, right: width, bottom: height };
    unsafe {
        let style = GetWindowLongW(hwnd, GWL_STYLE) as DWORD;
        let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE) as DWORD;
        AdjustWindowRectEx(&mut rect, style, FALSE, ex_style);
    }
    (rect.right - rect.left, rect.bottom - rect.top)
}

fn client_origin(hwnd: HWND) -> POINT {
    let mut origin = POINT { x: 0, y: 0 };
    unsafe {
        ClientToScreen(hwnd, &mut origin);
    }
    origin
}

unsafe extern "system" fn window_procedure(hwnd: HWND, msg: UINT, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let handle = NativeHandle::from_raw(hwnd as usize);
    let dispatched = Dispatched {
        handle,
        message: RawMessage::new(msg, wparam, lparam),
        modifiers: current_modifiers(),
    };
    PENDING.with(|pending| pending.borrow_mut().push(dispatched));

    match msg {
        // Closing is the application's decision
        WM_CLOSE => 0,
        WM_SETCURSOR if u32::from(low_word(lparam as usize)) == HTCLIENT as u32 => {
            let hidden = HIDDEN_CURSOR.with(|hidden| hidden.borrow().contains(&handle.as_raw()));
            if hidden {
                SetCursor(ptr::null_mut());
                TRUE as LRESULT
            } else {
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

fn register_window_class() -> WindowResult<()> {
    let class_name = wide(CLASS_NAME);
    let class = WNDCLASSEXW {
        cbSize: mem::size_of::<WNDCLASSEXW>() as UINT,
        style: CS_OWNDC | CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(window_procedure),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: instance(),
        hIcon: ptr::null_mut(),
        hCursor: unsafe { LoadCursorW(ptr::null_mut(), IDC_ARROW) },
        hbrBackground: ptr::null_mut(),
        lpszMenuName: ptr::null(),
        lpszClassName: class_name.as_ptr(),
        hIconSm: ptr::null_mut(),
    };

    if unsafe { RegisterClassExW(&class) } == 0 {
        let code = last_error();
        if code != ERROR_CLASS_ALREADY_EXISTS {
            return Err(WindowError::ClassRegistration { code });
        }
        debug!("Window class was already registered");
    }
    Ok(())
}

fn unregister_window_class() {
    let class_name = wide(CLASS_NAME);
    if unsafe { UnregisterClassW(class_name.as_ptr(), instance()) } == FALSE {
        warn!("UnregisterClassW failed (platform error {})", last_error());
    }
}

impl Platform for Win32 {
    type Icon = Win32Icon;
    type GlContext = Win32Context;

    fn register_class() -> WindowResult<()> {
        CLASS.acquire(register_window_class)
    }

    fn unregister_class() {
        CLASS.release(unregister_window_class);
    }

    fn create_window(desc: &WindowDesc<'_>) -> WindowResult<NativeHandle> {
        let class_name = wide(CLASS_NAME);
        let title = wide(desc.title);
        let (style, ex_style) = window_styles(desc.style);

        let mut rect = RECT { left: 0, top: 0, right: desc.width, bottom: desc.height };
        unsafe {
            AdjustWindowRectEx(&mut rect, style, FALSE, ex_style);
        }

        let hwnd = unsafe {
            CreateWindowExW(
                ex_style,
                class_name.as_ptr(),
                title.as_ptr(),
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                rect.right - rect.left,
                rect.bottom - rect.top,
                ptr::null_mut(),
                ptr::null_mut(),
                instance(),
                ptr::null_mut(),
            )
        };
        if hwnd.is_null() {
            return Err(WindowError::Creation { code: last_error() });
        }

        unsafe {
            ShowWindow(hwnd, SW_SHOW);
        }
        Ok(NativeHandle::from_raw(hwnd as usize))
    }

    fn destroy_window(handle: NativeHandle) {
        HIDDEN_CURSOR.with(|hidden| hidden.borrow_mut().remove(&handle.as_raw()));
        if unsafe { DestroyWindow(hwnd(handle)) } == FALSE {
            warn!("DestroyWindow failed (platform error {})", last_error());
        }
        // Teardown notifications must not reach a later window reusing the handle
        PENDING.with(|pending| pending.borrow_mut().retain(|dispatched| dispatched.handle != handle));
    }

    fn drain_messages() -> Vec<Dispatched> {
        let mut msg: MSG = unsafe { mem::zeroed() };
        unsafe {
            while PeekMessageW(&mut msg, ptr::null_mut(), 0, 0, PM_REMOVE) != FALSE {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        PENDING.with(|pending| mem::take(&mut *pending.borrow_mut()))
    }

    fn client_size(handle: NativeHandle) -> (i32, i32) {
        let mut rect = RECT { left: 0, top: 0, right: 0, bottom: 0 };
        unsafe {
            GetClientRect(hwnd(handle), &mut rect);
        }
        (rect.right - rect.left, rect.bottom - rect.top)
    }

    fn set_client_size(handle: NativeHandle, width: i32, height: i32) {
        let hwnd = hwnd(handle);
        let (outer_width, outer_height) = outer_size(hwnd, width, height);
        unsafe {
            SetWindowPos(
                hwnd,
                ptr::null_mut(),
                0,
                0,
                outer_width,
                outer_height,
                SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }

    fn position(handle: NativeHandle) -> (i32, i32) {
        let origin = client_origin(hwnd(handle));
        (origin.x, origin.y)
    }

    fn set_position(handle: NativeHandle, x: i32, y: i32) {
        let hwnd = hwnd(handle);
        let origin = client_origin(hwnd);
        let mut frame = RECT { left: 0, top: 0, right: 0, bottom: 0 };
        unsafe {
            GetWindowRect(hwnd, &mut frame);
            SetWindowPos(
                hwnd,
                ptr::null_mut(),
                x - (origin.x - frame.left),
                y - (origin.y - frame.top),
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }

    fn set_title(handle: NativeHandle, title: &str) {
        let title = wide(title);
        unsafe {
            SetWindowTextW(hwnd(handle), title.as_ptr());
        }
    }

    fn set_visible(handle: NativeHandle, visible: bool) {
        unsafe {
            ShowWindow(hwnd(handle), if visible { SW_SHOW } else { SW_HIDE });
        }
    }

    fn create_icon(image: &IconImage<'_>) -> WindowResult<Win32Icon> {
        let width = image.width() as i32;
        let height = image.height() as i32;

        let bgra: Vec<u8> = image
            .rgba()
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[2], pixel[1], pixel[0], pixel[3]])
            .collect();
        // Monochrome rows are padded to 16 bits; an all-zero mask defers to alpha
        let mask_stride = ((image.width() as usize + 15) / 16) * 2;
        let mask = vec![0u8; mask_stride * image.height() as usize];

        unsafe {
            let color = CreateBitmap(width, height, 1, 32, bgra.as_ptr().cast());
            let monochrome = CreateBitmap(width, height, 1, 1, mask.as_ptr().cast());
            let mut info = ICONINFO {
                fIcon: TRUE,
                xHotspot: 0,
                yHotspot: 0,
                hbmMask: monochrome,
                hbmColor: color,
            };
            let icon = CreateIconIndirect(&mut info);
            let code = last_error();
            DeleteObject(color.cast());
            DeleteObject(monochrome.cast());

            if icon.is_null() {
                return Err(WindowError::IconCreation { code });
            }
            Ok(Win32Icon(icon))
        }
    }

    fn load_icon(resource_id: u16) -> WindowResult<Win32Icon> {
        let icon = unsafe {
            LoadImageW(instance(), MAKEINTRESOURCEW(resource_id), IMAGE_ICON, 0, 0, LR_DEFAULTSIZE)
        };
        if icon.is_null() {
            return Err(WindowError::IconCreation { code: last_error() });
        }
        Ok(Win32Icon(icon.cast()))
    }

    fn install_icon(handle: NativeHandle, icon: &Win32Icon) {
        unsafe {
            SendMessageW(hwnd(handle), WM_SETICON, ICON_BIG as WPARAM, icon.0 as LPARAM);
            SendMessageW(hwnd(handle), WM_SETICON, ICON_SMALL as WPARAM, icon.0 as LPARAM);
        }
    }

    fn destroy_icon(icon: Win32Icon) {
        unsafe {
            DestroyIcon(icon.0);
        }
    }

    fn set_cursor_visible(handle: NativeHandle, visible: bool) {
        HIDDEN_CURSOR.with(|hidden| {
            let mut hidden = hidden.borrow_mut();
            if visible {
                hidden.remove(&handle.as_raw());
            } else {
                hidden.insert(handle.as_raw());
            }
        });
    }

    fn clip_cursor(handle: NativeHandle, clip: bool) {
        if !clip {
            unsafe {
                ClipCursor(ptr::null());
            }
            return;
        }

        let hwnd = hwnd(handle);
        let mut rect = RECT { left: 0, top: 0, right: 0, bottom: 0 };
        unsafe {
            GetClientRect(hwnd, &mut rect);
            let mut top_left = POINT { x: rect.left, y: rect.top };
            let mut bottom_right = POINT { x: rect.right, y: rect.bottom };
            ClientToScreen(hwnd, &mut top_left);
            ClientToScreen(hwnd, &mut bottom_right);
            let screen = RECT {
                left: top_left.x,
                top: top_left.y,
                right: bottom_right.x,
                bottom: bottom_right.y,
            };
            ClipCursor(&screen);
        }
    }

    fn track_mouse_leave(handle: NativeHandle) {
        let mut track = TRACKMOUSEEVENT {
            cbSize: mem::size_of::<TRACKMOUSEEVENT>() as DWORD,
            dwFlags: TME_LEAVE,
            hwndTrack: hwnd(handle),
            dwHoverTime: 0,
        };
        if unsafe { TrackMouseEvent(&mut track) } == FALSE {
            warn!("TrackMouseEvent failed (platform error {})", last_error());
        }
    }

    fn create_gl_context(handle: NativeHandle) -> WindowResult<Win32Context> {
        let hwnd = hwnd(handle);
        let hdc = unsafe { GetDC(hwnd) };
        if hdc.is_null() {
            return Err(WindowError::ContextCreation(format!("GetDC failed (platform error {})", last_error())));
        }

        let release = |error: WindowError| {
            unsafe {
                ReleaseDC(hwnd, hdc);
            }
            Err(error)
        };

        let mut descriptor: PIXELFORMATDESCRIPTOR = unsafe { mem::zeroed() };
        descriptor.nSize = mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16;
        descriptor.nVersion = 1;
        descriptor.dwFlags = PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL | PFD_DOUBLEBUFFER;
        descriptor.iPixelType = PFD_TYPE_RGBA;
        descriptor.cColorBits = 32;
        descriptor.cDepthBits = 24;
        descriptor.cStencilBits = 8;
        descriptor.iLayerType = PFD_MAIN_PLANE;

        let format = unsafe { ChoosePixelFormat(hdc, &descriptor) };
        if format == 0 {
            return release(WindowError::PixelFormat(format!("ChoosePixelFormat failed (platform error {})", last_error())));
        }
        let set: BOOL = unsafe { SetPixelFormat(hdc, format, &descriptor) };
        if set == FALSE {
            return release(WindowError::PixelFormat(format!("SetPixelFormat failed (platform error {})", last_error())));
        }

        let hglrc = unsafe { wglCreateContext(hdc) };
        if hglrc.is_null() {
            return release(WindowError::ContextCreation(format!("wglCreateContext failed (platform error {})", last_error())));
        }
        if unsafe { wglMakeCurrent(hdc, hglrc) } == FALSE {
            let code = last_error();
            unsafe {
                wglDeleteContext(hglrc);
            }
            return release(WindowError::ContextCreation(format!("wglMakeCurrent failed (platform error {code})")));
        }

        Ok(Win32Context { hdc, hglrc })
    }

    fn swap_buffers(_handle: NativeHandle, context: &Win32Context) {
        unsafe {
            SwapBuffers(context.hdc);
        }
    }

    fn gl_proc_address(name: &CStr) -> *const c_void {
        let address = unsafe { wglGetProcAddress(name.as_ptr()) } as isize;
        // wglGetProcAddress signals failure with a handful of small sentinels
        if !matches!(address, -1 | 0 | 1 | 2 | 3) {
            return address as *const c_void;
        }

        unsafe {
            let module = GetModuleHandleA(b"opengl32.dll\0".as_ptr().cast());
            if module.is_null() {
                return ptr::null();
            }
            GetProcAddress(module, name.as_ptr()) as *const c_void
        }
    }

    fn destroy_gl_context(handle: NativeHandle, context: Win32Context) {
        unsafe {
            wglMakeCurrent(ptr::null_mut(), ptr::null_mut());
            wglDeleteContext(context.hglrc);
            ReleaseDC(hwnd(handle), context.hdc);
        }
    }
}

impl PresentationPlatform for Win32 {
    fn raw_window_handle(handle: NativeHandle) -> RawWindowHandle {
        let mut raw = Win32WindowHandle::empty();
        raw.hwnd = handle.as_raw() as *mut c_void;
        raw.hinstance = instance().cast();
        RawWindowHandle::Win32(raw)
    }

    fn raw_display_handle() -> RawDisplayHandle {
        RawDisplayHandle::Windows(WindowsDisplayHandle::empty())
    }
}
