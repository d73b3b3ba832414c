//! Platform windowing backends
//!
//! A [`Platform`] is the process-global windowing subsystem seen through
//! associated functions only: class registration, native window creation,
//! message draining and the per-handle setters the window layer needs. Exactly
//! one backend drives a given [`Window`](crate::Window); it is selected by the
//! window's type parameter and defaults to [`DefaultPlatform`].
//!
//! - [`headless::Headless`]: scripted in-memory backend for tests and hosts
//!   without a native implementation
//! - `win32::Win32`: the native backend (Windows only)

use std::ffi::{c_void, CStr};

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::error::{WindowError, WindowResult};
use crate::event::Modifiers;
use crate::message::RawMessage;
use crate::style::WindowStyle;

mod class;
pub mod headless;

#[cfg(windows)]
pub mod win32;

/// Backend used when a window does not name one
#[cfg(windows)]
pub type DefaultPlatform = win32::Win32;

/// Backend used when a window does not name one
#[cfg(not(windows))]
pub type DefaultPlatform = headless::Headless;

/// Opaque native window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(usize);

impl NativeHandle {
    /// Wrap a raw platform handle value
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw platform handle value
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

/// Parameters applied atomically when a native window is created
#[derive(Debug, Clone, Copy)]
pub struct WindowDesc<'a> {
    /// Client width in pixels
    pub width: i32,
    /// Client height in pixels
    pub height: i32,
    /// Title bar text
    pub title: &'a str,
    /// Decoration flags
    pub style: WindowStyle,
}

/// A raw message as delivered for one native window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    /// Target window
    pub handle: NativeHandle,
    /// The message triple
    pub message: RawMessage,
    /// Modifier state captured at delivery
    pub modifiers: Modifiers,
}

/// RGBA8 pixel data for a window icon
#[derive(Debug, Clone, Copy)]
pub struct IconImage<'a> {
    width: u32,
    height: u32,
    rgba: &'a [u8],
}

impl<'a> IconImage<'a> {
    /// Validate that `rgba` holds exactly `width * height` pixels
    pub fn new(width: u32, height: u32, rgba: &'a [u8]) -> WindowResult<Self> {
        let invalid = |expected| WindowError::InvalidIcon { width, height, expected, actual: rgba.len() };
        // Dimensions too large to address are reported with `usize::MAX`
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| invalid(usize::MAX))?;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(invalid(expected));
        }
        Ok(Self { width, height, rgba })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixels
    pub fn rgba(&self) -> &'a [u8] {
        self.rgba
    }
}

/// The windowing subsystem consumed by [`Window`](crate::Window)
///
/// All functions must be called from the thread that pumps messages for the
/// windows involved.
pub trait Platform: 'static {
    /// Owned icon resource
    type Icon;
    /// Owned legacy graphics context
    type GlContext;

    /// Register the window class shared by every window
    fn register_class() -> WindowResult<()>;

    /// Unregister the window class
    fn unregister_class();

    /// Create a native window with size, title and style applied before it is shown
    fn create_window(desc: &WindowDesc<'_>) -> WindowResult<NativeHandle>;

    /// Destroy a native window
    fn destroy_window(handle: NativeHandle);

    /// Deliver every pending message of this thread, in platform order
    fn drain_messages() -> Vec<Dispatched>;

    /// Client area size
    fn client_size(handle: NativeHandle) -> (i32, i32);

    /// Resize the client area
    fn set_client_size(handle: NativeHandle, width: i32, height: i32);

    /// Client area origin in screen coordinates
    fn position(handle: NativeHandle) -> (i32, i32);

    /// Move the client area origin
    fn set_position(handle: NativeHandle, x: i32, y: i32);

    /// Replace the title text
    fn set_title(handle: NativeHandle, title: &str);

    /// Show or hide the window
    fn set_visible(handle: NativeHandle, visible: bool);

    /// Create an icon from pixel data
    fn create_icon(image: &IconImage<'_>) -> WindowResult<Self::Icon>;

    /// Load an icon from the executable's resources
    fn load_icon(resource_id: u16) -> WindowResult<Self::Icon>;

    /// Make `icon` the window's icon
    fn install_icon(handle: NativeHandle, icon: &Self::Icon);

    /// Release an icon
    fn destroy_icon(icon: Self::Icon);

    /// Show or hide the cursor over the client area
    fn set_cursor_visible(handle: NativeHandle, visible: bool);

    /// Confine the cursor to the client area, or release the confinement
    fn clip_cursor(handle: NativeHandle, clip: bool);

    /// Ask for one pointer-leave notification
    fn track_mouse_leave(handle: NativeHandle);

    /// Select a pixel format and bind a legacy context to the window
    fn create_gl_context(handle: NativeHandle) -> WindowResult<Self::GlContext>;

    /// Swap front and back buffers
    fn swap_buffers(handle: NativeHandle, context: &Self::GlContext);

    /// Look up a legacy API entry point; null when unknown
    fn gl_proc_address(name: &CStr) -> *const c_void;

    /// Unbind and release a legacy context
    fn destroy_gl_context(handle: NativeHandle, context: Self::GlContext);
}

/// Platforms whose windows can back a GPU presentation surface
pub trait PresentationPlatform: Platform {
    /// Raw window handle for surface creation
    fn raw_window_handle(handle: NativeHandle) -> RawWindowHandle;

    /// Raw display handle for instance extension selection
    fn raw_display_handle() -> RawDisplayHandle;
}

/// An icon released when dropped
pub struct OwnedIcon<P: Platform> {
    icon: Option<P::Icon>,
}

impl<P: Platform> OwnedIcon<P> {
    /// Take ownership of a platform icon
    pub fn new(icon: P::Icon) -> Self {
        Self { icon: Some(icon) }
    }

    /// Borrow the platform icon
    pub fn get(&self) -> Option<&P::Icon> {
        self.icon.as_ref()
    }
}

impl<P: Platform> Drop for OwnedIcon<P> {
    fn drop(&mut self) {
        if let Some(icon) = self.icon.take() {
            P::destroy_icon(icon);
        }
    }
}
