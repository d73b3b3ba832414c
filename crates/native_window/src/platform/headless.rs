//! Scripted in-memory platform
//!
//! `Headless` keeps a per-thread model of the windowing subsystem: windows
//! with geometry and titles, a pending message queue, icons, cursor clip and
//! pointer-leave tracking. Tests post raw messages with [`Headless::post`] and
//! inspect the model through the query helpers. Geometry setters behave like a
//! real platform and queue a size or move notification only when the value
//! actually changes.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::{c_void, CStr};

use crate::error::{WindowError, WindowResult};
use crate::event::Modifiers;
use crate::message::RawMessage;
use crate::style::WindowStyle;

use super::{Dispatched, IconImage, NativeHandle, Platform, WindowDesc};

/// Origin given to newly created windows
const DEFAULT_POSITION: (i32, i32) = (100, 100);

fn clamp_size(width: i32, height: i32) -> (u16, u16) {
    let clamp = |value: i32| value.clamp(0, i32::from(u16::MAX)) as u16;
    (clamp(width), clamp(height))
}

fn clamp_position(x: i32, y: i32) -> (i16, i16) {
    let clamp = |value: i32| value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    (clamp(x), clamp(y))
}

#[derive(Debug)]
struct HeadlessWindow {
    size: (i32, i32),
    position: (i32, i32),
    title: String,
    style: WindowStyle,
    visible: bool,
    cursor_visible: bool,
    icon: Option<u64>,
    leave_armed: bool,
    swaps: u32,
}

#[derive(Debug, Default)]
struct HeadlessState {
    class_registered: bool,
    class_registrations: usize,
    next_id: usize,
    windows: HashMap<NativeHandle, HeadlessWindow>,
    queue: VecDeque<Dispatched>,
    modifiers: Modifiers,
    live_icons: HashSet<u64>,
    live_contexts: HashSet<u64>,
    clip: Option<NativeHandle>,
    fail_next_window: bool,
    fail_next_pixel_format: bool,
}

impl HeadlessState {
    fn next_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    fn enqueue(&mut self, handle: NativeHandle, message: RawMessage) {
        let modifiers = self.modifiers;
        self.queue.push_back(Dispatched { handle, message, modifiers });
    }
}

thread_local! {
    static STATE: RefCell<HeadlessState> = RefCell::new(HeadlessState::default());
}

fn with_state<R>(f: impl FnOnce(&mut HeadlessState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

fn with_window<R>(handle: NativeHandle, f: impl FnOnce(&mut HeadlessWindow) -> R) -> Option<R> {
    with_state(|state| state.windows.get_mut(&handle).map(f))
}

/// In-memory platform for tests and hosts without a native backend
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

/// Icon owned by the headless platform
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessIcon(u64);

/// Legacy context owned by the headless platform
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessContext(u64);

impl Headless {
    /// Queue a raw message for `handle`, stamped with the current modifiers
    pub fn post(handle: NativeHandle, message: RawMessage) {
        with_state(|state| state.enqueue(handle, message));
    }

    /// Deliver a pointer-leave notification if tracking is armed for `handle`
    ///
    /// Returns whether a notification was queued; delivering one disarms tracking.
    pub fn post_mouse_leave(handle: NativeHandle) -> bool {
        with_state(|state| {
            let armed = state
                .windows
                .get_mut(&handle)
                .map_or(false, |window| std::mem::replace(&mut window.leave_armed, false));
            if armed {
                state.enqueue(handle, RawMessage::mouse_leave());
            }
            armed
        })
    }

    /// Set the modifier state stamped onto subsequently posted messages
    pub fn set_modifiers(modifiers: Modifiers) {
        with_state(|state| state.modifiers = modifiers);
    }

    /// Make the next window creation fail
    pub fn fail_next_window() {
        with_state(|state| state.fail_next_window = true);
    }

    /// Make the next legacy context creation fail pixel format selection
    pub fn fail_next_pixel_format() {
        with_state(|state| state.fail_next_pixel_format = true);
    }

    /// Whether the window class is currently registered
    pub fn is_class_registered() -> bool {
        with_state(|state| state.class_registered)
    }

    /// How many times the class has been registered on this thread
    pub fn class_registrations() -> usize {
        with_state(|state| state.class_registrations)
    }

    /// Whether `handle` names a live native window
    pub fn window_exists(handle: NativeHandle) -> bool {
        with_state(|state| state.windows.contains_key(&handle))
    }

    /// Title of a live window
    pub fn title(handle: NativeHandle) -> Option<String> {
        with_window(handle, |window| window.title.clone())
    }

    /// Style of a live window
    pub fn style(handle: NativeHandle) -> Option<WindowStyle> {
        with_window(handle, |window| window.style)
    }

    /// Visibility of a live window
    pub fn is_visible(handle: NativeHandle) -> bool {
        with_window(handle, |window| window.visible).unwrap_or(false)
    }

    /// Whether the cursor is drawn over a live window
    pub fn is_cursor_visible(handle: NativeHandle) -> bool {
        with_window(handle, |window| window.cursor_visible).unwrap_or(true)
    }

    /// Window the cursor is confined to, if any
    pub fn cursor_clip() -> Option<NativeHandle> {
        with_state(|state| state.clip)
    }

    /// Whether a pointer-leave notification is armed for `handle`
    pub fn is_leave_tracking_armed(handle: NativeHandle) -> bool {
        with_window(handle, |window| window.leave_armed).unwrap_or(false)
    }

    /// Number of icons created and not yet destroyed
    pub fn live_icons() -> usize {
        with_state(|state| state.live_icons.len())
    }

    /// Whether `handle` currently shows an icon
    pub fn has_icon(handle: NativeHandle) -> bool {
        with_window(handle, |window| window.icon.is_some()).unwrap_or(false)
    }

    /// Number of legacy contexts created and not yet destroyed
    pub fn live_contexts() -> usize {
        with_state(|state| state.live_contexts.len())
    }

    /// Number of buffer swaps presented on `handle`
    pub fn swap_count(handle: NativeHandle) -> u32 {
        with_window(handle, |window| window.swaps).unwrap_or(0)
    }

    /// Number of messages waiting to be drained
    pub fn pending_messages() -> usize {
        with_state(|state| state.queue.len())
    }
}

impl Platform for Headless {
    type Icon = HeadlessIcon;
    type GlContext = HeadlessContext;

    fn register_class() -> WindowResult<()> {
        with_state(|state| {
            state.class_registered = true;
            state.class_registrations += 1;
        });
        Ok(())
    }

    fn unregister_class() {
        with_state(|state| state.class_registered = false);
    }

    fn create_window(desc: &WindowDesc<'_>) -> WindowResult<NativeHandle> {
        with_state(|state| {
            if !state.class_registered {
                return Err(WindowError::Creation { code: 1407 });
            }
            if std::mem::take(&mut state.fail_next_window) {
                return Err(WindowError::Creation { code: 8 });
            }

            let handle = NativeHandle::from_raw(state.next_id() << 4);
            let (width, height) = clamp_size(desc.width, desc.height);
            state.windows.insert(
                handle,
                HeadlessWindow {
                    size: (i32::from(width), i32::from(height)),
                    position: DEFAULT_POSITION,
                    title: desc.title.to_owned(),
                    style: desc.style,
                    visible: true,
                    cursor_visible: true,
                    icon: None,
                    leave_armed: false,
                    swaps: 0,
                },
            );
            Ok(handle)
        })
    }

    fn destroy_window(handle: NativeHandle) {
        with_state(|state| {
            state.windows.remove(&handle);
            state.queue.retain(|dispatched| dispatched.handle != handle);
            if state.clip == Some(handle) {
                state.clip = None;
            }
        });
    }

    fn drain_messages() -> Vec<Dispatched> {
        with_state(|state| state.queue.drain(..).collect())
    }

    fn client_size(handle: NativeHandle) -> (i32, i32) {
        with_window(handle, |window| window.size).unwrap_or((0, 0))
    }

    fn set_client_size(handle: NativeHandle, width: i32, height: i32) {
        with_state(|state| {
            let Some(window) = state.windows.get_mut(&handle) else {
                return;
            };
            let (width, height) = clamp_size(width, height);
            let size = (i32::from(width), i32::from(height));
            if window.size == size {
                return;
            }
            window.size = size;
            state.enqueue(handle, RawMessage::size(width, height));
        });
    }

    fn position(handle: NativeHandle) -> (i32, i32) {
        with_window(handle, |window| window.position).unwrap_or((0, 0))
    }

    fn set_position(handle: NativeHandle, x: i32, y: i32) {
        with_state(|state| {
            let Some(window) = state.windows.get_mut(&handle) else {
                return;
            };
            let (x, y) = clamp_position(x, y);
            let position = (i32::from(x), i32::from(y));
            if window.position == position {
                return;
            }
            window.position = position;
            state.enqueue(handle, RawMessage::moved(x, y));
        });
    }

    fn set_title(handle: NativeHandle, title: &str) {
        with_window(handle, |window| window.title = title.to_owned());
    }

    fn set_visible(handle: NativeHandle, visible: bool) {
        with_window(handle, |window| window.visible = visible);
    }

    fn create_icon(_image: &IconImage<'_>) -> WindowResult<HeadlessIcon> {
        with_state(|state| {
            let id = state.next_id() as u64;
            state.live_icons.insert(id);
            Ok(HeadlessIcon(id))
        })
    }

    fn load_icon(resource_id: u16) -> WindowResult<HeadlessIcon> {
        if resource_id == 0 {
            return Err(WindowError::IconCreation { code: 1813 });
        }
        with_state(|state| {
            let id = state.next_id() as u64;
            state.live_icons.insert(id);
            Ok(HeadlessIcon(id))
        })
    }

    fn install_icon(handle: NativeHandle, icon: &HeadlessIcon) {
        with_window(handle, |window| window.icon = Some(icon.0));
    }

    fn destroy_icon(icon: HeadlessIcon) {
        with_state(|state| {
            state.live_icons.remove(&icon.0);
            for window in state.windows.values_mut() {
                if window.icon == Some(icon.0) {
                    window.icon = None;
                }
            }
        });
    }

    fn set_cursor_visible(handle: NativeHandle, visible: bool) {
        with_window(handle, |window| window.cursor_visible = visible);
    }

    fn clip_cursor(handle: NativeHandle, clip: bool) {
        with_state(|state| {
            if clip {
                state.clip = Some(handle);
            } else if state.clip == Some(handle) {
                state.clip = None;
            }
        });
    }

    fn track_mouse_leave(handle: NativeHandle) {
        with_window(handle, |window| window.leave_armed = true);
    }

    fn create_gl_context(_handle: NativeHandle) -> WindowResult<HeadlessContext> {
        with_state(|state| {
            if std::mem::take(&mut state.fail_next_pixel_format) {
                return Err(WindowError::PixelFormat("no RGBA double-buffered format".to_owned()));
            }
            let id = state.next_id() as u64;
            state.live_contexts.insert(id);
            Ok(HeadlessContext(id))
        })
    }

    fn swap_buffers(handle: NativeHandle, _context: &HeadlessContext) {
        with_window(handle, |window| window.swaps += 1);
    }

    fn gl_proc_address(_name: &CStr) -> *const c_void {
        std::ptr::null()
    }

    fn destroy_gl_context(_handle: NativeHandle, context: HeadlessContext) {
        with_state(|state| {
            state.live_contexts.remove(&context.0);
        });
    }
}
