//! Application-facing window
//!
//! A [`Window`] owns one native window for its whole life: construction
//! creates it, drop destroys it. In between it can take one legacy graphics
//! context, and it collects the events translated from platform messages until
//! the application pulls them.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::{debug, warn};
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle, RawDisplayHandle, RawWindowHandle};

use crate::config::WindowConfig;
use crate::error::{WindowError, WindowResult};
use crate::event::Event;
use crate::graphics::LegacyContext;
use crate::platform::{DefaultPlatform, IconImage, NativeHandle, OwnedIcon, Platform, PresentationPlatform, WindowDesc};
use crate::style::WindowStyle;

use super::inner::WindowCore;
use super::hook::MessageHook;
use super::registry;
use super::state::WindowState;

/// Lifecycle stage of a live window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStage {
    /// Native window exists, no graphics context
    Live,
    /// A legacy graphics context is bound
    ContextAttached,
}

/// A native window with a typed event queue
///
/// Not `Send`: a window may only be driven from the thread that created it.
pub struct Window<P: Platform = DefaultPlatform> {
    handle: NativeHandle,
    core: Rc<RefCell<WindowCore>>,
    icon: Option<OwnedIcon<P>>,
    context: Option<LegacyContext<P>>,
}

impl<P: Platform> Window<P> {
    /// Create a window with the given client size, title and decorations
    ///
    /// Fails when the window class cannot be registered or the platform
    /// refuses to create the window; nothing is left behind in that case.
    pub fn new(width: i32, height: i32, title: &str, style: WindowStyle) -> WindowResult<Self> {
        registry::acquire_class::<P>()?;

        let desc = WindowDesc { width, height, title, style };
        let handle = match P::create_window(&desc) {
            Ok(handle) => handle,
            Err(err) => {
                registry::release_class::<P>();
                return Err(err);
            }
        };

        let state = WindowState::new(P::client_size(handle), P::position(handle));
        let core = Rc::new(RefCell::new(WindowCore::new(state)));
        registry::insert(handle, &core);

        debug!("Created window {:#x} \"{}\" ({}x{}, {:?})", handle.as_raw(), title, width, height, style);

        Ok(Self { handle, core, icon: None, context: None })
    }

    /// Create a window from a configuration and apply its initial settings
    pub fn from_config(config: &WindowConfig) -> WindowResult<Self> {
        let mut window = Self::new(config.width, config.height, &config.title, config.style)?;
        window.set_key_repeat(config.key_repeat);
        window.set_cursor_visible(config.cursor_visible);
        window.set_cursor_capture(config.cursor_capture);
        if !config.visible {
            window.set_visible(false);
        }
        Ok(window)
    }

    /// Drain pending platform messages and translate them into events
    ///
    /// Messages for every window of this thread are delivered, each to the
    /// queue of the window that owns it, in platform order.
    pub fn pump_events(&mut self) {
        for dispatched in P::drain_messages() {
            registry::route::<P>(dispatched);
        }
    }

    /// Whether any event is waiting
    pub fn has_event(&self) -> bool {
        !self.core().queue.is_empty()
    }

    /// Number of waiting events
    pub fn pending_events(&self) -> usize {
        self.core().queue.len()
    }

    /// Remove and return the oldest event, or `None` when the queue is empty
    pub fn pop_event(&mut self) -> Option<Event> {
        self.core_mut().queue.pop_front()
    }

    /// Remove and return every waiting event in arrival order
    pub fn pop_all_events(&mut self) -> Vec<Event> {
        self.core_mut().queue.drain(..).collect()
    }

    /// Install a hook that sees raw messages before translation
    pub fn set_message_hook<H>(&mut self, hook: H)
    where
        H: MessageHook + 'static,
    {
        self.core_mut().hook = Some(Box::new(hook));
    }

    /// Remove the installed hook, if any
    pub fn clear_message_hook(&mut self) {
        self.core_mut().hook = None;
    }

    /// Bind a legacy graphics context to this window
    ///
    /// Only one context may ever be attached.
    pub fn attach_legacy_context(&mut self) -> WindowResult<&LegacyContext<P>> {
        if self.context.is_some() {
            warn!("Window {:#x} already has a graphics context", self.handle.as_raw());
            return Err(WindowError::ContextAlreadyAttached);
        }
        Ok(self.context.insert(LegacyContext::create(self.handle)?))
    }

    /// The attached legacy context, if any
    pub fn legacy_context(&self) -> Option<&LegacyContext<P>> {
        self.context.as_ref()
    }

    /// Swap the buffers of the attached legacy context
    pub fn present_frame(&self) -> WindowResult<()> {
        let context = self.context.as_ref().ok_or(WindowError::NoGraphicsContext)?;
        context.present();
        Ok(())
    }

    /// Current lifecycle stage
    pub fn stage(&self) -> WindowStage {
        if self.context.is_some() {
            WindowStage::ContextAttached
        } else {
            WindowStage::Live
        }
    }

    /// Opaque native handle for graphics collaborators
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Drawable client area size in pixels
    pub fn client_size(&self) -> (i32, i32) {
        P::client_size(self.handle)
    }

    /// Client area size in pixels
    pub fn size(&self) -> (i32, i32) {
        P::client_size(self.handle)
    }

    /// Resize the client area
    ///
    /// Does nothing when the size is already current. The resulting
    /// [`Event::Resize`] comes from the platform's notification, not from here.
    pub fn set_size(&mut self, width: i32, height: i32) {
        if self.size() == (width, height) {
            return;
        }
        P::set_client_size(self.handle, width, height);
    }

    /// Client area origin in screen coordinates
    pub fn position(&self) -> (i32, i32) {
        P::position(self.handle)
    }

    /// Move the client area origin; does nothing when already there
    pub fn set_position(&mut self, x: i32, y: i32) {
        if self.position() == (x, y) {
            return;
        }
        P::set_position(self.handle, x, y);
    }

    /// Replace the title text
    pub fn set_title(&mut self, title: &str) {
        P::set_title(self.handle, title);
    }

    /// Show or hide the window
    pub fn set_visible(&mut self, visible: bool) {
        P::set_visible(self.handle, visible);
    }

    /// Replace the icon with RGBA8 pixel data
    pub fn set_icon(&mut self, width: u32, height: u32, rgba: &[u8]) -> WindowResult<()> {
        let image = IconImage::new(width, height, rgba)?;
        let icon = OwnedIcon::new(P::create_icon(&image)?);
        self.replace_icon(icon);
        Ok(())
    }

    /// Replace the icon with one from the executable's resources
    pub fn set_icon_resource(&mut self, resource_id: u16) -> WindowResult<()> {
        let icon = OwnedIcon::new(P::load_icon(resource_id)?);
        self.replace_icon(icon);
        Ok(())
    }

    fn replace_icon(&mut self, icon: OwnedIcon<P>) {
        // Release the previous icon before the new one goes in
        self.icon = None;
        if let Some(raw) = icon.get() {
            P::install_icon(self.handle, raw);
        }
        self.icon = Some(icon);
    }

    /// Whether the cursor is drawn over the client area
    pub fn cursor_visible(&self) -> bool {
        self.core().state.cursor_visible
    }

    /// Show or hide the cursor over the client area
    pub fn set_cursor_visible(&mut self, visible: bool) {
        if self.cursor_visible() == visible {
            return;
        }
        self.core_mut().state.cursor_visible = visible;
        P::set_cursor_visible(self.handle, visible);
    }

    /// Whether cursor confinement is requested
    pub fn cursor_capture(&self) -> bool {
        self.core().state.cursor_capture
    }

    /// Confine the cursor to the client area while the window has focus
    ///
    /// Focus loss releases the confinement without clearing the request;
    /// regaining focus applies it again.
    pub fn set_cursor_capture(&mut self, capture: bool) {
        let focused = {
            let mut core = self.core_mut();
            if core.state.cursor_capture == capture {
                return;
            }
            core.state.cursor_capture = capture;
            core.state.focused
        };

        if !capture {
            P::clip_cursor(self.handle, false);
        } else if focused {
            P::clip_cursor(self.handle, true);
        }
    }

    /// Whether held keys re-emit key presses
    pub fn key_repeat(&self) -> bool {
        self.core().state.key_repeat
    }

    /// Enable or disable auto-repeat key presses
    pub fn set_key_repeat(&mut self, repeat: bool) {
        self.core_mut().state.key_repeat = repeat;
    }

    fn core(&self) -> Ref<'_, WindowCore> {
        self.core.borrow()
    }

    fn core_mut(&self) -> RefMut<'_, WindowCore> {
        self.core.borrow_mut()
    }
}

impl<P: Platform> Drop for Window<P> {
    fn drop(&mut self) {
        self.context = None;

        if self.cursor_capture() {
            P::clip_cursor(self.handle, false);
        }

        registry::remove(self.handle);
        P::destroy_window(self.handle);
        self.icon = None;
        registry::release_class::<P>();

        debug!("Destroyed window {:#x}", self.handle.as_raw());
    }
}

impl<P: Platform> std::fmt::Debug for Window<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .field("stage", &self.stage())
            .field("pending_events", &self.pending_events())
            .finish()
    }
}

// SAFETY: the handle stays valid until the window is dropped, which the borrow
// of `self` prevents while the returned handle is being used.
#[allow(unsafe_code)]
unsafe impl<P: PresentationPlatform> HasRawWindowHandle for Window<P> {
    fn raw_window_handle(&self) -> RawWindowHandle {
        P::raw_window_handle(self.handle)
    }
}

#[allow(unsafe_code)]
unsafe impl<P: PresentationPlatform> HasRawDisplayHandle for Window<P> {
    fn raw_display_handle(&self) -> RawDisplayHandle {
        P::raw_display_handle()
    }
}
