//! Legacy immediate-mode graphics context

use std::ffi::{c_void, CStr};

use log::debug;

use crate::error::WindowResult;
use crate::platform::{NativeHandle, Platform};

/// A legacy context bound to one native window, released on drop
pub struct LegacyContext<P: Platform> {
    handle: NativeHandle,
    context: Option<P::GlContext>,
}

impl<P: Platform> LegacyContext<P> {
    /// Select a pixel format for `handle` and bind a new context to it
    pub(crate) fn create(handle: NativeHandle) -> WindowResult<Self> {
        let context = P::create_gl_context(handle)?;
        debug!("Legacy context created for window {:#x}", handle.as_raw());
        Ok(Self { handle, context: Some(context) })
    }

    /// Swap the front and back buffers
    pub fn present(&self) {
        if let Some(context) = &self.context {
            P::swap_buffers(self.handle, context);
        }
    }

    /// Look up an API entry point for a function loader
    pub fn proc_address(&self, name: &CStr) -> *const c_void {
        P::gl_proc_address(name)
    }
}

impl<P: Platform> Drop for LegacyContext<P> {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            P::destroy_gl_context(self.handle, context);
            debug!("Legacy context released for window {:#x}", self.handle.as_raw());
        }
    }
}
