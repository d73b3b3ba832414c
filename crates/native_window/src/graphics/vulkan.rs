//! Vulkan presentation surface attachment
//!
//! Instance creation stays with the caller. This module only reports which
//! instance extensions a window needs and turns a live window into a
//! `VkSurfaceKHR`.

#![allow(unsafe_code)]

use std::ffi::CStr;

use ash::{extensions::khr, vk, Entry, Instance};
use log::debug;
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle, RawDisplayHandle};

use crate::error::{WindowError, WindowResult};
use crate::platform::PresentationPlatform;
use crate::window::Window;

/// Instance extensions needed to present to windows of the given display
pub fn extension_names(display: RawDisplayHandle) -> WindowResult<Vec<&'static CStr>> {
    let names = ash_window::enumerate_required_extensions(display).map_err(WindowError::Surface)?;
    // SAFETY: ash-window hands out pointers into static nul-terminated names
    Ok(names.iter().map(|&name| unsafe { CStr::from_ptr(name) }).collect())
}

/// Instance extensions needed to present to windows of platform `P`
pub fn required_instance_extensions<P: PresentationPlatform>() -> WindowResult<Vec<&'static CStr>> {
    extension_names(P::raw_display_handle())
}

/// A presentation surface for one window, destroyed on drop
///
/// The surface must be dropped before the instance it was created from and
/// before the window it presents to.
pub struct Surface {
    loader: khr::Surface,
    surface: vk::SurfaceKHR,
}

impl Surface {
    /// Create a surface for `window` on an instance that enabled
    /// [`required_instance_extensions`]
    pub fn new<P: PresentationPlatform>(entry: &Entry, instance: &Instance, window: &Window<P>) -> WindowResult<Self> {
        let loader = khr::Surface::new(entry, instance);

        // SAFETY: the window and display handles come from a live window
        let surface = unsafe {
            ash_window::create_surface(
                entry,
                instance,
                window.raw_display_handle(),
                window.raw_window_handle(),
                None,
            )
            .map_err(WindowError::Surface)?
        };

        debug!("Created Vulkan surface for window {:#x}", window.native_handle().as_raw());
        Ok(Self { loader, surface })
    }

    /// The surface handle
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// The surface extension loader
    pub fn loader(&self) -> &khr::Surface {
        &self.loader
    }

    /// Whether a queue family can present to this surface
    pub fn supports_present(&self, physical_device: vk::PhysicalDevice, queue_family_index: u32) -> WindowResult<bool> {
        unsafe {
            self.loader
                .get_physical_device_surface_support(physical_device, queue_family_index, self.surface)
                .map_err(WindowError::Surface)
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_surface(self.surface, None);
        }
    }
}
