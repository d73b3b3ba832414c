//! Graphics attachment for native windows
//!
//! - [`legacy`]: one immediate-mode context per window, owned by the window
//! - [`vulkan`]: extension query and presentation surface creation

pub mod legacy;
pub mod vulkan;

pub use legacy::LegacyContext;
pub use vulkan::{extension_names, required_instance_extensions, Surface};
