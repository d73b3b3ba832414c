//! Window error types

use thiserror::Error;

/// Errors raised by window construction, graphics attachment and misuse checks
#[derive(Error, Debug)]
pub enum WindowError {
    /// The native window class could not be registered
    #[error("Window class registration failed (platform error {code})")]
    ClassRegistration {
        /// Platform error code
        code: u32,
    },

    /// The platform refused to create the native window
    #[error("Window creation failed (platform error {code})")]
    Creation {
        /// Platform error code
        code: u32,
    },

    /// No pixel format compatible with the legacy context exists
    #[error("No compatible pixel format: {0}")]
    PixelFormat(String),

    /// The legacy graphics context could not be created or bound
    #[error("Graphics context creation failed: {0}")]
    ContextCreation(String),

    /// A graphics context is already attached to this window
    #[error("A graphics context is already attached")]
    ContextAlreadyAttached,

    /// Present was requested before any graphics context was attached
    #[error("No graphics context attached")]
    NoGraphicsContext,

    /// Icon pixel data does not match the declared dimensions
    #[error("Invalid icon: expected {expected} bytes for {width}x{height} RGBA, got {actual}")]
    InvalidIcon {
        /// Icon width in pixels
        width: u32,
        /// Icon height in pixels
        height: u32,
        /// Required buffer length
        expected: usize,
        /// Supplied buffer length
        actual: usize,
    },

    /// The platform could not create or load an icon
    #[error("Icon creation failed (platform error {code})")]
    IconCreation {
        /// Platform error code
        code: u32,
    },

    /// Vulkan surface creation or extension query failed
    #[error("Vulkan surface error: {0:?}")]
    Surface(ash::vk::Result),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;
