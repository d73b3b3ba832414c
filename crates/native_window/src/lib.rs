//! # Native Window
//!
//! A minimal native windowing layer: one window type with a typed event
//! queue, attachable to a legacy OpenGL context or a Vulkan surface.
//!
//! ## Features
//!
//! - **Typed Events**: raw platform messages become [`Event`]s in arrival order
//! - **Message Hook**: intercept raw messages before translation
//! - **Legacy Graphics**: one immediate-mode context per window
//! - **Vulkan**: instance extension query and surface creation through `ash`
//! - **Headless Backend**: the whole window layer runs without a display
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use native_window::prelude::*;
//!
//! fn main() -> Result<(), WindowError> {
//!     let mut window: Window = Window::new(800, 600, "Hello", WindowStyle::DEFAULT)?;
//!
//!     'running: loop {
//!         window.pump_events();
//!         while let Some(event) = window.pop_event() {
//!             if let Event::Close = event {
//!                 break 'running;
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

pub mod config;
pub mod error;
pub mod event;
pub mod graphics;
pub mod logging;
pub mod message;
pub mod platform;
pub mod style;
pub mod window;

pub use config::{Config, ConfigError, WindowConfig};
pub use error::{WindowError, WindowResult};
pub use event::{Event, KeyCode, Modifiers, MouseButton};
pub use message::RawMessage;
pub use platform::{DefaultPlatform, NativeHandle, Platform};
pub use style::WindowStyle;
pub use window::{HookResponse, MessageHook, Window, WindowStage};

/// Common imports for window users
pub mod prelude {
    pub use crate::{
        config::{Config, WindowConfig},
        error::{WindowError, WindowResult},
        event::{Event, KeyCode, Modifiers, MouseButton},
        graphics::{LegacyContext, Surface},
        message::RawMessage,
        style::WindowStyle,
        window::{HookResponse, MessageHook, Window, WindowStage},
    };
}
