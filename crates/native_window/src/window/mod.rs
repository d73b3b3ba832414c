//! Window lifecycle, message translation and routing
//!
//! A [`Window`] is `Live` from construction and may move once to
//! `ContextAttached`; dropping it from either stage tears everything down.
//! Raw platform messages reach a window through the per-thread routing
//! registry, pass the optional [`MessageHook`], and are translated by
//! [`WindowState::translate`] into [`Event`](crate::Event)s on the window's
//! queue.

mod inner;
mod handle;
mod hook;
mod registry;
mod state;

pub use handle::{Window, WindowStage};
pub use hook::{HookOutcome, HookResponse, MessageHook};
pub use registry::{class_registered, live_windows};
pub use state::{Effects, Translation, WindowState};
