//! Native handle → window routing registry
//!
//! The platform delivers messages by native handle only, so every live window
//! is entered here when it is constructed and removed before its native window
//! is destroyed. Entries are weak: the registry never keeps a window alive.
//!
//! Windows are thread-affine, so the registry is a lazily initialised
//! singleton per pump thread. It also counts the thread's live windows; the
//! thread takes a class reference when its first window is acquired and gives
//! it back when its last one is released. Backends whose class is shared by
//! the whole process count those references across threads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

use crate::error::WindowResult;
use crate::platform::{Dispatched, NativeHandle, Platform};

use super::inner::WindowCore;
use super::state::Effects;

#[derive(Default)]
struct Registry {
    routes: HashMap<NativeHandle, Weak<RefCell<WindowCore>>>,
    live: usize,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

/// Count one more live window, registering the class for the first
pub(crate) fn acquire_class<P: Platform>() -> WindowResult<()> {
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if registry.live == 0 {
            P::register_class()?;
            debug!("Window class registered");
        }
        registry.live += 1;
        Ok(())
    })
}

/// Count one less live window, unregistering the class after the last
pub(crate) fn release_class<P: Platform>() {
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if registry.live == 0 {
            warn!("Window class released more often than acquired");
            return;
        }
        registry.live -= 1;
        if registry.live == 0 {
            P::unregister_class();
            debug!("Window class unregistered");
        }
    });
}

pub(crate) fn insert(handle: NativeHandle, core: &Rc<RefCell<WindowCore>>) {
    REGISTRY.with(|registry| {
        registry.borrow_mut().routes.insert(handle, Rc::downgrade(core));
    });
}

pub(crate) fn remove(handle: NativeHandle) {
    REGISTRY.with(|registry| {
        registry.borrow_mut().routes.remove(&handle);
    });
}

fn lookup(handle: NativeHandle) -> Option<Rc<RefCell<WindowCore>>> {
    REGISTRY.with(|registry| registry.borrow().routes.get(&handle).and_then(Weak::upgrade))
}

/// Number of constructed windows not yet dropped on this thread
pub fn live_windows() -> usize {
    REGISTRY.with(|registry| registry.borrow().live)
}

/// Whether the window class is registered on this thread's behalf
pub fn class_registered() -> bool {
    live_windows() > 0
}

/// Deliver one drained message to its owning window
///
/// Messages for handles without a live window are dropped silently; they are
/// expected while a native window outlives its wrapper during teardown.
pub(crate) fn route<P: Platform>(dispatched: Dispatched) {
    let Dispatched { handle, message, modifiers } = dispatched;

    let Some(core) = lookup(handle) else {
        trace!("Ignoring message {:#06x} for unowned handle {:#x}", message.opcode, handle.as_raw());
        return;
    };

    let effects = match core.try_borrow_mut() {
        Ok(mut core) => core.process(&message, modifiers),
        Err(_) => {
            warn!("Dropping message {:#06x}: window is already processing a message", message.opcode);
            return;
        }
    };

    apply_effects::<P>(handle, effects);
}

fn apply_effects<P: Platform>(handle: NativeHandle, effects: Effects) {
    if effects.contains(Effects::TRACK_MOUSE_LEAVE) {
        P::track_mouse_leave(handle);
    }
    if effects.contains(Effects::RELEASE_CURSOR_CLIP) {
        trace!("Releasing cursor clip after focus loss");
        P::clip_cursor(handle, false);
    }
    if effects.contains(Effects::APPLY_CURSOR_CLIP) {
        P::clip_cursor(handle, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Modifiers};
    use crate::message::RawMessage;
    use crate::platform::headless::Headless;
    use crate::window::state::WindowState;

    #[test]
    fn test_class_registered_iff_live() {
        assert!(!class_registered());
        acquire_class::<Headless>().unwrap();
        acquire_class::<Headless>().unwrap();
        assert_eq!(live_windows(), 2);
        assert_eq!(Headless::class_registrations(), 1);

        release_class::<Headless>();
        assert!(class_registered());
        assert!(Headless::is_class_registered());

        release_class::<Headless>();
        assert!(!class_registered());
        assert!(!Headless::is_class_registered());
    }

    #[test]
    fn test_route_to_unowned_handle_is_ignored() {
        route::<Headless>(Dispatched {
            handle: NativeHandle::from_raw(0xDEAD),
            message: RawMessage::close(),
            modifiers: Modifiers::empty(),
        });
    }

    #[test]
    fn test_route_after_owner_dropped_is_ignored() {
        let handle = NativeHandle::from_raw(0x40);
        let core = Rc::new(RefCell::new(WindowCore::new(WindowState::new((1, 1), (0, 0)))));
        insert(handle, &core);

        let dispatched = Dispatched { handle, message: RawMessage::close(), modifiers: Modifiers::empty() };
        route::<Headless>(dispatched);
        assert_eq!(core.borrow().queue.front(), Some(&Event::Close));

        // Stale weak entry: the window is gone but the route was never removed
        drop(core);
        route::<Headless>(dispatched);
        remove(handle);
    }
}
