//! Process-wide window class reference count
//!
//! A window class belongs to the process, while windows and their routing
//! live on the threads that created them. Backends with a process-global class
//! keep one `SharedClass` so the class is registered once for the first
//! pumping thread and unregistered after the last one lets go.

#![cfg_attr(not(windows), allow(dead_code))]

use std::sync::{Mutex, PoisonError};

use crate::error::WindowResult;

/// Counts threads that currently hold the class
pub(crate) struct SharedClass {
    users: Mutex<usize>,
}

impl SharedClass {
    pub(crate) const fn new() -> Self {
        Self { users: Mutex::new(0) }
    }

    /// Take one reference, running `register` for the first
    pub(crate) fn acquire(&self, register: impl FnOnce() -> WindowResult<()>) -> WindowResult<()> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        if *users == 0 {
            register()?;
        }
        *users += 1;
        Ok(())
    }

    /// Drop one reference, running `unregister` after the last
    pub(crate) fn release(&self, unregister: impl FnOnce()) {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        match *users {
            0 => {}
            1 => {
                *users = 0;
                unregister();
            }
            _ => *users -= 1,
        }
    }

    #[cfg(test)]
    fn users(&self) -> usize {
        *self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    use crate::error::WindowError;

    #[test]
    fn test_class_survives_until_last_thread_releases() {
        let class = Arc::new(SharedClass::new());
        let registered = Arc::new(AtomicUsize::new(0));
        let unregistered = Arc::new(AtomicUsize::new(0));

        let register = || {
            registered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        class.acquire(register).unwrap();

        let worker = {
            let class = Arc::clone(&class);
            let registered = Arc::clone(&registered);
            let unregistered = Arc::clone(&unregistered);
            thread::spawn(move || {
                class
                    .acquire(|| {
                        registered.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                    .unwrap();
                class.release(|| {
                    unregistered.fetch_add(1, Ordering::SeqCst);
                });
            })
        };
        worker.join().unwrap();

        // The worker let go first; the main thread still holds the class
        assert_eq!(registered.load(Ordering::SeqCst), 1);
        assert_eq!(unregistered.load(Ordering::SeqCst), 0);
        assert_eq!(class.users(), 1);

        class.release(|| {
            unregistered.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(unregistered.load(Ordering::SeqCst), 1);
        assert_eq!(class.users(), 0);
    }

    #[test]
    fn test_failed_registration_takes_no_reference() {
        let class = SharedClass::new();
        let result = class.acquire(|| Err(WindowError::ClassRegistration { code: 5 }));

        assert!(result.is_err());
        assert_eq!(class.users(), 0);
        class.release(|| panic!("nothing to unregister"));
    }
}
