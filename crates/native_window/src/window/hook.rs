//! User message interception
//!
//! A hook sees every raw message routed to its window before the default
//! translation runs. Answering [`HookResponse::Handled`] claims the message:
//! no event is produced for it and the window's stored state is left alone.

use crate::message::RawMessage;

/// Answer given by a hook for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResponse {
    /// The hook fully processed the message; skip default translation
    Handled,
    /// Let default translation run
    Declined,
}

/// What happened when a message was offered to a window's hook slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// No hook is installed
    NotInstalled,
    /// A hook is installed and let the message through
    Declined,
    /// A hook is installed and claimed the message
    Handled,
}

impl HookOutcome {
    /// Whether default translation must run
    pub fn translate(self) -> bool {
        !matches!(self, Self::Handled)
    }
}

/// Low-level interception hook
pub trait MessageHook {
    /// Inspect a raw message before translation
    fn process(&mut self, message: &RawMessage) -> HookResponse;
}

impl<F> MessageHook for F
where
    F: FnMut(&RawMessage) -> HookResponse,
{
    fn process(&mut self, message: &RawMessage) -> HookResponse {
        self(message)
    }
}

/// Storage for an optional installed hook
pub(crate) type HookSlot = Option<Box<dyn MessageHook>>;

/// Offer `message` to the hook in `slot`, if any
pub(crate) fn consult(slot: &mut HookSlot, message: &RawMessage) -> HookOutcome {
    match slot {
        None => HookOutcome::NotInstalled,
        Some(hook) => match hook.process(message) {
            HookResponse::Handled => HookOutcome::Handled,
            HookResponse::Declined => HookOutcome::Declined,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::opcode;

    #[test]
    fn test_consult_three_outcomes() {
        let msg = RawMessage::close();
        let mut slot: HookSlot = None;
        assert_eq!(consult(&mut slot, &msg), HookOutcome::NotInstalled);

        slot = Some(Box::new(|_: &RawMessage| HookResponse::Declined));
        assert_eq!(consult(&mut slot, &msg), HookOutcome::Declined);

        slot = Some(Box::new(|m: &RawMessage| {
            if m.opcode == opcode::CLOSE {
                HookResponse::Handled
            } else {
                HookResponse::Declined
            }
        }));
        assert_eq!(consult(&mut slot, &msg), HookOutcome::Handled);
        assert_eq!(consult(&mut slot, &RawMessage::set_focus()), HookOutcome::Declined);
    }

    #[test]
    fn test_outcome_translate_flag() {
        assert!(HookOutcome::NotInstalled.translate());
        assert!(HookOutcome::Declined.translate());
        assert!(!HookOutcome::Handled.translate());
    }
}
