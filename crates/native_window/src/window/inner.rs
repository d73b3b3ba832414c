//! Shared per-window core: state, event queue and hook

use std::collections::VecDeque;

use log::trace;

use crate::event::{Event, Modifiers};
use crate::message::RawMessage;

use super::hook::{self, HookSlot};
use super::state::{Effects, Translation, WindowState};

/// The part of a window reachable from message routing
pub(crate) struct WindowCore {
    pub(crate) state: WindowState,
    pub(crate) queue: VecDeque<Event>,
    pub(crate) hook: HookSlot,
}

impl WindowCore {
    pub(crate) fn new(state: WindowState) -> Self {
        Self { state, queue: VecDeque::new(), hook: None }
    }

    /// Run one routed message through the hook and the translation rules
    pub(crate) fn process(&mut self, message: &RawMessage, modifiers: Modifiers) -> Effects {
        let outcome = hook::consult(&mut self.hook, message);
        if !outcome.translate() {
            trace!("Message {:#06x} claimed by hook", message.opcode);
            return Effects::empty();
        }

        let Translation { events, effects } = self.state.translate(message, modifiers);
        for event in &events {
            trace!("Queued {}", event.kind_name());
        }
        self.queue.extend(events);
        effects
    }
}
