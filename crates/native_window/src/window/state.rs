//! Window state and message translation
//!
//! Translation is a pure function of the stored [`WindowState`] and one
//! [`RawMessage`]: it updates the state and returns the events to append plus
//! the platform side effects the caller must perform. Nothing here touches the
//! platform, which keeps the ordering and suppression rules unit-testable.

use bitflags::bitflags;

use crate::event::{Event, KeyCode, Modifiers, MouseButton};
use crate::message::{opcode, RawMessage, WHEEL_DELTA};

bitflags! {
    /// Platform side effects requested by a translation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Effects: u8 {
        /// Arm pointer-leave tracking (delivered once per arm)
        const TRACK_MOUSE_LEAVE = 1 << 0;
        /// Release the cursor confinement
        const RELEASE_CURSOR_CLIP = 1 << 1;
        /// Confine the cursor to the client area again
        const APPLY_CURSOR_CLIP = 1 << 2;
    }
}

/// Result of translating one raw message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    /// Events to append to the queue, in order
    pub events: Vec<Event>,
    /// Side effects to execute against the platform
    pub effects: Effects,
}

impl Translation {
    fn none() -> Self {
        Self::default()
    }

    fn one(event: Event) -> Self {
        Self { events: vec![event], effects: Effects::empty() }
    }

    fn with_effects(mut self, effects: Effects) -> Self {
        self.effects |= effects;
        self
    }
}

/// Mutable presentation state of one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    /// Last client size reported by the platform
    pub size: (i32, i32),
    /// Last client origin reported by the platform
    pub position: (i32, i32),
    /// Cursor drawn over the client area
    pub cursor_visible: bool,
    /// Cursor confinement requested
    pub cursor_capture: bool,
    /// Held keys re-emit key presses
    pub key_repeat: bool,
    /// Pointer currently inside the client area
    pub mouse_inside: bool,
    /// Window currently has keyboard focus
    pub focused: bool,
    high_surrogate: Option<u16>,
}

impl WindowState {
    /// Fresh state for a window created at `size` / `position`
    pub fn new(size: (i32, i32), position: (i32, i32)) -> Self {
        Self {
            size,
            position,
            cursor_visible: true,
            cursor_capture: false,
            key_repeat: true,
            mouse_inside: false,
            focused: false,
            high_surrogate: None,
        }
    }

    /// Translate one raw message
    ///
    /// `modifiers` is the keyboard modifier state captured when the platform
    /// delivered the message. Unknown opcodes translate to nothing.
    pub fn translate(&mut self, message: &RawMessage, modifiers: Modifiers) -> Translation {
        match message.opcode {
            opcode::CLOSE => Translation::one(Event::Close),

            opcode::SIZE => {
                let (width, height) = message.lparam_words();
                let size = (i32::from(width), i32::from(height));
                if size == self.size {
                    return Translation::none();
                }
                self.size = size;
                let translation = Translation::one(Event::Resize { width: size.0, height: size.1 });
                translation.with_effects(self.reclip())
            }

            opcode::MOVE => {
                let position = message.lparam_point();
                if position == self.position {
                    return Translation::none();
                }
                self.position = position;
                let translation = Translation::one(Event::Move { x: position.0, y: position.1 });
                translation.with_effects(self.reclip())
            }

            opcode::SET_FOCUS => {
                self.focused = true;
                let effects = if self.cursor_capture {
                    Effects::APPLY_CURSOR_CLIP
                } else {
                    Effects::empty()
                };
                Translation::one(Event::FocusGained).with_effects(effects)
            }

            opcode::KILL_FOCUS => {
                self.focused = false;
                self.mouse_inside = false;
                self.high_surrogate = None;
                let effects = if self.cursor_capture {
                    Effects::RELEASE_CURSOR_CLIP
                } else {
                    Effects::empty()
                };
                Translation::one(Event::FocusLost).with_effects(effects)
            }

            opcode::KEY_DOWN | opcode::SYS_KEY_DOWN => {
                let repeat = message.is_key_repeat();
                if repeat && !self.key_repeat {
                    return Translation::none();
                }
                Translation::one(Event::KeyDown {
                    key: KeyCode::from_virtual_key(message.wparam as u32),
                    modifiers,
                    repeat,
                })
            }

            opcode::KEY_UP | opcode::SYS_KEY_UP => Translation::one(Event::KeyUp {
                key: KeyCode::from_virtual_key(message.wparam as u32),
                modifiers,
                repeat: false,
            }),

            opcode::CHAR => self.compose_char(message.wparam as u16),

            opcode::MOUSE_MOVE => {
                let (x, y) = message.lparam_point();
                let mut translation = Translation::none();
                if !self.mouse_inside {
                    self.mouse_inside = true;
                    translation.events.push(Event::MouseEnter);
                    translation.effects |= Effects::TRACK_MOUSE_LEAVE;
                }
                translation.events.push(Event::MouseMove { x, y });
                translation
            }

            opcode::MOUSE_LEAVE => {
                // Focus loss already closed the enter/leave pair
                if !std::mem::replace(&mut self.mouse_inside, false) {
                    return Translation::none();
                }
                Translation::one(Event::MouseLeave)
            }

            opcode::LBUTTON_DOWN | opcode::RBUTTON_DOWN | opcode::MBUTTON_DOWN | opcode::XBUTTON_DOWN => {
                let (x, y) = message.lparam_point();
                let button = button_of(message);
                Translation::one(Event::MouseButtonDown { button, x, y })
            }

            opcode::LBUTTON_UP | opcode::RBUTTON_UP | opcode::MBUTTON_UP | opcode::XBUTTON_UP => {
                let (x, y) = message.lparam_point();
                let button = button_of(message);
                Translation::one(Event::MouseButtonUp { button, x, y })
            }

            opcode::MOUSE_WHEEL => Translation::one(Event::MouseWheel {
                delta_x: 0.0,
                delta_y: notches(message.wheel_delta()),
            }),

            opcode::MOUSE_HWHEEL => Translation::one(Event::MouseWheel {
                delta_x: notches(message.wheel_delta()),
                delta_y: 0.0,
            }),

            _ => Translation::none(),
        }
    }

    /// Re-confine the cursor after the client rectangle changed
    fn reclip(&self) -> Effects {
        if self.cursor_capture && self.focused {
            Effects::APPLY_CURSOR_CLIP
        } else {
            Effects::empty()
        }
    }

    fn compose_char(&mut self, unit: u16) -> Translation {
        match unit {
            0xD800..=0xDBFF => {
                self.high_surrogate = Some(unit);
                Translation::none()
            }
            0xDC00..=0xDFFF => {
                let Some(high) = self.high_surrogate.take() else {
                    return Translation::none();
                };
                char::decode_utf16([high, unit])
                    .next()
                    .and_then(Result::ok)
                    .map_or_else(Translation::none, |c| Translation::one(Event::TextInput(c)))
            }
            _ => {
                self.high_surrogate = None;
                char::from_u32(u32::from(unit))
                    .map_or_else(Translation::none, |c| Translation::one(Event::TextInput(c)))
            }
        }
    }
}

fn button_of(message: &RawMessage) -> MouseButton {
    match message.opcode {
        opcode::LBUTTON_DOWN | opcode::LBUTTON_UP => MouseButton::Left,
        opcode::RBUTTON_DOWN | opcode::RBUTTON_UP => MouseButton::Right,
        opcode::MBUTTON_DOWN | opcode::MBUTTON_UP => MouseButton::Middle,
        _ if message.is_xbutton1() => MouseButton::X1,
        _ => MouseButton::X2,
    }
}

fn notches(raw: i16) -> f32 {
    f32::from(raw) / f32::from(WHEEL_DELTA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WindowState {
        WindowState::new((800, 600), (100, 100))
    }

    #[test]
    fn test_close_translates_to_close() {
        let mut state = state();
        let t = state.translate(&RawMessage::close(), Modifiers::empty());
        assert_eq!(t.events, vec![Event::Close]);
    }

    #[test]
    fn test_resize_only_on_change() {
        let mut state = state();
        let same = state.translate(&RawMessage::size(800, 600), Modifiers::empty());
        assert!(same.events.is_empty());

        let changed = state.translate(&RawMessage::size(1024, 768), Modifiers::empty());
        assert_eq!(changed.events, vec![Event::Resize { width: 1024, height: 768 }]);
        assert_eq!(state.size, (1024, 768));

        let repeated = state.translate(&RawMessage::size(1024, 768), Modifiers::empty());
        assert!(repeated.events.is_empty());
    }

    #[test]
    fn test_move_only_on_change_with_negative_coordinates() {
        let mut state = state();
        assert!(state.translate(&RawMessage::moved(100, 100), Modifiers::empty()).events.is_empty());

        let t = state.translate(&RawMessage::moved(-20, 5), Modifiers::empty());
        assert_eq!(t.events, vec![Event::Move { x: -20, y: 5 }]);
        assert_eq!(state.position, (-20, 5));
    }

    #[test]
    fn test_repeat_suppressed_when_disabled() {
        let mut state = state();
        state.key_repeat = false;
        let t = state.translate(&RawMessage::key_down(0x41, true), Modifiers::empty());
        assert!(t.events.is_empty());

        // First press is never a repeat
        let t = state.translate(&RawMessage::key_down(0x41, false), Modifiers::empty());
        assert_eq!(t.events.len(), 1);

        state.key_repeat = true;
        let t = state.translate(&RawMessage::key_down(0x41, true), Modifiers::SHIFT);
        assert_eq!(
            t.events,
            vec![Event::KeyDown { key: KeyCode::A, modifiers: Modifiers::SHIFT, repeat: true }]
        );
    }

    #[test]
    fn test_key_up_is_never_repeat() {
        let mut state = state();
        state.key_repeat = false;
        let t = state.translate(&RawMessage::key_up(0x1B), Modifiers::CONTROL);
        assert_eq!(
            t.events,
            vec![Event::KeyUp { key: KeyCode::Escape, modifiers: Modifiers::CONTROL, repeat: false }]
        );
    }

    #[test]
    fn test_mouse_enter_precedes_first_move() {
        let mut state = state();
        let first = state.translate(&RawMessage::mouse_move(10, 20), Modifiers::empty());
        assert_eq!(first.events, vec![Event::MouseEnter, Event::MouseMove { x: 10, y: 20 }]);
        assert!(first.effects.contains(Effects::TRACK_MOUSE_LEAVE));

        let second = state.translate(&RawMessage::mouse_move(11, 20), Modifiers::empty());
        assert_eq!(second.events, vec![Event::MouseMove { x: 11, y: 20 }]);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn test_leave_rearms_enter() {
        let mut state = state();
        state.translate(&RawMessage::mouse_move(1, 1), Modifiers::empty());
        let leave = state.translate(&RawMessage::mouse_leave(), Modifiers::empty());
        assert_eq!(leave.events, vec![Event::MouseLeave]);
        assert!(!state.mouse_inside);

        let again = state.translate(&RawMessage::mouse_move(2, 2), Modifiers::empty());
        assert_eq!(again.events[0], Event::MouseEnter);
        assert!(again.effects.contains(Effects::TRACK_MOUSE_LEAVE));
    }

    #[test]
    fn test_focus_loss_resets_inside_and_releases_clip() {
        let mut state = state();
        state.cursor_capture = true;
        state.translate(&RawMessage::set_focus(), Modifiers::empty());
        state.translate(&RawMessage::mouse_move(1, 1), Modifiers::empty());

        let lost = state.translate(&RawMessage::kill_focus(), Modifiers::empty());
        assert_eq!(lost.events, vec![Event::FocusLost]);
        assert_eq!(lost.effects, Effects::RELEASE_CURSOR_CLIP);
        assert!(!state.mouse_inside);
        assert!(state.cursor_capture);

        let gained = state.translate(&RawMessage::set_focus(), Modifiers::empty());
        assert_eq!(gained.events, vec![Event::FocusGained]);
        assert_eq!(gained.effects, Effects::APPLY_CURSOR_CLIP);
    }

    #[test]
    fn test_leave_after_focus_loss_is_dropped() {
        let mut state = state();
        state.translate(&RawMessage::mouse_move(1, 1), Modifiers::empty());
        state.translate(&RawMessage::kill_focus(), Modifiers::empty());

        let leave = state.translate(&RawMessage::mouse_leave(), Modifiers::empty());
        assert!(leave.events.is_empty());
        assert!(!state.mouse_inside);
    }

    #[test]
    fn test_focus_without_capture_has_no_effects() {
        let mut state = state();
        let lost = state.translate(&RawMessage::kill_focus(), Modifiers::empty());
        assert!(lost.effects.is_empty());
    }

    #[test]
    fn test_buttons_and_positions() {
        let mut state = state();
        let down = state.translate(&RawMessage::button(opcode::RBUTTON_DOWN, 3, 4), Modifiers::empty());
        assert_eq!(down.events, vec![Event::MouseButtonDown { button: MouseButton::Right, x: 3, y: 4 }]);

        let x2 = state.translate(&RawMessage::xbutton(opcode::XBUTTON_UP, 2, 5, 6), Modifiers::empty());
        assert_eq!(x2.events, vec![Event::MouseButtonUp { button: MouseButton::X2, x: 5, y: 6 }]);

        let x1 = state.translate(&RawMessage::xbutton(opcode::XBUTTON_DOWN, 1, 0, 0), Modifiers::empty());
        assert_eq!(x1.events, vec![Event::MouseButtonDown { button: MouseButton::X1, x: 0, y: 0 }]);
    }

    #[test]
    fn test_wheel_is_signed_notches() {
        let mut state = state();
        let t = state.translate(&RawMessage::wheel(-240), Modifiers::empty());
        assert_eq!(t.events, vec![Event::MouseWheel { delta_x: 0.0, delta_y: -2.0 }]);

        let t = state.translate(&RawMessage::hwheel(60), Modifiers::empty());
        assert_eq!(t.events, vec![Event::MouseWheel { delta_x: 0.5, delta_y: 0.0 }]);
    }

    #[test]
    fn test_text_input_combines_surrogates() {
        let mut state = state();
        assert_eq!(
            state.translate(&RawMessage::char_unit(u16::from(b'a')), Modifiers::empty()).events,
            vec![Event::TextInput('a')]
        );

        // U+1F600 as a UTF-16 pair
        assert!(state.translate(&RawMessage::char_unit(0xD83D), Modifiers::empty()).events.is_empty());
        let t = state.translate(&RawMessage::char_unit(0xDE00), Modifiers::empty());
        assert_eq!(t.events, vec![Event::TextInput('\u{1F600}')]);
    }

    #[test]
    fn test_unpaired_low_surrogate_is_dropped() {
        let mut state = state();
        assert!(state.translate(&RawMessage::char_unit(0xDE00), Modifiers::empty()).events.is_empty());
    }

    #[test]
    fn test_unknown_opcode_is_ignored() {
        let mut state = state();
        let before = state.clone();
        let t = state.translate(&RawMessage::new(0x7FFF, 1, 2), Modifiers::empty());
        assert_eq!(t, Translation::default());
        assert_eq!(state, before);
    }

    #[test]
    fn test_resize_while_captured_reclips() {
        let mut state = state();
        state.cursor_capture = true;
        state.focused = true;
        let t = state.translate(&RawMessage::size(640, 480), Modifiers::empty());
        assert_eq!(t.effects, Effects::APPLY_CURSOR_CLIP);
    }
}
