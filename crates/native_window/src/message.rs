//! Raw platform messages
//!
//! A raw message is the `(opcode, wparam, lparam)` triple the platform delivers
//! for a window. Opcodes use the Win32 numbering so translation stays free of
//! platform bindings and can run on any host.

/// Message opcodes understood by the translation layer
pub mod opcode {
    /// Window moved
    pub const MOVE: u32 = 0x0003;
    /// Client area resized
    pub const SIZE: u32 = 0x0005;
    /// Keyboard focus gained
    pub const SET_FOCUS: u32 = 0x0007;
    /// Keyboard focus lost
    pub const KILL_FOCUS: u32 = 0x0008;
    /// Close requested
    pub const CLOSE: u32 = 0x0010;
    /// Cursor shape query
    pub const SET_CURSOR: u32 = 0x0020;
    /// Key pressed
    pub const KEY_DOWN: u32 = 0x0100;
    /// Key released
    pub const KEY_UP: u32 = 0x0101;
    /// Character composed
    pub const CHAR: u32 = 0x0102;
    /// Key pressed with alt or F10
    pub const SYS_KEY_DOWN: u32 = 0x0104;
    /// Key released with alt or F10
    pub const SYS_KEY_UP: u32 = 0x0105;
    /// Pointer moved
    pub const MOUSE_MOVE: u32 = 0x0200;
    /// Left button pressed
    pub const LBUTTON_DOWN: u32 = 0x0201;
    /// Left button released
    pub const LBUTTON_UP: u32 = 0x0202;
    /// Right button pressed
    pub const RBUTTON_DOWN: u32 = 0x0204;
    /// Right button released
    pub const RBUTTON_UP: u32 = 0x0205;
    /// Middle button pressed
    pub const MBUTTON_DOWN: u32 = 0x0207;
    /// Middle button released
    pub const MBUTTON_UP: u32 = 0x0208;
    /// Vertical wheel
    pub const MOUSE_WHEEL: u32 = 0x020A;
    /// Extra button pressed
    pub const XBUTTON_DOWN: u32 = 0x020B;
    /// Extra button released
    pub const XBUTTON_UP: u32 = 0x020C;
    /// Horizontal wheel
    pub const MOUSE_HWHEEL: u32 = 0x020E;
    /// Pointer left the client area (needs tracking to be armed)
    pub const MOUSE_LEAVE: u32 = 0x02A3;
}

/// One wheel notch in raw wheel units
pub const WHEEL_DELTA: i16 = 120;

/// Bit 30 of a key message's lparam: the key was already down
const KEY_PREVIOUS_STATE: isize = 1 << 30;

/// Bit 31 of a key message's lparam: the key is being released
const KEY_TRANSITION_STATE: isize = 1 << 31;

/// First extra button identifier in the high word of an X button message
const XBUTTON1: u16 = 0x0001;

/// A raw platform message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawMessage {
    /// Message opcode
    pub opcode: u32,
    /// First payload word
    pub wparam: usize,
    /// Second payload word
    pub lparam: isize,
}

impl RawMessage {
    /// Build a message from its raw parts
    pub const fn new(opcode: u32, wparam: usize, lparam: isize) -> Self {
        Self { opcode, wparam, lparam }
    }

    /// Close request
    pub const fn close() -> Self {
        Self::new(opcode::CLOSE, 0, 0)
    }

    /// Client area resized to `width` x `height`
    pub fn size(width: u16, height: u16) -> Self {
        Self::new(opcode::SIZE, 0, pack_words(width, height))
    }

    /// Client area origin moved to `(x, y)`
    pub fn moved(x: i16, y: i16) -> Self {
        Self::new(opcode::MOVE, 0, pack_words(x as u16, y as u16))
    }

    /// Focus gained
    pub const fn set_focus() -> Self {
        Self::new(opcode::SET_FOCUS, 0, 0)
    }

    /// Focus lost
    pub const fn kill_focus() -> Self {
        Self::new(opcode::KILL_FOCUS, 0, 0)
    }

    /// Key press for virtual key `vk`, optionally flagged as auto-repeat
    pub fn key_down(vk: u32, repeat: bool) -> Self {
        let lparam = if repeat { KEY_PREVIOUS_STATE | 1 } else { 1 };
        Self::new(opcode::KEY_DOWN, vk as usize, lparam)
    }

    /// Key release for virtual key `vk`
    pub fn key_up(vk: u32) -> Self {
        // Releases always carry the previous-state and transition bits
        Self::new(opcode::KEY_UP, vk as usize, KEY_PREVIOUS_STATE | KEY_TRANSITION_STATE | 1)
    }

    /// A UTF-16 code unit produced by character composition
    pub fn char_unit(unit: u16) -> Self {
        Self::new(opcode::CHAR, unit as usize, 1)
    }

    /// Pointer moved to client `(x, y)`
    pub fn mouse_move(x: i16, y: i16) -> Self {
        Self::new(opcode::MOUSE_MOVE, 0, pack_words(x as u16, y as u16))
    }

    /// Pointer left the client area
    pub const fn mouse_leave() -> Self {
        Self::new(opcode::MOUSE_LEAVE, 0, 0)
    }

    /// Vertical wheel by `delta` raw units
    pub fn wheel(delta: i16) -> Self {
        Self::new(opcode::MOUSE_WHEEL, ((delta as u16) as usize) << 16, 0)
    }

    /// Horizontal wheel by `delta` raw units
    pub fn hwheel(delta: i16) -> Self {
        Self::new(opcode::MOUSE_HWHEEL, ((delta as u16) as usize) << 16, 0)
    }

    /// Button message at client `(x, y)`; `opcode` selects button and direction
    pub fn button(opcode: u32, x: i16, y: i16) -> Self {
        Self::new(opcode, 0, pack_words(x as u16, y as u16))
    }

    /// Extra button message, `which` is 1 or 2
    pub fn xbutton(opcode: u32, which: u16, x: i16, y: i16) -> Self {
        Self::new(opcode, (which as usize) << 16, pack_words(x as u16, y as u16))
    }

    /// Unsigned low/high words of lparam
    pub fn lparam_words(&self) -> (u16, u16) {
        (low_word(self.lparam as usize), high_word(self.lparam as usize))
    }

    /// Signed point packed into lparam
    pub fn lparam_point(&self) -> (i32, i32) {
        let (x, y) = self.lparam_words();
        (i32::from(x as i16), i32::from(y as i16))
    }

    /// Signed wheel delta from the high word of wparam
    pub fn wheel_delta(&self) -> i16 {
        high_word(self.wparam) as i16
    }

    /// Whether a key press is an auto-repeat of a held key
    pub fn is_key_repeat(&self) -> bool {
        self.lparam & KEY_PREVIOUS_STATE != 0
    }

    /// Whether an extra-button message refers to the first extra button
    pub fn is_xbutton1(&self) -> bool {
        high_word(self.wparam) == XBUTTON1
    }
}

/// Low 16 bits of a word
pub fn low_word(value: usize) -> u16 {
    (value & 0xFFFF) as u16
}

/// Bits 16..32 of a word
pub fn high_word(value: usize) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}

fn pack_words(low: u16, high: u16) -> isize {
    ((u32::from(high) << 16) | u32::from(low)) as isize
}
