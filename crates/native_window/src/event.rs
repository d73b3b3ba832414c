//! Typed window events
//!
//! Events are produced by the message translation layer and pulled from a
//! window's queue by the application. The set of kinds is closed: every
//! consumer matches exhaustively, so adding a kind is a compile-time change.

use bitflags::bitflags;

/// A window event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The user asked to close the window
    Close,

    /// The client area changed size
    Resize {
        /// New client width in pixels
        width: i32,
        /// New client height in pixels
        height: i32,
    },

    /// The client area origin moved
    Move {
        /// New screen x of the client area
        x: i32,
        /// New screen y of the client area
        y: i32,
    },

    /// The window received keyboard focus
    FocusGained,

    /// The window lost keyboard focus
    FocusLost,

    /// A key was pressed, or auto-repeated while held
    KeyDown {
        /// The key
        key: KeyCode,
        /// Modifier state when the message was delivered
        modifiers: Modifiers,
        /// True for auto-repeat presses
        repeat: bool,
    },

    /// A key was released
    KeyUp {
        /// The key
        key: KeyCode,
        /// Modifier state when the message was delivered
        modifiers: Modifiers,
        /// Always false for releases
        repeat: bool,
    },

    /// A character finished composing
    TextInput(char),

    /// The pointer moved inside the client area
    MouseMove {
        /// Client x
        x: i32,
        /// Client y
        y: i32,
    },

    /// The pointer entered the client area
    MouseEnter,

    /// The pointer left the client area
    MouseLeave,

    /// A pointer button was pressed
    MouseButtonDown {
        /// The button
        button: MouseButton,
        /// Client x
        x: i32,
        /// Client y
        y: i32,
    },

    /// A pointer button was released
    MouseButtonUp {
        /// The button
        button: MouseButton,
        /// Client x
        x: i32,
        /// Client y
        y: i32,
    },

    /// Wheel or trackpad scroll, in notches (positive is right / away from the user)
    MouseWheel {
        /// Horizontal delta
        delta_x: f32,
        /// Vertical delta
        delta_y: f32,
    },
}

impl Event {
    /// Whether this is a close request
    pub fn is_close(&self) -> bool {
        matches!(self, Self::Close)
    }

    /// Short name of the event kind, for logging
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Close => "Close",
            Self::Resize { .. } => "Resize",
            Self::Move { .. } => "Move",
            Self::FocusGained => "FocusGained",
            Self::FocusLost => "FocusLost",
            Self::KeyDown { .. } => "KeyDown",
            Self::KeyUp { .. } => "KeyUp",
            Self::TextInput(_) => "TextInput",
            Self::MouseMove { .. } => "MouseMove",
            Self::MouseEnter => "MouseEnter",
            Self::MouseLeave => "MouseLeave",
            Self::MouseButtonDown { .. } => "MouseButtonDown",
            Self::MouseButtonUp { .. } => "MouseButtonUp",
            Self::MouseWheel { .. } => "MouseWheel",
        }
    }
}

bitflags! {
    /// Keyboard modifier state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either shift key
        const SHIFT = 1 << 0;
        /// Either control key
        const CONTROL = 1 << 1;
        /// Either alt key
        const ALT = 1 << 2;
        /// Either Windows key
        const SUPER = 1 << 3;
        /// Caps lock toggled on
        const CAPS_LOCK = 1 << 4;
        /// Num lock toggled on
        const NUM_LOCK = 1 << 5;
    }
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// First extra button (usually "back")
    X1,
    /// Second extra button (usually "forward")
    X2,
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Digit keys on the main row
    Digit(u8),
    /// Function keys F1 through F24
    Function(u8),
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Insert key
    Insert,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// End key
    End,
    /// Page up key
    PageUp,
    /// Page down key
    PageDown,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Shift key
    Shift,
    /// Control key
    Control,
    /// Alt key
    Alt,
    /// Windows key
    Super,
    /// Caps lock key
    CapsLock,
    /// A key without a dedicated variant, by virtual-key code
    Unknown(u32),
}

impl KeyCode {
    /// Map a Win32 virtual-key code
    pub fn from_virtual_key(vk: u32) -> Self {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::A, KeyCode::B, KeyCode::C, KeyCode::D, KeyCode::E, KeyCode::F,
            KeyCode::G, KeyCode::H, KeyCode::I, KeyCode::J, KeyCode::K, KeyCode::L,
            KeyCode::M, KeyCode::N, KeyCode::O, KeyCode::P, KeyCode::Q, KeyCode::R,
            KeyCode::S, KeyCode::T, KeyCode::U, KeyCode::V, KeyCode::W, KeyCode::X,
            KeyCode::Y, KeyCode::Z,
        ];

        match vk {
            0x41..=0x5A => LETTERS[(vk - 0x41) as usize],
            0x30..=0x39 => Self::Digit((vk - 0x30) as u8),
            0x70..=0x87 => Self::Function((vk - 0x70 + 1) as u8),
            0x20 => Self::Space,
            0x0D => Self::Enter,
            0x1B => Self::Escape,
            0x09 => Self::Tab,
            0x08 => Self::Backspace,
            0x2D => Self::Insert,
            0x2E => Self::Delete,
            0x24 => Self::Home,
            0x23 => Self::End,
            0x21 => Self::PageUp,
            0x22 => Self::PageDown,
            0x26 => Self::Up,
            0x28 => Self::Down,
            0x25 => Self::Left,
            0x27 => Self::Right,
            0x10 | 0xA0 | 0xA1 => Self::Shift,
            0x11 | 0xA2 | 0xA3 => Self::Control,
            0x12 | 0xA4 | 0xA5 => Self::Alt,
            0x5B | 0x5C => Self::Super,
            0x14 => Self::CapsLock,
            other => Self::Unknown(other),
        }
    }
}
