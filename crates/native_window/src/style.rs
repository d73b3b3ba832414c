//! Window decoration style

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Independent decoration flags applied at window creation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct WindowStyle: u32 {
        /// Caption bar with title text
        const TITLE_BAR = 1 << 0;
        /// Sizing border and maximize box
        const RESIZE = 1 << 1;
        /// System menu with close button
        const CLOSE = 1 << 2;
    }
}

impl WindowStyle {
    /// Title bar, resize border and close button
    pub const DEFAULT: Self = Self::TITLE_BAR.union(Self::RESIZE).union(Self::CLOSE);
    /// Fixed-size window with a close button
    pub const NO_RESIZE: Self = Self::TITLE_BAR.union(Self::CLOSE);
    /// Resizable window without a close button
    pub const NO_CLOSE: Self = Self::TITLE_BAR.union(Self::RESIZE);

    /// Whether the window has a title bar
    pub fn has_title_bar(self) -> bool {
        self.contains(Self::TITLE_BAR)
    }

    /// Whether the user can resize the window
    pub fn is_resizable(self) -> bool {
        self.contains(Self::RESIZE)
    }

    /// Whether the window shows a close button
    pub fn has_close_button(self) -> bool {
        self.contains(Self::CLOSE)
    }
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(WindowStyle::DEFAULT.is_resizable());
        assert!(WindowStyle::DEFAULT.has_close_button());
        assert!(!WindowStyle::NO_RESIZE.is_resizable());
        assert!(WindowStyle::NO_RESIZE.has_title_bar());
        assert!(!WindowStyle::NO_CLOSE.has_close_button());
        assert_eq!(WindowStyle::default(), WindowStyle::all());
    }

    #[test]
    fn test_style_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            style: WindowStyle,
        }

        let parsed: Wrapper = toml::from_str(r#"style = "TITLE_BAR | CLOSE""#).unwrap();
        assert_eq!(parsed.style, WindowStyle::NO_RESIZE);
    }
}
