use std::fmt;

use crate::coords::Vec2;

/// Keyboard key, identified by physical position (US layout names).
///
/// Keys the engine has no name for arrive as `Other(code)` with the
/// platform's key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Delete,

    Up,
    Down,
    Left,
    Right,

    Shift,
    Control,
    Alt,
    Super,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    Other(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Other(code) => write!(f, "key #{code}"),
            named => fmt::Debug::fmt(named, f),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Held modifier keys.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

/// Window-system input, already converted to logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool, repeat: bool },
    Button { button: MouseButton, pressed: bool },
    PointerMoved(Vec2),
    PointerLeft,
    /// Scroll distance in logical pixels; line-based wheels are pre-scaled.
    Wheel(Vec2),
    Modifiers(Modifiers),
    Focus(bool),
}
