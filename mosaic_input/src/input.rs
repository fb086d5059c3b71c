// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input identifiers and the low-level events the dispatcher consumes.

use alloc::string::String;
use core::fmt;

use kurbo::Point;

/// Mouse button, numbered like DOM `MouseEvent.button`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (index 0).
    Left,
    /// Auxiliary button, usually the wheel (index 1).
    Middle,
    /// Secondary button (index 2).
    Right,
}

impl MouseButton {
    /// Map a DOM button index to a button; other indices are not tracked.
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    /// The binding name of this button, e.g. `"LeftButton"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "LeftButton",
            Self::Middle => "MiddleButton",
            Self::Right => "RightButton",
        }
    }
}

/// A single key or mouse button that can be held down.
///
/// Keys use browser-style key names (`"Control"`, `"a"`, `"Delete"`).
/// Converting from a string maps `"LeftButton"`, `"MiddleButton"` and
/// `"RightButton"` to [`InputId::Button`] and everything else to [`InputId::Key`].
///
/// ```
/// use mosaic_input::{InputId, MouseButton};
///
/// assert_eq!(InputId::from("LeftButton"), InputId::Button(MouseButton::Left));
/// assert_eq!(InputId::from("a"), InputId::Key("a".into()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputId {
    /// A keyboard key.
    Key(String),
    /// A mouse button.
    Button(MouseButton),
}

impl InputId {
    /// Shorthand for a keyboard key.
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// The name used in binding combinations.
    pub fn name(&self) -> &str {
        match self {
            Self::Key(key) => key,
            Self::Button(button) => button.name(),
        }
    }
}

impl From<&str> for InputId {
    fn from(name: &str) -> Self {
        match name {
            "LeftButton" => Self::Button(MouseButton::Left),
            "MiddleButton" => Self::Button(MouseButton::Middle),
            "RightButton" => Self::Button(MouseButton::Right),
            key => Self::Key(key.into()),
        }
    }
}

impl From<MouseButton> for InputId {
    fn from(button: MouseButton) -> Self {
        Self::Button(button)
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of a low-level input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Key pressed (or auto-repeated).
    KeyDown,
    /// Key released.
    KeyUp,
    /// Mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Pointer moved.
    MouseMove,
    /// Button pressed and released on the same target.
    Click,
    /// Two clicks in quick succession.
    DoubleClick,
    /// Context menu requested.
    ContextMenu,
    /// Wheel scrolled.
    Wheel,
    /// Pointer entered the target.
    MouseEnter,
    /// Pointer left the target.
    MouseLeave,
}

impl EventKind {
    /// Whether this is a keyboard event; everything else is a pointer event.
    pub fn is_keyboard(self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp)
    }
}

/// A low-level input event as delivered by the host.
///
/// `position` is relative to the drawing surface. `timestamp` is in host
/// milliseconds; the dispatcher only compares timestamps, it never reads a clock.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    /// What happened.
    pub kind: EventKind,
    /// The key or button involved, if any.
    pub input: Option<InputId>,
    /// Whether a key down was generated by OS auto-repeat.
    pub repeat: bool,
    /// Pointer position, for pointer events.
    pub position: Option<Point>,
    /// Host timestamp in milliseconds.
    pub timestamp: u64,
}

impl InputEvent {
    /// A key press. `repeat` marks OS auto-repeat.
    pub fn key_down(key: impl Into<String>, repeat: bool, timestamp: u64) -> Self {
        Self {
            kind: EventKind::KeyDown,
            input: Some(InputId::Key(key.into())),
            repeat,
            position: None,
            timestamp,
        }
    }

    /// A key release.
    pub fn key_up(key: impl Into<String>, timestamp: u64) -> Self {
        Self {
            kind: EventKind::KeyUp,
            input: Some(InputId::Key(key.into())),
            repeat: false,
            position: None,
            timestamp,
        }
    }

    /// A mouse button press at `position`.
    pub fn mouse_down(button: MouseButton, position: Point, timestamp: u64) -> Self {
        Self::button(EventKind::MouseDown, button, position, timestamp)
    }

    /// A mouse button release at `position`.
    pub fn mouse_up(button: MouseButton, position: Point, timestamp: u64) -> Self {
        Self::button(EventKind::MouseUp, button, position, timestamp)
    }

    /// A pointer move to `position`.
    pub fn mouse_move(position: Point, timestamp: u64) -> Self {
        Self::pointer(EventKind::MouseMove, position, timestamp)
    }

    /// Any pointer event that carries no button.
    pub fn pointer(kind: EventKind, position: Point, timestamp: u64) -> Self {
        Self {
            kind,
            input: None,
            repeat: false,
            position: Some(position),
            timestamp,
        }
    }

    fn button(kind: EventKind, button: MouseButton, position: Point, timestamp: u64) -> Self {
        Self {
            kind,
            input: Some(InputId::Button(button)),
            repeat: false,
            position: Some(position),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_round_trip() {
        for button in [MouseButton::Left, MouseButton::Middle, MouseButton::Right] {
            assert_eq!(InputId::from(button.name()), InputId::Button(button));
        }
        assert_eq!(MouseButton::from_index(2), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_index(3), None);
    }

    #[test]
    fn keyboard_kinds() {
        assert!(EventKind::KeyDown.is_keyboard());
        assert!(EventKind::KeyUp.is_keyboard());
        assert!(!EventKind::MouseDown.is_keyboard());
        assert!(!EventKind::Wheel.is_keyboard());
    }

    #[test]
    fn constructors_fill_inputs() {
        let e = InputEvent::mouse_down(MouseButton::Left, Point::new(3.0, 4.0), 10);
        assert_eq!(e.input, Some(InputId::Button(MouseButton::Left)));
        assert_eq!(e.position, Some(Point::new(3.0, 4.0)));
        let e = InputEvent::key_down("a", true, 5);
        assert!(e.repeat);
        assert_eq!(e.input.as_ref().map(InputId::name), Some("a"));
        assert!(InputEvent::mouse_move(Point::ZERO, 0).input.is_none());
    }
}
