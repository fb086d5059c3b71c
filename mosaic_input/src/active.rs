// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The set of keys and buttons currently held down in one scope.

use hashbrown::HashSet;

use crate::input::{EventKind, InputEvent, InputId};

/// Keys and mouse buttons currently held down.
///
/// Mutated by press and release events, read by binding resolution.
#[derive(Clone, Debug, Default)]
pub struct ActiveInputSet {
    down: HashSet<InputId>,
}

impl ActiveInputSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `input` as held. Returns `true` if it was not already held.
    pub fn press(&mut self, input: InputId) -> bool {
        self.down.insert(input)
    }

    /// Mark `input` as released. Returns `true` if it was held.
    pub fn release(&mut self, input: &InputId) -> bool {
        self.down.remove(input)
    }

    /// Whether `input` is held.
    pub fn is_active(&self, input: &InputId) -> bool {
        self.down.contains(input)
    }

    /// Whether every input in `inputs` is held. Vacuously true for no inputs.
    pub fn all_active<'a>(&self, inputs: impl IntoIterator<Item = &'a InputId>) -> bool {
        inputs.into_iter().all(|input| self.is_active(input))
    }

    /// Release everything, e.g. when the host window loses focus.
    pub fn clear(&mut self) {
        self.down.clear();
    }

    /// Number of held inputs.
    pub fn len(&self) -> usize {
        self.down.len()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.down.is_empty()
    }

    /// Iterate over held inputs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &InputId> + '_ {
        self.down.iter()
    }

    /// Apply a press or release event; other events leave the set alone.
    ///
    /// Auto-repeated key downs do not touch the set: the key is already held.
    pub fn apply(&mut self, event: &InputEvent) {
        let Some(input) = &event.input else {
            return;
        };
        match event.kind {
            EventKind::KeyDown if !event.repeat => {
                self.press(input.clone());
            }
            EventKind::MouseDown => {
                self.press(input.clone());
            }
            EventKind::KeyUp | EventKind::MouseUp => {
                self.release(input);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use kurbo::Point;

    #[test]
    fn press_and_release() {
        let mut set = ActiveInputSet::new();
        assert!(set.press(InputId::key("Control")));
        assert!(!set.press(InputId::key("Control")));
        assert!(set.is_active(&InputId::key("Control")));
        assert!(set.release(&InputId::key("Control")));
        assert!(!set.release(&InputId::key("Control")));
        assert!(set.is_empty());
    }

    #[test]
    fn all_active_requires_every_input() {
        let mut set = ActiveInputSet::new();
        let chord = [InputId::key("Control"), InputId::key("a")];
        assert!(set.all_active(core::iter::empty()));
        set.press(InputId::key("a"));
        assert!(!set.all_active(&chord));
        set.press(InputId::key("Control"));
        assert!(set.all_active(&chord));
    }

    #[test]
    fn apply_tracks_keys_and_buttons() {
        let mut set = ActiveInputSet::new();
        set.apply(&InputEvent::key_down("d", false, 0));
        set.apply(&InputEvent::mouse_down(MouseButton::Left, Point::ZERO, 0));
        assert_eq!(set.len(), 2);
        set.apply(&InputEvent::mouse_move(Point::new(1.0, 1.0), 1));
        assert_eq!(set.len(), 2);
        set.apply(&InputEvent::mouse_up(MouseButton::Left, Point::ZERO, 2));
        set.apply(&InputEvent::key_up("d", 3));
        assert!(set.is_empty());
    }

    #[test]
    fn repeat_does_not_press() {
        let mut set = ActiveInputSet::new();
        set.apply(&InputEvent::key_down("x", true, 0));
        assert!(set.is_empty());
        set.press(InputId::key("y"));
        set.clear();
        assert_eq!(set.iter().count(), 0);
    }
}
