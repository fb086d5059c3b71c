// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input combinations and registered bindings.

use alloc::string::String;

use smallvec::SmallVec;

use crate::input::{EventKind, InputId};

/// An ordered list of inputs that must be held together.
///
/// The empty combination is unconditional. Two combinations are equal when
/// they list the same inputs in the same order, matching their canonical
/// [`key`](Self::key).
///
/// ```
/// use mosaic_input::Combination;
///
/// let chord = Combination::from(["Control", "a"]);
/// assert_eq!(chord.len(), 2);
/// assert_eq!(chord.key(), "Control,a");
/// assert!(Combination::none().is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Combination {
    inputs: SmallVec<[InputId; 2]>,
}

impl Combination {
    /// The empty, unconditional combination.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build a combination from anything convertible to [`InputId`].
    pub fn new<I: Into<InputId>>(inputs: impl IntoIterator<Item = I>) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// The inputs, in registration order.
    pub fn inputs(&self) -> &[InputId] {
        &self.inputs
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether this is the unconditional combination.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Canonical key: input names joined with `,`.
    pub fn key(&self) -> String {
        let mut key = String::new();
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(input.name());
        }
        key
    }
}

impl<I: Into<InputId>, const N: usize> From<[I; N]> for Combination {
    fn from(inputs: [I; N]) -> Self {
        Self::new(inputs)
    }
}

impl From<InputId> for Combination {
    fn from(input: InputId) -> Self {
        Self::new([input])
    }
}

/// Identity of a binding: registering the same key again replaces it.
pub type BindingKey = (Combination, EventKind);

/// A registered binding.
#[derive(Clone, Debug)]
pub struct Binding<S, A> {
    /// Inputs that must be held.
    pub combination: Combination,
    /// Event kind the binding listens for.
    pub kind: EventKind,
    /// Payload handed back when the binding fires.
    pub action: A,
    /// Ignore keyboard auto-repeat.
    pub fire_once: bool,
    /// Scope the binding listens on, or `None` for the global scope.
    pub scope: Option<S>,
}

impl<S, A> Binding<S, A> {
    /// Whether this binding answers to `key`.
    pub fn matches_key(&self, combination: &Combination, kind: EventKind) -> bool {
        self.kind == kind && self.combination == *combination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;

    #[test]
    fn order_matters() {
        let a = Combination::from(["Control", "a"]);
        let b = Combination::from(["a", "Control"]);
        assert_ne!(a, b);
        assert_eq!(a, Combination::new(["Control", "a"]));
    }

    #[test]
    fn buttons_are_parsed_by_name() {
        let c = Combination::from(["LeftButton"]);
        assert_eq!(c.inputs(), [InputId::Button(MouseButton::Left)]);
        assert_eq!(c.key(), "LeftButton");
        assert_eq!(Combination::none().key(), "");
    }
}
