// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-step undo history.

use alloc::vec::Vec;

use crate::object::{ObjectId, PlacedObject};

/// What a revision did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevisionAction {
    /// An object was placed.
    Added,
    /// An object was removed.
    Removed,
}

/// One undoable step.
#[derive(Clone, Debug, PartialEq)]
pub struct RevisionEntry {
    /// What happened.
    pub action: RevisionAction,
    /// The object it happened to. For [`RevisionAction::Removed`] this id is dead.
    pub object: ObjectId,
    /// The object as it was when the step was recorded.
    pub snapshot: PlacedObject,
}

/// A strict LIFO of [`RevisionEntry`]s. There is no redo.
#[derive(Clone, Debug, Default)]
pub struct RevisionLog {
    entries: Vec<RevisionEntry>,
}

impl RevisionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step.
    pub fn push(&mut self, entry: RevisionEntry) {
        self.entries.push(entry);
    }

    /// Take the most recent step.
    pub fn pop(&mut self) -> Option<RevisionEntry> {
        self.entries.pop()
    }

    /// The most recent step.
    pub fn last(&self) -> Option<&RevisionEntry> {
        self.entries.last()
    }

    /// Number of recorded steps.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the steps matching `keep`, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&RevisionEntry) -> bool) {
        self.entries.retain(keep);
    }

    /// Point every step about `from` at `to` instead.
    ///
    /// Used when undoing a removal brings an object back under a new id.
    pub fn rebind(&mut self, from: ObjectId, to: ObjectId) {
        for entry in self.entries.iter_mut().filter(|e| e.object == from) {
            entry.object = to;
        }
    }

    /// Forget every step.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &RevisionEntry> + '_ {
        self.entries.iter()
    }
}
