// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors raised while configuring or validating an [`RTree`](crate::RTree).
///
/// Only [`IndexError::CapacityTooSmall`] can come out of normal use. The other
/// variants are reported by [`RTree::validate`](crate::RTree::validate) and mean
/// the tree's structure has been corrupted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A node must be able to hold at least two children to split.
    #[error("r-tree capacity must be at least 2, got {capacity}")]
    CapacityTooSmall {
        /// The rejected maximum capacity.
        capacity: usize,
    },
    /// A node's bounds differ from the minimal box covering its children.
    #[error("node at height {height} has stale bounds")]
    StaleBounds {
        /// Height of the offending node.
        height: usize,
    },
    /// A node holds more than the maximum, or a non-root node fewer than the minimum.
    #[error("node at height {height} holds {count} children, outside {min}..={max}")]
    Fill {
        /// Height of the offending node.
        height: usize,
        /// Number of children found.
        count: usize,
        /// Minimum allowed for non-root nodes.
        min: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A child does not sit exactly one level below its parent, or records hang off an internal node.
    #[error("child height {child} under parent height {parent}")]
    Height {
        /// Height of the parent.
        parent: usize,
        /// Height of the child.
        child: usize,
    },
    /// A child's parent link does not point back at the node holding it.
    #[error("broken parent link below height {height}")]
    ParentLink {
        /// Height of the node whose child is mislinked.
        height: usize,
    },
    /// The record count tracked by the tree disagrees with the leaves.
    #[error("tree tracks {expected} records but leaves hold {found}")]
    RecordCount {
        /// Count tracked by the tree.
        expected: usize,
        /// Count found in the leaves.
        found: usize,
    },
}
