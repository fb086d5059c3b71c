// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Index: an R-tree over 2D axis-aligned bounding boxes.
//!
//! - Insert boxes (zero-area points included) with a copyable payload.
//! - Search for every record intersecting or containing a query box.
//! - Delete by exact bounds, condensing underfilled nodes and shrinking the root.
//! - Check structural integrity with [`RTree::validate`].
//!
//! The tree is generic over the scalar type `T` and does not depend on any
//! geometry crate. Area metrics are accumulated in a widened type
//! (f32→f64, f64→f64, i64→i128) so split decisions stay stable.
//!
//! Splits are quadratic: the most wasteful pair of entries seeds two groups and
//! every other entry joins the group it enlarges least.
//!
//! # Example
//!
//! ```rust
//! use mosaic_index::{Bounds, RTree};
//!
//! let mut tree = RTree::<f64, u32>::with_capacity(4).unwrap();
//! for i in 0..20 {
//!     let x = f64::from(i) * 20.0;
//!     tree.insert(Bounds::from_xywh(x, 0.0, 10.0, 10.0), i);
//! }
//! assert_eq!(tree.len(), 20);
//! assert!(tree.height() > 1);
//!
//! // Point queries are zero-size boxes; edges count as hits.
//! let hits = tree.search(Bounds::point(30.0, 10.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].payload, 1);
//!
//! assert_eq!(tree.delete(Bounds::from_xywh(20.0, 0.0, 10.0, 10.0)), Some(1));
//! assert!(tree.search(Bounds::point(30.0, 10.0)).is_empty());
//! tree.validate().unwrap();
//! ```
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.

#![no_std]

extern crate alloc;

mod error;
mod rtree;
mod types;

pub use error::IndexError;
pub use rtree::{DEFAULT_MAX_CAPACITY, RTree, Record};
pub use types::{Bounds, Scalar, ScalarAcc};
