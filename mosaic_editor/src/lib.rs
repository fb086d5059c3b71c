// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Editor: a 2D canvas editing engine for tile and sprite layouts.
//!
//! Objects are rectangular regions of a source image ([`SourceRegion`])
//! copied onto a canvas at a destination position and a stacking layer.
//!
//! - [`placement`]: pure clamping and grid snapping.
//! - [`Editor`]: placed objects, their spatial index ([`mosaic_index::RTree`]),
//!   the one-object-per-spot rule and single-step undo.
//! - [`DrawSurface`]: the host's canvas. [`RecordingSurface`] is a headless one.
//! - [`AssetRegistry`]: source key to image handle lookup.
//! - [`Session`]: an editor wired to the default keyboard and mouse bindings
//!   from [`mosaic_input`].
//!
//! The engine keeps no clocks and draws nothing itself. Hosts forward input
//! events with timestamps and hand in the surface to draw on.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use mosaic_editor::{
//!     AssetRegistry, Editor, EditorEvent, RecordingSurface, Scope, Session, SourceRegion,
//! };
//! use mosaic_input::{InputEvent, MouseButton};
//!
//! let extent = Size::new(320.0, 240.0);
//! let mut surface = RecordingSurface::new(extent);
//! let assets: AssetRegistry<&str> = [("grass", "grass.png")].into_iter().collect();
//! let mut session = Session::new(Editor::new(extent), assets);
//! session
//!     .editor_mut()
//!     .set_brush(Some(SourceRegion::new("grass", "terrain", 0.0, 0.0, 16.0, 16.0)));
//!
//! let press = InputEvent::mouse_down(MouseButton::Left, Point::new(40.0, 20.0), 0);
//! let events = session.handle(&mut surface, &press, Some(&Scope::Canvas), 0);
//! assert!(events.iter().any(|e| matches!(e, EditorEvent::Placed { .. })));
//! assert_eq!(session.editor().len(), 1);
//! ```

#![no_std]

extern crate alloc;

mod assets;
mod editor;
mod object;
pub mod placement;
mod revision;
mod session;
mod surface;

pub use assets::AssetRegistry;
pub use editor::{Editor, EditorConfig, EditorEvent, EditorFlags, Rejection};
pub use object::{ObjectId, PlacedObject, PlacementKey, SourceRegion};
pub use revision::{RevisionAction, RevisionEntry, RevisionLog};
pub use session::{EditorAction, Scope, Session};
pub use surface::{DrawOp, DrawSurface, RecordingSurface};
