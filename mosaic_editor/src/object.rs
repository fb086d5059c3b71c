// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brushes, placed objects and their identifiers.

use alloc::string::String;

use kurbo::{Point, Rect, Size};
use mosaic_index::Bounds;

/// A rectangle of a source image, used as the brush for new objects.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceRegion {
    /// Key of the source image in the asset registry.
    pub source_key: String,
    /// Group the source belongs to, e.g. a tile set.
    pub group_key: String,
    /// Left edge of the region in the source image.
    pub sx: f64,
    /// Top edge of the region in the source image.
    pub sy: f64,
    /// Region width; placed objects share it.
    pub width: f64,
    /// Region height; placed objects share it.
    pub height: f64,
}

impl SourceRegion {
    /// Create a region of `source_key` in `group_key`.
    pub fn new(
        source_key: impl Into<String>,
        group_key: impl Into<String>,
        sx: f64,
        sy: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            source_key: source_key.into(),
            group_key: group_key.into(),
            sx,
            sy,
            width,
            height,
        }
    }

    /// Size of the region.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The region in source image coordinates.
    pub fn src_rect(&self) -> Rect {
        Rect::new(self.sx, self.sy, self.sx + self.width, self.sy + self.height)
    }
}

/// Identifier for a placed object (generational).
///
/// An id stays valid until its object is removed; a later object reusing the
/// slot gets a higher generation, so stale ids never alias new objects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) u32, pub(crate) u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A source region drawn at a destination position on a stacking layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedObject {
    /// Key of the source image in the asset registry.
    pub source_key: String,
    /// Group the source belongs to.
    pub group_key: String,
    /// Destination x.
    pub dx: f64,
    /// Destination y.
    pub dy: f64,
    /// Width, in both source and destination.
    pub w: f64,
    /// Height, in both source and destination.
    pub h: f64,
    /// Source x.
    pub sx: f64,
    /// Source y.
    pub sy: f64,
    /// Stacking layer; higher layers draw on top.
    pub layer: u32,
}

impl PlacedObject {
    /// Place `source` at `at` on `layer`.
    pub fn from_source(source: &SourceRegion, at: Point, layer: u32) -> Self {
        Self {
            source_key: source.source_key.clone(),
            group_key: source.group_key.clone(),
            dx: at.x,
            dy: at.y,
            w: source.width,
            h: source.height,
            sx: source.sx,
            sy: source.sy,
            layer,
        }
    }

    /// The occupancy key.
    pub fn key(&self) -> PlacementKey {
        PlacementKey {
            dx: self.dx,
            dy: self.dy,
            layer: self.layer,
        }
    }

    /// Destination origin.
    pub fn origin(&self) -> Point {
        Point::new(self.dx, self.dy)
    }

    /// Destination rectangle on the canvas.
    pub fn dst_rect(&self) -> Rect {
        Rect::new(self.dx, self.dy, self.dx + self.w, self.dy + self.h)
    }

    /// Source rectangle in the source image.
    pub fn src_rect(&self) -> Rect {
        Rect::new(self.sx, self.sy, self.sx + self.w, self.sy + self.h)
    }

    /// Bounds as stored in the spatial index.
    pub fn bounds(&self) -> Bounds<f64> {
        Bounds::from_xywh(self.dx, self.dy, self.w, self.h)
    }
}

/// `(dx, dy, layer)`: at most one live object may hold a given key.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementKey {
    /// Destination x.
    pub dx: f64,
    /// Destination y.
    pub dy: f64,
    /// Stacking layer.
    pub layer: u32,
}

impl PlacementKey {
    /// Key for an object at `at` on `layer`.
    pub fn new(at: Point, layer: u32) -> Self {
        Self {
            dx: at.x,
            dy: at.y,
            layer,
        }
    }
}

/// Convert a canvas rectangle to index bounds.
pub(crate) fn rect_bounds(rect: Rect) -> Bounds<f64> {
    let rect = rect.abs();
    Bounds::new(rect.x0, rect.x1, rect.y0, rect.y1)
}
