// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing surface the editor paints on.
//!
//! The editor never touches pixels. It asks a [`DrawSurface`] to copy source
//! regions and to clear destination regions, and reads the surface extent to
//! keep objects on the canvas.

use alloc::vec::Vec;

use kurbo::{Rect, Size};

/// A 2D surface that can copy image regions and clear rectangles.
pub trait DrawSurface {
    /// Handle to a drawable source image.
    type Image;

    /// Size of the canvas.
    fn extent(&self) -> Size;

    /// Copy `src` from `image` into `dst` on the canvas.
    fn draw_region(&mut self, image: &Self::Image, src: Rect, dst: Rect);

    /// Clear `dst` on the canvas.
    fn clear_region(&mut self, dst: Rect);
}

/// One operation recorded by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp<I> {
    /// A region was drawn.
    Draw {
        /// The source image handle.
        image: I,
        /// Source rectangle.
        src: Rect,
        /// Destination rectangle.
        dst: Rect,
    },
    /// A region was cleared.
    Clear(Rect),
}

/// A headless surface that records every operation.
///
/// Handy for servers, replays and tests.
#[derive(Clone, Debug)]
pub struct RecordingSurface<I> {
    extent: Size,
    ops: Vec<DrawOp<I>>,
}

impl<I: Clone> RecordingSurface<I> {
    /// Create a surface of the given extent.
    pub fn new(extent: Size) -> Self {
        Self {
            extent,
            ops: Vec::new(),
        }
    }

    /// Change the extent, as a window resize would.
    pub fn resize(&mut self, extent: Size) {
        self.extent = extent;
    }

    /// Operations recorded so far.
    pub fn ops(&self) -> &[DrawOp<I>] {
        &self.ops
    }

    /// Take the recorded operations, leaving the log empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp<I>> {
        core::mem::take(&mut self.ops)
    }
}

impl<I: Clone> DrawSurface for RecordingSurface<I> {
    type Image = I;

    fn extent(&self) -> Size {
        self.extent
    }

    fn draw_region(&mut self, image: &I, src: Rect, dst: Rect) {
        self.ops.push(DrawOp::Draw {
            image: image.clone(),
            src,
            dst,
        });
    }

    fn clear_region(&mut self, dst: Rect) {
        self.ops.push(DrawOp::Clear(dst));
    }
}
