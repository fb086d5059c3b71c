// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement math: keep objects on the canvas and snap them to their own grid.
//!
//! Clamping comes first, snapping second. Snapping rounds to the nearer multiple
//! of the object's dimension and prefers the lower grid line on an exact tie:
//!
//! ```
//! use mosaic_editor::placement::{clamp_axis, snap_axis};
//!
//! assert_eq!(snap_axis(609.0, 32.0), 608.0);
//! assert_eq!(snap_axis(633.0, 32.0), 640.0);
//! assert_eq!(snap_axis(16.0, 32.0), 0.0);
//! assert_eq!(clamp_axis(90.0, 20.0, 100.0), 80.0);
//! assert_eq!(clamp_axis(-5.0, 20.0, 100.0), 0.0);
//! ```

use kurbo::{Point, Size};

/// Clamp `value` so an object of `size` starting there stays inside `0..=extent`.
///
/// When the object is larger than the extent the far edge wins and the result
/// is negative.
pub fn clamp_axis(value: f64, size: f64, extent: f64) -> f64 {
    let max = extent - size;
    if value >= max {
        max
    } else if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Snap `coordinate` to the nearer multiple of `dimension`.
///
/// The remainder follows the sign of the coordinate, so a negative dimension
/// behaves like its absolute value. A zero dimension leaves the coordinate alone.
pub fn snap_axis(coordinate: f64, dimension: f64) -> f64 {
    if dimension == 0.0 {
        return coordinate;
    }
    let remainder = coordinate % dimension;
    let delta = (dimension - remainder).abs().min(remainder);
    let lower = coordinate - delta;
    if lower % dimension == 0.0 {
        lower
    } else {
        coordinate + delta
    }
}

/// Clamp both axes of `raw` for an object of `size` on a canvas of `extent`.
pub fn clamp_point(raw: Point, size: Size, extent: Size) -> Point {
    Point::new(
        clamp_axis(raw.x, size.width, extent.width),
        clamp_axis(raw.y, size.height, extent.height),
    )
}

/// Snap both axes of `point` to the grid formed by `size`.
pub fn snap_point(point: Point, size: Size) -> Point {
    Point::new(
        snap_axis(point.x, size.width),
        snap_axis(point.y, size.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_like_the_level_editor() {
        assert_eq!(snap_axis(609.0, 32.0), 608.0);
        assert_eq!(snap_axis(613.0, 32.0), 608.0);
        assert_eq!(snap_axis(633.0, 32.0), 640.0);
        assert_eq!(snap_axis(639.0, 32.0), 640.0);
        assert_eq!(snap_axis(222.0, 17.0), 221.0);
        assert_eq!(snap_axis(228.0, 17.0), 221.0);
        assert_eq!(snap_axis(235.0, 17.0), 238.0);
        assert_eq!(snap_axis(237.0, 17.0), 238.0);
    }

    #[test]
    fn zero_dimension_skips_snapping() {
        assert_eq!(snap_axis(1223.0, 0.0), 1223.0);
    }

    #[test]
    fn negative_dimension_acts_like_its_magnitude() {
        assert_eq!(snap_axis(183.0, -11.0), 176.0);
        assert_eq!(snap_axis(189.0, -18.0), 180.0);
    }

    #[test]
    fn aligned_coordinates_stay_put() {
        for i in 0..20 {
            let c = f64::from(i) * 20.0;
            assert_eq!(snap_axis(c, 20.0), c);
        }
    }

    #[test]
    fn clamps_into_canvas() {
        assert_eq!(clamp_axis(30.0, 20.0, 100.0), 30.0);
        assert_eq!(clamp_axis(-5.0, 20.0, 100.0), 0.0);
        assert_eq!(clamp_axis(90.0, 20.0, 100.0), 80.0);
        assert_eq!(clamp_axis(80.0, 20.0, 100.0), 80.0);
        // An object wider than the canvas is pinned to the far edge.
        assert_eq!(clamp_axis(0.0, 120.0, 100.0), -20.0);
    }

    #[test]
    fn points_clamp_then_snap() {
        let size = Size::new(20.0, 20.0);
        let extent = Size::new(100.0, 100.0);
        let clamped = clamp_point(Point::new(95.0, 7.0), size, extent);
        assert_eq!(clamped, Point::new(80.0, 7.0));
        assert_eq!(snap_point(clamped, size), Point::new(80.0, 0.0));
    }
}
