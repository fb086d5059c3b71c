// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding boxes and the scalar abstraction used for area metrics.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// Edges are closed: a box touches everything that shares one of its edges.
/// Equality is exact numeric comparison of all four fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Bounds<T> {
    /// Create a box from its extents, in `min_x, max_x, min_y, max_y` order.
    #[inline(always)]
    pub const fn new(min_x: T, max_x: T, min_y: T, max_y: T) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

impl<T: Copy> Bounds<T> {
    /// A zero-size box at `(x, y)`.
    ///
    /// Point queries and point objects are expressed this way.
    #[inline]
    pub const fn point(x: T, y: T) -> Self {
        Self::new(x, x, y, y)
    }
}

impl<T: Copy + PartialOrd> Bounds<T> {
    /// Whether the two boxes share at least one point (edges included).
    ///
    /// ```
    /// use mosaic_index::Bounds;
    ///
    /// let a = Bounds::new(0.0, 10.0, 0.0, 10.0);
    /// assert!(a.intersects(&Bounds::new(10.0, 20.0, 0.0, 10.0)));
    /// assert!(!a.intersects(&Bounds::new(11.0, 20.0, 0.0, 10.0)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Whether `other` lies entirely inside this box.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Whether the point lies inside this box.
    #[inline]
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// The smallest box covering both boxes.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            max_x: max_t(self.max_x, other.max_x),
            min_y: min_t(self.min_y, other.min_y),
            max_y: max_t(self.max_y, other.max_y),
        }
    }

    /// The smallest box covering every box in `iter`, or `None` when it is empty.
    pub fn union_all(iter: impl IntoIterator<Item = Self>) -> Option<Self> {
        iter.into_iter().reduce(|acc, b| acc.union(&b))
    }
}

impl<T: Scalar> Bounds<T> {
    /// Create a box from an origin and a size.
    #[inline]
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::new(x, T::add(x, w), y, T::add(y, h))
    }

    /// Area in the scalar's widened accumulator. Inverted boxes have zero area.
    #[inline]
    pub fn area(&self) -> T::Acc {
        let w = T::max(T::sub(self.max_x, self.min_x), T::zero());
        let h = T::max(T::sub(self.max_y, self.min_y), T::zero());
        T::widen(w) * T::widen(h)
    }

    /// How much this box's area grows if it has to cover `other` as well.
    #[inline]
    pub fn enlargement(&self, other: &Self) -> T::Acc {
        self.union(other).area() - self.area()
    }

    /// Dead space created by covering both boxes with one box.
    ///
    /// This is the quadratic split's seed metric: the larger it is, the worse the
    /// two entries would fit in the same node.
    #[inline]
    pub fn waste(&self, other: &Self) -> T::Acc {
        self.union(other).area() - self.area() - other.area()
    }
}

/// Numeric scalar abstraction for bounding boxes.
///
/// Areas are accumulated in a widened type (f32→f64, i64→i128) so enlargement
/// comparisons during splits stay meaningful.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the two scalar values.
    fn max(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        Self::max(a, b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        Self::max(a, b)
    }

    #[inline(always)]
    fn widen(v: Self) -> Self::Acc {
        v
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline(always)]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        core::cmp::max(a, b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }
}

/// Helper alias for the widened accumulator type of a `T: Scalar`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}
