// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned 3D ranges.

use core::fmt;

use glam::DVec3;

use crate::axis::{Axis, AxisTriple, axis_order};
use crate::range::{Range, RangeCompare, RangeCompare3};

/// Axis-aligned box given as one [`Range`] per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range3 {
    /// Range along x.
    pub x: Range,
    /// Range along y.
    pub y: Range,
    /// Range along z.
    pub z: Range,
}

impl Range3 {
    /// Create a range from per-axis ranges.
    pub const fn new(x: Range, y: Range, z: Range) -> Self {
        Self { x, y, z }
    }

    /// Degenerate range containing only `v`.
    pub const fn from_point(v: DVec3) -> Self {
        Self {
            x: Range::point(v.x),
            y: Range::point(v.y),
            z: Range::point(v.z),
        }
    }

    /// Range covering `center ± radius`.
    pub fn from_center_radius(center: DVec3, radius: DVec3) -> Self {
        let mut r = Self::from_point(center);
        r.extend_point(center + radius);
        r.extend_point(center - radius);
        r
    }

    /// Reset to the single point `v`.
    pub fn set_point(&mut self, v: DVec3) {
        *self = Self::from_point(v);
    }

    /// Grow the range so it contains `v`.
    pub fn extend_point(&mut self, v: DVec3) {
        self.x.extend(v.x);
        self.y.extend(v.y);
        self.z.extend(v.z);
    }

    /// Grow the range so it contains `other`.
    pub fn extend_range(&mut self, other: &Self) {
        self.extend_point(other.center() - other.radius());
        self.extend_point(other.center() + other.radius());
    }

    /// Center point.
    pub fn center(&self) -> DVec3 {
        DVec3::new(self.x.center(), self.y.center(), self.z.center())
    }

    /// Half-extent vector.
    pub fn radius(&self) -> DVec3 {
        DVec3::new(self.x.radius(), self.y.radius(), self.z.radius())
    }

    /// Extent vector.
    pub fn extent(&self) -> DVec3 {
        DVec3::new(self.x.extent(), self.y.extent(), self.z.extent())
    }

    /// Map a normalized parameter vector into the range, per axis.
    pub fn value(&self, v: DVec3) -> DVec3 {
        DVec3::new(self.x.value(v.x), self.y.value(v.y), self.z.value(v.z))
    }

    /// Clamp `v` into the range, per axis.
    pub fn clamp(&self, v: DVec3) -> DVec3 {
        DVec3::new(self.x.clamp(v.x), self.y.clamp(v.y), self.z.clamp(v.z))
    }

    /// The range along `axis`, or `None` for [`Axis::W`].
    pub fn axis_range(&self, axis: Axis) -> Option<Range> {
        match axis {
            Axis::X => Some(self.x),
            Axis::Y => Some(self.y),
            Axis::Z => Some(self.z),
            Axis::W => None,
        }
    }

    /// Whether `v` lies inside, within tolerance `t`.
    pub fn contains(&self, v: DVec3, t: f64) -> bool {
        self.x.contains(v.x, t) && self.y.contains(v.y, t) && self.z.contains(v.z, t)
    }

    /// Per-axis relationship to `other`.
    pub fn compare3(&self, other: &Self, t: f64) -> RangeCompare3 {
        RangeCompare3 {
            x: self.x.compare(&other.x, t),
            y: self.y.compare(&other.y, t),
            z: self.z.compare(&other.z, t),
        }
    }

    /// Relationship to `other`.
    ///
    /// Containment may hold with equal ranges on some axes; a single disjoint
    /// axis makes the boxes disjoint.
    pub fn compare(&self, other: &Self, t: f64) -> RangeCompare {
        let c = self.compare3(other, t);
        if c.x == c.y && c.x == c.z {
            return c.x;
        }
        let axes = [c.x, c.y, c.z];
        if axes.contains(&RangeCompare::Disjoint) {
            return RangeCompare::Disjoint;
        }
        if axes
            .iter()
            .all(|v| matches!(v, RangeCompare::FirstContains | RangeCompare::Equal))
        {
            return RangeCompare::FirstContains;
        }
        if axes
            .iter()
            .all(|v| matches!(v, RangeCompare::OtherContains | RangeCompare::Equal))
        {
            return RangeCompare::OtherContains;
        }
        RangeCompare::Overlap
    }

    /// Axes ordered by descending half-extent (longest axis first).
    pub fn axis_order(&self) -> AxisTriple {
        axis_order(self.radius())
    }

    /// The eight corner points.
    pub fn corners(&self) -> [DVec3; 8] {
        let (lo, hi) = (
            DVec3::new(self.x.min, self.y.min, self.z.min),
            DVec3::new(self.x.max, self.y.max, self.z.max),
        );
        [
            DVec3::new(hi.x, hi.y, hi.z),
            DVec3::new(lo.x, hi.y, hi.z),
            DVec3::new(lo.x, lo.y, hi.z),
            DVec3::new(hi.x, lo.y, hi.z),
            DVec3::new(hi.x, hi.y, lo.z),
            DVec3::new(lo.x, hi.y, lo.z),
            DVec3::new(lo.x, lo.y, lo.z),
            DVec3::new(hi.x, lo.y, lo.z),
        ]
    }
}

impl fmt::Display for Range3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range3[{}, {}, {}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_TOLERANCE as T;

    fn cube(c: DVec3, r: f64) -> Range3 {
        Range3::from_center_radius(c, DVec3::splat(r))
    }

    #[test]
    fn center_radius_roundtrip() {
        let r = Range3::from_center_radius(DVec3::new(1.0, 2.0, 3.0), DVec3::new(0.5, 1.0, 2.0));
        assert_eq!(r.center(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(r.radius(), DVec3::new(0.5, 1.0, 2.0));
        assert_eq!(r.extent(), DVec3::new(1.0, 2.0, 4.0));
        assert_eq!(r.axis_order().a0, Axis::Z);
    }

    #[test]
    fn containment_with_shared_faces() {
        let outer = cube(DVec3::ZERO, 1.0);
        // Shares the max-x face with the outer cube.
        let inner = Range3::new(Range::new(0.0, 1.0), Range::new(-0.5, 0.5), Range::new(-0.5, 0.5));
        assert_eq!(outer.compare(&inner, T), RangeCompare::FirstContains);
        assert_eq!(inner.compare(&outer, T), RangeCompare::OtherContains);
        assert_eq!(outer.compare(&outer, T), RangeCompare::Equal);
    }

    #[test]
    fn disjoint_on_one_axis_is_disjoint() {
        let a = cube(DVec3::ZERO, 1.0);
        let b = cube(DVec3::new(0.0, 0.0, 5.0), 1.0);
        assert_eq!(a.compare(&b, T), RangeCompare::Disjoint);
        let c = cube(DVec3::new(1.5, 0.0, 0.0), 1.0);
        assert_eq!(a.compare(&c, T), RangeCompare::Overlap);
    }

    #[test]
    fn w_axis_has_no_range() {
        assert!(cube(DVec3::ZERO, 1.0).axis_range(Axis::W).is_none());
        assert_eq!(cube(DVec3::ZERO, 1.0).axis_range(Axis::Y), Some(Range::new(-1.0, 1.0)));
    }
}
