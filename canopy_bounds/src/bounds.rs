// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding boxes and their spatial predicates.

use core::fmt;

use glam::DVec3;

use crate::range::{RangeCompare, RangeCompare3};
use crate::range3::Range3;
use crate::shapes::{Line3, Plane3, Sphere3};
use crate::tolerance::{eq, gt, lt};

/// Tri-state result of testing bounds against a query shape.
///
/// For planes, `Inside` means entirely on the normal side and `Outside`
/// entirely on the other side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intersection {
    /// No part of the bounds is inside the shape.
    Outside,
    /// The bounds cross the boundary of the shape.
    Overlap,
    /// The bounds are entirely inside the shape.
    Inside,
}

impl Intersection {
    /// Whether the result is not [`Intersection::Overlap`].
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Overlap)
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Outside => "outside",
            Self::Overlap => "overlap",
            Self::Inside => "inside",
        };
        f.write_str(s)
    }
}

/// Axis-aligned bounding box described by a center and a half-extent vector.
///
/// The derived [`Range3`] and the bounding-sphere radius (`|r_vec|`) are kept
/// alongside so predicates do not recompute them.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxBounds {
    center: DVec3,
    r_vec: DVec3,
    range: Range3,
    radius: f64,
}

impl BoxBounds {
    /// Zero-size bounds at the origin.
    pub const ZERO: Self = Self {
        center: DVec3::ZERO,
        r_vec: DVec3::ZERO,
        range: Range3::from_point(DVec3::ZERO),
        radius: 0.0,
    };

    /// Create bounds from a center and a half-extent vector.
    ///
    /// Negative half-extents are taken by magnitude.
    pub fn new(center: DVec3, r_vec: DVec3) -> Self {
        let r_vec = r_vec.abs();
        Self {
            center,
            r_vec,
            range: Range3::from_center_radius(center, r_vec),
            radius: r_vec.length(),
        }
    }

    /// Create bounds covering `range`.
    pub fn from_range(range: Range3) -> Self {
        Self::new(range.center(), range.radius())
    }

    /// Center point.
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Half-extent vector.
    pub fn r_vec(&self) -> DVec3 {
        self.r_vec
    }

    /// Axis-aligned range.
    pub fn range(&self) -> &Range3 {
        &self.range
    }

    /// Radius of the bounding sphere, `|r_vec|`.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Smallest bounds containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let mut range = self.range;
        range.extend_range(&other.range);
        Self::from_range(range)
    }

    /// The eight corners.
    pub fn vertices(&self) -> [DVec3; 8] {
        self.range.corners()
    }

    /// Position relative to `plane`.
    pub fn check_plane(&self, plane: &Plane3, t: f64) -> Intersection {
        let d = plane.signed_distance(self.center);
        if gt(d, self.radius, t) {
            return Intersection::Inside;
        }
        if lt(d, -self.radius, t) {
            return Intersection::Outside;
        }
        let mut above = 0;
        let mut below = 0;
        for v in self.vertices() {
            let dv = plane.signed_distance(v);
            if eq(dv, 0.0, t) {
                return Intersection::Overlap;
            }
            if dv > 0.0 {
                above += 1;
            } else {
                below += 1;
            }
        }
        match (above, below) {
            (_, 0) => Intersection::Inside,
            (0, _) => Intersection::Outside,
            _ => Intersection::Overlap,
        }
    }

    /// Position relative to `sphere`, using the bounding sphere of the box.
    pub fn check_sphere(&self, sphere: &Sphere3, t: f64) -> Intersection {
        let d = (self.center - sphere.p).length();
        if gt(d, self.radius + sphere.r, t) {
            return Intersection::Outside;
        }
        if lt(d + self.radius, sphere.r, t) {
            return Intersection::Inside;
        }
        Intersection::Overlap
    }

    /// Whether `line` passes through the box.
    pub fn check_line(&self, line: &Line3, t: f64) -> bool {
        self.slab_interval(line, t)
            .is_some_and(|(s0, s1)| s0 <= s1)
    }

    /// Whether the ray (`line` restricted to non-negative parameters) hits
    /// the box.
    pub fn check_ray(&self, ray: &Line3, t: f64) -> bool {
        self.slab_interval(ray, t)
            .is_some_and(|(s0, s1)| s0.max(0.0) <= s1)
    }

    /// Position relative to the query box `other`.
    pub fn check_box(&self, other: &Self, t: f64) -> Intersection {
        match self.compare(other, t) {
            RangeCompare::Disjoint => Intersection::Outside,
            RangeCompare::OtherContains | RangeCompare::Equal => Intersection::Inside,
            RangeCompare::FirstContains | RangeCompare::Overlap => Intersection::Overlap,
        }
    }

    /// Relationship of these bounds to `other`.
    pub fn compare(&self, other: &Self, t: f64) -> RangeCompare {
        self.range.compare(&other.range, t)
    }

    /// Per-axis relationship of these bounds to `other`.
    pub fn compare3(&self, other: &Self, t: f64) -> RangeCompare3 {
        self.range.compare3(&other.range, t)
    }

    /// Whether `v` is inside, within tolerance `t`.
    pub fn contains_point(&self, v: DVec3, t: f64) -> bool {
        self.range.contains(v, t)
    }

    /// Parameter interval where `line` is inside the tolerance-grown slabs.
    ///
    /// `None` if the line is parallel to a slab and outside of it.
    fn slab_interval(&self, line: &Line3, t: f64) -> Option<(f64, f64)> {
        let lo = self.center - self.r_vec - DVec3::splat(t);
        let hi = self.center + self.r_vec + DVec3::splat(t);
        let mut s0 = f64::NEG_INFINITY;
        let mut s1 = f64::INFINITY;
        for i in 0..3 {
            let (p, u) = (line.p[i], line.u[i]);
            if u == 0.0 {
                if p < lo[i] || p > hi[i] {
                    return None;
                }
                continue;
            }
            let a = (lo[i] - p) / u;
            let b = (hi[i] - p) / u;
            s0 = s0.max(a.min(b));
            s1 = s1.min(a.max(b));
        }
        Some((s0, s1))
    }
}

impl Default for BoxBounds {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for BoxBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxBounds[center = {}, r = {}]", self.center, self.r_vec)
    }
}
