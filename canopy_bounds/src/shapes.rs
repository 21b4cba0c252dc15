// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query shapes: planes, spheres, and lines.

use glam::DVec3;

use crate::range3::Range3;
use crate::tolerance::{DEFAULT_TOLERANCE, eq};

/// Plane through `p` spanned by the tangents `u` and `v`.
///
/// The normal is `u × v`, normalized. Points on the normal side are "above".
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane3 {
    /// A point on the plane.
    pub p: DVec3,
    /// First tangent.
    pub u: DVec3,
    /// Second tangent.
    pub v: DVec3,
}

impl Plane3 {
    /// The xy-plane through the origin, normal along +z.
    pub const XY: Self = Self::new(DVec3::ZERO, DVec3::X, DVec3::Y);

    /// Create a plane from a point and two tangents.
    pub const fn new(p: DVec3, u: DVec3, v: DVec3) -> Self {
        Self { p, u, v }
    }

    /// Create a plane from its normal `n`, a tangent hint `t` and a point `p`.
    ///
    /// If `t` is parallel to `n`, the y and then the z unit vectors are tried.
    pub fn from_normal(n: DVec3, t: DVec3, p: DVec3) -> Self {
        let mut u = t;
        for fallback in [DVec3::Y, DVec3::Z] {
            if !eq(n.cross(u).length(), 0.0, DEFAULT_TOLERANCE) {
                break;
            }
            u = fallback;
        }
        let n0 = n.normalize_or_zero();
        let u = (u - n0 * n0.dot(u)).normalize_or_zero();
        let v = n.cross(u).normalize_or_zero();
        Self { p, u, v }
    }

    /// Unit normal.
    pub fn normal(&self) -> DVec3 {
        self.u.cross(self.v).normalize_or_zero()
    }

    /// Signed distance of `v` from the plane, positive on the normal side.
    pub fn signed_distance(&self, v: DVec3) -> f64 {
        self.normal().dot(v - self.p)
    }
}

/// Sphere with center `p` and radius `r`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere3 {
    /// Center.
    pub p: DVec3,
    /// Radius.
    pub r: f64,
}

impl Sphere3 {
    /// Create a sphere.
    pub const fn new(p: DVec3, r: f64) -> Self {
        Self { p, r }
    }

    /// Axis-aligned bounds.
    pub fn bounds(&self) -> Range3 {
        Range3::from_center_radius(self.p, DVec3::splat(self.r))
    }

    /// Whether `v` lies inside, within tolerance `t`.
    pub fn contains(&self, v: DVec3, t: f64) -> bool {
        (v - self.p).length() <= self.r + t
    }
}

/// Line through `p` with direction `u`.
///
/// Used as a ray when only points with non-negative parameter count.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line3 {
    /// Origin.
    pub p: DVec3,
    /// Direction.
    pub u: DVec3,
}

impl Line3 {
    /// Create a line from an origin and a direction.
    pub const fn new(p: DVec3, u: DVec3) -> Self {
        Self { p, u }
    }

    /// Point at parameter `s`.
    pub fn point_at(&self, s: f64) -> DVec3 {
        self.p + self.u * s
    }

    /// Line parameter of the point closest to `v`.
    ///
    /// Returns `0` for a degenerate direction.
    pub fn closest_parameter(&self, v: DVec3) -> f64 {
        let uu = self.u.length_squared();
        if uu == 0.0 {
            return 0.0;
        }
        self.u.dot(v - self.p) / uu
    }

    /// Distance from `v` to the line.
    pub fn distance_to(&self, v: DVec3) -> f64 {
        (v - self.point_at(self.closest_parameter(v))).length()
    }

    /// Distance from `v` to the ray starting at `p`.
    pub fn ray_distance_to(&self, v: DVec3) -> f64 {
        (v - self.point_at(self.closest_parameter(v).max(0.0))).length()
    }

    /// Intersection point with `plane`, or `None` if the line is parallel to it.
    pub fn intersect_plane(&self, plane: &Plane3) -> Option<DVec3> {
        let n = plane.normal();
        let d = n.dot(self.u);
        if d == 0.0 {
            return None;
        }
        let s = n.dot(plane.p - self.p) / d;
        Some(self.point_at(s))
    }
}
