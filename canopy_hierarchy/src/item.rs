// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Items that can be placed in a hierarchy.

use core::fmt::Debug;

use canopy_bounds::tolerance::{gt, lt};
use canopy_bounds::{
    BoxBounds, Intersection, Line3, Plane3, Range3, RangeCompare, RangeCompare3, Sphere3,
};
use glam::DVec3;

use crate::error::{Error, Result};

/// An object with box bounds that can be stored as a leaf of a
/// [`Hierarchy`](crate::Hierarchy).
///
/// Implementors provide a center, a half-extent vector and an ID. The
/// bounding predicates work on the resulting box. The `*_inner` predicates
/// may be overridden to test the actual shape; by default they are the same
/// as the bounding predicates. Queries only call the inner predicates for
/// items whose bounding test is inconclusive.
pub trait BoxBoundsItem: Debug + Send + Sync {
    /// Center of the bounding box.
    fn center(&self) -> DVec3;

    /// Half-extent vector of the bounding box.
    fn r_vec(&self) -> DVec3;

    /// Item ID. Empty if not set.
    fn item_id(&self) -> &str;

    /// Set the item ID.
    fn set_item_id(&mut self, id: String);

    /// The bounding box.
    fn box_bounds(&self) -> BoxBounds {
        BoxBounds::new(self.center(), self.r_vec())
    }

    /// The bounding box as a range.
    fn bounds(&self) -> Range3 {
        *self.box_bounds().range()
    }

    /// Radius of the bounding sphere.
    fn radius(&self) -> f64 {
        self.r_vec().length()
    }

    /// Position of the bounding box relative to `plane`.
    fn check_plane(&self, plane: &Plane3, t: f64) -> Intersection {
        self.box_bounds().check_plane(plane, t)
    }

    /// Position of the bounding box relative to `sphere`.
    fn check_sphere(&self, sphere: &Sphere3, t: f64) -> Intersection {
        self.box_bounds().check_sphere(sphere, t)
    }

    /// Whether `line` intersects the bounding box.
    fn check_line(&self, line: &Line3, t: f64) -> bool {
        self.box_bounds().check_line(line, t)
    }

    /// Whether `ray` intersects the bounding box.
    fn check_ray(&self, ray: &Line3, t: f64) -> bool {
        self.box_bounds().check_ray(ray, t)
    }

    /// Position of the bounding box relative to the box `other`.
    fn check_box(&self, other: &BoxBounds, t: f64) -> Intersection {
        self.box_bounds().check_box(other, t)
    }

    /// Position of the item shape relative to `plane`.
    fn check_plane_inner(&self, plane: &Plane3, t: f64) -> Intersection {
        self.check_plane(plane, t)
    }

    /// Position of the item shape relative to `sphere`.
    fn check_sphere_inner(&self, sphere: &Sphere3, t: f64) -> Intersection {
        self.check_sphere(sphere, t)
    }

    /// Whether `line` intersects the item shape.
    fn check_line_inner(&self, line: &Line3, t: f64) -> bool {
        self.check_line(line, t)
    }

    /// Whether `ray` intersects the item shape.
    fn check_ray_inner(&self, ray: &Line3, t: f64) -> bool {
        self.check_ray(ray, t)
    }

    /// Position of the item shape relative to the box `other`.
    fn check_box_inner(&self, other: &BoxBounds, t: f64) -> Intersection {
        self.check_box(other, t)
    }

    /// Relationship of this item's bounds to the bounds of `other`.
    fn compare(&self, other: &dyn BoxBoundsItem, t: f64) -> RangeCompare {
        self.box_bounds().compare(&other.box_bounds(), t)
    }

    /// Per-axis relationship of this item's bounds to the bounds of `other`.
    fn compare3(&self, other: &dyn BoxBoundsItem, t: f64) -> RangeCompare3 {
        self.box_bounds().compare3(&other.box_bounds(), t)
    }

    /// Legacy XML element for this item.
    ///
    /// Fails with [`Error::MissingItemId`] if the ID is empty.
    fn xml_legacy(&self) -> Result<String> {
        if self.item_id().is_empty() {
            return Err(Error::MissingItemId);
        }
        let (c, r) = (self.center(), self.r_vec());
        Ok(format!(
            "<bbitem id=\"{}\" center=\"{},{},{}\" rvec=\"{},{},{}\" />",
            self.item_id(),
            c.x,
            c.y,
            c.z,
            r.x,
            r.y,
            r.z
        ))
    }
}

/// A box-shaped item.
///
/// Also serves as the placeholder for leaves restored from a
/// [`BoxDescription`](crate::BoxDescription).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundsItem {
    /// Center.
    pub center: DVec3,
    /// Half-extent vector.
    pub r_vec: DVec3,
    /// Item ID.
    pub item_id: String,
}

impl BoundsItem {
    /// Create an item from a center, a half-extent vector and an ID.
    pub fn new(center: DVec3, r_vec: DVec3, item_id: impl Into<String>) -> Self {
        Self {
            center,
            r_vec,
            item_id: item_id.into(),
        }
    }

    /// A zero-size item at `p`.
    pub fn point(p: DVec3, item_id: impl Into<String>) -> Self {
        Self::new(p, DVec3::ZERO, item_id)
    }
}

impl BoxBoundsItem for BoundsItem {
    fn center(&self) -> DVec3 {
        self.center
    }

    fn r_vec(&self) -> DVec3 {
        self.r_vec
    }

    fn item_id(&self) -> &str {
        &self.item_id
    }

    fn set_item_id(&mut self, id: String) {
        self.item_id = id;
    }
}

/// A sphere-shaped item.
///
/// The inner predicates test the sphere itself, so queries do not report a
/// sphere that only its bounding box reaches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SphereItem {
    /// The sphere.
    pub sphere: Sphere3,
    /// Item ID.
    pub item_id: String,
}

impl SphereItem {
    /// Create a sphere item.
    pub fn new(center: DVec3, radius: f64, item_id: impl Into<String>) -> Self {
        Self {
            sphere: Sphere3::new(center, radius),
            item_id: item_id.into(),
        }
    }
}

impl BoxBoundsItem for SphereItem {
    fn center(&self) -> DVec3 {
        self.sphere.p
    }

    fn r_vec(&self) -> DVec3 {
        DVec3::splat(self.sphere.r)
    }

    fn item_id(&self) -> &str {
        &self.item_id
    }

    fn set_item_id(&mut self, id: String) {
        self.item_id = id;
    }

    fn check_plane_inner(&self, plane: &Plane3, t: f64) -> Intersection {
        let d = plane.signed_distance(self.sphere.p);
        if gt(d, self.sphere.r, t) {
            Intersection::Inside
        } else if lt(d, -self.sphere.r, t) {
            Intersection::Outside
        } else {
            Intersection::Overlap
        }
    }

    fn check_sphere_inner(&self, sphere: &Sphere3, t: f64) -> Intersection {
        let d = (self.sphere.p - sphere.p).length();
        if gt(d, self.sphere.r + sphere.r, t) {
            Intersection::Outside
        } else if lt(d + self.sphere.r, sphere.r, t) {
            Intersection::Inside
        } else {
            Intersection::Overlap
        }
    }

    fn check_line_inner(&self, line: &Line3, t: f64) -> bool {
        line.distance_to(self.sphere.p) <= self.sphere.r + t
    }

    fn check_ray_inner(&self, ray: &Line3, t: f64) -> bool {
        ray.ray_distance_to(self.sphere.p) <= self.sphere.r + t
    }

    fn check_box_inner(&self, other: &BoxBounds, t: f64) -> Intersection {
        let closest = other.range().clamp(self.sphere.p);
        if gt((closest - self.sphere.p).length(), self.sphere.r, t) {
            return Intersection::Outside;
        }
        match self.box_bounds().compare(other, t) {
            RangeCompare::OtherContains | RangeCompare::Equal => Intersection::Inside,
            _ => Intersection::Overlap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_bounds::DEFAULT_TOLERANCE as T;

    #[test]
    fn bounds_item_xml() {
        let item = BoundsItem::new(DVec3::new(1.0, 2.0, 3.0), DVec3::splat(0.5), "a");
        assert_eq!(
            item.xml_legacy().unwrap(),
            "<bbitem id=\"a\" center=\"1,2,3\" rvec=\"0.5,0.5,0.5\" />"
        );
        let anon = BoundsItem::point(DVec3::ZERO, "");
        assert!(matches!(anon.xml_legacy(), Err(Error::MissingItemId)));
    }

    #[test]
    fn sphere_inner_is_tighter_than_bounds() {
        let s = SphereItem::new(DVec3::ZERO, 1.0, "s");
        // Passes through a corner region of the bounding box but misses the sphere.
        let line = Line3::new(DVec3::new(0.95, 0.95, 0.0), DVec3::Z);
        assert!(s.check_line(&line, T));
        assert!(!s.check_line_inner(&line, T));

        let corner = BoxBounds::new(DVec3::splat(1.2), DVec3::splat(0.3));
        assert_eq!(s.check_box(&corner, T), Intersection::Overlap);
        assert_eq!(s.check_box_inner(&corner, T), Intersection::Outside);

        let plane = Plane3::new(DVec3::new(0.0, 0.0, -1.2), DVec3::X, DVec3::Y);
        assert_eq!(s.check_plane_inner(&plane, T), Intersection::Inside);
    }

    #[test]
    fn sphere_ray_behind_origin() {
        let s = SphereItem::new(DVec3::ZERO, 1.0, "s");
        let away = Line3::new(DVec3::new(3.0, 0.0, 0.0), DVec3::X);
        assert!(!s.check_ray_inner(&away, T));
        assert!(s.check_line_inner(&away, T));
    }

    #[test]
    fn compare_uses_bounds() {
        let big = BoundsItem::new(DVec3::ZERO, DVec3::splat(2.0), "big");
        let small = SphereItem::new(DVec3::ZERO, 1.0, "small");
        assert_eq!(big.compare(&small, T), RangeCompare::FirstContains);
        assert_eq!(small.compare(&big, T), RangeCompare::OtherContains);
    }
}
