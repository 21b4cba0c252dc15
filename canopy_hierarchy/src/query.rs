// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial queries and structural inspection of a hierarchy.

use std::collections::BTreeSet;

use canopy_bounds::{BoxBounds, Intersection, Line3, Plane3, RangeCompare, Sphere3};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, Kind};
use crate::item::BoxBoundsItem;
use crate::types::{ItemOrder, NodeId};

#[derive(Copy, Clone, Debug)]
enum Shape<'a> {
    Plane(&'a Plane3),
    Line(&'a Line3),
    Ray(&'a Line3),
    Sphere(&'a Sphere3),
    Box(&'a BoxBounds),
}

fn hit(v: bool) -> Intersection {
    if v {
        Intersection::Overlap
    } else {
        Intersection::Outside
    }
}

impl Shape<'_> {
    fn op(self) -> &'static str {
        match self {
            Self::Plane(_) => "items_above_plane",
            Self::Line(_) => "items_on_line",
            Self::Ray(_) => "items_on_ray",
            Self::Sphere(_) => "items_in_sphere",
            Self::Box(_) => "items_in_box",
        }
    }

    /// Bounding test for a box. Lines and rays never resolve to `Inside`.
    fn test_box(self, b: &BoxBounds, t: f64) -> Intersection {
        match self {
            Self::Plane(p) => b.check_plane(p, t),
            Self::Line(l) => hit(b.check_line(l, t)),
            Self::Ray(r) => hit(b.check_ray(r, t)),
            Self::Sphere(s) => b.check_sphere(s, t),
            Self::Box(q) => b.check_box(q, t),
        }
    }

    fn test_leaf(self, item: &dyn BoxBoundsItem, t: f64) -> Intersection {
        match self {
            Self::Plane(p) => item.check_plane(p, t),
            Self::Line(l) => hit(item.check_line(l, t)),
            Self::Ray(r) => hit(item.check_ray(r, t)),
            Self::Sphere(s) => item.check_sphere(s, t),
            Self::Box(q) => item.check_box(q, t),
        }
    }

    fn test_inner(self, item: &dyn BoxBoundsItem, t: f64) -> bool {
        match self {
            Self::Plane(p) => item.check_plane_inner(p, t) != Intersection::Outside,
            Self::Line(l) => item.check_line_inner(l, t),
            Self::Ray(r) => item.check_ray_inner(r, t),
            Self::Sphere(s) => item.check_sphere_inner(s, t) != Intersection::Outside,
            Self::Box(q) => item.check_box_inner(q, t) != Intersection::Outside,
        }
    }
}

impl Hierarchy {
    /// Items of `bx` above `plane` (on its normal side), or intersecting it.
    ///
    /// See [`Hierarchy::items_in_box`] for how results are aggregated.
    pub fn items_above_plane(
        &self,
        bx: NodeId,
        plane: &Plane3,
        t: f64,
    ) -> Result<BTreeSet<NodeId>> {
        self.query(bx, Shape::Plane(plane), t)
    }

    /// Items of `bx` intersected by `line`.
    pub fn items_on_line(&self, bx: NodeId, line: &Line3, t: f64) -> Result<BTreeSet<NodeId>> {
        self.query(bx, Shape::Line(line), t)
    }

    /// Items of `bx` intersected by `ray`.
    pub fn items_on_ray(&self, bx: NodeId, ray: &Line3, t: f64) -> Result<BTreeSet<NodeId>> {
        self.query(bx, Shape::Ray(ray), t)
    }

    /// Items of `bx` inside or intersecting `sphere`.
    pub fn items_in_sphere(
        &self,
        bx: NodeId,
        sphere: &Sphere3,
        t: f64,
    ) -> Result<BTreeSet<NodeId>> {
        self.query(bx, Shape::Sphere(sphere), t)
    }

    /// Items of `bx` inside or intersecting the box `query`.
    ///
    /// A box entirely inside the query shape is returned as a whole instead
    /// of its items, so results can contain bounding boxes as well as leaves.
    /// If `bx` itself is inside, the result is `{bx}`. Boxes that straddle
    /// the boundary are descended into; for leaves that straddle it the
    /// item's inner test decides.
    ///
    /// Fails with [`Error::EmptyInteriorNode`] when a straddling box has no
    /// items.
    pub fn items_in_box(
        &self,
        bx: NodeId,
        query: &BoxBounds,
        t: f64,
    ) -> Result<BTreeSet<NodeId>> {
        self.query(bx, Shape::Box(query), t)
    }

    fn query(&self, bx: NodeId, shape: Shape<'_>, t: f64) -> Result<BTreeSet<NodeId>> {
        let b = self.box_ref(bx, shape.op())?;
        let mut out = BTreeSet::new();
        match shape.test_box(&b.bounds, t) {
            Intersection::Inside => {
                out.insert(bx);
            }
            Intersection::Outside => {}
            Intersection::Overlap => self.query_items(bx, shape, t, &mut out)?,
        }
        Ok(out)
    }

    fn query_items(
        &self,
        bx: NodeId,
        shape: Shape<'_>,
        t: f64,
        out: &mut BTreeSet<NodeId>,
    ) -> Result<()> {
        let op = shape.op();
        let b = self.box_ref(bx, op)?;
        if b.items.is_empty() {
            return Err(Error::EmptyInteriorNode { op });
        }
        trace!("{op}: descending into {bx:?} ({} items)", b.items.len());
        for &item in &b.items {
            match &self.get(item, op)?.kind {
                Kind::Box(child) => match shape.test_box(&child.bounds, t) {
                    Intersection::Inside => {
                        out.insert(item);
                    }
                    Intersection::Overlap => self.query_items(item, shape, t, out)?,
                    Intersection::Outside => {}
                },
                Kind::Leaf(leaf) => {
                    let include = match shape.test_leaf(leaf.as_ref(), t) {
                        Intersection::Inside => true,
                        Intersection::Overlap => shape.test_inner(leaf.as_ref(), t),
                        Intersection::Outside => false,
                    };
                    if include {
                        out.insert(item);
                    }
                }
            }
        }
        Ok(())
    }

    /// The deepest node below `bx` whose bounds contain `target`.
    ///
    /// Items are searched in order; the first containing child wins. Returns
    /// `bx` if no item contains `target`, and `None` if `bx` does not.
    pub fn containing_leaf(
        &self,
        bx: NodeId,
        target: &BoxBounds,
        t: f64,
    ) -> Result<Option<NodeId>> {
        const OP: &str = "containing_leaf";
        let b = self.box_ref(bx, OP)?;
        if !b.bounds.compare(target, t).first_covers() {
            return Ok(None);
        }
        for &item in &b.items {
            match &self.get(item, OP)?.kind {
                Kind::Box(_) => {
                    if let Some(found) = self.containing_leaf(item, target, t)? {
                        return Ok(Some(found));
                    }
                }
                Kind::Leaf(leaf) => {
                    if leaf.box_bounds().compare(target, t).first_covers() {
                        return Ok(Some(item));
                    }
                }
            }
        }
        Ok(Some(bx))
    }

    /// `bx` and every bounding box below it.
    pub fn bounding_boxes(&self, bx: NodeId) -> Result<BTreeSet<NodeId>> {
        let mut out = BTreeSet::new();
        self.collect_nodes(bx, true, &mut out)?;
        Ok(out)
    }

    /// Every leaf item below `bx`.
    pub fn leaves(&self, bx: NodeId) -> Result<BTreeSet<NodeId>> {
        let mut out = BTreeSet::new();
        self.collect_nodes(bx, false, &mut out)?;
        Ok(out)
    }

    fn collect_nodes(&self, bx: NodeId, boxes: bool, out: &mut BTreeSet<NodeId>) -> Result<()> {
        const OP: &str = "collect_nodes";
        let b = self.box_ref(bx, OP)?;
        if boxes {
            out.insert(bx);
        }
        for &item in &b.items {
            if self.is_box(item) {
                self.collect_nodes(item, boxes, out)?;
            } else if !boxes {
                out.insert(item);
            }
        }
        Ok(())
    }

    /// Path of boxes from the box directly holding `item` up to `bx`.
    ///
    /// Returns `None` if `item` is not below `bx`. Boxes are searched depth
    /// first, in item order.
    pub fn item_path(&self, bx: NodeId, item: NodeId) -> Result<Option<Vec<NodeId>>> {
        let b = self.box_ref(bx, "item_path")?;
        if b.items.contains(&item) {
            return Ok(Some(vec![bx]));
        }
        for &child in &b.items {
            if self.is_box(child) {
                if let Some(mut path) = self.item_path(child, item)? {
                    path.push(bx);
                    return Ok(Some(path));
                }
            }
        }
        Ok(None)
    }

    /// Whether the hierarchy below `other` matches the one below `bx`.
    ///
    /// The bounds of both boxes must be equal within `t`. Every leaf of `bx`
    /// must be an item of `other` too, and every box of `bx` must have a
    /// matching box with equal bounds among the items of `other`. Items of
    /// `other` without counterpart in `bx` are not checked.
    pub fn compare_hierarchy(&self, bx: NodeId, other: NodeId, t: f64) -> Result<bool> {
        const OP: &str = "compare_hierarchy";
        let a = self.box_ref(bx, OP)?;
        let b = self.box_ref(other, OP)?;
        if a.bounds.compare(&b.bounds, t) != RangeCompare::Equal {
            debug!("{OP}: bounds of {bx:?} and {other:?} differ");
            return Ok(false);
        }
        for &item in &a.items {
            let Kind::Box(child) = &self.get(item, OP)?.kind else {
                if !b.items.contains(&item) {
                    debug!("{OP}: leaf {item:?} of {bx:?} missing in {other:?}");
                    return Ok(false);
                }
                continue;
            };
            let mut matched = false;
            for &candidate in &b.items {
                let Kind::Box(c) = &self.get(candidate, OP)?.kind else {
                    continue;
                };
                if child.bounds.compare(&c.bounds, t) == RangeCompare::Equal
                    && self.compare_hierarchy(item, candidate, t)?
                {
                    matched = true;
                    break;
                }
            }
            if !matched {
                debug!("{OP}: no match for box {item:?} of {bx:?} in {other:?}");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Check that every item below `bx` is contained in the box holding it.
    pub fn validate(&self, bx: NodeId, t: f64) -> Result<()> {
        const OP: &str = "validate";
        let b = self.box_ref(bx, OP)?;
        for &item in &b.items {
            let node = self.get(item, OP)?;
            if !b.bounds.compare(&node.kind.bounds(), t).first_covers() {
                return Err(Error::NotContained {
                    item,
                    container: bx,
                });
            }
            if matches!(node.kind, Kind::Box(_)) {
                self.validate(item, t)?;
            }
        }
        Ok(())
    }

    /// Sort `ids` by the centers of their nodes.
    ///
    /// The sort is stable.
    pub fn sort_items(&self, ids: &mut [NodeId], order: ItemOrder) -> Result<()> {
        const OP: &str = "sort_items";
        let mut keyed = ids
            .iter()
            .map(|&id| -> Result<(f64, NodeId)> {
                let c = self.get(id, OP)?.kind.bounds().center();
                let key = match order {
                    ItemOrder::Axis(axis) => axis.component(c).ok_or(Error::InvalidAxis(axis))?,
                    ItemOrder::DistanceToPoint(p) => (c - p).length(),
                    ItemOrder::DistanceToPlane(plane) => plane.signed_distance(c),
                };
                Ok((key, id))
            })
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (slot, (_, id)) in ids.iter_mut().zip(keyed) {
            *slot = id;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{BoundsItem, SphereItem};
    use crate::split::{SplitOptions, SplitSet};
    use crate::testing::{Rng, cube, eight_cubes, random_box};
    use canopy_bounds::{Axes, Axis, DEFAULT_TOLERANCE as T};
    use glam::DVec3;

    fn split_eight(h: &mut Hierarchy) -> (NodeId, Vec<NodeId>) {
        let root = h.insert_box();
        let ids = eight_cubes(h);
        h.add_items(root, ids.iter().copied(), 0, 0.0).unwrap();
        let mut splits = SplitSet::new();
        splits.add_splits_on(Axes::XYZ, 1);
        h.split(root, &splits, &SplitOptions::recursive(1, 0)).unwrap();
        (root, ids)
    }

    /// Expand boxes in a query result to their leaves.
    fn expand(h: &Hierarchy, ids: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
        let mut out = BTreeSet::new();
        for &id in ids {
            if h.is_box(id) {
                out.extend(h.leaves(id).unwrap());
            } else {
                out.insert(id);
            }
        }
        out
    }

    #[test]
    fn enclosing_sphere_returns_the_box_itself() {
        let mut h = Hierarchy::new();
        let root = h.insert_box();
        let a = h.insert_leaf(cube(DVec3::ZERO, 0.5, "a"));
        h.add_item(root, a, 0.0).unwrap();
        let hits = h
            .items_in_sphere(root, &Sphere3::new(DVec3::ZERO, 10.0), T)
            .unwrap();
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec![root]);
        let none = h
            .items_in_sphere(root, &Sphere3::new(DVec3::splat(20.0), 1.0), T)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn straddling_empty_box_is_an_error() {
        let mut h = Hierarchy::new();
        let root = h.insert_box();
        let err = h.items_above_plane(root, &Plane3::XY, T).unwrap_err();
        assert!(matches!(err, Error::EmptyInteriorNode { op: "items_above_plane" }));
        // Resolved without descending: no error.
        let below = Plane3::new(DVec3::new(0.0, 0.0, -5.0), DVec3::X, DVec3::Y);
        assert_eq!(h.items_above_plane(root, &below, T).unwrap().len(), 1);
    }

    #[test]
    fn plane_query_on_split_tree() {
        let mut h = Hierarchy::new();
        let (root, ids) = split_eight(&mut h);
        let plane = Plane3::new(DVec3::new(0.0, 0.0, 0.25), DVec3::X, DVec3::Y);
        let hits = expand(&h, &h.items_above_plane(root, &plane, T).unwrap());
        let expected: BTreeSet<_> = ids
            .iter()
            .copied()
            .filter(|&id| h.box_bounds(id).unwrap().center().z > 0.0)
            .collect();
        assert_eq!(hits, expected);
    }

    #[test]
    fn plane_query_returns_whole_boxes() {
        let mut h = Hierarchy::new();
        let (root, _) = split_eight(&mut h);
        // Everything with z > 0 lies entirely above this plane.
        let plane = Plane3::new(DVec3::new(0.0, 0.0, -0.001), DVec3::X, DVec3::Y);
        let hits = h.items_above_plane(root, &plane, T).unwrap();
        assert!(hits.iter().any(|&id| h.is_box(id)));
        assert_eq!(expand(&h, &hits).len(), 8);
    }

    #[test]
    fn line_and_ray_queries() {
        let mut h = Hierarchy::new();
        let (root, ids) = split_eight(&mut h);
        let line = Line3::new(DVec3::new(0.5, 0.5, 10.0), -DVec3::Z);
        let on_line = h.items_on_line(root, &line, T).unwrap();
        assert_eq!(on_line.len(), 2, "column of two cubes");
        assert!(on_line.iter().all(|id| ids.contains(id)));

        // Starting inside the upper cube and pointing up misses the lower one.
        let ray = Line3::new(DVec3::new(0.5, 0.5, 0.5), DVec3::Z);
        let on_ray = h.items_on_ray(root, &ray, T).unwrap();
        assert_eq!(on_ray.len(), 1);
        let c = h.box_bounds(*on_ray.first().unwrap()).unwrap().center();
        assert_eq!(c, DVec3::new(0.5, 0.5, 0.5));

        let away = Line3::new(DVec3::new(0.5, 0.5, 10.0), DVec3::Z);
        assert!(h.items_on_ray(root, &away, T).unwrap().is_empty());
    }

    #[test]
    fn sphere_leaves_use_inner_test() {
        let mut h = Hierarchy::new();
        let root = h.insert_box();
        let s = h.insert_leaf(SphereItem::new(DVec3::ZERO, 1.0, "s"));
        let b = h.insert_leaf(cube(DVec3::new(3.0, 0.0, 0.0), 1.0, "b"));
        h.add_items(root, [s, b], 0, 0.0).unwrap();
        // Crosses the corner of the sphere's bounding box only.
        let line = Line3::new(DVec3::new(0.95, 0.95, 0.0), DVec3::Z);
        assert!(h.items_on_line(root, &line, T).unwrap().is_empty());
        let line = Line3::new(DVec3::new(0.5, 0.0, 0.0), DVec3::Z);
        let hits = h.items_on_line(root, &line, T).unwrap();
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec![s]);
    }

    #[test]
    fn box_query_soundness() {
        let mut rng = Rng::new(0xdead_beef);
        let mut h = Hierarchy::new();
        let (root, leaves) = random_box(&mut h, &mut rng, 200);
        let mut splits = SplitSet::new();
        splits.add_splits_on(Axes::XYZ, 3);
        h.split(root, &splits, &SplitOptions::recursive(4, 0)).unwrap();

        for _ in 0..50 {
            let q = BoxBounds::new(rng.vec3(-10.0, 10.0), rng.vec3(0.5, 6.0));
            let hits = expand(&h, &h.items_in_box(root, &q, T).unwrap());
            for &id in &leaves {
                let b = h.box_bounds(id).unwrap();
                let rel = b.compare(&q, T);
                if hits.contains(&id) {
                    assert_ne!(rel, RangeCompare::Disjoint, "false positive {id:?}");
                }
                if matches!(rel, RangeCompare::OtherContains | RangeCompare::Equal) {
                    assert!(hits.contains(&id), "false negative {id:?}");
                }
            }
        }
    }

    #[test]
    fn containing_leaf_finds_deepest() {
        let mut h = Hierarchy::new();
        let (root, _) = split_eight(&mut h);
        let target = BoxBounds::new(DVec3::new(0.5, 0.5, 0.5), DVec3::splat(0.1));
        let found = h.containing_leaf(root, &target, T).unwrap().unwrap();
        assert!(!h.is_box(found));
        assert_eq!(h.box_bounds(found).unwrap().center(), DVec3::splat(0.5));

        // Straddling two cubes: the smallest box holding both.
        let wide = BoxBounds::new(DVec3::new(0.0, 0.5, 0.5), DVec3::splat(0.1));
        let found = h.containing_leaf(root, &wide, T).unwrap().unwrap();
        assert!(h.is_box(found));
        let outside = BoxBounds::new(DVec3::splat(5.0), DVec3::splat(0.1));
        assert_eq!(h.containing_leaf(root, &outside, T).unwrap(), None);
    }

    #[test]
    fn flatten_and_paths() {
        let mut h = Hierarchy::new();
        let (root, ids) = split_eight(&mut h);
        let boxes = h.bounding_boxes(root).unwrap();
        // 1 root + 2 + 4 + 8 after three rounds of binary splits.
        assert_eq!(boxes.len(), 15);
        assert!(boxes.contains(&root));
        assert_eq!(h.leaves(root).unwrap(), ids.iter().copied().collect());
        let path = h.item_path(root, ids[0]).unwrap().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path[3], root);
        assert_eq!(h.parent(path[0]), Some(path[1]));
        let stray = h.insert_leaf(BoundsItem::point(DVec3::ZERO, "stray"));
        assert_eq!(h.item_path(root, stray).unwrap(), None);
    }

    #[test]
    fn validate_reports_escaped_items() {
        let mut h = Hierarchy::new();
        let (root, ids) = split_eight(&mut h);
        h.validate(root, T).unwrap();
        // Sneak a far item into a leaf box without updating its bounds.
        let path = h.item_path(root, ids[0]).unwrap().unwrap();
        let far = h.insert_leaf(cube(DVec3::splat(9.0), 0.5, "far"));
        let holder = path[0];
        h.box_mut(holder, "test").unwrap().items.insert(far);
        let err = h.validate(root, T).unwrap_err();
        assert!(matches!(err, Error::NotContained { item, container } if item == far && container == holder));
    }

    #[test]
    fn single_item_box_validates() {
        let mut h = Hierarchy::new();
        let root = h.insert_box();
        let a = h.insert_leaf(cube(DVec3::ZERO, 0.5, "a"));
        h.add_item(root, a, 0.0).unwrap();
        h.validate(root, T).unwrap();
    }

    #[test]
    fn compare_hierarchy_matches_structure() {
        let mut h = Hierarchy::new();
        let (a, ids) = split_eight(&mut h);
        let b = h.insert_box();
        h.add_items(b, ids.iter().copied(), 0, 0.0).unwrap();
        let mut splits = SplitSet::new();
        splits.add_splits_on(Axes::XYZ, 1);
        h.split(b, &splits, &SplitOptions::recursive(1, 0)).unwrap();
        assert!(h.compare_hierarchy(a, b, T).unwrap());

        // A flat box has the same bounds but not the same structure.
        let flat = h.insert_box();
        h.add_items(flat, ids.iter().copied(), 0, 0.0).unwrap();
        assert!(!h.compare_hierarchy(a, flat, T).unwrap());
        // Leaves are compared by identity.
        let copy = h.insert_box();
        for &id in &ids {
            let bb = h.box_bounds(id).unwrap();
            let c = h.insert_leaf(BoundsItem::new(bb.center(), bb.r_vec(), "copy"));
            h.add_item(copy, c, 0.0).unwrap();
        }
        assert!(!h.compare_hierarchy(copy, flat, T).unwrap());
        assert!(h.compare_hierarchy(flat, flat, T).unwrap());
    }

    #[test]
    fn sort_by_axis_distance_and_plane() {
        let mut h = Hierarchy::new();
        let ids: Vec<_> = [3.0, -1.0, 2.0]
            .into_iter()
            .map(|x| h.insert_leaf(BoundsItem::point(DVec3::new(x, 0.0, 0.0), "p")))
            .collect();
        let mut v = ids.clone();
        h.sort_items(&mut v, ItemOrder::Axis(Axis::X)).unwrap();
        assert_eq!(v, vec![ids[1], ids[2], ids[0]]);
        h.sort_items(&mut v, ItemOrder::DistanceToPoint(DVec3::new(2.5, 0.0, 0.0)))
            .unwrap();
        assert_eq!(v, vec![ids[2], ids[0], ids[1]]);
        let plane = Plane3::new(DVec3::ZERO, DVec3::Y, DVec3::Z);
        h.sort_items(&mut v, ItemOrder::DistanceToPlane(plane)).unwrap();
        assert_eq!(v, vec![ids[1], ids[2], ids[0]]);
        assert!(matches!(
            h.sort_items(&mut v, ItemOrder::Axis(Axis::W)),
            Err(Error::InvalidAxis(Axis::W))
        ));
    }

    #[test]
    fn parallel_queries_on_a_finished_tree() {
        let mut rng = Rng::new(99);
        let mut h = Hierarchy::new();
        let (root, _) = random_box(&mut h, &mut rng, 150);
        let mut splits = SplitSet::new();
        splits.add_splits_on(Axes::XYZ, 3);
        h.split(root, &splits, &SplitOptions::recursive(4, 0)).unwrap();

        let spheres: Vec<_> = (0..8)
            .map(|_| Sphere3::new(rng.vec3(-8.0, 8.0), rng.range(1.0, 5.0)))
            .collect();
        let serial: Vec<_> = spheres
            .iter()
            .map(|s| h.items_in_sphere(root, s, T).unwrap())
            .collect();
        let h = &h;
        let parallel: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = spheres
                .iter()
                .map(|s| scope.spawn(move || h.items_in_sphere(root, s, T).unwrap()))
                .collect();
            handles.into_iter().map(|j| j.join().unwrap()).collect()
        });
        assert_eq!(serial, parallel);
    }
}
