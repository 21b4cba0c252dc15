// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchy basics.
//!
//! Fill a box with scattered points, split it recursively, and run a few queries.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p canopy_demos --example hierarchy_basics`

use std::collections::BTreeSet;

use canopy_bounds::{Axes, BoxBounds, DEFAULT_TOLERANCE, Line3, Plane3, Sphere3};
use canopy_hierarchy::{BoundsItem, Hierarchy, NodeId, SphereItem, SplitOptions, SplitSet};
use glam::DVec3;
use log::info;

const POINTS: [[f64; 3]; 12] = [
    [0.61, 0.72, -0.23],
    [0.88, -0.06, 0.20],
    [0.06, 0.83, -0.59],
    [0.10, -0.94, -0.98],
    [0.07, -0.01, 0.78],
    [-0.70, -0.55, -0.94],
    [-0.96, -0.30, -0.01],
    [-0.23, -0.63, 0.31],
    [0.57, 0.89, 0.65],
    [-0.90, 0.50, 0.88],
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
];

/// Names of the leaves in `ids`, with boxes expanded to their leaves.
fn leaf_names(h: &Hierarchy, ids: &BTreeSet<NodeId>) -> Vec<String> {
    let mut names = Vec::new();
    for &id in ids {
        let leaves = if h.is_box(id) {
            h.leaves(id).unwrap()
        } else {
            BTreeSet::from([id])
        };
        names.extend(leaves.iter().filter_map(|&l| h.item_id(l)).map(str::to_owned));
    }
    names.sort();
    names
}

fn main() {
    env_logger::init();
    let t = DEFAULT_TOLERANCE;

    let mut h = Hierarchy::new();
    let root = h.insert_box();
    h.set_item_id(root, "root").unwrap();
    for (i, p) in POINTS.iter().enumerate() {
        let leaf = h.insert_leaf(BoundsItem::point(DVec3::from_array(*p), format!("point{i:02}")));
        h.add_item(root, leaf, 0.0).unwrap();
    }
    let ball = h.insert_leaf(SphereItem::new(DVec3::new(0.3, 0.3, 0.3), 0.2, "ball"));
    h.add_item(root, ball, 0.0).unwrap();
    info!("root bounds: {}", h.box_bounds(root).unwrap());

    // Quarter points on each axis, preferring the longest axis of each box.
    let mut splits = SplitSet::new();
    splits.add_splits_on(Axes::XYZ, 3);
    let opts = SplitOptions {
        prefer_longest_axis: true,
        ..SplitOptions::recursive(2, 0)
    };
    let pair = h.split(root, &splits, &opts).unwrap();
    println!("split into {pair:?}");
    h.validate(root, t).unwrap();
    println!("bounding boxes: {}", h.bounding_boxes(root).unwrap().len());

    let above = h.items_above_plane(root, &Plane3::XY, t).unwrap();
    println!("above z = 0: {:?}", leaf_names(&h, &above));

    let sphere = Sphere3::new(DVec3::new(0.5, 0.5, 0.5), 0.6);
    let near = h.items_in_sphere(root, &sphere, t).unwrap();
    println!("in sphere: {:?}", leaf_names(&h, &near));

    let ray = Line3::new(DVec3::new(0.3, 0.3, 5.0), -DVec3::Z);
    let hit = h.items_on_ray(root, &ray, t).unwrap();
    println!("on ray: {:?}", leaf_names(&h, &hit));
    assert!(hit.contains(&ball), "the ray passes through the ball");

    let query = BoxBounds::new(DVec3::new(-0.5, -0.5, -0.5), DVec3::splat(0.6));
    let in_box = h.items_in_box(root, &query, t).unwrap();
    println!("in box: {:?}", leaf_names(&h, &in_box));

    let target = BoxBounds::new(DVec3::new(0.3, 0.3, 0.3), DVec3::splat(0.05));
    if let Some(holder) = h.containing_leaf(root, &target, t).unwrap() {
        let path = h.item_path(root, holder).unwrap().unwrap_or_default();
        println!(
            "containing leaf: {:?} at depth {}",
            h.item_id(holder).unwrap_or_default(),
            path.len()
        );
    }
}
