// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Canopy Bounds: build boxes, compare them, and test query shapes.

use canopy_bounds::{BoxBounds, DEFAULT_TOLERANCE, Line3, Plane3, Sphere3};
use glam::DVec3;

fn main() {
    let t = DEFAULT_TOLERANCE;
    let a = BoxBounds::new(DVec3::ZERO, DVec3::splat(1.0));
    let b = BoxBounds::new(DVec3::new(1.5, 0.0, 0.0), DVec3::splat(0.5));
    println!("a = {a}");
    println!("b = {b}");
    println!("a vs b: {} per axis {}", a.compare(&b, t), a.compare3(&b, t));
    println!("union: {}", a.union(&b));
    println!("longest axis of b: {}", b.range().axis_order().a0);

    // Query shapes
    println!("a vs xy-plane: {}", a.check_plane(&Plane3::XY, t));
    println!("a vs sphere: {}", a.check_sphere(&Sphere3::new(DVec3::ZERO, 3.0), t));
    let ray = Line3::new(DVec3::new(5.0, 0.0, 0.0), -DVec3::X);
    println!("ray hits b: {}", b.check_ray(&ray, t));
}
