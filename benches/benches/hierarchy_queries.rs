// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial queries on a split hierarchy.

use canopy_bounds::{Axes, BoxBounds, DEFAULT_TOLERANCE, Line3, Plane3, Sphere3};
use canopy_hierarchy::{BoundsItem, Hierarchy, NodeId, SplitOptions, SplitSet};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::DVec3;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn vec3(&mut self, scale: f64) -> DVec3 {
        DVec3::new(self.next_f64(), self.next_f64(), self.next_f64()) * scale
    }
}

fn build(count: usize, min_items: usize) -> (Hierarchy, NodeId) {
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let mut h = Hierarchy::new();
    let root = h.insert_box();
    for i in 0..count {
        let c = rng.vec3(1000.0);
        let r = rng.vec3(5.0) + DVec3::splat(0.01);
        let id = h.insert_leaf(BoundsItem::new(c, r, format!("item{i}")));
        h.add_item(root, id, 0.0).unwrap();
    }
    let mut splits = SplitSet::new();
    splits.add_splits_on(Axes::XYZ, 3);
    h.split(root, &splits, &SplitOptions::recursive(min_items, 0)).unwrap();
    (h, root)
}

fn bench_queries(c: &mut Criterion) {
    let t = DEFAULT_TOLERANCE;
    for &min_items in &[4usize, 16] {
        let (h, root) = build(10_000, min_items);
        let mut group = c.benchmark_group(format!("queries_min_items_{min_items}"));

        let sphere = Sphere3::new(DVec3::splat(500.0), 100.0);
        group.bench_function("sphere", |b| {
            b.iter(|| black_box(h.items_in_sphere(root, &sphere, t).unwrap().len()));
        });

        let query = BoxBounds::new(DVec3::new(300.0, 400.0, 500.0), DVec3::new(100.0, 50.0, 200.0));
        group.bench_function("box", |b| {
            b.iter(|| black_box(h.items_in_box(root, &query, t).unwrap().len()));
        });

        let plane = Plane3::from_normal(DVec3::new(1.0, 1.0, 1.0), DVec3::X, DVec3::splat(700.0));
        group.bench_function("plane", |b| {
            b.iter(|| black_box(h.items_above_plane(root, &plane, t).unwrap().len()));
        });

        let line = Line3::new(DVec3::new(0.0, 500.0, 500.0), DVec3::new(1.0, 0.1, 0.0));
        group.bench_function("line", |b| {
            b.iter(|| black_box(h.items_on_line(root, &line, t).unwrap().len()));
        });

        let ray = Line3::new(DVec3::splat(500.0), DVec3::new(0.3, -1.0, 0.2));
        group.bench_function("ray", |b| {
            b.iter(|| black_box(h.items_on_ray(root, &ray, t).unwrap().len()));
        });

        let target = BoxBounds::new(DVec3::splat(250.0), DVec3::splat(1.0));
        group.bench_function("containing_leaf", |b| {
            b.iter(|| black_box(h.containing_leaf(root, &target, t).unwrap()));
        });
        group.finish();
    }
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
