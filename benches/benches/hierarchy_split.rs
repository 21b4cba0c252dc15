// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building and splitting hierarchies of random boxes.

use canopy_bounds::Axes;
use canopy_hierarchy::{BoundsItem, Hierarchy, NodeId, SplitOptions, SplitSet};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
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

fn gen_random_items(count: usize, extent: f64, size: f64) -> Vec<BoundsItem> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| BoundsItem::new(rng.vec3(extent), rng.vec3(size) + DVec3::splat(0.01), format!("item{i}")))
        .collect()
}

fn gen_clustered_items(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<BoundsItem> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let centers: Vec<_> = (0..n_clusters).map(|_| rng.vec3(1000.0)).collect();
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for c in centers {
        for _ in 0..per_cluster {
            let d = rng.vec3(spread) - DVec3::splat(spread * 0.5);
            out.push(BoundsItem::new(c + d, DVec3::splat(0.5), format!("item{}", out.len())));
        }
    }
    out
}

fn fill(items: &[BoundsItem]) -> (Hierarchy, NodeId) {
    let mut h = Hierarchy::new();
    let root = h.insert_box();
    for item in items {
        let id = h.insert_leaf(item.clone());
        h.add_item(root, id, 0.0).unwrap();
    }
    (h, root)
}

fn bench_add_items(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_items");
    for &n in &[1_000usize, 10_000] {
        let items = gen_random_items(n, 1000.0, 5.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_n{n}"), |b| {
            b.iter(|| black_box(fill(&items)));
        });
    }
    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_recursive");
    let mut splits = SplitSet::new();
    splits.add_splits_on(Axes::XYZ, 3);
    for &n in &[1_000usize, 10_000] {
        let items = gen_random_items(n, 1000.0, 5.0);
        group.throughput(Throughput::Elements(n as u64));
        for prefer_longest_axis in [false, true] {
            let opts = SplitOptions {
                prefer_longest_axis,
                ..SplitOptions::recursive(8, 0)
            };
            let name = if prefer_longest_axis { "longest_axis" } else { "balanced" };
            group.bench_function(format!("random_{name}_n{n}"), |b| {
                b.iter_batched(
                    || fill(&items),
                    |(mut h, root)| {
                        let pair = h.split(root, &splits, &opts).unwrap();
                        black_box(pair);
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    let items = gen_clustered_items(16, 256, 50.0);
    let opts = SplitOptions::recursive(8, 0);
    group.bench_function("clustered_n4096", |b| {
        b.iter_batched(
            || fill(&items),
            |(mut h, root)| {
                let pair = h.split(root, &splits, &opts).unwrap();
                black_box(pair);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_best_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_split");
    let items = gen_random_items(10_000, 1000.0, 5.0);
    let (h, root) = fill(&items);
    for num in [1usize, 3, 7] {
        let mut splits = SplitSet::new();
        splits.add_splits_on(Axes::XYZ, num);
        let opts = SplitOptions::default();
        group.bench_function(format!("candidates_{}", splits.len()), |b| {
            b.iter(|| black_box(h.best_split(root, &splits, &opts).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add_items, bench_split, bench_best_split);
criterion_main!(benches);
