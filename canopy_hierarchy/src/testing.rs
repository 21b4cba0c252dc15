// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use glam::DVec3;

use crate::hierarchy::Hierarchy;
use crate::item::BoundsItem;
use crate::types::NodeId;

/// Cube-shaped item with half-extent `r`.
pub(crate) fn cube(center: DVec3, r: f64, id: &str) -> BoundsItem {
    BoundsItem::new(center, DVec3::splat(r), id)
}

/// Eight unit cubes centered at `(±0.5, ±0.5, ±0.5)`.
pub(crate) fn eight_cubes(h: &mut Hierarchy) -> Vec<NodeId> {
    let mut out = Vec::new();
    for i in 0..8 {
        let sign = |bit: u32| if i & (1 << bit) == 0 { -0.5 } else { 0.5 };
        let c = DVec3::new(sign(0), sign(1), sign(2));
        out.push(h.insert_leaf(cube(c, 0.5, &format!("cube{i}"))));
    }
    out
}

/// Twenty scattered points plus the corners `(1, 1, 1)` and `(-1, -1, -1)`.
pub(crate) const VERTICES: [[f64; 3]; 22] = [
    [0.607415641887, 0.718705489141, -0.225119709644],
    [0.875825333637, -0.0573853653933, 0.202470894686],
    [0.0622396542542, 0.833795337589, -0.594071825809],
    [0.0978927338215, -0.938852215553, -0.978846042241],
    [0.0728408015356, -0.00997117308592, 0.775148271791],
    [-0.698258593952, -0.548446195445, -0.938418659592],
    [-0.963365750832, -0.300554008166, -0.00954516618162],
    [-0.23397952826, -0.632782192171, 0.314228963344],
    [-0.0362186111467, -0.881106809054, 0.196295037355],
    [-0.494240109345, -0.637551388716, -0.504403922825],
    [0.567796144827, 0.891323063435, 0.646969860611],
    [0.398703185601, 0.221126849291, 0.563951443381],
    [-0.230592732479, 0.207860506282, 0.550936374027],
    [-0.0203087267027, 0.828140936686, -0.0113749638823],
    [-0.12589991174, 0.39163333572, -0.967737855772],
    [-0.896956271477, 0.501435268487, 0.881099725261],
    [0.919674754078, 0.768222708852, -0.325443420918],
    [0.96884639734, -0.111784368895, 0.708906705091],
    [0.993587035364, -0.974822676713, -0.562923045724],
    [0.116054844554, -0.423830262697, -0.321361680489],
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
];

/// A root box holding one zero-size item per entry of [`VERTICES`], named
/// `vertex01` to `vertex22`.
pub(crate) fn vertex_box(h: &mut Hierarchy) -> (NodeId, Vec<NodeId>) {
    let root = h.insert_box();
    let mut leaves = Vec::new();
    for (i, v) in VERTICES.iter().enumerate() {
        let id = h.insert_leaf(BoundsItem::point(DVec3::from_array(*v), format!("vertex{:02}", i + 1)));
        h.add_item(root, id, 0.0).expect("live box and leaf");
        leaves.push(id);
    }
    (root, leaves)
}

/// Small deterministic xorshift generator.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng(u64);

impl Rng {
    pub(crate) fn new(seed: u64) -> Self {
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

    /// Uniform in `[0, 1)`.
    pub(crate) fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    pub(crate) fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    pub(crate) fn vec3(&mut self, lo: f64, hi: f64) -> DVec3 {
        DVec3::new(self.range(lo, hi), self.range(lo, hi), self.range(lo, hi))
    }
}

/// `n` random box items inside `[-10, 10]^3`, added to a new root box.
pub(crate) fn random_box(h: &mut Hierarchy, rng: &mut Rng, n: usize) -> (NodeId, Vec<NodeId>) {
    let root = h.insert_box();
    let mut leaves = Vec::with_capacity(n);
    for i in 0..n {
        let c = rng.vec3(-9.0, 9.0);
        let r = rng.vec3(0.05, 1.0);
        let id = h.insert_leaf(BoundsItem::new(c, r, format!("item{i:03}")));
        h.add_item(root, id, 0.0).expect("live box and leaf");
        leaves.push(id);
    }
    (root, leaves)
}
