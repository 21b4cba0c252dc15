// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the hierarchy: node identifiers, split results, and orderings.

use std::collections::BTreeSet;

use canopy_bounds::{Axis, Plane3};
use glam::DVec3;

/// Identifier for a node (bounding box or leaf item) in a [`Hierarchy`](crate::Hierarchy).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Ordering
///
/// `NodeId`s order by slot index, then generation. Item sets are kept in this
/// order, so iteration over a box's items, and every operation built on it, is deterministic.
///
/// ### Liveness
///
/// Use [`Hierarchy::is_alive`](crate::Hierarchy::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// The two boxes created by a successful [`Hierarchy::split`](crate::Hierarchy::split).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoxPair {
    /// Box holding the items at or below the split position.
    pub b0: NodeId,
    /// Box holding the items above the split position.
    pub b1: NodeId,
}

/// Items of a box partitioned by a split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    /// Items whose center is at or below the split position.
    pub lower: BTreeSet<NodeId>,
    /// Items whose center is above the split position.
    pub upper: BTreeSet<NodeId>,
}

impl Partition {
    /// Item counts `(lower, upper)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.lower.len(), self.upper.len())
    }
}

/// Sort key for [`Hierarchy::sort_items`](crate::Hierarchy::sort_items).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ItemOrder {
    /// Ascending center coordinate along an axis.
    Axis(Axis),
    /// Ascending distance of the center to a point.
    DistanceToPoint(DVec3),
    /// Ascending signed distance of the center to a plane.
    DistanceToPlane(Plane3),
}

/// Naming scheme for [`Hierarchy::set_child_ids`](crate::Hierarchy::set_child_ids).
///
/// Child `k` of a box is named `prefix_KK`, followed by `_LL` (the level) if
/// [`show_level`](Self::show_level) is set. Numbers are zero-padded to
/// [`field_width`](Self::field_width) digits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChildIdOptions {
    /// Append the level to each ID.
    pub show_level: bool,
    /// Leave items that already have an ID untouched.
    pub keep_existing: bool,
    /// Also name the children of renamed child boxes, using the child's ID
    /// (without level) as their prefix.
    pub recursive: bool,
    /// Level written for the direct children.
    pub level: u32,
    /// Minimum number of digits for numbers.
    pub field_width: usize,
}

impl Default for ChildIdOptions {
    fn default() -> Self {
        Self {
            show_level: true,
            keep_existing: true,
            recursive: false,
            level: 0,
            field_width: 2,
        }
    }
}
