// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core hierarchy implementation: node storage and item mutation.

use std::collections::BTreeSet;

use canopy_bounds::{BoxBounds, Range3};
use log::warn;

use crate::error::{Error, Result};
use crate::item::BoxBoundsItem;
use crate::types::NodeId;

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena holding bounding boxes and leaf items.
///
/// Every node is addressed by a generational [`NodeId`]. A bounding box
/// holds a set of items, each either another bounding box or a leaf. A leaf
/// may be held by several boxes; a box records at most one parent.
///
/// Operations that take a box handle fail with [`Error::InvalidNode`] for a
/// stale handle and with [`Error::NotABox`] for a leaf handle.
pub struct Hierarchy {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let boxes = self
            .nodes
            .iter()
            .flatten()
            .filter(|n| matches!(n.kind, Kind::Box(_)))
            .count();
        f.debug_struct("Hierarchy")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("boxes", &boxes)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) kind: Kind,
}

#[derive(Debug)]
pub(crate) enum Kind {
    Box(BoxNode),
    Leaf(Box<dyn BoxBoundsItem>),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct BoxNode {
    pub(crate) bounds: BoxBounds,
    pub(crate) item_id: String,
    pub(crate) level: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) items: BTreeSet<NodeId>,
}

impl Kind {
    pub(crate) fn bounds(&self) -> BoxBounds {
        match self {
            Self::Box(b) => b.bounds,
            Self::Leaf(item) => item.box_bounds(),
        }
    }
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    fn alloc(&mut self, kind: Kind) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node { generation, kind });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node { generation, kind }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        if self.is_alive(id) {
            self.nodes[id.idx()] = None;
            self.free_list.push(id.idx());
        }
    }

    /// Insert a leaf item.
    pub fn insert_leaf(&mut self, item: impl BoxBoundsItem + 'static) -> NodeId {
        self.insert_boxed_leaf(Box::new(item))
    }

    /// Insert an already boxed leaf item.
    pub fn insert_boxed_leaf(&mut self, item: Box<dyn BoxBoundsItem>) -> NodeId {
        self.alloc(Kind::Leaf(item))
    }

    /// Insert an empty bounding box at level `0`.
    pub fn insert_box(&mut self) -> NodeId {
        self.insert_box_at_level(0)
    }

    /// Insert an empty bounding box at `level`.
    pub fn insert_box_at_level(&mut self, level: u32) -> NodeId {
        self.alloc(Kind::Box(BoxNode {
            level,
            ..BoxNode::default()
        }))
    }

    /// Remove a node.
    ///
    /// The node is taken out of every box holding it, and boxes recording it
    /// as their parent are detached. Bounds of the former containers are not
    /// recomputed; call [`Hierarchy::update`] if needed. Items held by a
    /// removed box stay in the hierarchy.
    ///
    /// Returns `false` if `id` was not live.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        for node in self.nodes.iter_mut().flatten() {
            if let Kind::Box(b) = &mut node.kind {
                b.items.remove(&id);
                if b.parent == Some(id) {
                    b.parent = None;
                }
            }
        }
        self.free(id);
        true
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns true if `id` refers to a live bounding box.
    pub fn is_box(&self, id: NodeId) -> bool {
        matches!(self.node_opt(id), Some(Node { kind: Kind::Box(_), .. }))
    }

    /// The leaf item behind `id`, or `None` if `id` is stale or a box.
    pub fn leaf(&self, id: NodeId) -> Option<&dyn BoxBoundsItem> {
        match &self.node_opt(id)?.kind {
            Kind::Leaf(item) => Some(item.as_ref()),
            Kind::Box(_) => None,
        }
    }

    /// Mutable access to the leaf item behind `id`.
    ///
    /// Changing the item's geometry does not update the boxes holding it.
    pub fn leaf_mut(&mut self, id: NodeId) -> Option<&mut (dyn BoxBoundsItem + 'static)> {
        match &mut self.node_opt_mut(id)?.kind {
            Kind::Leaf(item) => Some(item.as_mut()),
            Kind::Box(_) => None,
        }
    }

    /// Bounds of a box or leaf.
    pub fn box_bounds(&self, id: NodeId) -> Option<BoxBounds> {
        self.node_opt(id).map(|n| n.kind.bounds())
    }

    /// ID of a box or leaf.
    pub fn item_id(&self, id: NodeId) -> Option<&str> {
        match &self.node_opt(id)?.kind {
            Kind::Box(b) => Some(&b.item_id),
            Kind::Leaf(item) => Some(item.item_id()),
        }
    }

    /// Set the ID of a box or leaf.
    pub fn set_item_id(&mut self, id: NodeId, item_id: impl Into<String>) -> Result<()> {
        let node = self
            .node_opt_mut(id)
            .ok_or(Error::InvalidNode { op: "set_item_id" })?;
        match &mut node.kind {
            Kind::Box(b) => b.item_id = item_id.into(),
            Kind::Leaf(item) => item.set_item_id(item_id.into()),
        }
        Ok(())
    }

    /// Level of a box.
    pub fn level(&self, bx: NodeId) -> Option<u32> {
        self.box_opt(bx).map(|b| b.level)
    }

    /// Set the level of a box.
    pub fn set_level(&mut self, bx: NodeId, level: u32) -> Result<()> {
        self.box_mut(bx, "set_level")?.level = level;
        Ok(())
    }

    /// Recorded parent of a box.
    pub fn parent(&self, bx: NodeId) -> Option<NodeId> {
        self.box_opt(bx)?.parent
    }

    /// Overwrite the recorded parent of a box.
    ///
    /// This does not add the box to `parent`'s items.
    pub fn set_parent(&mut self, bx: NodeId, parent: Option<NodeId>) -> Result<()> {
        const OP: &str = "set_parent";
        if let Some(p) = parent {
            self.box_ref(p, OP)?;
        }
        self.box_mut(bx, OP)?.parent = parent;
        Ok(())
    }

    /// Items of a box.
    pub fn items(&self, bx: NodeId) -> Option<&BTreeSet<NodeId>> {
        self.box_opt(bx).map(|b| &b.items)
    }

    /// Number of items of a box; `0` for anything else.
    pub fn num_items(&self, bx: NodeId) -> usize {
        self.box_opt(bx).map_or(0, |b| b.items.len())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the hierarchy holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of boxes holding `id`.
    pub fn ref_count(&self, id: NodeId) -> usize {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| matches!(&n.kind, Kind::Box(b) if b.items.contains(&id)))
            .count()
    }

    /// Add `item` to the box `bx`.
    ///
    /// The first item sets the box bounds, later items extend them. If
    /// `max_radius > 0` and the extended bounds would have a larger radius,
    /// nothing changes and `false` is returned.
    ///
    /// A box item without a parent gets `bx` as its parent. A box item that
    /// already has a different parent keeps it; this is logged as a warning.
    ///
    /// Fails with [`Error::SelfInsertion`] if `item` is `bx` or a box that
    /// already holds `bx` below it.
    pub fn add_item(&mut self, bx: NodeId, item: NodeId, max_radius: f64) -> Result<bool> {
        const OP: &str = "add_item";
        if self.reaches(item, bx) {
            return Err(Error::SelfInsertion { op: OP });
        }
        let item_bounds = self.get(item, OP)?.kind.bounds();
        let b = self.box_ref(bx, OP)?;
        let bounds = if b.items.is_empty() {
            item_bounds
        } else {
            b.bounds.union(&item_bounds)
        };
        if max_radius > 0.0 && bounds.radius() > max_radius {
            return Ok(false);
        }
        if let Some(child) = self.box_opt_mut(item) {
            match child.parent {
                None => child.parent = Some(bx),
                Some(p) if p != bx => {
                    warn!("{OP}: box {item:?} already has parent {p:?}, not changing it to {bx:?}");
                }
                Some(_) => {}
            }
        }
        let b = self.box_mut(bx, OP)?;
        b.items.insert(item);
        b.bounds = bounds;
        Ok(true)
    }

    /// Remove `item` from the box `bx`.
    ///
    /// Returns `false` if the box does not hold `item`. Bounds only shrink if
    /// `update` is set (or on a later [`Hierarchy::update`]).
    pub fn remove_item(&mut self, bx: NodeId, item: NodeId, update: bool) -> Result<bool> {
        const OP: &str = "remove_item";
        self.get(item, OP)?;
        if !self.box_mut(bx, OP)?.items.remove(&item) {
            return Ok(false);
        }
        if let Some(child) = self.box_opt_mut(item) {
            if child.parent == Some(bx) {
                child.parent = None;
            }
        }
        if update {
            self.update(bx)?;
        }
        Ok(true)
    }

    /// Add several items to `bx`.
    ///
    /// Items are tried in iteration order. An item is rejected once the box
    /// holds `max_items` items (if `max_items > 0`) or if it fails the
    /// `max_radius` check of [`Hierarchy::add_item`]. Returns the rejected items.
    pub fn add_items(
        &mut self,
        bx: NodeId,
        items: impl IntoIterator<Item = NodeId>,
        max_items: usize,
        max_radius: f64,
    ) -> Result<BTreeSet<NodeId>> {
        let mut rejected = BTreeSet::new();
        for item in items {
            if (max_items > 0 && self.num_items(bx) >= max_items)
                || !self.add_item(bx, item, max_radius)?
            {
                rejected.insert(item);
            }
        }
        Ok(rejected)
    }

    /// Move items from `source` into `bx`.
    ///
    /// Items are taken from the front of `source` until the box holds
    /// `max_items` items (if `max_items > 0`) or `source` is exhausted. Items
    /// rejected by the `max_radius` check go back into `source`. Returns the
    /// number of items taken.
    pub fn take_items(
        &mut self,
        bx: NodeId,
        source: &mut BTreeSet<NodeId>,
        max_items: usize,
        max_radius: f64,
    ) -> Result<usize> {
        let mut rejected = BTreeSet::new();
        let mut taken = 0;
        while max_items == 0 || self.num_items(bx) < max_items {
            let Some(item) = source.pop_first() else {
                break;
            };
            match self.add_item(bx, item, max_radius) {
                Ok(true) => taken += 1,
                Ok(false) => {
                    rejected.insert(item);
                }
                Err(e) => {
                    source.insert(item);
                    source.append(&mut rejected);
                    return Err(e);
                }
            }
        }
        source.append(&mut rejected);
        Ok(taken)
    }

    /// Recompute the bounds of `bx` from its items, then those of its parents.
    ///
    /// A box without items keeps its bounds and does not update its parent.
    pub fn update(&mut self, bx: NodeId) -> Result<()> {
        const OP: &str = "update";
        let mut visited = BTreeSet::new();
        let mut current = Some(bx);
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let b = self.box_ref(id, OP)?;
            let Some(bounds) = self.union_bounds(b.items.iter().copied(), OP)? else {
                return Ok(());
            };
            current = b.parent;
            self.box_mut(id, OP)?.bounds = bounds;
        }
        Ok(())
    }

    /// Remove all items from `bx` and reset its bounds to zero.
    ///
    /// Child boxes with `bx` as their parent are detached. The ID and level
    /// are kept.
    pub fn clear(&mut self, bx: NodeId) -> Result<()> {
        const OP: &str = "clear";
        let b = self.box_mut(bx, OP)?;
        let items = core::mem::take(&mut b.items);
        b.bounds = BoxBounds::ZERO;
        for item in items {
            if let Some(child) = self.box_opt_mut(item) {
                if child.parent == Some(bx) {
                    child.parent = None;
                }
            }
        }
        Ok(())
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn get(&self, id: NodeId, op: &'static str) -> Result<&Node> {
        self.node_opt(id).ok_or(Error::InvalidNode { op })
    }

    fn box_opt(&self, id: NodeId) -> Option<&BoxNode> {
        match &self.node_opt(id)?.kind {
            Kind::Box(b) => Some(b),
            Kind::Leaf(_) => None,
        }
    }

    fn box_opt_mut(&mut self, id: NodeId) -> Option<&mut BoxNode> {
        match &mut self.node_opt_mut(id)?.kind {
            Kind::Box(b) => Some(b),
            Kind::Leaf(_) => None,
        }
    }

    /// Whether `target` is `from` or is held, at any depth, by the box `from`.
    pub(crate) fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(b) = self.box_opt(id) {
                stack.extend(b.items.iter().copied().filter(|&i| self.is_box(i) || i == target));
            }
        }
        false
    }

    pub(crate) fn box_ref(&self, id: NodeId, op: &'static str) -> Result<&BoxNode> {
        match &self.get(id, op)?.kind {
            Kind::Box(b) => Ok(b),
            Kind::Leaf(_) => Err(Error::NotABox { op }),
        }
    }

    pub(crate) fn box_mut(&mut self, id: NodeId, op: &'static str) -> Result<&mut BoxNode> {
        match &mut self
            .node_opt_mut(id)
            .ok_or(Error::InvalidNode { op })?
            .kind
        {
            Kind::Box(b) => Ok(b),
            Kind::Leaf(_) => Err(Error::NotABox { op }),
        }
    }

    /// Union of the bounds of `items`, or `None` if there are none.
    pub(crate) fn union_bounds(
        &self,
        items: impl IntoIterator<Item = NodeId>,
        op: &'static str,
    ) -> Result<Option<BoxBounds>> {
        let mut range: Option<Range3> = None;
        for item in items {
            let b = self.get(item, op)?.kind.bounds();
            match &mut range {
                Some(r) => r.extend_range(b.range()),
                None => range = Some(*b.range()),
            }
        }
        Ok(range.map(BoxBounds::from_range))
    }
}
