// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolving leaf items by ID.

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::hierarchy::Hierarchy;
use crate::types::NodeId;

/// Lookup of leaf items by their ID.
///
/// Used by [`Hierarchy::init_from_source`] to replace placeholder leaves with
/// real items. Implementations may insert new leaves into the hierarchy and
/// must fail if no item can be returned for `item_id`.
pub trait ItemSource {
    /// The node for `item_id`.
    fn get_item(&mut self, hierarchy: &mut Hierarchy, item_id: &str) -> Result<NodeId>;
}

impl<F> ItemSource for F
where
    F: FnMut(&mut Hierarchy, &str) -> Result<NodeId>,
{
    fn get_item(&mut self, hierarchy: &mut Hierarchy, item_id: &str) -> Result<NodeId> {
        self(hierarchy, item_id)
    }
}

/// Map from item ID to an existing leaf.
#[derive(Clone, Debug, Default)]
pub struct LeafIndex {
    map: HashMap<String, NodeId>,
}

impl LeafIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the given nodes by their IDs.
    ///
    /// Stale handles are skipped. If several nodes share an ID, the first
    /// one is kept.
    pub fn from_leaves(hierarchy: &Hierarchy, ids: impl IntoIterator<Item = NodeId>) -> Self {
        let mut index = Self::new();
        for id in ids {
            if let Some(item_id) = hierarchy.item_id(id) {
                index.insert(item_id, id);
            }
        }
        index
    }

    /// Map `item_id` to `id` unless the ID is already taken. Returns whether
    /// the entry was added.
    pub fn insert(&mut self, item_id: impl Into<String>, id: NodeId) -> bool {
        let item_id = item_id.into();
        if self.map.contains_key(&item_id) {
            warn!("LeafIndex: duplicate item ID {item_id:?}, keeping the first entry");
            return false;
        }
        self.map.insert(item_id, id);
        true
    }

    /// The node registered for `item_id`.
    pub fn get(&self, item_id: &str) -> Option<NodeId> {
        self.map.get(item_id).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl ItemSource for LeafIndex {
    fn get_item(&mut self, _hierarchy: &mut Hierarchy, item_id: &str) -> Result<NodeId> {
        self.get(item_id)
            .ok_or_else(|| Error::ItemNotFound(item_id.to_owned()))
    }
}

impl Hierarchy {
    /// Index of all leaves below `bx` by their IDs.
    pub fn leaf_index(&self, bx: NodeId) -> Result<LeafIndex> {
        Ok(LeafIndex::from_leaves(self, self.leaves(bx)?))
    }

    /// Replace every leaf below `bx` with `source.get_item(leaf_id)`.
    ///
    /// Child boxes are kept and processed recursively. The items of each box
    /// are swapped only after all of them were resolved, and its bounds are
    /// then recomputed from the new items. Replaced leaves that are no longer
    /// held by any box are removed from the hierarchy.
    ///
    /// On error, boxes already processed keep their new items.
    pub fn init_from_source<S>(&mut self, bx: NodeId, source: &mut S) -> Result<()>
    where
        S: ItemSource + ?Sized,
    {
        const OP: &str = "init_from_source";
        let items: Vec<NodeId> = self.box_ref(bx, OP)?.items.iter().copied().collect();
        let mut resolved = BTreeSet::new();
        let mut replaced = Vec::new();
        for item in items {
            if self.is_box(item) {
                self.init_from_source(item, source)?;
                resolved.insert(item);
                continue;
            }
            let item_id = self
                .item_id(item)
                .ok_or(Error::InvalidNode { op: OP })?
                .to_owned();
            let real = source.get_item(self, &item_id)?;
            self.get(real, OP)?;
            if self.reaches(real, bx) {
                return Err(Error::SelfInsertion { op: OP });
            }
            if real != item {
                replaced.push(item);
            }
            resolved.insert(real);
        }
        let bounds = self.union_bounds(resolved.iter().copied(), OP)?;
        let b = self.box_mut(bx, OP)?;
        b.items = resolved;
        if let Some(bounds) = bounds {
            b.bounds = bounds;
        }
        let mut released = 0;
        for old in replaced {
            if self.ref_count(old) == 0 {
                self.free(old);
                released += 1;
            }
        }
        if released > 0 {
            debug!("{OP}: released {released} placeholder leaves of {bx:?}");
        }
        Ok(())
    }
}
