// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializable structure of a hierarchy with leaves stored by ID only.

use canopy_bounds::BoxBounds;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, Kind};
use crate::item::BoundsItem;
use crate::types::NodeId;

/// A bounding box and its items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxDescription {
    /// Box ID. May be empty.
    pub item_id: String,
    /// Level of the box.
    pub level: u32,
    /// Center of the box bounds.
    pub center: DVec3,
    /// Half-extent vector of the box bounds.
    pub r_vec: DVec3,
    /// Items in the order of the box's item set.
    #[serde(default)]
    pub items: Vec<ItemDescription>,
}

/// An item of a [`BoxDescription`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDescription {
    /// A nested bounding box.
    Box(BoxDescription),
    /// A leaf, identified by its ID.
    Leaf {
        /// Leaf ID.
        item_id: String,
        /// Center of the leaf bounds.
        center: DVec3,
        /// Half-extent vector of the leaf bounds.
        r_vec: DVec3,
    },
}

impl Hierarchy {
    /// Describe the hierarchy below `bx`.
    ///
    /// Fails with [`Error::MissingItemId`] if a leaf has an empty ID, since
    /// it could not be resolved again.
    pub fn describe(&self, bx: NodeId) -> Result<BoxDescription> {
        const OP: &str = "describe";
        let b = self.box_ref(bx, OP)?;
        let mut items = Vec::with_capacity(b.items.len());
        for &item in &b.items {
            match &self.get(item, OP)?.kind {
                Kind::Box(_) => items.push(ItemDescription::Box(self.describe(item)?)),
                Kind::Leaf(leaf) => {
                    if leaf.item_id().is_empty() {
                        return Err(Error::MissingItemId);
                    }
                    items.push(ItemDescription::Leaf {
                        item_id: leaf.item_id().to_owned(),
                        center: leaf.center(),
                        r_vec: leaf.r_vec(),
                    });
                }
            }
        }
        Ok(BoxDescription {
            item_id: b.item_id.clone(),
            level: b.level,
            center: b.bounds.center(),
            r_vec: b.bounds.r_vec(),
            items,
        })
    }

    /// Rebuild the boxes of `desc`, with a [`BoundsItem`] placeholder per leaf.
    ///
    /// Returns the new root box. Use [`Hierarchy::init_from_source`] to
    /// swap the placeholders for the real items. A box without items gets
    /// the bounds stored in the description.
    pub fn restore(&mut self, desc: &BoxDescription) -> Result<NodeId> {
        let bx = self.insert_box_at_level(desc.level);
        self.set_item_id(bx, desc.item_id.as_str())?;
        for item in &desc.items {
            let child = match item {
                ItemDescription::Box(d) => self.restore(d)?,
                ItemDescription::Leaf {
                    item_id,
                    center,
                    r_vec,
                } => self.insert_leaf(BoundsItem::new(*center, *r_vec, item_id.as_str())),
            };
            self.add_item(bx, child, 0.0)?;
        }
        if desc.items.is_empty() {
            self.box_mut(bx, "restore")?.bounds = BoxBounds::new(desc.center, desc.r_vec);
        }
        Ok(bx)
    }
}
