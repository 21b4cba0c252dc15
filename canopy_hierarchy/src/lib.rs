// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Hierarchy: a bounding-volume hierarchy of axis-aligned boxes.
//!
//! Items with a center and a half-extent vector are collected into bounding boxes, which are
//! split recursively along the axes until each box holds few items. The finished hierarchy
//! answers spatial queries against planes, lines, rays, spheres, and boxes.
//!
//! - Boxes grow as items are added and can be capped by item count or radius.
//! - Splitting picks, among caller-supplied candidates, the cut with the best item balance,
//!   optionally favoring the longest axis of the box.
//! - Queries descend only into boxes that straddle the query shape. A box entirely inside the
//!   shape is returned as a whole, so results may contain boxes as well as leaves.
//!
//! ## Arena and handles
//!
//! All boxes and leaves live in one [`Hierarchy`] and are addressed by generational
//! [`NodeId`] handles. Leaves are trait objects implementing [`BoxBoundsItem`], so any type
//! with bounds can be indexed. A leaf may be held by several boxes; each box records at most
//! one parent. Operations on a stale handle fail with [`Error::InvalidNode`].
//!
//! ## API overview
//!
//! - [`Hierarchy`]: node storage plus every box operation, taking the box's [`NodeId`].
//! - [`BoxBoundsItem`]: the leaf contract, with [`BoundsItem`] and [`SphereItem`] as ready-made leaves.
//! - [`Split`], [`SplitSet`], [`SplitOptions`]: split candidates and the splitting configuration.
//! - [`BoxDescription`]: serializable structure with leaves stored by ID, rebuilt with
//!   [`Hierarchy::restore`] and reconnected via an [`ItemSource`] such as [`LeafIndex`].
//!
//! Key operations:
//! - [`Hierarchy::add_item`] / [`Hierarchy::add_items`] / [`Hierarchy::take_items`]
//! - [`Hierarchy::split`] and [`Hierarchy::best_split`]
//! - [`Hierarchy::items_above_plane`], [`Hierarchy::items_on_line`], [`Hierarchy::items_on_ray`],
//!   [`Hierarchy::items_in_sphere`], [`Hierarchy::items_in_box`], [`Hierarchy::containing_leaf`]
//! - [`Hierarchy::validate`] and [`Hierarchy::compare_hierarchy`]
//!
//! ## Logging
//!
//! The crate logs through [`log`]: split decisions and hierarchy mismatches at `debug`, query
//! descent at `trace`, and inconsistent parent links at `warn`. No logger is installed.
//!
//! # Example
//!
//! ```rust
//! use canopy_bounds::{Axes, DEFAULT_TOLERANCE, Sphere3};
//! use canopy_hierarchy::{BoundsItem, Hierarchy, SplitOptions, SplitSet};
//! use glam::DVec3;
//!
//! let mut h = Hierarchy::new();
//! let root = h.insert_box();
//! for i in 0_u8..16 {
//!     let x = f64::from(i);
//!     let leaf = h.insert_leaf(BoundsItem::new(DVec3::new(x, 0.0, 0.0), DVec3::splat(0.25), format!("item{i}")));
//!     h.add_item(root, leaf, 0.0).unwrap();
//! }
//!
//! // Split at the quarter points of each axis until boxes hold at most two items.
//! let mut splits = SplitSet::new();
//! splits.add_splits_on(Axes::XYZ, 3);
//! h.split(root, &splits, &SplitOptions::recursive(2, 0)).unwrap();
//! h.validate(root, DEFAULT_TOLERANCE).unwrap();
//!
//! // Items near x = 3.
//! let hits = h.items_in_sphere(root, &Sphere3::new(DVec3::new(3.0, 0.0, 0.0), 0.5), DEFAULT_TOLERANCE).unwrap();
//! let ids: Vec<_> = hits.iter().filter_map(|&id| h.item_id(id)).collect();
//! assert_eq!(ids, ["item3"]);
//! ```

mod description;
mod error;
mod hierarchy;
mod item;
mod query;
mod source;
mod split;
mod splitting;
mod types;
mod xml;

#[cfg(test)]
mod testing;

pub use description::{BoxDescription, ItemDescription};
pub use error::{Error, Result};
pub use hierarchy::Hierarchy;
pub use item::{BoundsItem, BoxBoundsItem, SphereItem};
pub use source::{ItemSource, LeafIndex};
pub use split::{Split, SplitOptions, SplitSet};
pub use types::{BoxPair, ChildIdOptions, ItemOrder, NodeId, Partition};
pub use xml::XML_HEADER;
