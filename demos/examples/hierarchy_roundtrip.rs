// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchy round trip.
//!
//! Describe a split hierarchy as JSON with leaves stored by ID, rebuild it, reconnect the
//! original leaves, and dump the legacy XML.
//!
//! Run:
//! - `cargo run -p canopy_demos --example hierarchy_roundtrip`

use canopy_bounds::{Axes, DEFAULT_TOLERANCE};
use canopy_hierarchy::{
    BoundsItem, BoxDescription, ChildIdOptions, Hierarchy, SplitOptions, SplitSet,
};
use glam::DVec3;
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let t = DEFAULT_TOLERANCE;

    let mut h = Hierarchy::new();
    let root = h.insert_box();
    h.set_item_id(root, "grid")?;
    for z in 0_u8..3 {
        for y in 0_u8..3 {
            for x in 0_u8..3 {
                let c = DVec3::new(f64::from(x), f64::from(y), f64::from(z));
                let leaf = h.insert_leaf(BoundsItem::new(c, DVec3::splat(0.4), format!("cell{x}{y}{z}")));
                h.add_item(root, leaf, 0.0)?;
            }
        }
    }
    let mut splits = SplitSet::new();
    splits.add_splits_on(Axes::XYZ, 1);
    h.split(root, &splits, &SplitOptions::recursive(4, 3))?;
    h.set_child_ids(
        root,
        "grid",
        &ChildIdOptions {
            recursive: true,
            level: 1,
            ..ChildIdOptions::default()
        },
    )?;

    let json = serde_json::to_string_pretty(&h.describe(root)?)?;
    info!("description is {} bytes", json.len());
    println!("{json}");

    let desc: BoxDescription = serde_json::from_str(&json)?;
    let copy = h.restore(&desc)?;
    let mut index = h.leaf_index(root)?;
    h.init_from_source(copy, &mut index)?;
    println!("restored hierarchy matches: {}", h.compare_hierarchy(root, copy, t)?);

    let path = std::env::temp_dir().join("canopy_grid.xml");
    h.write_to_file(root, &path)?;
    println!("wrote {}", path.display());
    Ok(())
}
