// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child naming and the legacy XML dump.

use std::path::Path;

use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, Kind};
use crate::types::{ChildIdOptions, NodeId};

/// Header written by [`Hierarchy::write_to_file`].
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n";

impl Hierarchy {
    /// Assign IDs to the items of `bx`.
    ///
    /// See [`ChildIdOptions`] for the naming scheme. Items are numbered in
    /// item order, counting skipped items too.
    pub fn set_child_ids(&mut self, bx: NodeId, prefix: &str, opts: &ChildIdOptions) -> Result<()> {
        const OP: &str = "set_child_ids";
        let items: Vec<NodeId> = self.box_ref(bx, OP)?.items.iter().copied().collect();
        let w = opts.field_width;
        for (k, item) in items.into_iter().enumerate() {
            let current = self.item_id(item).ok_or(Error::InvalidNode { op: OP })?;
            if opts.keep_existing && !current.is_empty() {
                continue;
            }
            let child_prefix = format!("{prefix}_{k:0w$}");
            let id = if opts.show_level {
                format!("{child_prefix}_{:0w$}", opts.level)
            } else {
                child_prefix.clone()
            };
            self.set_item_id(item, id)?;
            if opts.recursive && self.is_box(item) {
                let next = ChildIdOptions {
                    level: opts.level.saturating_add(1),
                    ..*opts
                };
                self.set_child_ids(item, &child_prefix, &next)?;
            }
        }
        Ok(())
    }

    /// Legacy XML representation of `bx` and everything below it.
    ///
    /// Fails with [`Error::MissingItemId`] if any box or leaf has no ID.
    pub fn xml_legacy(&self, bx: NodeId) -> Result<String> {
        let mut out = String::new();
        self.write_xml(bx, &mut out)?;
        Ok(out)
    }

    fn write_xml(&self, bx: NodeId, out: &mut String) -> Result<()> {
        const OP: &str = "xml_legacy";
        let b = self.box_ref(bx, OP)?;
        if b.item_id.is_empty() {
            return Err(Error::MissingItemId);
        }
        let (c, r) = (b.bounds.center(), b.bounds.r_vec());
        out.push_str(&format!(
            "<bbox id=\"{}\" center=\"{},{},{}\" rvec=\"{},{},{}\"><items>",
            b.item_id, c.x, c.y, c.z, r.x, r.y, r.z
        ));
        for &item in &b.items {
            match &self.get(item, OP)?.kind {
                Kind::Box(_) => self.write_xml(item, out)?,
                Kind::Leaf(leaf) => out.push_str(&leaf.xml_legacy()?),
            }
        }
        out.push_str("</items></bbox>");
        Ok(())
    }

    /// Write [`XML_HEADER`] and [`Hierarchy::xml_legacy`] of `bx` to `path`.
    pub fn write_to_file(&self, bx: NodeId, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.xml_legacy(bx)?;
        std::fs::write(path, format!("{XML_HEADER}{xml}"))?;
        Ok(())
    }
}
