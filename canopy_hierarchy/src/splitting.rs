// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split selection and binary splitting of bounding boxes.
//!
//! A candidate [`Split`] partitions the items of a box by comparing their
//! centers with the split position. Candidates are ranked by balance:
//! the difference `d = |n0 - n1|` of the item counts on both sides, ties
//! broken in favor of the position closer to the middle.
//!
//! With [`SplitOptions::prefer_longest_axis`], the best candidate along the
//! longest axis of the box is used instead of the overall best if the
//! relative difference `|1 - r_best / r_longest|` of their count ratios
//! `r = |1 - n0 / n1|` is at most [`SplitOptions::longest_axis_tolerance`].

use canopy_bounds::tolerance::lt_or_eq;
use log::debug;

use crate::error::{Error, Result};
use crate::hierarchy::Hierarchy;
use crate::split::{Split, SplitOptions, SplitSet};
use crate::types::{BoxPair, NodeId, Partition};

#[derive(Copy, Clone, Debug)]
struct Candidate {
    split: Split,
    d: usize,
    r: f64,
}

impl Candidate {
    fn is_better_than(&self, other: &Self) -> bool {
        self.d < other.d
            || (self.d == other.d && (self.split.s - 0.5).abs() < (other.split.s - 0.5).abs())
    }
}

fn update_best(best: &mut Option<Candidate>, candidate: Candidate) {
    match best {
        Some(b) if !candidate.is_better_than(b) => {}
        _ => *best = Some(candidate),
    }
}

impl Hierarchy {
    /// Partition the items of `bx` by `split`.
    ///
    /// The split position is `split.s` mapped into the range of the box
    /// along `split.axis`. Items whose center is at or below the position
    /// (within tolerance `t`) go to [`Partition::lower`], the rest to
    /// [`Partition::upper`].
    pub fn split_test(&self, bx: NodeId, split: &Split, t: f64) -> Result<Partition> {
        const OP: &str = "split_test";
        let b = self.box_ref(bx, OP)?;
        let range = b
            .bounds
            .range()
            .axis_range(split.axis)
            .ok_or(Error::InvalidAxis(split.axis))?;
        let sc = range.value(split.s);
        let mut out = Partition::default();
        for &item in &b.items {
            let center = self.get(item, OP)?.kind.bounds().center();
            let v = split
                .axis
                .component(center)
                .ok_or(Error::InvalidAxis(split.axis))?;
            if lt_or_eq(v, sc, t) {
                out.lower.insert(item);
            } else {
                out.upper.insert(item);
            }
        }
        Ok(out)
    }

    /// The best split of `bx` among `splits`, or `None` if no candidate
    /// leaves at least `opts.min_items` items on each side.
    pub fn best_split(
        &self,
        bx: NodeId,
        splits: &SplitSet,
        opts: &SplitOptions,
    ) -> Result<Option<Split>> {
        const OP: &str = "best_split";
        let node = self.box_ref(bx, OP)?;
        let n = node.items.len();
        if n < 2 * opts.min_items {
            debug!("{OP}: {bx:?} has {n} items, need {}", 2 * opts.min_items);
            return Ok(None);
        }
        let preferred_axis = node.bounds.range().axis_order().a0;
        let mut best = None;
        let mut best_preferred = None;
        for split in splits {
            let (n0, n1) = self.split_test(bx, split, opts.tolerance)?.counts();
            if n0 < opts.min_items || n1 < opts.min_items {
                continue;
            }
            let r = if n1 == 0 {
                f64::INFINITY
            } else {
                (1.0 - n0 as f64 / n1 as f64).abs()
            };
            let candidate = Candidate {
                split: *split,
                d: n0.abs_diff(n1),
                r,
            };
            update_best(&mut best, candidate);
            if split.axis == preferred_axis {
                update_best(&mut best_preferred, candidate);
            }
        }
        if opts.prefer_longest_axis {
            if let (Some(b), Some(p)) = (best, best_preferred) {
                let r0 = if p.r != 0.0 { (1.0 - b.r / p.r).abs() } else { 0.0 };
                if r0 <= opts.longest_axis_tolerance {
                    debug!(
                        "{OP}: using {} on longest axis instead of {} (ratio difference {r0})",
                        p.split, b.split
                    );
                    return Ok(Some(p.split));
                }
            }
        }
        Ok(best.map(|c| c.split))
    }

    /// Split `bx` into two new boxes.
    ///
    /// With a single candidate in `splits` that candidate is used, otherwise
    /// [`Hierarchy::best_split`] picks one. The items are moved into two new
    /// boxes one level below `bx`, which become the only items of `bx`. With
    /// [`SplitOptions::recursive`], the new boxes are split in turn until they
    /// hold at most `min_items` items or reach `max_level`.
    ///
    /// Levels are taken from the boxes themselves: a recursive split of a box
    /// already at `max_level` or deeper does nothing. Use
    /// [`Hierarchy::set_level`] to count from `0` at `bx`.
    ///
    /// Returns `None`, leaving `bx` unchanged, if `bx` has no items, a
    /// recursion limit is reached, or no candidate puts items on both sides.
    pub fn split(
        &mut self,
        bx: NodeId,
        splits: &SplitSet,
        opts: &SplitOptions,
    ) -> Result<Option<BoxPair>> {
        const OP: &str = "split";
        let b = self.box_ref(bx, OP)?;
        let (n, level) = (b.items.len(), b.level);
        if n == 0 {
            debug!("{OP}: {bx:?} has no items");
            return Ok(None);
        }
        if opts.recursive {
            if n <= opts.min_items {
                debug!("{OP}: {bx:?} has {n} items, not splitting further");
                return Ok(None);
            }
            if opts.max_level > 0 && level >= opts.max_level {
                debug!("{OP}: {bx:?} reached level {level}");
                return Ok(None);
            }
        }
        let chosen = if splits.len() == 1 {
            splits.get(0)
        } else {
            self.best_split(bx, splits, opts)?
        };
        let Some(split) = chosen else {
            debug!("{OP}: no suitable split for {bx:?}");
            return Ok(None);
        };
        let part = self.split_test(bx, &split, opts.tolerance)?;
        if part.lower.is_empty() || part.upper.is_empty() {
            debug!("{OP}: {split} leaves one side of {bx:?} empty");
            return Ok(None);
        }
        debug!(
            "{OP}: {bx:?} at level {level} by {split} into {} + {} items",
            part.lower.len(),
            part.upper.len()
        );

        self.clear(bx)?;
        let b0 = self.insert_box_at_level(level.saturating_add(1));
        let b1 = self.insert_box_at_level(level.saturating_add(1));
        self.add_items(b0, part.lower, 0, 0.0)?;
        self.add_items(b1, part.upper, 0, 0.0)?;
        if opts.recursive {
            self.split(b0, splits, opts)?;
            self.split(b1, splits, opts)?;
        }
        self.add_item(bx, b0, 0.0)?;
        self.add_item(bx, b1, 0.0)?;
        Ok(Some(BoxPair { b0, b1 }))
    }
}
