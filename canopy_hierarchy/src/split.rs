// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split candidates and splitting options.

use core::fmt;

use canopy_bounds::{Axes, Axis, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};

/// A cut through a bounding box.
///
/// `s` is a normalized position along `axis`: `0` is the minimum of the box
/// range on that axis, `1` the maximum, `0.5` the midpoint. It is not
/// validated.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Axis the cut is perpendicular to.
    pub axis: Axis,
    /// Normalized position along the axis.
    pub s: f64,
}

impl Split {
    /// Create a split.
    pub const fn new(axis: Axis, s: f64) -> Self {
        Self { axis, s }
    }

    /// Split at the midpoint of `axis`.
    pub const fn midpoint(axis: Axis) -> Self {
        Self { axis, s: 0.5 }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Split[{}, {}]", self.axis, self.s)
    }
}

/// An ordered collection of split candidates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitSet {
    splits: Vec<Split>,
}

impl SplitSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a split.
    pub fn add_split(&mut self, split: Split) {
        self.splits.push(split);
    }

    /// Append `num` evenly spaced splits along `axis`, at `i / (num + 1)`
    /// for `i` in `1..=num`, and return them.
    ///
    /// `num == 0` adds nothing.
    pub fn add_splits(&mut self, axis: Axis, num: usize) -> &[Split] {
        let start = self.splits.len();
        let step = 1.0 / (num + 1) as f64;
        self.splits
            .extend((1..=num).map(|i| Split::new(axis, step * i as f64)));
        &self.splits[start..]
    }

    /// [`SplitSet::add_splits`] for each axis in `axes`, in X, Y, Z, W order.
    pub fn add_splits_on(&mut self, axes: Axes, num: usize) -> &[Split] {
        let start = self.splits.len();
        for axis in axes.axes() {
            self.add_splits(axis, num);
        }
        &self.splits[start..]
    }

    /// Number of splits.
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    /// Whether the set holds no splits.
    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Split at `index`.
    pub fn get(&self, index: usize) -> Option<Split> {
        self.splits.get(index).copied()
    }

    /// Iterate the splits in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Split> {
        self.splits.iter()
    }

    /// All splits in insertion order.
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Index of the first split equal to `split`.
    pub fn find(&self, split: &Split) -> Option<usize> {
        self.splits.iter().position(|s| s == split)
    }

    /// Remove the first split equal to `split`. Returns whether one was removed.
    pub fn remove(&mut self, split: &Split) -> bool {
        match self.find(split) {
            Some(i) => {
                self.splits.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove and return the split at `index`.
    pub fn remove_index(&mut self, index: usize) -> Option<Split> {
        (index < self.splits.len()).then(|| self.splits.remove(index))
    }

    /// Remove all splits.
    pub fn clear(&mut self) {
        self.splits.clear();
    }
}

impl FromIterator<Split> for SplitSet {
    fn from_iter<I: IntoIterator<Item = Split>>(iter: I) -> Self {
        Self {
            splits: iter.into_iter().collect(),
        }
    }
}

impl Extend<Split> for SplitSet {
    fn extend<I: IntoIterator<Item = Split>>(&mut self, iter: I) {
        self.splits.extend(iter);
    }
}

impl<'a> IntoIterator for &'a SplitSet {
    type Item = &'a Split;
    type IntoIter = core::slice::Iter<'a, Split>;

    fn into_iter(self) -> Self::IntoIter {
        self.splits.iter()
    }
}

/// Options for [`Hierarchy::best_split`](crate::Hierarchy::best_split) and
/// [`Hierarchy::split`](crate::Hierarchy::split).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Split the new boxes again until a limit is reached.
    pub recursive: bool,
    /// Minimum number of items on each side of a split. When splitting
    /// recursively, boxes with at most this many items are not split.
    pub min_items: usize,
    /// Maximum level for recursive splitting. `0` means no limit.
    ///
    /// Compared against the stored level of each box, not against the depth
    /// below the box passed to [`Hierarchy::split`](crate::Hierarchy::split).
    pub max_level: u32,
    /// Tolerance for coordinate comparisons.
    pub tolerance: f64,
    /// Prefer a split along the longest axis of the box if its balance is
    /// close enough to the best one.
    pub prefer_longest_axis: bool,
    /// Relative balance difference within which the longest axis is preferred.
    pub longest_axis_tolerance: f64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            min_items: 0,
            max_level: 0,
            tolerance: DEFAULT_TOLERANCE,
            prefer_longest_axis: false,
            longest_axis_tolerance: 0.1,
        }
    }
}

impl SplitOptions {
    /// Options for recursive splitting with the given item and level limits.
    pub fn recursive(min_items: usize, max_level: u32) -> Self {
        Self {
            recursive: true,
            min_items,
            max_level,
            ..Self::default()
        }
    }
}
