// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-dimensional ranges and range relationships.

use core::fmt;

use crate::tolerance::{eq, gt, gt_or_eq, lt, lt_or_eq};

/// Relationship of one range (the first) to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeCompare {
    /// Both ranges are equal within tolerance.
    Equal,
    /// The other range contains the first one.
    OtherContains,
    /// The first range contains the other one.
    FirstContains,
    /// The ranges overlap, neither contains the other.
    Overlap,
    /// The ranges do not touch.
    Disjoint,
}

impl RangeCompare {
    /// Whether the first range contains the other or equals it.
    pub const fn first_covers(self) -> bool {
        matches!(self, Self::FirstContains | Self::Equal)
    }
}

impl fmt::Display for RangeCompare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equal => "equal",
            Self::OtherContains => "other contains",
            Self::FirstContains => "first contains",
            Self::Overlap => "overlap",
            Self::Disjoint => "disjoint",
        };
        f.write_str(s)
    }
}

/// Per-axis range relationships.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeCompare3 {
    /// Relationship along x.
    pub x: RangeCompare,
    /// Relationship along y.
    pub y: RangeCompare,
    /// Relationship along z.
    pub z: RangeCompare,
}

impl fmt::Display for RangeCompare3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Closed range of values `[min, max]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Range {
    /// Create a range from its bounds.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate range containing a single value.
    pub const fn point(v: f64) -> Self {
        Self { min: v, max: v }
    }

    /// Grow the range so it contains `value`.
    pub fn extend(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Midpoint.
    pub fn center(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Half the extent.
    pub fn radius(&self) -> f64 {
        0.5 * (self.max - self.min)
    }

    /// `max - min`.
    pub fn extent(&self) -> f64 {
        self.max - self.min
    }

    /// Map a normalized parameter into the range: `0` is `min`, `1` is `max`.
    pub fn value(&self, s: f64) -> f64 {
        self.min + (self.max - self.min) * s
    }

    /// Clamp `value` into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// [`Range::value`] followed by [`Range::clamp`].
    pub fn clamped_value(&self, s: f64) -> f64 {
        self.clamp(self.value(s))
    }

    /// Whether `v` lies in the range, within tolerance `t`.
    pub fn contains(&self, v: f64, t: f64) -> bool {
        !(lt(v, self.min, t) || gt(v, self.max, t))
    }

    /// Relationship of this range to `other`.
    pub fn compare(&self, other: &Self, t: f64) -> RangeCompare {
        if eq(self.min, other.min, t) && eq(self.max, other.max, t) {
            return RangeCompare::Equal;
        }
        if lt(self.max, other.min, t) || gt(self.min, other.max, t) {
            return RangeCompare::Disjoint;
        }
        if lt_or_eq(other.min, self.min, t) && gt_or_eq(other.max, self.max, t) {
            return RangeCompare::OtherContains;
        }
        if lt_or_eq(self.min, other.min, t) && gt_or_eq(self.max, other.max, t) {
            return RangeCompare::FirstContains;
        }
        RangeCompare::Overlap
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
