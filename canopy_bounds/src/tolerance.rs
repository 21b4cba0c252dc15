// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tolerance-aware scalar comparisons.
//!
//! All predicates in this crate take an explicit tolerance `t`. Two values
//! closer than `t` compare as equal; `lt` and `gt` require a gap larger than `t`.

/// Default tolerance for comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;

/// `v0 < v1` by more than `t`.
#[inline]
pub fn lt(v0: f64, v1: f64, t: f64) -> bool {
    v0 < v1 - t
}

/// `v0 > v1` by more than `t`.
#[inline]
pub fn gt(v0: f64, v1: f64, t: f64) -> bool {
    v0 > v1 + t
}

/// `v0` and `v1` are within `t` of each other.
#[inline]
pub fn eq(v0: f64, v1: f64, t: f64) -> bool {
    !(gt(v0, v1, t) || lt(v0, v1, t))
}

/// `v0 <= v1` within `t`.
#[inline]
pub fn lt_or_eq(v0: f64, v1: f64, t: f64) -> bool {
    !gt(v0, v1, t)
}

/// `v0 >= v1` within `t`.
#[inline]
pub fn gt_or_eq(v0: f64, v1: f64, t: f64) -> bool {
    !lt(v0, v1, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_inside_tolerance_are_equal() {
        assert!(eq(1.0, 1.0 + 0.5e-6, DEFAULT_TOLERANCE));
        assert!(!lt(1.0, 1.0 + 0.5e-6, DEFAULT_TOLERANCE));
        assert!(lt_or_eq(1.0 + 0.5e-6, 1.0, DEFAULT_TOLERANCE));
        assert!(gt_or_eq(1.0, 1.0 + 0.5e-6, DEFAULT_TOLERANCE));
    }

    #[test]
    fn strict_comparisons_need_a_gap() {
        assert!(lt(1.0, 1.1, DEFAULT_TOLERANCE));
        assert!(gt(1.1, 1.0, DEFAULT_TOLERANCE));
        assert!(!eq(1.0, 1.1, DEFAULT_TOLERANCE));
        assert!(!lt(1.0, 1.1, 0.2), "a wide tolerance swallows the gap");
    }
}
