// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis identifiers, axis ordering, and axis sets.

use core::fmt;

use glam::DVec3;

/// Coordinate axis.
///
/// `W` exists for homogeneous coordinates; it has no component in a 3D
/// vector and no range in a [`Range3`](crate::Range3).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
    /// The homogeneous w axis.
    W,
}

impl Axis {
    /// All axes in declaration order.
    pub const ALL: [Self; 4] = [Self::X, Self::Y, Self::Z, Self::W];

    /// Component index in a 3D vector, or `None` for [`Axis::W`].
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::X => Some(0),
            Self::Y => Some(1),
            Self::Z => Some(2),
            Self::W => None,
        }
    }

    /// Axis for a 3D component index.
    pub const fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// Component of `v` along this axis, or `None` for [`Axis::W`].
    pub fn component(self, v: DVec3) -> Option<f64> {
        self.index().map(|i| v[i])
    }

    /// The flag for this axis in an [`Axes`] set.
    pub const fn flag(self) -> Axes {
        match self {
            Self::X => Axes::X,
            Self::Y => Axes::Y,
            Self::Z => Axes::Z,
            Self::W => Axes::W,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::W => "W",
        };
        f.write_str(s)
    }
}

/// Three axes ordered from the largest to the smallest component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AxisTriple {
    /// Axis of the largest component.
    pub a0: Axis,
    /// Axis of the middle component.
    pub a1: Axis,
    /// Axis of the smallest component.
    pub a2: Axis,
}

/// Order the axes of `v` by descending component.
///
/// Ties keep the earlier axis first (X before Y before Z).
pub fn axis_order(v: DVec3) -> AxisTriple {
    let c = |a: Axis| a.component(v).unwrap_or(0.0);
    let mut r = AxisTriple {
        a0: Axis::X,
        a1: Axis::Y,
        a2: Axis::Z,
    };
    if c(Axis::Y) > c(Axis::X) {
        r.a0 = Axis::Y;
        r.a1 = Axis::X;
    }
    if c(r.a2) > c(r.a0) {
        let t0 = r.a2;
        r.a2 = r.a1;
        r.a1 = r.a0;
        r.a0 = t0;
    }
    if c(r.a2) > c(r.a1) {
        core::mem::swap(&mut r.a1, &mut r.a2);
    }
    r
}

bitflags::bitflags! {
    /// A set of axes, used to generate splits along several axes at once.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Axes: u8 {
        /// The x axis.
        const X = 0b0001;
        /// The y axis.
        const Y = 0b0010;
        /// The z axis.
        const Z = 0b0100;
        /// The homogeneous w axis.
        const W = 0b1000;
        /// The three spatial axes.
        const XYZ = Self::X.bits() | Self::Y.bits() | Self::Z.bits();
    }
}

impl Axes {
    /// Iterate the contained axes in X, Y, Z, W order.
    pub fn axes(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |a| self.contains(a.flag()))
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::XYZ
    }
}
