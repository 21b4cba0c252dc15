// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Bounds: 3D ranges, bounding boxes, and spatial predicates.
//!
//! Canopy Bounds holds the geometric value types a bounding-volume hierarchy is built from.
//!
//! - [`Range`] and [`Range3`]: closed ranges and axis-aligned boxes with tolerance-aware comparison.
//! - [`BoxBounds`]: a box given by center and half-extent vector, with tri-state tests against
//!   planes, spheres, and boxes and boolean tests against lines and rays.
//! - [`Plane3`], [`Sphere3`], [`Line3`]: the query shapes.
//! - [`Axis`], [`Axes`], [`AxisTriple`]: axis identifiers, axis sets, and longest-axis ordering.
//!
//! Vectors are [`glam::DVec3`]. Every predicate takes an explicit tolerance; see
//! [`DEFAULT_TOLERANCE`] and the helpers in [`tolerance`].
//!
//! # Example
//!
//! ```rust
//! use canopy_bounds::{BoxBounds, DEFAULT_TOLERANCE, Intersection, Line3, Sphere3};
//! use glam::DVec3;
//!
//! let b = BoxBounds::new(DVec3::ZERO, DVec3::splat(0.5));
//!
//! // A sphere around the box contains it.
//! let s = Sphere3::new(DVec3::ZERO, 2.0);
//! assert_eq!(b.check_sphere(&s, DEFAULT_TOLERANCE), Intersection::Inside);
//!
//! // A ray pointing at the box hits it, the reversed ray does not.
//! let ray = Line3::new(DVec3::new(0.0, 0.0, 5.0), -DVec3::Z);
//! assert!(b.check_ray(&ray, DEFAULT_TOLERANCE));
//! assert!(!b.check_ray(&Line3::new(ray.p, DVec3::Z), DEFAULT_TOLERANCE));
//! ```
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` on the value types (forwarded to `glam/serde`).
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in coordinates. Comparisons with tolerance `t` treat values
//! closer than `t` as equal, so touching boxes overlap rather than being disjoint.

pub mod axis;
pub mod bounds;
pub mod range;
pub mod range3;
pub mod shapes;
pub mod tolerance;

pub use axis::{Axes, Axis, AxisTriple, axis_order};
pub use bounds::{BoxBounds, Intersection};
pub use range::{Range, RangeCompare, RangeCompare3};
pub use range3::Range3;
pub use shapes::{Line3, Plane3, Sphere3};
pub use tolerance::DEFAULT_TOLERANCE;
