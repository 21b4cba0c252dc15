// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for hierarchy operations.

use canopy_bounds::Axis;
use thiserror::Error;

use crate::types::NodeId;

/// Errors reported by [`Hierarchy`](crate::Hierarchy) operations.
///
/// Capacity and radius rejections, and the lack of a suitable split, are not
/// errors; those are reported through ordinary return values.
#[derive(Error, Debug)]
pub enum Error {
    /// A node handle is stale or was never issued by this hierarchy.
    #[error("{op}: invalid node")]
    InvalidNode {
        /// Operation that received the handle.
        op: &'static str,
    },

    /// A leaf was passed where a bounding box is required.
    #[error("{op}: node is not a bounding box")]
    NotABox {
        /// Operation that received the handle.
        op: &'static str,
    },

    /// A box was added to itself or to a box below it.
    #[error("{op}: a bounding box cannot contain itself")]
    SelfInsertion {
        /// Operation that received the handle.
        op: &'static str,
    },

    /// A query had to descend into a bounding box without items.
    #[error("{op}: bounding box has no items")]
    EmptyInteriorNode {
        /// The query that failed.
        op: &'static str,
    },

    /// An item is not contained in the bounding box holding it.
    #[error("item {item:?} is not contained in bounding box {container:?}")]
    NotContained {
        /// The offending item.
        item: NodeId,
        /// The box holding it.
        container: NodeId,
    },

    /// A split was requested along an axis without a 3D component.
    #[error("invalid split axis {0}")]
    InvalidAxis(Axis),

    /// An item source has no item for this ID.
    #[error("item '{0}' not found")]
    ItemNotFound(String),

    /// An item without an ID was serialized or resolved.
    #[error("item ID not set")]
    MissingItemId,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for hierarchy operations.
pub type Result<T> = core::result::Result<T, Error>;
