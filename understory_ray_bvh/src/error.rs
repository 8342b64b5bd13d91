// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by BVH construction.

use thiserror::Error;

/// Rejected construction input.
///
/// Every variant is an invalid-input condition detected before any work is done.
/// Queries on a built [`Bvh`](crate::Bvh) cannot fail.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum BuildError {
    /// The vertex buffer does not hold a whole number of triangles.
    #[error("vertex buffer length {len} is not a multiple of 9")]
    VertexBufferLength {
        /// Length of the rejected buffer.
        len: usize,
    },
    /// `max_triangles_per_node` was zero.
    #[error("max triangles per node must be positive")]
    LeafThreshold,
    /// The box padding was negative, infinite, or NaN.
    #[error("extent padding {epsilon} must be finite and non-negative")]
    Epsilon {
        /// The rejected padding.
        epsilon: f64,
    },
}

impl BuildError {
    /// Whether this is an invalid-input error. Currently true for every variant.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::VertexBufferLength { .. } | Self::LeafThreshold | Self::Epsilon { .. }
        )
    }
}
