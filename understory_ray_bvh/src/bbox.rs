// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat per-triangle bounding-box records.
//!
//! Each record is [`BBOX_STRIDE`] scalars: `[id, min_x, min_y, min_z, max_x, max_y, max_z]`.
//! Records live in one `Vec<f64>` so the builder can reorder a range by bulk
//! copies instead of shuffling per-triangle heap objects.
//!
//! None of these helpers validate `slot`; out-of-range slots panic on the
//! slice index.

use crate::types::Aabb3;
use crate::vec3::Vec3;

/// Number of scalars per bounding-box record.
pub const BBOX_STRIDE: usize = 7;

/// A decoded bounding-box record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Positional index of the originating triangle in the vertex buffer.
    pub triangle_id: usize,
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl BoundingBox {
    /// Midpoint of the box, used for side assignment while splitting.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The box without its triangle id.
    pub fn aabb(&self) -> Aabb3 {
        Aabb3::new(self.min, self.max)
    }
}

/// Write a record at `slot`.
#[allow(
    clippy::cast_precision_loss,
    reason = "Triangle ids are stored as f64; ids below 2^53 round-trip exactly."
)]
pub fn encode(buffer: &mut [f64], slot: usize, triangle_id: usize, min: Vec3, max: Vec3) {
    let r = &mut buffer[slot * BBOX_STRIDE..(slot + 1) * BBOX_STRIDE];
    r[0] = triangle_id as f64;
    r[1..4].copy_from_slice(&min.to_array());
    r[4..7].copy_from_slice(&max.to_array());
}

/// Copy one record from `src[src_slot]` to `dst[dst_slot]`.
pub fn copy(src: &[f64], src_slot: usize, dst: &mut [f64], dst_slot: usize) {
    let from = src_slot * BBOX_STRIDE;
    let to = dst_slot * BBOX_STRIDE;
    dst[to..to + BBOX_STRIDE].copy_from_slice(&src[from..from + BBOX_STRIDE]);
}

/// Read the triangle id stored at `slot`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Ids are written from usize values by `encode` and are never negative or fractional."
)]
pub fn triangle_id(buffer: &[f64], slot: usize) -> usize {
    buffer[slot * BBOX_STRIDE] as usize
}

/// Read the record at `slot`.
pub fn decode(buffer: &[f64], slot: usize) -> BoundingBox {
    let base = slot * BBOX_STRIDE;
    BoundingBox {
        triangle_id: triangle_id(buffer, slot),
        min: Vec3::from_slice(buffer, base + 1),
        max: Vec3::from_slice(buffer, base + 4),
    }
}
