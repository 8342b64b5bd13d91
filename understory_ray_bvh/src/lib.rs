// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ray_bvh --heading-base-level=0

//! Understory Ray BVH: a build-once 3D bounding volume hierarchy over triangles.
//!
//! Understory Ray BVH answers "which triangles does this ray cross?" for large
//! triangle soups, the query behind picking, line-of-sight checks, and collision probes.
//!
//! - Build once from a flat vertex buffer (nine `f64` per triangle) or from [`Triangle`] values.
//! - Query with [`Bvh::intersect_ray`]: every triangle crossed by the forward ray, with the
//!   crossing point, in traversal order.
//! - Optionally cull hits from behind a triangle (its normal is `(b - a) × (c - a)`).
//!
//! The tree is immutable after construction, so a shared `&Bvh` can be queried from any
//! number of threads. There is no insertion, removal, or refit.
//! Results are neither sorted by distance nor deduplicated; callers wanting the closest hit
//! pick the smallest [`RayHit::t`].
//!
//! # Example
//!
//! ```rust
//! use understory_ray_bvh::{Bvh, Vec3};
//!
//! // Two triangles in the z = 0 plane, facing up.
//! let vertices = vec![
//!     0.0, 0.0, 0.0, 1000.0, 0.0, 0.0, 1000.0, 1000.0, 0.0, //
//!     0.0, 0.0, 0.0, 2000.0, 0.0, 0.0, 2000.0, 1000.0, 0.0,
//! ];
//! let bvh = Bvh::from_vertices(vertices, 7).unwrap();
//!
//! // Shoot straight down; only the second, larger triangle lies under (1500, 3).
//! let hits = bvh.intersect_ray(Vec3::new(1500.0, 3.0, 1000.0), Vec3::new(0.0, 0.0, -1.0), true);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].triangle_index, 1);
//! assert_eq!(hits[0].point, Vec3::new(1500.0, 3.0, 0.0));
//! ```
//!
//! ## How the tree is built
//!
//! Each triangle gets a bounding-box record in a flat buffer (see [`bbox`]). Starting from
//! a root covering everything, any node holding more than
//! [`BuildConfig::max_triangles_per_node`] records is split at the center of its own
//! extent along the longest axis that leaves both sides non-empty. The node's records are
//! reordered in place, so every leaf owns a contiguous slot range. Nodes that cannot be
//! split on any axis (coincident geometry) stay leaves even above the threshold.
//! Node extents are padded by [`BuildConfig::epsilon`] so flat geometry still has volume.
//!
//! ## Float semantics
//!
//! Inputs are assumed free of NaN. Zero direction components are fine: the slab test is
//! written for the infinite reciprocals they produce. Debug builds assert that rays
//! contain no NaN.
//!
//! ## Features
//!
//! - `std` (default): use the standard library for square roots.
//! - `libm`: use `libm` instead, for `no_std` targets.
//!
//! This crate is `no_std` and uses `alloc`. Build progress is reported through the
//! [`log`] facade at `debug` and `trace` level.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bbox;
pub mod builder;
pub mod bvh;
pub mod config;
pub mod error;
mod math;
pub mod node;
pub mod ray;
pub mod types;
pub mod vec3;

pub use bbox::BoundingBox;
pub use builder::{BuildStats, compute_bounding_boxes, compute_extents};
pub use bvh::{Bvh, RayHit};
pub use config::BuildConfig;
pub use error::BuildError;
pub use node::{Node, NodeId, NodeKind};
pub use ray::Ray;
pub use types::{Aabb3, Axis, AxisSet, Triangle};
pub use vec3::Vec3;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn bvh_is_shareable_across_threads() {
        assert_send_sync::<Bvh>();
    }

    #[test]
    fn vertex_and_triangle_constructors_agree() {
        let tris = [
            Triangle::from_scalars([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            Triangle::from_scalars([5.0, 0.0, 1.0, 6.0, 0.0, 1.0, 5.0, 1.0, 1.0]),
            Triangle::from_scalars([0.0, 5.0, 2.0, 1.0, 5.0, 2.0, 0.0, 6.0, 2.0]),
        ];
        let mut flat = Vec::new();
        for t in &tris {
            flat.extend_from_slice(&t.0[0].to_array());
            flat.extend_from_slice(&t.0[1].to_array());
            flat.extend_from_slice(&t.0[2].to_array());
        }
        let a = Bvh::from_triangles(&tris, 1).unwrap();
        let b = Bvh::from_vertices(flat, 1).unwrap();
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.bbox_buffer(), b.bbox_buffer());
        assert_eq!(a.node_count(), b.node_count());
    }

    #[test]
    fn custom_epsilon_pads_root() {
        let t = Triangle::from([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let cfg = BuildConfig::new(4).with_epsilon(0.5);
        let bvh = Bvh::from_triangles_with_config(&[t], cfg).unwrap();
        assert_eq!(bvh.root().extents().min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(bvh.root().extents().max, Vec3::new(1.5, 1.5, 0.5));
        assert_eq!(bvh.config().epsilon, 0.5);
    }
}
