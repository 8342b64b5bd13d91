// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down construction by midpoint partitioning.
//!
//! Each split compares record centroids against the center of the node's own
//! extent (not a median of the contained triangles) on all three axes, keeps the
//! axes where both sides are non-empty, and cuts along the longest of those.
//! The node's slot range is then stably reordered so the "below" records come
//! first. Nodes whose three candidate axes all fail stay leaves, whatever their
//! size; this stops endless splitting of coincident geometry.
//!
//! The split loop runs off an explicit worklist, so tree depth is not bounded by
//! the call stack.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use crate::bbox::{self, BBOX_STRIDE};
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::node::{Node, NodeId, NodeKind};
use crate::types::{Aabb3, Axis, AxisSet, TRIANGLE_STRIDE};
use crate::vec3::Vec3;

/// Compute one bounding-box record per triangle of a flat vertex buffer.
///
/// Record `i` describes triangle `i` and carries `i` as its id.
pub fn compute_bounding_boxes(vertices: &[f64]) -> Result<Vec<f64>, BuildError> {
    if !vertices.len().is_multiple_of(TRIANGLE_STRIDE) {
        return Err(BuildError::VertexBufferLength {
            len: vertices.len(),
        });
    }
    let count = vertices.len() / TRIANGLE_STRIDE;
    let mut out = vec![0.0; count * BBOX_STRIDE];
    let mut a = Vec3::ZERO;
    let mut b = Vec3::ZERO;
    let mut c = Vec3::ZERO;
    for i in 0..count {
        let base = i * TRIANGLE_STRIDE;
        a.set_from_slice(vertices, base);
        b.set_from_slice(vertices, base + 3);
        c.set_from_slice(vertices, base + 6);
        bbox::encode(&mut out, i, i, a.min(b).min(c), a.max(b).max(c));
    }
    Ok(out)
}

/// Bounds of the records in `range`, padded outward by `epsilon`.
///
/// An empty range yields [`Aabb3::ZERO`], which is not a meaningful bound.
pub fn compute_extents(bboxes: &[f64], range: Range<usize>, epsilon: f64) -> Aabb3 {
    let mut slots = range.map(|slot| bbox::decode(bboxes, slot).aabb());
    let Some(first) = slots.next() else {
        return Aabb3::ZERO;
    };
    slots.fold(first, |acc, b| acc.union(&b)).expand(epsilon)
}

/// Summary of a finished build, for logging and inspection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Total nodes in the arena.
    pub nodes: usize,
    /// Leaf nodes.
    pub leaves: usize,
    /// Deepest level reached (the root is level 0).
    pub max_level: u32,
    /// Leaves left above the size threshold because no axis could split them.
    pub oversized_leaves: usize,
}

/// Output of [`Builder::build`].
#[derive(Debug)]
pub(crate) struct Built {
    pub(crate) nodes: Vec<Node>,
    pub(crate) bboxes: Vec<f64>,
    pub(crate) stats: BuildStats,
}

/// Owns the record buffers while the tree is being split.
#[derive(Debug)]
pub(crate) struct Builder {
    config: BuildConfig,
    bboxes: Vec<f64>,
    // Left/right concatenation lands here before being copied back.
    scratch: Vec<f64>,
    nodes: Vec<Node>,
    stats: BuildStats,
}

impl Builder {
    pub(crate) fn new(vertices: &[f64], config: BuildConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let bboxes = compute_bounding_boxes(vertices)?;
        let scratch = vec![0.0; bboxes.len()];
        Ok(Self {
            config,
            bboxes,
            scratch,
            nodes: Vec::new(),
            stats: BuildStats::default(),
        })
    }

    pub(crate) fn build(mut self) -> Built {
        let count = self.bboxes.len() / BBOX_STRIDE;
        let extents = compute_extents(&self.bboxes, 0..count, self.config.epsilon);
        self.nodes.push(Node::leaf(extents, 0..count, 0));

        // LIFO order only changes which node is split next, never the shape.
        let mut pending = vec![NodeId::ROOT];
        while let Some(id) = pending.pop() {
            if let Some((left, right)) = self.split(id) {
                pending.push(left);
                pending.push(right);
            }
        }

        self.stats.nodes = self.nodes.len();
        for n in &self.nodes {
            if n.is_leaf() {
                self.stats.leaves += 1;
                self.stats.max_level = self.stats.max_level.max(n.level);
            }
        }
        log::debug!(
            "built BVH over {count} triangles: {} nodes, {} leaves, max level {}, {} oversized leaves",
            self.stats.nodes,
            self.stats.leaves,
            self.stats.max_level,
            self.stats.oversized_leaves,
        );

        Built {
            nodes: self.nodes,
            bboxes: self.bboxes,
            stats: self.stats,
        }
    }

    fn centroid(&self, slot: usize) -> Vec3 {
        bbox::decode(&self.bboxes, slot).centroid()
    }

    /// Try to split leaf `id`. Returns the new children on success.
    fn split(&mut self, id: NodeId) -> Option<(NodeId, NodeId)> {
        let node = &self.nodes[id.idx()];
        let range = node.range()?;
        let count = range.len();
        if count == 0 || count <= self.config.max_triangles_per_node {
            return None;
        }
        let level = node.level;
        let centers = Axis::ALL.map(|axis| node.center_on(axis));
        let lengths = node.extents.extent();

        let mut below = [0_usize; 3];
        for slot in range.clone() {
            let c = self.centroid(slot);
            for (i, axis) in Axis::ALL.into_iter().enumerate() {
                if c[axis] < centers[i] {
                    below[i] += 1;
                }
            }
        }

        let mut failed = AxisSet::empty();
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            if below[i] == 0 || below[i] == count {
                failed |= axis.flag();
            }
        }
        if failed == AxisSet::all() {
            self.stats.oversized_leaves += 1;
            log::trace!(
                "node {id:?} ({}..{}) has no usable split axis; kept as a leaf of {count}",
                range.start,
                range.end,
            );
            return None;
        }

        // Longest surviving axis; strict comparison keeps the earliest on ties.
        let mut chosen: Option<(usize, Axis)> = None;
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            if failed.has(axis) {
                continue;
            }
            if chosen.is_none_or(|(_, best)| lengths[axis] > lengths[best]) {
                chosen = Some((i, axis));
            }
        }
        let (i, axis) = chosen?;

        let split_at = range.start + below[i];
        self.partition(range.clone(), axis, centers[i], split_at);

        let eps = self.config.epsilon;
        let left_range = range.start..split_at;
        let right_range = split_at..range.end;
        log::trace!(
            "split node {id:?} on {axis:?}: {left_range:?} | {right_range:?} at level {}",
            level + 1,
        );

        let left = NodeId::new(self.nodes.len());
        let right = NodeId::new(self.nodes.len() + 1);
        let left_node = Node::leaf(
            compute_extents(&self.bboxes, left_range.clone(), eps),
            left_range,
            level + 1,
        );
        let right_node = Node::leaf(
            compute_extents(&self.bboxes, right_range.clone(), eps),
            right_range,
            level + 1,
        );
        self.nodes.push(left_node);
        self.nodes.push(right_node);
        self.nodes[id.idx()].kind = NodeKind::Internal { left, right };
        Some((left, right))
    }

    /// Stable two-way partition of `range` around `center` on `axis`.
    ///
    /// Records strictly below `center` move to `range.start..split_at` and the rest
    /// to `split_at..range.end`, each keeping its original relative order. The
    /// range holds the same records afterward, only reordered.
    fn partition(&mut self, range: Range<usize>, axis: Axis, center: f64, split_at: usize) {
        let mut lo = range.start;
        let mut hi = split_at;
        for slot in range.clone() {
            let dst = if self.centroid(slot)[axis] < center {
                lo += 1;
                lo - 1
            } else {
                hi += 1;
                hi - 1
            };
            bbox::copy(&self.bboxes, slot, &mut self.scratch, dst);
        }
        debug_assert_eq!(lo, split_at, "left side count changed during partition");
        debug_assert_eq!(hi, range.end, "right side count changed during partition");

        let span = range.start * BBOX_STRIDE..range.end * BBOX_STRIDE;
        self.bboxes[span.clone()].copy_from_slice(&self.scratch[span]);
    }
}
