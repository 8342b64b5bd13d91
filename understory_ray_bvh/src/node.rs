// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes stored in the BVH's node arena.

use core::ops::Range;

use crate::types::{Aabb3, Axis};

/// Handle to a node in a [`Bvh`](crate::Bvh).
///
/// Handles are only meaningful for the tree that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: Self = Self(0);

    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0
    }
}

/// Leaf or internal payload of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf owning the half-open slot range `[start, end)` of the bounding-box buffer.
    Leaf {
        /// First slot.
        start: usize,
        /// One past the last slot.
        end: usize,
    },
    /// An internal node with exactly two children. It owns no slots.
    Internal {
        /// Child holding the records whose centroids fell below the split plane.
        left: NodeId,
        /// Child holding the remaining records.
        right: NodeId,
    },
}

/// A node of the hierarchy.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) extents: Aabb3,
    pub(crate) level: u32,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn leaf(extents: Aabb3, range: Range<usize>, level: u32) -> Self {
        Self {
            extents,
            level,
            kind: NodeKind::Leaf {
                start: range.start,
                end: range.end,
            },
        }
    }

    /// Padded extent of every record this node covers.
    pub fn extents(&self) -> &Aabb3 {
        &self.extents
    }

    /// Depth below the root (the root is level 0).
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Leaf/internal payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Slot range of a leaf; `None` for internal nodes.
    pub fn range(&self) -> Option<Range<usize>> {
        match self.kind {
            NodeKind::Leaf { start, end } => Some(start..end),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Both children of an internal node; `None` for leaves.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Internal { left, right } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Number of records in a leaf. Internal nodes report zero.
    pub fn element_count(&self) -> usize {
        self.range().map_or(0, |r| r.len())
    }

    /// Center of the node extent along `axis`.
    pub fn center_on(&self, axis: Axis) -> f64 {
        self.extents.center_on(axis)
    }
}
