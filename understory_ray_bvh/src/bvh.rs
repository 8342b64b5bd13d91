// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built hierarchy and its ray queries.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::bbox::{self, BBOX_STRIDE};
use crate::builder::{BuildStats, Builder};
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::node::{Node, NodeId, NodeKind};
use crate::ray::Ray;
use crate::types::{TRIANGLE_STRIDE, Triangle};
use crate::vec3::Vec3;

/// One triangle crossed by a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// The triangle's vertices.
    pub triangle: Triangle,
    /// Positional index of the triangle in the input.
    pub triangle_index: usize,
    /// Where the ray crosses the triangle.
    pub point: Vec3,
    /// Ray parameter of the crossing: `point == origin + direction * t`.
    pub t: f64,
}

/// A bounding volume hierarchy over a triangle soup.
///
/// Built once, immutable afterward, and safe to query from many threads at once.
///
/// ```
/// use understory_ray_bvh::{Bvh, Triangle, Vec3};
///
/// let tris = [
///     Triangle::from([[0.0, 0.0, 0.0], [1000.0, 0.0, 0.0], [1000.0, 1000.0, 0.0]]),
///     Triangle::from([[0.0, 0.0, 0.0], [2000.0, 0.0, 0.0], [2000.0, 1000.0, 0.0]]),
/// ];
/// let bvh = Bvh::from_triangles(&tris, 7).unwrap();
///
/// let hits = bvh.intersect_ray(
///     Vec3::new(1500.0, 3.0, 1000.0),
///     Vec3::new(0.0, 0.0, -1.0),
///     true,
/// );
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].triangle_index, 1);
/// assert_eq!(hits[0].point, Vec3::new(1500.0, 3.0, 0.0));
/// ```
pub struct Bvh {
    vertices: Vec<f64>,
    bboxes: Vec<f64>,
    nodes: Vec<Node>,
    config: BuildConfig,
    stats: BuildStats,
}

impl Bvh {
    /// Build from a flat vertex buffer (nine scalars per triangle).
    pub fn from_vertices(
        vertices: Vec<f64>,
        max_triangles_per_node: usize,
    ) -> Result<Self, BuildError> {
        Self::from_vertices_with_config(vertices, BuildConfig::new(max_triangles_per_node))
    }

    /// Build from a flat vertex buffer with an explicit configuration.
    pub fn from_vertices_with_config(
        vertices: Vec<f64>,
        config: BuildConfig,
    ) -> Result<Self, BuildError> {
        let built = Builder::new(&vertices, config)?.build();
        Ok(Self {
            vertices,
            bboxes: built.bboxes,
            nodes: built.nodes,
            config,
            stats: built.stats,
        })
    }

    /// Build from discrete triangles.
    pub fn from_triangles(
        triangles: &[Triangle],
        max_triangles_per_node: usize,
    ) -> Result<Self, BuildError> {
        Self::from_triangles_with_config(triangles, BuildConfig::new(max_triangles_per_node))
    }

    /// Build from discrete triangles with an explicit configuration.
    pub fn from_triangles_with_config(
        triangles: &[Triangle],
        config: BuildConfig,
    ) -> Result<Self, BuildError> {
        let mut vertices = Vec::with_capacity(triangles.len() * TRIANGLE_STRIDE);
        for t in triangles {
            t.write_to(&mut vertices);
        }
        Self::from_vertices_with_config(vertices, config)
    }

    /// Every triangle the ray crosses, in traversal order (not sorted by distance).
    pub fn intersect_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        backface_culling: bool,
    ) -> Vec<RayHit> {
        self.intersect(&Ray::new(origin, direction), backface_culling)
    }

    /// Every triangle `ray` crosses, in traversal order (not sorted by distance).
    pub fn intersect(&self, ray: &Ray, backface_culling: bool) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for index in self.candidates(ray) {
            let triangle = Triangle::from_slice(&self.vertices, index);
            if let Some(t) = ray.intersect_triangle(&triangle, backface_culling) {
                hits.push(RayHit {
                    triangle,
                    triangle_index: index,
                    point: ray.at(t),
                    t,
                });
            }
        }
        hits
    }

    /// Ids of all triangles in leaves whose box the ray passes.
    ///
    /// This is the pruning phase of [`Bvh::intersect`] without the per-triangle test.
    pub fn candidates(&self, ray: &Ray) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.idx()];
            if !ray.hits_box(&node.extents) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { start, end } => {
                    out.extend((start..end).map(|slot| bbox::triangle_id(&self.bboxes, slot)));
                }
                NodeKind::Internal { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        out
    }

    /// The vertex buffer the tree was built from.
    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    /// Triangle with positional index `index`, or `None` if out of range.
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        (index < self.triangle_count()).then(|| Triangle::from_slice(&self.vertices, index))
    }

    /// The reordered bounding-box records (see [`bbox`](crate::bbox) for the layout).
    pub fn bbox_buffer(&self) -> &[f64] {
        &self.bboxes
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.bboxes.len() / BBOX_STRIDE
    }

    /// Configuration used to build this tree.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Leaf size threshold used to build this tree.
    pub fn max_triangles_per_node(&self) -> usize {
        self.config.max_triangles_per_node
    }

    /// Node and leaf counts gathered during construction.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node level (the root is level 0).
    pub fn depth(&self) -> u32 {
        self.stats.max_level
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.idx()]
    }

    /// Look up a node by handle, or `None` if it does not belong to this tree.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    /// All leaves with their handles, in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, n)| (NodeId::new(i), n))
    }

    /// Triangle ids stored in a leaf. Empty for internal or unknown nodes.
    pub fn leaf_triangles(&self, id: NodeId) -> impl Iterator<Item = usize> + '_ {
        let range = self.node(id).and_then(Node::range).unwrap_or(0..0);
        range.map(|slot| bbox::triangle_id(&self.bboxes, slot))
    }
}

impl Debug for Bvh {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bvh")
            .field("triangles", &self.triangle_count())
            .field(
                "max_triangles_per_node",
                &self.config.max_triangles_per_node,
            )
            .field("nodes", &self.stats.nodes)
            .field("leaves", &self.stats.leaves)
            .field("depth", &self.stats.max_level)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn flat_up() -> Triangle {
        Triangle::from([[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]])
    }

    #[test]
    fn two_triangle_scenario() {
        let t0 = Triangle::from([[0.0, 0.0, 0.0], [1000.0, 0.0, 0.0], [1000.0, 1000.0, 0.0]]);
        let t1 = Triangle::from([[0.0, 0.0, 0.0], [2000.0, 0.0, 0.0], [2000.0, 1000.0, 0.0]]);
        let bvh = Bvh::from_triangles(&[t0, t1], 7).unwrap();
        assert!(bvh.root().is_leaf());

        let hits = bvh.intersect_ray(
            Vec3::new(1500.0, 3.0, 1000.0),
            Vec3::new(0.0, 0.0, -1.0),
            true,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].triangle_index, 1);
        assert_eq!(hits[0].triangle, t1);
        assert_eq!(hits[0].point, Vec3::new(1500.0, 3.0, 0.0));
        assert_eq!(hits[0].t, 1000.0);
    }

    #[test]
    fn backface_toggle() {
        let bvh = Bvh::from_triangles(&[flat_up()], 1).unwrap();
        let up = Vec3::new(0.0, 0.0, 1.0);
        let above = Vec3::new(0.0, 0.0, 5.0);
        assert_eq!(bvh.intersect_ray(above, -up, false).len(), 1);

        let below = Vec3::new(0.0, 0.0, -5.0);
        assert!(bvh.intersect_ray(below, up, true).is_empty());
        assert_eq!(bvh.intersect_ray(below, up, false).len(), 1);
    }

    #[test]
    fn empty_geometry() {
        let bvh = Bvh::from_vertices(Vec::new(), 4).unwrap();
        assert!(bvh.root().is_leaf());
        assert_eq!(bvh.root().element_count(), 0);
        assert_eq!(bvh.triangle_count(), 0);
        assert!(
            bvh.intersect_ray(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), false)
                .is_empty()
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            Bvh::from_vertices(vec![0.0; 8], 4).unwrap_err(),
            BuildError::VertexBufferLength { len: 8 }
        );
        assert_eq!(
            Bvh::from_triangles(&[flat_up()], 0).unwrap_err(),
            BuildError::LeafThreshold
        );
    }

    #[test]
    fn stacked_layers_all_reported() {
        // Ten parallel layers; one vertical ray crosses all of them.
        let tris: Vec<Triangle> = (0..10_u32)
            .map(|i| {
                let z = f64::from(i);
                Triangle::from([[-1.0, -1.0, z], [1.0, -1.0, z], [0.0, 1.0, z]])
            })
            .collect();
        let bvh = Bvh::from_triangles(&tris, 2).unwrap();
        assert!(!bvh.root().is_leaf());

        let hits = bvh.intersect_ray(Vec3::new(0.0, 0.0, 20.0), Vec3::new(0.0, 0.0, -1.0), true);
        let mut ids: Vec<_> = hits.iter().map(|h| h.triangle_index).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        for h in &hits {
            assert_eq!(h.point.z, h.triangle.0[0].z);
        }
    }

    #[test]
    fn pruning_skips_far_leaves() {
        // A row of small triangles along Y; a ray over one end only sees nearby leaves.
        let tris: Vec<Triangle> = (0..32_u32)
            .map(|i| {
                let y = f64::from(i) * 10.0;
                Triangle::from([[0.0, y, 0.0], [1.0, y, 0.0], [0.0, y + 1.0, 0.0]])
            })
            .collect();
        let bvh = Bvh::from_triangles(&tris, 2).unwrap();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let candidates = bvh.candidates(&ray);
        assert!(candidates.contains(&0));
        assert!(candidates.len() < tris.len());

        let hits = bvh.intersect(&ray, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].triangle_index, 0);
    }

    #[test]
    fn accessors_and_debug() {
        let bvh = Bvh::from_triangles(&[flat_up(), flat_up()], 1).unwrap();
        assert_eq!(bvh.vertices().len(), 18);
        assert_eq!(bvh.triangle(1), Some(flat_up()));
        assert_eq!(bvh.triangle(2), None);
        assert_eq!(bvh.max_triangles_per_node(), 1);
        assert_eq!(bvh.leaves().count(), bvh.stats().leaves);
        let total: usize = bvh
            .leaves()
            .map(|(id, _)| bvh.leaf_triangles(id).count())
            .sum();
        assert_eq!(total, 2);
        assert!(format!("{bvh:?}").starts_with("Bvh {"));
    }
}
