// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: axes, boxes, and triangles.

use crate::vec3::Vec3;

/// Number of scalars a triangle occupies in a flat vertex buffer.
pub const TRIANGLE_STRIDE: usize = 9;

/// A coordinate axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// All axes in tie-break order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    pub(crate) const fn flag(self) -> AxisSet {
        match self {
            Self::X => AxisSet::X,
            Self::Y => AxisSet::Y,
            Self::Z => AxisSet::Z,
        }
    }
}

bitflags::bitflags! {
    /// A set of axes.
    ///
    /// The builder uses this to record which axes failed to produce a
    /// two-sided partition for a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AxisSet: u8 {
        /// The X axis.
        const X = 0b0000_0001;
        /// The Y axis.
        const Y = 0b0000_0010;
        /// The Z axis.
        const Z = 0b0000_0100;
    }
}

impl AxisSet {
    /// Whether `axis` is a member of the set.
    pub fn has(self, axis: Axis) -> bool {
        self.contains(axis.flag())
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3 {
    /// A zero-extent box at the origin.
    pub const ZERO: Self = Self::new(Vec3::ZERO, Vec3::ZERO);

    /// Create a new AABB from min/max corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Center coordinate along one axis.
    pub fn center_on(&self, axis: Axis) -> f64 {
        (self.min[axis] + self.max[axis]) * 0.5
    }

    /// Side lengths of the box.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box outward by `by` on every side.
    pub fn expand(&self, by: f64) -> Self {
        let pad = Vec3::new(by, by, by);
        Self::new(self.min - pad, self.max + pad)
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Whether `other` lies inside this box (boundaries inclusive).
    pub fn contains_box(&self, other: &Self) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
            && other.max.z <= self.max.z
    }

    /// Whether `p` lies inside this box (boundaries inclusive).
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.contains_box(&Self::new(p, p))
    }

    /// Radius of the sphere centered on the box that touches its farthest corner.
    pub fn bounding_sphere_radius(&self) -> f64 {
        let c = self.center();
        let to_min = (c - self.min).length_squared();
        let to_max = (c - self.max).length_squared();
        crate::math::sqrt(to_min.max(to_max))
    }
}

/// A triangle given by three points.
///
/// Winding matters: the front face is the side the normal `(b - a) × (c - a)`
/// points toward.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Triangle(pub [Vec3; 3]);

impl Triangle {
    /// Create a triangle from its three vertices.
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self([a, b, c])
    }

    /// Create a triangle from nine scalars `[ax, ay, az, bx, by, bz, cx, cy, cz]`.
    pub fn from_scalars(s: [f64; TRIANGLE_STRIDE]) -> Self {
        Self::from_slice(&s, 0)
    }

    /// Read the triangle with positional index `index` from a flat vertex buffer.
    ///
    /// Panics if the buffer is too short.
    pub fn from_slice(vertices: &[f64], index: usize) -> Self {
        let base = index * TRIANGLE_STRIDE;
        Self::new(
            Vec3::from_slice(vertices, base),
            Vec3::from_slice(vertices, base + 3),
            Vec3::from_slice(vertices, base + 6),
        )
    }

    /// The three vertices.
    pub const fn vertices(&self) -> [Vec3; 3] {
        self.0
    }

    /// Unnormalized face normal `(b - a) × (c - a)`.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.0;
        (b - a).cross(c - a)
    }

    /// Componentwise bounds of the three vertices.
    pub fn bounds(&self) -> Aabb3 {
        let [a, b, c] = self.0;
        Aabb3::new(a.min(b).min(c), a.max(b).max(c))
    }

    /// Append the nine scalars of this triangle to `out`.
    pub(crate) fn write_to(&self, out: &mut alloc::vec::Vec<f64>) {
        for v in self.0 {
            out.extend_from_slice(&v.to_array());
        }
    }

    /// Barycentric coordinates `[w0, w1, w2]` of `p` projected onto the triangle's plane.
    ///
    /// Returns `None` for degenerate (zero-area) triangles.
    pub fn barycentric(&self, p: Vec3) -> Option<[f64; 3]> {
        let [a, b, c] = self.0;
        let n = self.normal();
        let nn = n.length_squared();
        if nn == 0.0 {
            return None;
        }
        let w1 = (p - a).cross(c - a).dot(n) / nn;
        let w2 = (b - a).cross(p - a).dot(n) / nn;
        Some([1.0 - w1 - w2, w1, w2])
    }
}

impl From<[[f64; 3]; 3]> for Triangle {
    fn from([a, b, c]: [[f64; 3]; 3]) -> Self {
        Self::new(a.into(), b.into(), c.into())
    }
}
