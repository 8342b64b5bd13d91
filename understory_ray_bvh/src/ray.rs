// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rays and the two geometric tests the traversal is built from.

use crate::types::{Aabb3, Triangle};
use crate::vec3::Vec3;

/// A ray with a precomputed reciprocal direction.
///
/// The direction does not need to be normalized; hit parameters `t` are in units
/// of its length. Zero direction components are fine. NaN components are not,
/// and debug builds assert against them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(
            !origin.is_nan() && !direction.is_nan(),
            "ray origin and direction must not contain NaN"
        );
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    /// Origin of the ray.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Direction of the ray.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Componentwise reciprocal of the direction (signed infinity for zero components).
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Point at parameter `t`: `origin + direction * t`.
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against `aabb`.
    ///
    /// Accepts when the per-axis parameter intervals overlap and the box is not
    /// entirely behind the origin. The entry parameter is not clamped to zero, so
    /// a box that contains the origin passes.
    pub fn hits_box(&self, aabb: &Aabb3) -> bool {
        let o = self.origin;
        let inv = self.inv_direction;
        let (mut t_min, mut t_max) = slab(aabb.min.x, aabb.max.x, o.x, inv.x);

        for (lo, hi) in [
            slab(aabb.min.y, aabb.max.y, o.y, inv.y),
            slab(aabb.min.z, aabb.max.z, o.z, inv.z),
        ] {
            if t_min > hi || lo > t_max {
                return false;
            }
            // An infinite running bound comes from a zero direction component and
            // constrains nothing, so the next axis always replaces it. This tests
            // for infinity, not NaN.
            if lo > t_min || t_min.is_infinite() {
                t_min = lo;
            }
            if hi < t_max || t_max.is_infinite() {
                t_max = hi;
            }
        }

        t_max >= 0.0
    }

    /// Ray/triangle test after Möller and Trumbore.
    ///
    /// Returns the ray parameter `t >= 0` of the crossing. Hits from behind the
    /// triangle (direction along its normal) are rejected when `backface_culling`
    /// is set. Rays parallel to the triangle's plane, including every ray against
    /// a zero-area triangle, never hit.
    pub fn intersect_triangle(&self, triangle: &Triangle, backface_culling: bool) -> Option<f64> {
        let [a, b, c] = triangle.0;
        let d = self.direction;
        let edge1 = b - a;
        let edge2 = c - a;
        let normal = edge1.cross(edge2);

        // With Q = origin - a, solve Q + t*D = b1*E1 + b2*E2 via
        //   |D.N| * b1 = sign(D.N) * D.(Q x E2)
        //   |D.N| * b2 = sign(D.N) * D.(E1 x Q)
        //   |D.N| * t  = -sign(D.N) * Q.N
        let mut d_dot_n = d.dot(normal);
        let sign = if d_dot_n > 0.0 {
            if backface_culling {
                return None;
            }
            1.0
        } else if d_dot_n < 0.0 {
            d_dot_n = -d_dot_n;
            -1.0
        } else {
            return None;
        };

        let diff = self.origin - a;
        let b1 = sign * d.dot(diff.cross(edge2));
        if b1 < 0.0 {
            return None;
        }
        let b2 = sign * d.dot(edge1.cross(diff));
        if b2 < 0.0 {
            return None;
        }
        if b1 + b2 > d_dot_n {
            return None;
        }
        let q_dot_n = -sign * diff.dot(normal);
        if q_dot_n < 0.0 {
            return None;
        }
        Some(q_dot_n / d_dot_n)
    }
}

/// Entry/exit parameters of one axis slab.
#[inline]
fn slab(min: f64, max: f64, origin: f64, inv: f64) -> (f64, f64) {
    if inv >= 0.0 {
        ((min - origin) * inv, (max - origin) * inv)
    } else {
        ((max - origin) * inv, (min - origin) * inv)
    }
}
