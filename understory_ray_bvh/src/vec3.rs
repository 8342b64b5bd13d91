// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-component `f64` vector used for points, directions, and extents.
//!
//! Two styles are supported side by side:
//!
//! - Value style via the operator impls (`a - b`, `v * s`) and [`Vec3::cross`],
//!   which is what most call sites in this crate use.
//! - Mutating style ([`Vec3::set`], [`Vec3::sub_vectors`], [`Vec3::cross_vectors`],
//!   [`Vec3::cross_assign`], [`Vec3::set_from_slice`]) for callers that reuse a
//!   small set of scratch vectors in tight loops.
//!
//! No operation checks its inputs. Infinite and NaN components propagate.

use core::ops::{Add, AddAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::types::Axis;

/// A 3D vector (or point) with `f64` components.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a vector from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a vector from up to three leading scalars.
    ///
    /// Missing trailing components default to zero; anything past the third
    /// scalar is ignored.
    ///
    /// ```
    /// use understory_ray_bvh::Vec3;
    ///
    /// assert_eq!(Vec3::from_scalars(&[1.0]), Vec3::new(1.0, 0.0, 0.0));
    /// assert_eq!(Vec3::from_scalars(&[1.0, 2.0]), Vec3::new(1.0, 2.0, 0.0));
    /// ```
    pub fn from_scalars(scalars: &[f64]) -> Self {
        let get = |i: usize| scalars.get(i).copied().unwrap_or(0.0);
        Self::new(get(0), get(1), get(2))
    }

    /// Read three consecutive scalars starting at `offset`.
    ///
    /// Panics if `offset + 3 > buffer.len()`.
    pub fn from_slice(buffer: &[f64], offset: usize) -> Self {
        Self::new(buffer[offset], buffer[offset + 1], buffer[offset + 2])
    }

    /// Overwrite all three components.
    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Overwrite this vector with three consecutive scalars starting at `offset`.
    pub fn set_from_slice(&mut self, buffer: &[f64], offset: usize) -> &mut Self {
        *self = Self::from_slice(buffer, offset);
        self
    }

    /// Set this vector to `a - b`.
    pub fn sub_vectors(&mut self, a: Self, b: Self) -> &mut Self {
        *self = a - b;
        self
    }

    /// Set this vector to `a × b`.
    pub fn cross_vectors(&mut self, a: Self, b: Self) -> &mut Self {
        *self = a.cross(b);
        self
    }

    /// Replace this vector with `self × rhs`.
    pub fn cross_assign(&mut self, rhs: Self) -> &mut Self {
        *self = self.cross(rhs);
        self
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Cross product `self × rhs`.
    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Componentwise reciprocal.
    ///
    /// A zero component yields a signed infinity, which the slab test relies on.
    #[inline]
    pub fn recip(self) -> Self {
        Self::new(1.0 / self.x, 1.0 / self.y, 1.0 / self.z)
    }

    /// Componentwise minimum.
    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    /// Componentwise maximum.
    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        crate::math::sqrt(self.length_squared())
    }

    /// Whether any component is NaN.
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Components as an array.
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Index<Axis> for Vec3 {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl MulAssign<f64> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, s: f64) {
        *self = *self * s;
    }
}

impl Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
