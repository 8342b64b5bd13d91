// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float helpers whose implementation depends on the `std`/`libm` features.

#[cfg(feature = "std")]
#[inline]
pub(crate) fn sqrt(v: f64) -> f64 {
    v.sqrt()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
#[inline]
pub(crate) fn sqrt(v: f64) -> f64 {
    libm::sqrt(v)
}

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("understory_ray_bvh requires either the `std` or `libm` feature");
