// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build-time configuration.

use crate::error::BuildError;

/// Padding applied to every node extent so flat geometry never yields a zero-thickness box.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Default leaf size.
pub const DEFAULT_MAX_TRIANGLES_PER_NODE: usize = 8;

/// Parameters controlling tree construction.
///
/// ```
/// use understory_ray_bvh::BuildConfig;
///
/// let cfg = BuildConfig::default().with_max_triangles_per_node(4);
/// assert!(cfg.validate().is_ok());
/// assert!(cfg.with_max_triangles_per_node(0).validate().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BuildConfig {
    /// Nodes holding more triangles than this are split, when a split exists.
    pub max_triangles_per_node: usize,
    /// Outward padding added to each side of every node extent.
    pub epsilon: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_triangles_per_node: DEFAULT_MAX_TRIANGLES_PER_NODE,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl BuildConfig {
    /// Default configuration with the given leaf size.
    pub fn new(max_triangles_per_node: usize) -> Self {
        Self::default().with_max_triangles_per_node(max_triangles_per_node)
    }

    /// Set the leaf size.
    #[must_use]
    pub fn with_max_triangles_per_node(mut self, n: usize) -> Self {
        self.max_triangles_per_node = n;
        self
    }

    /// Set the extent padding.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.max_triangles_per_node == 0 {
            return Err(BuildError::LeafThreshold);
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(BuildError::Epsilon {
                epsilon: self.epsilon,
            });
        }
        Ok(())
    }
}
