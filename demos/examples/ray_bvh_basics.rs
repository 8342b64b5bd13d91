// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray BVH basics.
//!
//! Build a tree over two overlapping triangles and shoot a ray straight down
//! through the part only the larger one covers.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_ray_bvh_demos --example ray_bvh_basics`

use understory_ray_bvh::{Bvh, Vec3};

fn main() {
    env_logger::init();

    let vertices = vec![
        0.0, 0.0, 0.0, 1000.0, 0.0, 0.0, 1000.0, 1000.0, 0.0, //
        0.0, 0.0, 0.0, 2000.0, 0.0, 0.0, 2000.0, 1000.0, 0.0,
    ];
    let bvh = match Bvh::from_vertices(vertices, 7) {
        Ok(bvh) => bvh,
        Err(err) => {
            eprintln!("build failed: {err}");
            return;
        }
    };
    println!("{bvh:?}");

    let origin = Vec3::new(1500.0, 3.0, 1000.0);
    let direction = Vec3::new(0.0, 0.0, -1.0);
    let hits = bvh.intersect_ray(origin, direction, true);
    for hit in &hits {
        println!(
            "hit triangle {} at ({}, {}, {}), t = {}",
            hit.triangle_index, hit.point.x, hit.point.y, hit.point.z, hit.t
        );
    }
    assert_eq!(hits.len(), 1, "only the larger triangle lies under the ray");
    assert_eq!(hits[0].triangle_index, 1);

    // From below, both triangles face away from the ray.
    let below = Vec3::new(500.0, 3.0, -10.0);
    let up = Vec3::new(0.0, 0.0, 1.0);
    let from_below = bvh.intersect_ray(below, up, true);
    println!("hits from below with culling: {}", from_below.len());
    assert!(from_below.is_empty());
    let both = bvh.intersect_ray(below, up, false);
    println!("hits from below without culling: {}", both.len());
}
