// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking on a terrain-like grid.
//!
//! Build a tree over a bumpy height field, inspect its shape, then pick the
//! nearest triangle under an oblique ray by taking the smallest `t`.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_ray_bvh_demos --example ray_bvh_grid_pick`

use understory_ray_bvh::{BuildConfig, Bvh, Ray, Triangle, Vec3};

fn height(x: usize, y: usize) -> f64 {
    ((x * 7 + y * 13) % 5) as f64
}

fn main() {
    env_logger::init();

    let n = 32;
    let mut tris = Vec::with_capacity(n * n * 2);
    for y in 0..n {
        for x in 0..n {
            let p = |x: usize, y: usize| Vec3::new(x as f64, y as f64, height(x, y));
            let (a, b, c, d) = (p(x, y), p(x + 1, y), p(x + 1, y + 1), p(x, y + 1));
            tris.push(Triangle::new(a, b, c));
            tris.push(Triangle::new(a, c, d));
        }
    }

    let config = BuildConfig::default().with_max_triangles_per_node(4);
    let bvh = match Bvh::from_triangles_with_config(&tris, config) {
        Ok(bvh) => bvh,
        Err(err) => {
            eprintln!("build failed: {err}");
            return;
        }
    };
    let stats = bvh.stats();
    println!(
        "{} triangles -> {} nodes, {} leaves, depth {}",
        bvh.triangle_count(),
        stats.nodes,
        stats.leaves,
        bvh.depth()
    );
    println!(
        "root extents {:?}, bounding sphere radius {:.2}",
        bvh.root().extents(),
        bvh.root().extents().bounding_sphere_radius()
    );

    let ray = Ray::new(Vec3::new(-5.0, 10.5, 20.0), Vec3::new(1.0, 0.25, -1.0));
    let candidates = bvh.candidates(&ray);
    let hits = bvh.intersect(&ray, true);
    println!(
        "{} candidates after pruning, {} front-facing hits",
        candidates.len(),
        hits.len()
    );

    match hits.iter().min_by(|a, b| a.t.total_cmp(&b.t)) {
        Some(nearest) => println!(
            "picked triangle {} at ({:.3}, {:.3}, {:.3}), t = {:.3}",
            nearest.triangle_index, nearest.point.x, nearest.point.y, nearest.point.z, nearest.t
        ),
        None => println!("nothing picked"),
    }
}
