// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_ray_bvh::{BuildConfig, Bvh, Ray, Vec3};

/// A flat `n` x `n` height field in the z = 0 plane, two triangles per cell.
fn gen_grid_mesh(n: usize, cell: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(n * n * 18);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            let (x1, y1) = (x0 + cell, y0 + cell);
            out.extend_from_slice(&[x0, y0, 0.0, x1, y0, 0.0, x1, y1, 0.0]);
            out.extend_from_slice(&[x0, y0, 0.0, x1, y1, 0.0, x0, y1, 0.0]);
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Small random triangles scattered through a `span`-sized cube.
fn gen_random_soup(count: usize, span: f64, size: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(count * 9);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let base = [
            rng.next_f64() * span,
            rng.next_f64() * span,
            rng.next_f64() * span,
        ];
        for _ in 0..3 {
            for b in base {
                out.push(b + (rng.next_f64() - 0.5) * size);
            }
        }
    }
    out
}

/// Many triangles stacked at a handful of positions; exercises the unsplittable path.
fn gen_coincident_stacks(stacks: usize, per_stack: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(stacks * per_stack * 9);
    for s in 0..stacks {
        let x = s as f64 * 10.0;
        for _ in 0..per_stack {
            out.extend_from_slice(&[x, 0.0, 0.0, x + 1.0, 0.0, 0.0, x, 1.0, 0.0]);
        }
    }
    out
}

fn gen_down_rays(count: usize, extent: f64) -> Vec<Ray> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| {
            Ray::new(
                Vec3::new(rng.next_f64() * extent, rng.next_f64() * extent, 100.0),
                Vec3::new(0.0, 0.0, -1.0),
            )
        })
        .collect()
}

fn gen_oblique_rays(count: usize, span: f64) -> Vec<Ray> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    (0..count)
        .map(|_| {
            let origin = Vec3::new(-span * 0.1, rng.next_f64() * span, rng.next_f64() * span);
            let direction = Vec3::new(1.0, rng.next_f64() - 0.5, rng.next_f64() - 0.5);
            Ray::new(origin, direction)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[32usize, 64, 128] {
        let mesh = gen_grid_mesh(n, 10.0);
        group.throughput(Throughput::Elements((n * n * 2) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter_batched(
                || mesh.clone(),
                |v| black_box(Bvh::from_vertices(v, 8).unwrap()),
                BatchSize::LargeInput,
            )
        });
    }
    for &max in &[1usize, 4, 16] {
        let soup = gen_random_soup(20_000, 1000.0, 4.0);
        group.bench_function(format!("random_soup_max{}", max), |b| {
            b.iter_batched(
                || soup.clone(),
                |v| black_box(Bvh::from_vertices(v, max).unwrap()),
                BatchSize::LargeInput,
            )
        });
    }
    let stacks = gen_coincident_stacks(64, 256);
    group.bench_function("coincident_stacks", |b| {
        b.iter_batched(
            || stacks.clone(),
            |v| black_box(Bvh::from_vertices(v, 4).unwrap()),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let n = 128;
    let grid = Bvh::from_vertices(gen_grid_mesh(n, 10.0), 8).unwrap();
    let down = gen_down_rays(1024, n as f64 * 10.0);
    group.throughput(Throughput::Elements(down.len() as u64));
    for culling in [false, true] {
        group.bench_function(format!("grid_down_culling_{}", culling), |b| {
            b.iter(|| {
                let hits: usize = down.iter().map(|r| grid.intersect(r, culling).len()).sum();
                black_box(hits);
            })
        });
    }
    group.bench_function("grid_down_candidates", |b| {
        b.iter(|| {
            let n: usize = down.iter().map(|r| grid.candidates(r).len()).sum();
            black_box(n);
        })
    });

    let soup = gen_random_soup(20_000, 1000.0, 4.0);
    let oblique = gen_oblique_rays(1024, 1000.0);
    for &max in &[1usize, 4, 16] {
        let bvh = Bvh::from_vertices_with_config(
            soup.clone(),
            BuildConfig::default().with_max_triangles_per_node(max),
        )
        .unwrap();
        group.bench_function(format!("random_soup_oblique_max{}", max), |b| {
            b.iter(|| {
                let hits: usize = oblique.iter().map(|r| bvh.intersect(r, false).len()).sum();
                black_box(hits);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
