//! Render queue and scene update benchmarks.
//!
//! Measures the per-frame cost of collecting and sorting renderables and of
//! a full update + render pass over scenes of increasing size. Objects are
//! arranged as shallow trees (one root per 10 objects) with pseudo-random
//! z-offsets so the sort has real work to do.
//!
//! Run with: `cargo bench --bench render_queue_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tessera_engine::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A null surface so the benchmark measures ordering, not recording.
struct CountingSurface {
    draws: u64,
}

impl Surface for CountingSurface {
    fn clear(&mut self, _color: Color) {}

    fn submit(&mut self, _cmd: DrawCmd) {
        self.draws += 1;
    }

    fn display(&mut self) {}
}

fn build_project(object_count: usize) -> Project {
    let random = Random::new(7);
    let mut project = Project::new("bench");
    let scene = project
        .create_scene_and_load("main")
        .unwrap();
    let mut root = None;
    for i in 0..object_count {
        let id = match root {
            Some(parent) if i % 10 != 0 => scene.create_child(parent, "leaf").unwrap(),
            _ => {
                let r = scene.create_object("root");
                root = Some(r);
                r
            }
        };
        let shape = ShapeRenderer::circle(1.0, Color::WHITE).with_z(random.range(-50, 50));
        scene.add_component(id, shape).unwrap();
        if i % 3 == 0 {
            scene
                .add_component(id, Script::new(|ctx| {
                    black_box(ctx.time().dt);
                })
                .labeled("noop"))
                .unwrap();
        }
    }
    project
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_render_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_pass");
    for count in [100usize, 1_000, 10_000] {
        let mut project = build_project(count);
        let engine = EngineContext::headless();
        project.update(&engine);
        let mut surface = CountingSurface { draws: 0 };
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &_count| {
            b.iter(|| black_box(project.render(&mut surface)));
        });
    }
    group.finish();
}

fn bench_update_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_pass");
    for count in [100usize, 1_000, 10_000] {
        let mut project = build_project(count);
        let engine = EngineContext::headless();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &_count| {
            b.iter(|| black_box(project.update(&engine)));
        });
    }
    group.finish();
}

fn bench_full_frame_1k(c: &mut Criterion) {
    let mut frames = FrameLoop::new(build_project(1_000), EngineConfig::headless());
    let mut surface = CountingSurface { draws: 0 };
    c.bench_function("full_frame_1k", |b| {
        b.iter(|| black_box(frames.frame(&mut surface).render.drawn));
    });
}

// ---------------------------------------------------------------------------
// Criterion groups and main
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_render_pass,
    bench_update_pass,
    bench_full_frame_1k
);
criterion_main!(benches);
