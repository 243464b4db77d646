//! Integration tests for render collection and ordering.

use tessera_engine::prelude::*;

/// Circles are told apart by radius.
fn radii(surface: &RecordingSurface) -> Vec<f32> {
    surface
        .last_frame()
        .into_iter()
        .filter_map(|cmd| match cmd {
            DrawCmd::Circle { radius, .. } => Some(*radius),
            _ => None,
        })
        .collect()
}

fn frame(project: &mut Project, surface: &mut RecordingSurface) -> RenderStats {
    let engine = EngineContext::headless();
    project.update(&engine);
    project.render(surface)
}

fn setup() -> Project {
    let mut project = Project::new("render");
    project.create_scene_and_load("main").unwrap();
    project
}

fn scene(project: &mut Project) -> &mut Scene {
    project.active_scene_mut().unwrap()
}

#[test]
fn lower_z_draws_first() {
    let mut project = setup();
    let s = scene(&mut project);
    for (r, z) in [(1.0, 5), (2.0, -1), (3.0, 0)] {
        let obj = s.create_object("dot");
        s.add_component(obj, ShapeRenderer::circle(r, Color::WHITE).with_z(z))
            .unwrap();
    }
    let mut surface = RecordingSurface::new();
    frame(&mut project, &mut surface);
    assert_eq!(radii(&surface), vec![2.0, 3.0, 1.0]);
}

#[test]
fn overlay_always_draws_after_base() {
    let mut project = setup();
    let s = scene(&mut project);
    let hud = s.create_object("hud");
    s.add_component(hud, TextLabel::new("score").with_z(-100)).unwrap();
    let world = s.create_object("world");
    s.add_component(world, ShapeRenderer::circle(1.0, Color::WHITE).with_z(100))
        .unwrap();

    let mut surface = RecordingSurface::new();
    frame(&mut project, &mut surface);
    let last = surface.last_frame();
    assert!(matches!(last[0], DrawCmd::Circle { .. }));
    assert!(matches!(last[1], DrawCmd::Text { .. }));
}

#[test]
fn equal_z_keeps_traversal_order() {
    let mut project = setup();
    let s = scene(&mut project);
    let first = s.create_object("first");
    let child = s.create_child(first, "child").unwrap();
    let second = s.create_object("second");
    for (id, r) in [(second, 3.0), (child, 2.0), (first, 1.0)] {
        s.add_component(id, ShapeRenderer::circle(r, Color::WHITE)).unwrap();
    }
    let mut surface = RecordingSurface::new();
    frame(&mut project, &mut surface);
    assert_eq!(radii(&surface), vec![1.0, 2.0, 3.0]);
}

#[test]
fn hidden_disabled_and_removed_are_skipped() {
    let mut project = setup();
    let s = scene(&mut project);
    let parent = s.create_object("parent");
    let child = s.create_child(parent, "child").unwrap();
    s.add_component(child, ShapeRenderer::circle(1.0, Color::WHITE)).unwrap();
    let hidden = s.create_object("hidden");
    let mut shape = ShapeRenderer::circle(2.0, Color::WHITE);
    shape.visible = false;
    s.add_component(hidden, shape).unwrap();
    let removed = s.create_object("removed");
    let h = s
        .add_component(removed, ShapeRenderer::circle(3.0, Color::WHITE))
        .unwrap();
    let off = s.create_object("off");
    let h_off = s
        .add_component(off, ShapeRenderer::circle(4.0, Color::WHITE))
        .unwrap();
    let kept = s.create_object("kept");
    s.add_component(kept, ShapeRenderer::circle(5.0, Color::WHITE)).unwrap();

    s.set_enabled(parent, false).unwrap();
    s.remove_component(h);
    s.set_component_enabled(h_off, false).unwrap();

    let mut surface = RecordingSurface::new();
    let stats = frame(&mut project, &mut surface);
    assert_eq!(radii(&surface), vec![5.0]);
    assert_eq!(stats.drawn, 1);
}

#[test]
fn manual_renderables_draw_only_when_enqueued() {
    let mut project = setup();
    let s = scene(&mut project);
    let obj = s.create_object("flash");
    let h = s
        .add_component(obj, ShapeRenderer::circle(7.0, Color::WHITE).manual())
        .unwrap();

    let mut surface = RecordingSurface::new();
    frame(&mut project, &mut surface);
    assert!(radii(&surface).is_empty());

    assert!(scene(&mut project).enqueue_render(h));
    assert!(scene(&mut project).enqueue_render(h));
    let stats = frame(&mut project, &mut surface);
    assert_eq!(radii(&surface), vec![7.0]);
    assert_eq!(stats.explicit, 1);

    frame(&mut project, &mut surface);
    assert!(radii(&surface).is_empty());
}

#[test]
fn enqueued_from_update_hook() {
    let mut project = setup();
    let s = scene(&mut project);
    let obj = s.create_object("blinker");
    let h = s
        .add_component(obj, ShapeRenderer::circle(2.0, Color::WHITE).manual())
        .unwrap();
    s.add_component(
        obj,
        Script::new(move |ctx| {
            if ctx.time().frame_index % 2 == 0 {
                ctx.scene_mut().enqueue_render(h);
            }
        }),
    )
    .unwrap();

    let mut frames = FrameLoop::new(project, EngineConfig::headless());
    let mut surface = RecordingSurface::new();
    let drawn = frames.run_frames(4, &mut surface);
    assert_eq!(drawn, 2);
}

#[test]
fn draws_use_world_transform() {
    let mut project = setup();
    let s = scene(&mut project);
    let parent = s.create_object("parent");
    let child = s.create_child(parent, "child").unwrap();
    s.get_mut(parent).unwrap().set_local_position(Vec2::new(10.0, 10.0));
    s.get_mut(child).unwrap().set_local_position(Vec2::new(5.0, 5.0));
    s.add_component(child, ShapeRenderer::rect(Vec2::ONE, Color::WHITE)).unwrap();

    let mut surface = RecordingSurface::new();
    frame(&mut project, &mut surface);
    let draws = surface.last_frame();
    match draws.as_slice() {
        [DrawCmd::Rect { center, .. }] => assert_eq!(*center, Vec2::new(15.0, 15.0)),
        other => panic!("unexpected draws: {other:?}"),
    }
}

#[test]
fn each_entry_draws_exactly_once() {
    let mut project = setup();
    let s = scene(&mut project);
    let obj = s.create_object("multi");
    s.add_component(obj, ShapeRenderer::circle(1.0, Color::WHITE)).unwrap();
    s.add_component(obj, ShapeRenderer::circle(2.0, Color::WHITE)).unwrap();
    let mut surface = RecordingSurface::new();
    let stats = frame(&mut project, &mut surface);
    assert_eq!(stats.collected, 2);
    assert_eq!(stats.drawn, 2);
    assert_eq!(radii(&surface), vec![1.0, 2.0]);
    assert_eq!(project.render_queue().len(), 2);
}
