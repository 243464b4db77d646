//! Integration tests for object and component lifecycle within a scene.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_engine::prelude::*;

type Log = Rc<RefCell<Vec<String>>>;

fn logger(log: &Log, label: &'static str) -> Script {
    let on_start = Rc::clone(log);
    let on_update = Rc::clone(log);
    Script::new(move |_ctx| on_update.borrow_mut().push(format!("update:{label}")))
        .with_start(move |_ctx| on_start.borrow_mut().push(format!("start:{label}")))
}

fn project_with_scene() -> Project {
    let mut project = Project::new("lifecycle");
    project.create_scene_and_load("main").unwrap();
    project
}

fn scene(project: &mut Project) -> &mut Scene {
    project.active_scene_mut().unwrap()
}

#[test]
fn start_runs_exactly_once_across_frames() {
    let log = Log::default();
    let engine = EngineContext::headless();
    let mut project = project_with_scene();
    let s = scene(&mut project);
    let obj = s.create_object("obj");
    s.add_component(obj, logger(&log, "a")).unwrap();

    for _ in 0..3 {
        project.update(&engine);
    }
    assert_eq!(
        *log.borrow(),
        vec!["start:a", "update:a", "update:a", "update:a"]
    );
}

#[test]
fn component_added_mid_frame_starts_next_frame() {
    let log = Log::default();
    let engine = EngineContext::headless();
    let mut project = project_with_scene();
    let s = scene(&mut project);
    let spawner = s.create_object("spawner");
    let sink = Rc::clone(&log);
    let mut spawned = false;
    s.add_component(
        spawner,
        Script::new(move |ctx| {
            if !spawned {
                spawned = true;
                let owner = ctx.owner();
                ctx.scene_mut()
                    .add_component(owner, logger(&sink, "late"))
                    .unwrap();
            }
        }),
    )
    .unwrap();

    project.update(&engine);
    assert!(log.borrow().is_empty());
    project.update(&engine);
    assert_eq!(*log.borrow(), vec!["start:late", "update:late"]);
}

#[test]
fn destroyed_object_is_gone_from_lookup_and_released_next_update() {
    let engine = EngineContext::headless();
    let mut project = project_with_scene();
    let s = scene(&mut project);
    let target = s.create_object("target");
    let killer = s.create_object("killer");
    s.add_component(
        killer,
        Script::new(move |ctx| {
            if let Some(id) = ctx.scene().get_game_object("target") {
                ctx.scene_mut().destroy_object(id);
            }
        }),
    )
    .unwrap();

    project.update(&engine);
    let s = scene(&mut project);
    assert_eq!(s.get_game_object("target"), None);
    assert!(!s.is_alive(target));
    assert!(s.get(target).is_some(), "memory is released at the next update");

    project.update(&engine);
    assert!(scene(&mut project).get(target).is_none());
}

#[test]
fn self_destroying_component_finishes_its_frame() {
    let log = Log::default();
    let engine = EngineContext::headless();
    let mut project = project_with_scene();
    let s = scene(&mut project);
    let first = s.create_object("first");
    let second = s.create_object("second");
    s.add_component(first, Script::new(|ctx| {
        ctx.destroy_owner();
    }))
    .unwrap();
    s.add_component(first, logger(&log, "first-sibling")).unwrap();
    s.add_component(second, logger(&log, "second")).unwrap();

    project.update(&engine);
    // The sibling on the destroyed object no longer ticks; the other object does.
    assert_eq!(
        *log.borrow(),
        vec!["start:first-sibling", "start:second", "update:second"]
    );
    project.update(&engine);
    let s = scene(&mut project);
    assert!(s.get(first).is_none());
    assert!(s.is_alive(second));
}

#[test]
fn disabled_parent_suspends_children_until_reenabled() {
    let log = Log::default();
    let engine = EngineContext::headless();
    let mut project = project_with_scene();
    let s = scene(&mut project);
    let parent = s.create_object("parent");
    let child = s.create_child(parent, "child").unwrap();
    s.add_component(child, logger(&log, "child")).unwrap();

    project.update(&engine);
    scene(&mut project).set_enabled(parent, false).unwrap();
    project.update(&engine);
    project.update(&engine);
    assert_eq!(*log.borrow(), vec!["start:child", "update:child"]);

    scene(&mut project).set_enabled(parent, true).unwrap();
    project.update(&engine);
    assert_eq!(
        *log.borrow(),
        vec!["start:child", "update:child", "update:child"]
    );
}

#[test]
fn component_lookup_by_handle_and_type() {
    let mut project = project_with_scene();
    let s = scene(&mut project);
    let obj = s.create_object("obj");
    let h = s
        .add_component(obj, ShapeRenderer::circle(1.0, Color::WHITE))
        .unwrap();
    assert!(s.component::<ShapeRenderer>(h).is_some());
    assert!(s.component::<TextLabel>(h).is_none());

    s.component_mut::<ShapeRenderer>(h).unwrap().z_offset = 4;
    assert_eq!(
        s.get(obj).unwrap().get_component::<ShapeRenderer>().unwrap().z_offset,
        4
    );

    s.set_component_property(h, "visible", PropertyValue::Bool(false))
        .unwrap();
    assert!(!s.component::<ShapeRenderer>(h).unwrap().visible);

    let err = s
        .set_component_property(h, "visible", PropertyValue::Int(1))
        .unwrap_err();
    assert!(matches!(err, EngineError::Property(CoreError::TypeMismatch { .. })));

    assert!(s.remove_component(h));
    assert!(matches!(
        s.inspect_component(h),
        Err(EngineError::DeadComponent { .. })
    ));
}

#[test]
fn components_reach_engine_services() {
    let engine = {
        let mut engine = EngineContext::new(EngineConfig::headless().with_seed(9));
        engine.resources_mut().insert("greeting", String::from("hello"));
        engine
    };
    let seen = Rc::new(RefCell::new(None::<(String, i32)>));
    let mut project = project_with_scene();
    let s = scene(&mut project);
    let obj = s.create_object("obj");
    let sink = Rc::clone(&seen);
    s.add_component(
        obj,
        Script::on_start(move |ctx| {
            let greeting = ctx
                .resources()
                .get::<String>("greeting")
                .map(|h| h.get().clone())
                .unwrap_or_default();
            *sink.borrow_mut() = Some((greeting, ctx.random().range(0, 10)));
        }),
    )
    .unwrap();

    project.update(&engine);
    let (greeting, roll) = seen.borrow().clone().unwrap();
    assert_eq!(greeting, "hello");
    assert!((0..10).contains(&roll));
    assert_eq!(engine.resources().access_count("greeting"), Some(1));
}
