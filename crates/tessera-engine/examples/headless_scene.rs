//! Headless demo -- a menu scene with a clickable button that switches to a
//! game scene, driven for a fixed number of frames against a recording
//! surface.
//!
//! Run with:
//!   RUST_LOG=tessera_engine=debug cargo run --example headless_scene -p tessera-engine

use anyhow::Context as _;
use tessera_engine::prelude::*;

const FRAMES: u64 = 120;
const CLICK_FRAME: u64 = 10;
const PLANET_COLORS: [Color; 3] = [
    Color::rgb(0.9, 0.3, 0.2),
    Color::rgb(0.2, 0.8, 0.3),
    Color::rgb(0.2, 0.4, 0.9),
];

fn build_menu(project: &mut Project) -> anyhow::Result<()> {
    let menu = project.create_scene("menu")?;
    menu.set_background(Color::rgb(0.1, 0.1, 0.2));

    let button = menu.create_object("start_button");
    menu.add_component(
        button,
        ShapeRenderer::rect(Vec2::new(120.0, 40.0), Color::rgb(0.3, 0.6, 0.3)),
    )?;
    menu.add_component(button, TextLabel::new("Start").with_size(20.0))?;

    let mut trigger = Trigger::centered(Vec2::new(120.0, 40.0));
    trigger.subscribe(|ctx, event| {
        if event == TriggerEvent::Click(MouseButton::Left) {
            tracing::info!("start pressed");
            ctx.load_scene("game");
        }
    });
    menu.add_component(button, trigger)?;
    Ok(())
}

fn build_game(project: &mut Project) -> anyhow::Result<()> {
    let game = project.create_scene("game")?;

    let pivot = game.create_object("pivot");
    game.add_component(
        pivot,
        Script::new(|ctx| {
            let dt = ctx.time().dt;
            let owner = ctx.owner();
            if let Some(go) = ctx.scene_mut().get_mut(owner) {
                let angle = go.local_rotation() + dt;
                go.set_local_rotation(angle);
            }
        })
        .labeled("spin"),
    )?;

    for (i, color) in PLANET_COLORS.into_iter().enumerate() {
        let planet = game.create_child(pivot, "planet")?;
        game.get_mut(planet)
            .context("planet was just created")?
            .set_local_position(Vec2::new(40.0 * (i + 1) as f32, 0.0));
        game.add_component(planet, ShapeRenderer::circle(8.0, color).with_z(i as i32))?;
    }

    let hud = game.create_object("hud");
    game.add_component(hud, TextLabel::new("score: 0"))?;
    game.add_component(
        hud,
        Script::new(|ctx| {
            let seconds = ctx.time().elapsed;
            if seconds > 1.0 {
                ctx.destroy_owner();
            }
        })
        .labeled("hud_timer"),
    )?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::headless().with_seed(42);
    init_tracing(config.log_filter.as_deref());

    let mut project = Project::new("headless-demo");
    build_menu(&mut project)?;
    build_game(&mut project)?;
    project.load_scene("menu")?;

    let mut frames = FrameLoop::new(project, config);
    let mut surface = RecordingSurface::new();
    let mut draws = 0;

    for frame in 0..FRAMES {
        let mut input = InputState::new();
        if frame == CLICK_FRAME {
            input.press(MouseButton::Left);
        }
        frames.context_mut().set_input(input);

        let diagnostics = frames.frame(&mut surface);
        draws += diagnostics.render.drawn;
        if let Some(scene) = &diagnostics.report.activated {
            println!("frame {frame}: switched to '{scene}'");
        }
    }

    let project = frames.into_project();
    println!(
        "{} frames, {} draws, active scene '{}'",
        FRAMES,
        draws,
        project.active_scene_name().unwrap_or("<none>")
    );

    let scene = project.active_scene().context("no active scene")?;
    let outline = serde_json::to_string_pretty(&scene.outline())?;
    println!("{outline}");
    Ok(())
}
