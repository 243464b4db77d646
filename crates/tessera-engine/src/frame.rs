//! The frame loop: clock, update, render.
//!
//! [`FrameLoop`] owns a [`Project`], the [`EngineContext`] and a
//! [`FrameClock`]. Each call to [`FrameLoop::frame`]:
//!
//! 1. advances the clock and publishes the new [`FrameTime`] to the context;
//! 2. runs [`Project::update`];
//! 3. runs [`Project::render`] against the host's surface.
//!
//! The host decides how often to call it. A window host calls it once per
//! redraw; a headless run calls [`FrameLoop::run_frames`].
//!
//! # Example
//!
//! ```
//! use tessera_engine::prelude::*;
//!
//! let mut project = Project::new("demo");
//! let scene = project.create_scene_and_load("main").unwrap();
//! let ball = scene.create_object("ball");
//! scene.add_component(ball, ShapeRenderer::circle(4.0, Color::WHITE)).unwrap();
//!
//! let mut frames = FrameLoop::new(project, EngineConfig::headless());
//! let mut surface = RecordingSurface::new();
//! frames.run_frames(3, &mut surface);
//!
//! assert_eq!(frames.frame_count(), 3);
//! assert_eq!(surface.frames(), 3);
//! assert_eq!(surface.last_frame().len(), 1);
//! ```

use std::time::{Duration, Instant};

use tessera_core::surface::Surface;

use crate::context::{EngineConfig, EngineContext};
use crate::project::{FrameReport, Project};
use crate::render::RenderStats;
use crate::time::{FrameClock, FrameTime};

// ---------------------------------------------------------------------------
// FrameDiagnostics
// ---------------------------------------------------------------------------

/// Timing and counters for the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    pub time: FrameTime,
    /// Wall-clock time spent in [`Project::update`].
    pub update_time: Duration,
    /// Wall-clock time spent in [`Project::render`].
    pub render_time: Duration,
    /// Whole frame, update plus render.
    pub total_time: Duration,
    pub report: FrameReport,
    pub render: RenderStats,
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// Drives a project one frame at a time.
pub struct FrameLoop {
    project: Project,
    context: EngineContext,
    clock: FrameClock,
    frames: u64,
    last_diagnostics: FrameDiagnostics,
}

impl FrameLoop {
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is set but not positive and finite.
    pub fn new(project: Project, config: EngineConfig) -> Self {
        let clock = config.clock();
        Self {
            project,
            context: EngineContext::new(config),
            clock,
            frames: 0,
            last_diagnostics: FrameDiagnostics::default(),
        }
    }

    /// Run one frame and return its diagnostics.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> &FrameDiagnostics {
        let frame_start = Instant::now();
        let time = self.clock.tick();
        self.context.set_time(time);

        let update_start = Instant::now();
        let report = self.project.update(&self.context);
        let update_time = update_start.elapsed();

        let render_start = Instant::now();
        let render = self.project.render(surface);
        let render_time = render_start.elapsed();

        self.frames += 1;
        self.last_diagnostics = FrameDiagnostics {
            time,
            update_time,
            render_time,
            total_time: frame_start.elapsed(),
            report,
            render,
        };
        &self.last_diagnostics
    }

    /// Run `count` frames. Returns the total number of draw hooks invoked.
    pub fn run_frames(&mut self, count: u64, surface: &mut dyn Surface) -> u64 {
        let mut drawn = 0u64;
        for _ in 0..count {
            drawn += self.frame(surface).render.drawn as u64;
        }
        drawn
    }

    // -- accessors ------------------------------------------------------------

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Mutable access to the project, for setup between frames.
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Mutable access to shared services, e.g. to push fresh input.
    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }

    pub fn into_project(self) -> Project {
        self.project
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
