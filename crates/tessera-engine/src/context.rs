//! Engine-wide services shared by every scene.
//!
//! [`EngineContext`] bundles what components reach through
//! [`UpdateCtx`](crate::component::UpdateCtx): the input source, the named
//! resource cache, the seeded random source and the current frame time. The
//! host owns one context and passes it to [`Project::update`](crate::project::Project::update)
//! each frame; there is no global instance.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tessera_core::input::{InputSource, InputState};
use tessera_core::random::Random;
use tessera_core::resources::Resources;

use crate::time::{FrameClock, FrameTime};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed seconds per frame. `None` measures wall-clock time instead.
    pub fixed_dt: Option<f64>,
    /// Upper clamp for wall-clock frame deltas, in seconds.
    pub max_dt: f64,
    /// Seed for the shared random source.
    pub seed: u64,
    /// `tracing` filter directive, e.g. `"tessera_engine=debug"`. `None`
    /// defers to `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: None,
            max_dt: 0.25,
            seed: 0,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    /// 60 Hz fixed step, seed 0. What tests and headless runs use.
    pub fn headless() -> Self {
        Self {
            fixed_dt: Some(1.0 / 60.0),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the frame clock this configuration describes.
    pub fn clock(&self) -> FrameClock {
        match self.fixed_dt {
            Some(dt) => FrameClock::fixed(dt),
            None => FrameClock::wall(Duration::from_secs_f64(self.max_dt.max(0.0))),
        }
    }
}

// ---------------------------------------------------------------------------
// EngineContext
// ---------------------------------------------------------------------------

/// Services available to every component during update.
pub struct EngineContext {
    config: EngineConfig,
    input: Box<dyn InputSource>,
    resources: Resources,
    random: Random,
    time: FrameTime,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            random: Random::new(config.seed),
            input: Box::new(InputState::default()),
            resources: Resources::new(),
            time: FrameTime::default(),
            config,
        }
    }

    /// Context built from [`EngineConfig::headless`].
    pub fn headless() -> Self {
        Self::new(EngineConfig::headless())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn input(&self) -> &dyn InputSource {
        self.input.as_ref()
    }

    /// Replace the input source; hosts typically push a fresh
    /// [`InputState`] snapshot before every frame.
    pub fn set_input(&mut self, input: impl InputSource + 'static) {
        self.input = Box::new(input);
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn random(&self) -> &Random {
        &self.random
    }

    pub fn random_mut(&mut self) -> &mut Random {
        &mut self.random
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    pub fn set_time(&mut self, time: FrameTime) {
        self.time = time;
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
