//! The scene registry and per-frame driver.
//!
//! A [`Project`] owns every [`Scene`] by unique name and tracks which one is
//! active. Each [`Project::update`] runs three steps, in order:
//!
//! 1. apply queued scene destroys, then release every scene that is
//!    pending destruction;
//! 2. apply the winning queued scene load;
//! 3. update the active scene.
//!
//! Before the first update, [`Project::load_scene`] switches immediately so
//! setup code can pick a starting scene; once the loop is running, loads are
//! queued and only the last request before the next update takes effect.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tessera_core::surface::Surface;
use tracing::{debug, info, warn};

use crate::command::SceneCommandBuffer;
use crate::context::EngineContext;
use crate::render::{RenderQueue, RenderStats};
use crate::scene::{Scene, SceneState, UpdateStats};
use crate::EngineError;

/// What happened during one [`Project::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Scenes released in step 1, in release order.
    pub released: Vec<String>,
    /// Scene that became active in step 2, if the active scene changed.
    pub activated: Option<String>,
    /// Queued requests that named a missing or dying scene.
    pub rejected: usize,
    /// Counters from the active scene's update.
    pub update: UpdateStats,
}

/// Owns scenes and drives the active one.
#[derive(Debug)]
pub struct Project {
    name: String,
    scenes: BTreeMap<String, Scene>,
    active: Option<String>,
    commands: SceneCommandBuffer,
    running: bool,
    frames: u64,
    queue: RenderQueue,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenes: BTreeMap::new(),
            active: None,
            commands: SceneCommandBuffer::new(),
            running: false,
            frames: 0,
            queue: RenderQueue::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` once the first update has run.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of updates run.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    // -- registry -------------------------------------------------------------

    /// Create an empty scene. Names are unique within a project.
    pub fn create_scene(&mut self, name: &str) -> Result<&mut Scene, EngineError> {
        match self.scenes.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(EngineError::DuplicateScene {
                name: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                debug!(scene = name, "scene created");
                Ok(slot.insert(Scene::new(name)))
            }
        }
    }

    /// Create a scene and load it.
    pub fn create_scene_and_load(&mut self, name: &str) -> Result<&mut Scene, EngineError> {
        self.create_scene(name)?;
        self.load_scene(name)?;
        self.scenes
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownScene {
                name: name.to_owned(),
            })
    }

    pub fn get_scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn get_scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    /// Registered scene names, sorted.
    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The active scene. A scene marked for destruction stays active until
    /// the next update releases it.
    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.as_deref().and_then(|n| self.scenes.get(n))
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.active.as_deref().and_then(|n| self.scenes.get_mut(n))
    }

    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    // -- scene requests -------------------------------------------------------

    /// Make `name` the active scene.
    ///
    /// Applied immediately before the first update, queued afterwards.
    pub fn load_scene(&mut self, name: &str) -> Result<(), EngineError> {
        let scene = self.scenes.get(name).ok_or_else(|| EngineError::UnknownScene {
            name: name.to_owned(),
        })?;
        if !scene.state().is_live() {
            return Err(EngineError::SceneUnavailable {
                name: name.to_owned(),
            });
        }
        if self.running {
            self.commands.load(name);
            Ok(())
        } else {
            self.switch_to(name).map(|_| ())
        }
    }

    /// Mark `name` pending-destroy. It is released at the start of the next
    /// update; if it is the active scene it stays active until then.
    /// Returns `Ok(false)` if it was already marked.
    pub fn destroy_scene(&mut self, name: &str) -> Result<bool, EngineError> {
        let scene = self
            .scenes
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownScene {
                name: name.to_owned(),
            })?;
        Ok(scene.destroy())
    }

    /// The load that will take effect at the next update, if any.
    pub fn pending_load(&self) -> Option<&str> {
        self.commands.pending_load()
    }

    fn switch_to(&mut self, name: &str) -> Result<bool, EngineError> {
        match self.scenes.get(name) {
            None => {
                return Err(EngineError::UnknownScene {
                    name: name.to_owned(),
                })
            }
            Some(scene) if !scene.state().is_live() => {
                return Err(EngineError::SceneUnavailable {
                    name: name.to_owned(),
                })
            }
            Some(_) => {}
        }
        if self.active.as_deref() == Some(name) {
            return Ok(false);
        }
        if let Some(previous) = self.active.take() {
            if let Some(scene) = self.scenes.get_mut(&previous) {
                scene.deactivate();
            }
        }
        if let Some(scene) = self.scenes.get_mut(name) {
            scene.activate();
        }
        info!(scene = name, "active scene changed");
        self.active = Some(name.to_owned());
        Ok(true)
    }

    // -- frame ----------------------------------------------------------------

    /// Run one frame of scene bookkeeping and update the active scene.
    pub fn update(&mut self, engine: &EngineContext) -> FrameReport {
        self.running = true;
        let mut report = FrameReport::default();
        let resolved = self.commands.resolve();

        for name in &resolved.destroy {
            match self.scenes.get_mut(name) {
                Some(scene) => {
                    scene.destroy();
                }
                None => {
                    warn!(scene = %name, "destroy requested for unknown scene");
                    report.rejected += 1;
                }
            }
        }
        let doomed: Vec<String> = self
            .scenes
            .iter()
            .filter(|(_, s)| s.state() == SceneState::PendingDestroy)
            .map(|(n, _)| n.clone())
            .collect();
        for name in doomed {
            if let Some(mut scene) = self.scenes.remove(&name) {
                scene.release();
            }
            if self.active.as_deref() == Some(name.as_str()) {
                self.active = None;
            }
            report.released.push(name);
        }

        if let Some(name) = resolved.load {
            match self.switch_to(&name) {
                Ok(true) => report.activated = Some(name),
                Ok(false) => {}
                Err(err) => {
                    warn!(%err, "queued scene load rejected");
                    report.rejected += 1;
                }
            }
        }

        if let Some(name) = self.active.as_deref() {
            if let Some(scene) = self.scenes.get_mut(name) {
                report.update = scene.update(engine, &mut self.commands);
            }
        }
        self.frames += 1;
        report
    }

    /// Draw the active scene onto `surface` and present it.
    ///
    /// With no active scene the surface is only presented.
    pub fn render(&mut self, surface: &mut dyn Surface) -> RenderStats {
        let mut stats = RenderStats::default();
        let active = self.active.as_deref();
        if let Some(scene) = active.and_then(|n| self.scenes.get_mut(n)) {
            if scene.clear_screen() {
                surface.clear(scene.background());
            }
            let explicit = scene.take_explicit_renders();
            stats = self.queue.rebuild(scene, &explicit);
            stats.drawn = self.queue.dispatch(scene, surface);
        }
        surface.display();
        stats
    }

    /// The render queue as built by the last [`render`](Self::render).
    pub fn render_queue(&self) -> &RenderQueue {
        &self.queue
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
