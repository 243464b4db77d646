//! Tessera engine -- scenes, game objects, components and render ordering.
//!
//! This crate builds on [`tessera_core`] to provide the runtime object
//! model: a [`Project`](project::Project) owns named
//! [`Scene`](scene::Scene)s, each scene owns a forest of
//! [`GameObject`](game_object::GameObject)s, and each object carries
//! [`Component`](component::Component)s. Every frame the project updates the
//! active scene and the [`RenderQueue`](render::RenderQueue) draws its
//! renderables in `(queue, z, traversal)` order.
//!
//! Everything runs on one thread. Structural changes requested during a
//! frame (destroying objects, removing components, switching or destroying
//! scenes) are deferred to a well-defined point at the start of the next
//! one.
//!
//! # Quick Start
//!
//! ```
//! use tessera_engine::prelude::*;
//!
//! let mut project = Project::new("demo");
//! let scene = project.create_scene_and_load("main").unwrap();
//!
//! let back = scene.create_object("back");
//! scene.add_component(back, ShapeRenderer::rect(Vec2::new(8.0, 8.0), Color::BLACK).with_z(-1)).unwrap();
//! let front = scene.create_object("front");
//! scene.add_component(front, ShapeRenderer::circle(2.0, Color::WHITE)).unwrap();
//!
//! let engine = EngineContext::headless();
//! let mut surface = RecordingSurface::new();
//! project.update(&engine);
//! let stats = project.render(&mut surface);
//!
//! assert_eq!(stats.drawn, 2);
//! assert!(matches!(surface.last_frame()[0], DrawCmd::Rect { .. }));
//! ```

#![deny(unsafe_code)]

pub mod command;
pub mod component;
pub mod components;
pub mod context;
pub mod frame;
pub mod game_object;
pub mod logging;
pub mod outline;
pub mod project;
pub mod render;
pub mod scene;
pub mod time;

use tessera_core::id::ObjectId;
use tessera_core::CoreError;

use crate::component::ComponentHandle;

/// Re-export the core crate for convenience.
pub use tessera_core;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by scene and project operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The object was destroyed, released, or never existed in this scene.
    #[error("game object {id} is destroyed or does not exist")]
    DeadObject { id: ObjectId },

    /// The component was removed or never existed.
    #[error("component {handle:?} is removed or does not exist")]
    DeadComponent { handle: ComponentHandle },

    /// Reparenting would make an object its own ancestor.
    #[error("cannot parent {child} under {parent}: {parent} is {child} or one of its descendants")]
    HierarchyCycle { child: ObjectId, parent: ObjectId },

    /// A scene with this name is already registered.
    #[error("a scene named '{name}' already exists")]
    DuplicateScene { name: String },

    /// No scene with this name is registered.
    #[error("no scene named '{name}'")]
    UnknownScene { name: String },

    /// The scene is pending destruction and cannot be loaded.
    #[error("scene '{name}' is being destroyed")]
    SceneUnavailable { name: String },

    /// A property read or write failed.
    #[error(transparent)]
    Property(#[from] CoreError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use tessera_core::prelude::*;

    pub use crate::command::{ResolvedCommands, SceneCommand, SceneCommandBuffer};
    pub use crate::component::{AsAny, Component, ComponentHandle, Renderable, Update, UpdateCtx};
    pub use crate::components::{
        Script, ScriptFn, Shape, ShapeRenderer, TextLabel, Trigger, TriggerEvent, TriggerListener,
    };
    pub use crate::context::{EngineConfig, EngineContext};
    pub use crate::frame::{FrameDiagnostics, FrameLoop};
    pub use crate::game_object::GameObject;
    pub use crate::logging::init_tracing;
    pub use crate::outline::{ComponentOutline, ObjectOutline, PropertyEntry, SceneOutline};
    pub use crate::project::{FrameReport, Project};
    pub use crate::render::{QueueType, RenderEntry, RenderKey, RenderQueue, RenderStats};
    pub use crate::scene::{ReparentMode, Scene, SceneState, UpdateStats};
    pub use crate::time::{FrameClock, FrameTime};
    pub use crate::EngineError;
}
