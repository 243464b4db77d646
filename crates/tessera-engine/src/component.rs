//! Component capability model.
//!
//! A component is any `'static` type implementing [`Component`]. What it can
//! *do* is discovered at dispatch time through capability queries rather
//! than by its concrete type:
//!
//! - [`Component::as_update`] → [`Update`]: ticked once per frame while the
//!   component and its owner are enabled.
//! - [`Component::as_renderable`] → [`Renderable`]: collected by the render
//!   queue and asked to draw itself.
//!
//! A component may implement any subset. New component kinds plug in by
//! overriding the matching query; the scene and render queue never name
//! concrete component types.
//!
//! # Example
//!
//! ```
//! use tessera_engine::prelude::*;
//!
//! struct Spinner { speed: f32 }
//!
//! impl Component for Spinner {
//!     fn as_update(&mut self) -> Option<&mut dyn Update> { Some(self) }
//! }
//!
//! impl Update for Spinner {
//!     fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
//!         let dt = ctx.time().dt;
//!         let owner = ctx.owner();
//!         if let Some(go) = ctx.scene_mut().get_mut(owner) {
//!             go.transform_mut().rotation += self.speed * dt;
//!         }
//!     }
//! }
//! ```

use std::any::Any;

use serde::{Deserialize, Serialize};
use tessera_core::id::{ComponentId, ObjectId};
use tessera_core::input::InputSource;
use tessera_core::inspect::PropertyValue;
use tessera_core::random::Random;
use tessera_core::resources::Resources;
use tessera_core::surface::Surface;
use tessera_core::transform::Transform;
use tessera_core::CoreError;

use crate::command::SceneCommandBuffer;
use crate::context::EngineContext;
use crate::render::QueueType;
use crate::scene::Scene;
use crate::time::FrameTime;

// ---------------------------------------------------------------------------
// ComponentHandle
// ---------------------------------------------------------------------------

/// Addresses one attached component: its owner plus its id.
///
/// The owner half never changes for the lifetime of the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentHandle {
    pub object: ObjectId,
    pub id: ComponentId,
}

// ---------------------------------------------------------------------------
// AsAny
// ---------------------------------------------------------------------------

/// Upcast helper so `dyn Component` can be downcast to its concrete type.
///
/// Implemented for every sized `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Per-frame behavior.
pub trait Update {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>);
}

/// Something the render queue can draw.
///
/// Draw hooks take `&self`: they run while the queue is being iterated and
/// must not change anything the queue depends on.
pub trait Renderable {
    /// Submit draw commands for this component. `world` is the owner's
    /// world transform at render time.
    fn draw(&self, surface: &mut dyn Surface, world: &Transform);

    /// Ordering within a queue; lower values draw first (further back).
    fn z_offset(&self) -> i32 {
        0
    }

    fn visible(&self) -> bool {
        true
    }

    /// `true` to be collected automatically every frame. When `false`, the
    /// component only draws in frames where it was passed to
    /// [`Scene::enqueue_render`].
    fn auto_queue(&self) -> bool {
        true
    }

    fn queue_type(&self) -> QueueType {
        QueueType::Base
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// An attachable unit of behavior.
pub trait Component: AsAny {
    /// Human-readable type name, used by the scene outline and logs.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Runs once, before the component's first update.
    fn start(&mut self, _ctx: &mut UpdateCtx<'_>) {}

    fn as_update(&mut self) -> Option<&mut dyn Update> {
        None
    }

    fn as_renderable(&self) -> Option<&dyn Renderable> {
        None
    }

    /// Current values of the component's inspectable properties.
    ///
    /// Types with an [`Inspect`](tessera_core::inspect::Inspect) table
    /// usually forward to [`read_properties`](tessera_core::inspect::read_properties).
    fn inspect(&self) -> Vec<(&'static str, PropertyValue)> {
        Vec::new()
    }

    fn set_property(&mut self, name: &str, _value: PropertyValue) -> Result<(), CoreError> {
        Err(CoreError::UnknownProperty {
            name: name.to_owned(),
        })
    }
}

impl dyn Component {
    pub fn is<C: Component>(&self) -> bool {
        self.as_any().is::<C>()
    }

    pub fn downcast_ref<C: Component>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }

    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.as_any_mut().downcast_mut::<C>()
    }
}

// ---------------------------------------------------------------------------
// UpdateCtx
// ---------------------------------------------------------------------------

/// Everything a component hook can reach while it runs.
///
/// The component itself is lent out of its slot for the duration of the
/// hook, so the scene can be borrowed mutably here. Looking up the running
/// component through the scene returns `None` until the hook returns.
pub struct UpdateCtx<'a> {
    scene: &'a mut Scene,
    engine: &'a EngineContext,
    commands: &'a mut SceneCommandBuffer,
    handle: ComponentHandle,
}

impl<'a> UpdateCtx<'a> {
    pub(crate) fn new(
        scene: &'a mut Scene,
        engine: &'a EngineContext,
        commands: &'a mut SceneCommandBuffer,
        handle: ComponentHandle,
    ) -> Self {
        Self {
            scene,
            engine,
            commands,
            handle,
        }
    }

    /// The object that owns the running component.
    pub fn owner(&self) -> ObjectId {
        self.handle.object
    }

    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    pub fn engine(&self) -> &EngineContext {
        self.engine
    }

    pub fn input(&self) -> &dyn InputSource {
        self.engine.input()
    }

    pub fn random(&self) -> &Random {
        self.engine.random()
    }

    pub fn resources(&self) -> &Resources {
        self.engine.resources()
    }

    pub fn time(&self) -> FrameTime {
        self.engine.time()
    }

    /// Destroy the owning object (deferred like every object destroy).
    pub fn destroy_owner(&mut self) -> bool {
        let owner = self.owner();
        self.scene.destroy_object(owner)
    }

    /// Request a scene switch. It takes effect at the start of the next
    /// project update; the last request issued before then wins.
    pub fn load_scene(&mut self, name: &str) {
        self.commands.load(name);
    }

    /// Request that a scene be destroyed.
    ///
    /// Naming the running scene marks it pending-destroy immediately. Other
    /// scenes are marked and released at the start of the next project
    /// update.
    pub fn destroy_scene(&mut self, name: &str) {
        if self.scene.name() == name {
            self.scene.destroy();
        } else {
            self.commands.destroy(name);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
