//! Scenes: an arena of game objects with a lifecycle.
//!
//! A [`Scene`] owns every [`GameObject`] in it, addressed by generational
//! [`ObjectId`]s. Objects form a forest: each has at most one parent, root
//! objects are kept in creation order, and children in attach order. That
//! order is the traversal order for both update and render collection.
//!
//! # Deferred structural changes
//!
//! Destroying an object or removing a component never happens in the middle
//! of a frame. [`Scene::destroy_object`] marks the object (and its subtree)
//! destroyed immediately, so name lookups and [`Scene::is_alive`] stop seeing
//! it, but the memory is only released when the next [`Scene::update`]
//! drains the pending list. Any traversal already in progress keeps working.
//!
//! # Update order
//!
//! Each scene update runs, in order:
//!
//! 1. drain pending destroys and component removals;
//! 2. call `start` on every enabled component that has not started yet and
//!    whose owner is active in the hierarchy;
//! 3. snapshot the depth-first, pre-order list of components and call
//!    `update` on each one that is still enabled, started and attached.
//!
//! Components added during a frame are not started or updated until the
//! next one.

use std::mem;

use serde::{Deserialize, Serialize};
use tessera_core::id::{ComponentId, ObjectAllocator, ObjectId};
use tessera_core::inspect::PropertyValue;
use tessera_core::math::{Color, Vec2};
use tessera_core::transform::Transform;
use tracing::{debug, trace, warn};

use crate::command::SceneCommandBuffer;
use crate::component::{Component, ComponentHandle, UpdateCtx};
use crate::context::EngineContext;
use crate::game_object::{ComponentSlot, GameObject};
use crate::EngineError;

// ---------------------------------------------------------------------------
// SceneState
// ---------------------------------------------------------------------------

/// Lifecycle of a scene.
///
/// ```text
/// Created ──activate──► Active ◄──resume── Paused
///                        │  ▲  └──pause───►
///                 deactivate │ activate
///                        ▼  │
///                       Inactive
///
/// any live state ──destroy──► PendingDestroy ──release──► Destroyed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneState {
    /// Built but never shown.
    Created,
    /// The project's active scene; updated every frame.
    Active,
    /// Active but not updated.
    Paused,
    /// Was active, another scene has since been loaded.
    Inactive,
    /// Destroy requested; released at the next project update.
    PendingDestroy,
    /// Released. Only observable on a scene value taken out of a project.
    Destroyed,
}

impl SceneState {
    /// Whether the scene can still be loaded.
    pub fn is_live(self) -> bool {
        !matches!(self, Self::PendingDestroy | Self::Destroyed)
    }
}

/// How [`Scene::set_parent`] treats the child's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReparentMode {
    /// Recompute the local transform so the world transform is unchanged.
    #[default]
    KeepWorld,
    /// Keep the local transform; the object moves with its new parent.
    KeepLocal,
}

/// Counters from one scene update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStats {
    /// Objects whose memory was released by the drain step.
    pub released_objects: usize,
    /// Component slots dropped by the drain step.
    pub released_components: usize,
    /// `start` hooks run.
    pub started: usize,
    /// `update` hooks run.
    pub updated: usize,
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A named collection of game objects.
///
/// Scenes are created through [`Project::create_scene`](crate::project::Project::create_scene).
pub struct Scene {
    name: String,
    state: SceneState,
    allocator: ObjectAllocator,
    nodes: Vec<Option<GameObject>>,
    roots: Vec<ObjectId>,
    pending_destroy: Vec<ObjectId>,
    pending_detach: Vec<ComponentHandle>,
    explicit_renders: Vec<ComponentHandle>,
    next_component: u64,
    clear_screen: bool,
    background: Color,
    activations: u32,
    frames: u64,
}

impl Scene {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            state: SceneState::Created,
            allocator: ObjectAllocator::new(),
            nodes: Vec::new(),
            roots: Vec::new(),
            pending_destroy: Vec::new(),
            pending_detach: Vec::new(),
            explicit_renders: Vec::new(),
            next_component: 0,
            clear_screen: true,
            background: Color::BLACK,
            activations: 0,
            frames: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Whether the surface is cleared before this scene renders.
    pub fn clear_screen(&self) -> bool {
        self.clear_screen
    }

    pub fn set_clear_screen(&mut self, clear: bool) {
        self.clear_screen = clear;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Number of times the scene became the active scene.
    pub fn activation_count(&self) -> u32 {
        self.activations
    }

    /// Number of update passes run.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    // -- lifecycle ------------------------------------------------------------

    /// Suspend updates. Returns `false` unless the scene was active.
    pub fn pause(&mut self) -> bool {
        if self.state != SceneState::Active {
            return false;
        }
        self.state = SceneState::Paused;
        debug!(scene = %self.name, "scene paused");
        true
    }

    /// Resume updates. Returns `false` unless the scene was paused.
    pub fn resume(&mut self) -> bool {
        if self.state != SceneState::Paused {
            return false;
        }
        self.state = SceneState::Active;
        debug!(scene = %self.name, "scene resumed");
        true
    }

    /// Mark the scene pending-destroy. The owning project releases it at
    /// the start of its next update. Returns `false` if already destroyed
    /// or pending.
    pub fn destroy(&mut self) -> bool {
        if !self.state.is_live() {
            return false;
        }
        self.state = SceneState::PendingDestroy;
        debug!(scene = %self.name, "scene marked for destruction");
        true
    }

    pub(crate) fn activate(&mut self) {
        if matches!(self.state, SceneState::Created | SceneState::Inactive) {
            self.state = SceneState::Active;
            self.activations += 1;
            debug!(scene = %self.name, activations = self.activations, "scene activated");
        }
    }

    pub(crate) fn deactivate(&mut self) {
        if matches!(self.state, SceneState::Active | SceneState::Paused) {
            self.state = SceneState::Inactive;
            debug!(scene = %self.name, "scene deactivated");
        }
    }

    /// Drop every object and mark the scene destroyed.
    pub(crate) fn release(&mut self) {
        let objects = self.allocator.live_count();
        self.nodes.clear();
        self.roots.clear();
        self.pending_destroy.clear();
        self.pending_detach.clear();
        self.explicit_renders.clear();
        self.allocator.clear();
        self.state = SceneState::Destroyed;
        debug!(scene = %self.name, objects, "scene released");
    }

    // -- objects --------------------------------------------------------------

    /// Create a root object.
    pub fn create_object(&mut self, name: impl Into<String>) -> ObjectId {
        let id = self.insert_node(name.into(), None);
        self.roots.push(id);
        id
    }

    /// Create an object as the last child of `parent`.
    pub fn create_child(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
    ) -> Result<ObjectId, EngineError> {
        if !self.is_alive(parent) {
            return Err(EngineError::DeadObject { id: parent });
        }
        let id = self.insert_node(name.into(), Some(parent));
        if let Some(p) = self.node_mut(parent) {
            p.children_mut().push(id);
        }
        Ok(id)
    }

    fn insert_node(&mut self, name: String, parent: Option<ObjectId>) -> ObjectId {
        let id = self.allocator.allocate();
        let index = id.index() as usize;
        if index >= self.nodes.len() {
            self.nodes.resize_with(index + 1, || None);
        }
        self.nodes[index] = Some(GameObject::new(id, name, parent));
        trace!(scene = %self.name, object = %id, "object created");
        id
    }

    fn node_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        if !self.allocator.is_live(id) {
            return None;
        }
        self.nodes.get_mut(id.index() as usize)?.as_mut()
    }

    /// Resolve an object, including one that is destroyed but not yet
    /// released.
    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        if !self.allocator.is_live(id) {
            return None;
        }
        self.nodes.get(id.index() as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.node_mut(id)
    }

    /// Whether `id` resolves to an object that has not been destroyed.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(|go| !go.is_destroyed())
    }

    /// Number of live (not destroyed) objects.
    pub fn object_count(&self) -> usize {
        self.walk().len()
    }

    /// Root objects in creation order, including destroyed roots that are
    /// not yet released.
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// First live object named `name`, in depth-first pre-order.
    pub fn get_game_object(&self, name: &str) -> Option<ObjectId> {
        self.walk()
            .into_iter()
            .find(|&id| self.get(id).is_some_and(|go| go.name() == name))
    }

    /// Every live object named `name`, in depth-first pre-order.
    pub fn find_all(&self, name: &str) -> Vec<ObjectId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|go| go.name() == name))
            .collect()
    }

    /// Live objects in depth-first pre-order.
    pub fn walk(&self) -> Vec<ObjectId> {
        self.preorder(false)
    }

    /// Objects active in the hierarchy, in depth-first pre-order.
    ///
    /// A disabled object hides its whole subtree.
    pub fn walk_active(&self) -> Vec<ObjectId> {
        self.preorder(true)
    }

    fn preorder(&self, only_enabled: bool) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack: Vec<ObjectId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(go) = self.get(id) else { continue };
            if go.is_destroyed() || (only_enabled && !go.is_enabled()) {
                continue;
            }
            out.push(id);
            stack.extend(go.children().iter().rev().copied());
        }
        out
    }

    /// Whether the object and all of its ancestors are enabled and alive.
    pub fn is_active_in_hierarchy(&self, id: ObjectId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.get(current) {
                Some(go) if go.is_enabled() && !go.is_destroyed() => cursor = go.parent(),
                _ => return false,
            }
        }
        true
    }

    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) -> Result<(), EngineError> {
        if !self.is_alive(id) {
            return Err(EngineError::DeadObject { id });
        }
        if let Some(go) = self.node_mut(id) {
            go.set_enabled(enabled);
        }
        Ok(())
    }

    /// Request destruction of `id` and its whole subtree.
    ///
    /// The objects stop being visible to lookups immediately and are
    /// released at the start of the next update. Returns `false` if the
    /// object was already destroyed or never existed.
    pub fn destroy_object(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(go) = self.node_mut(current) {
                go.mark_destroyed();
                stack.extend(go.children().iter().copied());
            }
        }
        self.pending_destroy.push(id);
        trace!(scene = %self.name, object = %id, "object marked for destruction");
        true
    }

    // -- hierarchy ------------------------------------------------------------

    /// Whether `ancestor` appears on the parent chain of `of`.
    pub fn is_ancestor(&self, ancestor: ObjectId, of: ObjectId) -> bool {
        let mut cursor = self.get(of).and_then(GameObject::parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(GameObject::parent);
        }
        false
    }

    /// Move `child` under `parent`, or to the root list when `parent` is
    /// `None`. The child is appended after existing children.
    ///
    /// Fails with [`EngineError::HierarchyCycle`] if `parent` is `child` or
    /// one of its descendants; the hierarchy is left unchanged.
    pub fn set_parent(
        &mut self,
        child: ObjectId,
        parent: Option<ObjectId>,
        mode: ReparentMode,
    ) -> Result<(), EngineError> {
        if !self.is_alive(child) {
            return Err(EngineError::DeadObject { id: child });
        }
        if let Some(p) = parent {
            if !self.is_alive(p) {
                return Err(EngineError::DeadObject { id: p });
            }
            if p == child || self.is_ancestor(child, p) {
                return Err(EngineError::HierarchyCycle { child, parent: p });
            }
        }
        let old_parent = self.get(child).and_then(GameObject::parent);
        if old_parent == parent {
            return Ok(());
        }
        let world = self.world_transform(child).unwrap_or_default();

        match old_parent {
            Some(op) => {
                if let Some(go) = self.node_mut(op) {
                    go.children_mut().retain(|&c| c != child);
                }
            }
            None => self.roots.retain(|&r| r != child),
        }
        match parent {
            Some(p) => {
                if let Some(go) = self.node_mut(p) {
                    go.children_mut().push(child);
                }
            }
            None => self.roots.push(child),
        }

        let local = match mode {
            ReparentMode::KeepWorld => {
                let parent_world = parent
                    .and_then(|p| self.world_transform(p))
                    .unwrap_or_default();
                Some(world.relative_to(&parent_world))
            }
            ReparentMode::KeepLocal => None,
        };
        if let Some(go) = self.node_mut(child) {
            go.set_parent_link(parent);
            if let Some(local) = local {
                *go.transform_mut() = local;
            }
        }
        Ok(())
    }

    /// Attach `child` as the last child of `parent`, keeping its world
    /// transform.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), EngineError> {
        self.set_parent(child, Some(parent), ReparentMode::KeepWorld)
    }

    /// Detach `child` from `parent` and make it a root, keeping its world
    /// transform. Returns `Ok(false)` if `child` was not a child of `parent`.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<bool, EngineError> {
        if !self.is_alive(child) {
            return Err(EngineError::DeadObject { id: child });
        }
        if self.get(child).and_then(GameObject::parent) != Some(parent) {
            return Ok(false);
        }
        self.set_parent(child, None, ReparentMode::KeepWorld)?;
        Ok(true)
    }

    /// Make `child` a root, keeping its world transform. Returns `Ok(false)`
    /// if it already was one.
    pub fn detach_from_parent(&mut self, child: ObjectId) -> Result<bool, EngineError> {
        match self.get(child).filter(|go| !go.is_destroyed()) {
            None => Err(EngineError::DeadObject { id: child }),
            Some(go) => match go.parent() {
                Some(parent) => self.remove_child(parent, child),
                None => Ok(false),
            },
        }
    }

    // -- transforms -----------------------------------------------------------

    pub fn local_transform(&self, id: ObjectId) -> Option<Transform> {
        self.get(id).map(|go| *go.transform())
    }

    pub fn set_local_position(&mut self, id: ObjectId, position: Vec2) -> Result<(), EngineError> {
        let go = self.node_mut(id).ok_or(EngineError::DeadObject { id })?;
        go.set_local_position(position);
        Ok(())
    }

    pub fn set_local_rotation(&mut self, id: ObjectId, radians: f32) -> Result<(), EngineError> {
        let go = self.node_mut(id).ok_or(EngineError::DeadObject { id })?;
        go.set_local_rotation(radians);
        Ok(())
    }

    /// World transform of `id`, folded from the root down. Never cached.
    pub fn world_transform(&self, id: ObjectId) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let go = self.get(current)?;
            chain.push(*go.transform());
            cursor = go.parent();
        }
        Some(Transform::chain(chain.iter().rev()))
    }

    pub fn global_position(&self, id: ObjectId) -> Option<Vec2> {
        self.world_transform(id).map(|t| t.position)
    }

    pub fn global_rotation(&self, id: ObjectId) -> Option<f32> {
        self.world_transform(id).map(|t| t.rotation)
    }

    fn parent_world(&self, id: ObjectId) -> Result<Transform, EngineError> {
        let go = self.get(id).ok_or(EngineError::DeadObject { id })?;
        Ok(go
            .parent()
            .and_then(|p| self.world_transform(p))
            .unwrap_or_default())
    }

    /// Move `id` so its world position becomes `position`.
    pub fn set_global_position(&mut self, id: ObjectId, position: Vec2) -> Result<(), EngineError> {
        let parent_world = self.parent_world(id)?;
        if let Some(go) = self.node_mut(id) {
            go.set_local_position(parent_world.inverse_transform_point(position));
        }
        Ok(())
    }

    /// Rotate `id` so its world rotation becomes `radians`.
    pub fn set_global_rotation(&mut self, id: ObjectId, radians: f32) -> Result<(), EngineError> {
        let parent_world = self.parent_world(id)?;
        if let Some(go) = self.node_mut(id) {
            go.set_local_rotation(radians - parent_world.rotation);
        }
        Ok(())
    }

    // -- components -----------------------------------------------------------

    /// Attach a component. It starts at the beginning of the next update.
    pub fn add_component<C: Component>(
        &mut self,
        id: ObjectId,
        component: C,
    ) -> Result<ComponentHandle, EngineError> {
        self.add_boxed_component(id, Box::new(component))
    }

    pub fn add_boxed_component(
        &mut self,
        id: ObjectId,
        component: Box<dyn Component>,
    ) -> Result<ComponentHandle, EngineError> {
        if !self.is_alive(id) {
            return Err(EngineError::DeadObject { id });
        }
        let cid = ComponentId(self.next_component);
        self.next_component += 1;
        trace!(object = %id, component = %cid, kind = component.type_name(), "component attached");
        if let Some(go) = self.node_mut(id) {
            go.components.push(ComponentSlot::new(cid, component));
        }
        Ok(ComponentHandle { object: id, id: cid })
    }

    fn slot(&self, handle: ComponentHandle) -> Option<&ComponentSlot> {
        self.get(handle.object)?
            .slot(handle.id)
            .filter(|s| !s.detached)
    }

    fn slot_mut(&mut self, handle: ComponentHandle) -> Option<&mut ComponentSlot> {
        self.node_mut(handle.object)?
            .slot_mut(handle.id)
            .filter(|s| !s.detached)
    }

    /// Borrow a component by handle, type-checked.
    pub fn component<C: Component>(&self, handle: ComponentHandle) -> Option<&C> {
        self.component_dyn(handle)?.downcast_ref::<C>()
    }

    pub fn component_mut<C: Component>(&mut self, handle: ComponentHandle) -> Option<&mut C> {
        self.slot_mut(handle)?.get_mut()?.downcast_mut::<C>()
    }

    pub fn component_dyn(&self, handle: ComponentHandle) -> Option<&(dyn Component + 'static)> {
        self.slot(handle)?.get()
    }

    pub fn component_exists(&self, handle: ComponentHandle) -> bool {
        self.slot(handle).is_some()
    }

    /// Remove a component. It stops updating and rendering immediately and
    /// its storage is dropped at the next update.
    pub fn remove_component(&mut self, handle: ComponentHandle) -> bool {
        match self.slot_mut(handle) {
            Some(slot) => {
                slot.detached = true;
                self.pending_detach.push(handle);
                true
            }
            None => false,
        }
    }

    pub fn set_component_enabled(
        &mut self,
        handle: ComponentHandle,
        enabled: bool,
    ) -> Result<(), EngineError> {
        let slot = self
            .slot_mut(handle)
            .ok_or(EngineError::DeadComponent { handle })?;
        slot.enabled = enabled;
        Ok(())
    }

    pub fn is_component_enabled(&self, handle: ComponentHandle) -> bool {
        self.slot(handle).is_some_and(|s| s.enabled)
    }

    /// Whether the component's `start` hook has run.
    pub fn is_component_started(&self, handle: ComponentHandle) -> bool {
        self.slot(handle).is_some_and(|s| s.started)
    }

    /// Inspectable properties of a component.
    pub fn inspect_component(
        &self,
        handle: ComponentHandle,
    ) -> Result<Vec<(&'static str, PropertyValue)>, EngineError> {
        self.component_dyn(handle)
            .map(|c| c.inspect())
            .ok_or(EngineError::DeadComponent { handle })
    }

    pub fn set_component_property(
        &mut self,
        handle: ComponentHandle,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), EngineError> {
        let component = self
            .slot_mut(handle)
            .and_then(ComponentSlot::get_mut)
            .ok_or(EngineError::DeadComponent { handle })?;
        component.set_property(name, value)?;
        Ok(())
    }

    /// Queue a component for drawing in the next render only.
    ///
    /// This is how components with `auto_queue() == false` get drawn.
    /// Returns `false` if the component does not exist.
    pub fn enqueue_render(&mut self, handle: ComponentHandle) -> bool {
        if !self.component_exists(handle) {
            return false;
        }
        self.explicit_renders.push(handle);
        true
    }

    pub(crate) fn take_explicit_renders(&mut self) -> Vec<ComponentHandle> {
        mem::take(&mut self.explicit_renders)
    }

    // -- update ---------------------------------------------------------------

    /// Run one frame: drain, start, update.
    ///
    /// Does nothing unless the scene is [`SceneState::Active`].
    pub fn update(&mut self, engine: &EngineContext, commands: &mut SceneCommandBuffer) -> UpdateStats {
        let mut stats = UpdateStats::default();
        if self.state != SceneState::Active {
            return stats;
        }
        self.drain_pending(&mut stats);
        self.run_starts(engine, commands, &mut stats);

        for handle in self.component_order() {
            if !self.can_tick(handle) {
                continue;
            }
            let Some(mut component) = self.lend(handle) else {
                continue;
            };
            if let Some(u) = component.as_update() {
                let mut ctx = UpdateCtx::new(self, engine, commands, handle);
                u.update(&mut ctx);
                stats.updated += 1;
            }
            self.restore(handle, component);
        }

        self.frames += 1;
        trace!(
            scene = %self.name,
            released = stats.released_objects,
            started = stats.started,
            updated = stats.updated,
            "scene updated"
        );
        stats
    }

    fn drain_pending(&mut self, stats: &mut UpdateStats) {
        for handle in mem::take(&mut self.pending_detach) {
            if let Some(go) = self.node_mut(handle.object) {
                let before = go.components.len();
                go.components.retain(|s| s.id != handle.id);
                stats.released_components += before - go.components.len();
            }
        }

        for id in mem::take(&mut self.pending_destroy) {
            // Already released along with a destroyed ancestor.
            let Some(parent) = self.get(id).map(GameObject::parent) else {
                continue;
            };
            match parent {
                Some(p) => {
                    if let Some(go) = self.node_mut(p) {
                        go.children_mut().retain(|&c| c != id);
                    }
                }
                None => self.roots.retain(|&r| r != id),
            }
            stats.released_objects += self.release_subtree(id);
        }
    }

    fn release_subtree(&mut self, root: ObjectId) -> usize {
        let mut released = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !self.allocator.is_live(id) {
                continue;
            }
            let node = self
                .nodes
                .get_mut(id.index() as usize)
                .and_then(Option::take);
            self.allocator.release(id);
            if let Some(go) = node {
                if !go.is_destroyed() {
                    warn!(object = %id, "released an object that was not marked destroyed");
                }
                stack.extend(go.children().iter().copied());
                released += 1;
            }
        }
        released
    }

    fn run_starts(
        &mut self,
        engine: &EngineContext,
        commands: &mut SceneCommandBuffer,
        stats: &mut UpdateStats,
    ) {
        for handle in self.component_order() {
            if !self.is_active_in_hierarchy(handle.object) {
                continue;
            }
            match self.slot_mut(handle) {
                Some(slot) if slot.enabled && !slot.started => slot.started = true,
                _ => continue,
            }
            let Some(mut component) = self.lend(handle) else {
                continue;
            };
            let mut ctx = UpdateCtx::new(self, engine, commands, handle);
            component.start(&mut ctx);
            stats.started += 1;
            self.restore(handle, component);
        }
    }

    /// Attached components of active objects, in traversal order.
    fn component_order(&self) -> Vec<ComponentHandle> {
        let mut order = Vec::new();
        for id in self.walk_active() {
            if let Some(go) = self.get(id) {
                order.extend(go.component_handles());
            }
        }
        order
    }

    fn can_tick(&self, handle: ComponentHandle) -> bool {
        self.slot(handle).is_some_and(|s| s.enabled && s.started)
            && self.is_active_in_hierarchy(handle.object)
    }

    fn lend(&mut self, handle: ComponentHandle) -> Option<Box<dyn Component>> {
        self.node_mut(handle.object)?
            .slot_mut(handle.id)?
            .component
            .take()
    }

    fn restore(&mut self, handle: ComponentHandle, component: Box<dyn Component>) {
        if let Some(slot) = self
            .node_mut(handle.object)
            .and_then(|go| go.slot_mut(handle.id))
        {
            slot.component = Some(component);
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("objects", &self.allocator.live_count())
            .field("roots", &self.roots.len())
            .field("pending_destroy", &self.pending_destroy.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Update;
    use std::cell::RefCell;
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        label: &'static str,
        log: Log,
    }

    impl Component for Probe {
        fn start(&mut self, _ctx: &mut UpdateCtx<'_>) {
            self.log.borrow_mut().push(format!("start:{}", self.label));
        }

        fn as_update(&mut self) -> Option<&mut dyn Update> {
            Some(self)
        }
    }

    impl Update for Probe {
        fn update(&mut self, _ctx: &mut UpdateCtx<'_>) {
            self.log.borrow_mut().push(format!("update:{}", self.label));
        }
    }

    fn active_scene() -> Scene {
        let mut scene = Scene::new("test");
        scene.activate();
        scene
    }

    fn step(scene: &mut Scene) -> UpdateStats {
        let engine = EngineContext::headless();
        let mut cmds = SceneCommandBuffer::new();
        scene.update(&engine, &mut cmds)
    }

    fn probe(label: &'static str, log: &Log) -> Probe {
        Probe {
            label,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn start_runs_once_before_first_update() {
        let log = Log::default();
        let mut scene = active_scene();
        let a = scene.create_object("a");
        scene.add_component(a, probe("a", &log)).unwrap();

        step(&mut scene);
        step(&mut scene);
        assert_eq!(*log.borrow(), vec!["start:a", "update:a", "update:a"]);
    }

    #[test]
    fn update_order_is_depth_first_preorder() {
        let log = Log::default();
        let mut scene = active_scene();
        let root = scene.create_object("root");
        let left = scene.create_child(root, "left").unwrap();
        let leaf = scene.create_child(left, "leaf").unwrap();
        let right = scene.create_child(root, "right").unwrap();
        let other = scene.create_object("other");
        for (id, label) in [(other, "other"), (right, "right"), (leaf, "leaf"), (left, "left"), (root, "root")] {
            scene.add_component(id, probe(label, &log)).unwrap();
        }
        step(&mut scene);
        let updates: Vec<String> = log
            .borrow()
            .iter()
            .filter(|l| l.starts_with("update:"))
            .cloned()
            .collect();
        assert_eq!(
            updates,
            vec!["update:root", "update:left", "update:leaf", "update:right", "update:other"]
        );
    }

    #[test]
    fn destroyed_object_hidden_from_lookup_but_resolvable_until_drain() {
        let mut scene = active_scene();
        let id = scene.create_object("doomed");
        step(&mut scene);

        assert!(scene.destroy_object(id));
        assert!(!scene.is_alive(id));
        assert_eq!(scene.get_game_object("doomed"), None);
        assert!(scene.get(id).is_some());
        assert!(!scene.destroy_object(id));

        let stats = step(&mut scene);
        assert_eq!(stats.released_objects, 1);
        assert!(scene.get(id).is_none());
        assert!(scene.roots().is_empty());
    }

    #[test]
    fn destroying_parent_releases_subtree() {
        let mut scene = active_scene();
        let p = scene.create_object("p");
        let c = scene.create_child(p, "c").unwrap();
        let g = scene.create_child(c, "g").unwrap();
        scene.destroy_object(g);
        scene.destroy_object(p);
        assert!(!scene.is_alive(c));
        let stats = step(&mut scene);
        assert_eq!(stats.released_objects, 3);
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn disabled_parent_suspends_subtree() {
        let log = Log::default();
        let mut scene = active_scene();
        let p = scene.create_object("p");
        let c = scene.create_child(p, "c").unwrap();
        scene.add_component(c, probe("c", &log)).unwrap();
        scene.set_enabled(p, false).unwrap();

        step(&mut scene);
        assert!(log.borrow().is_empty());
        assert!(!scene.is_active_in_hierarchy(c));

        scene.set_enabled(p, true).unwrap();
        step(&mut scene);
        assert_eq!(*log.borrow(), vec!["start:c", "update:c"]);
    }

    #[test]
    fn disabled_component_is_not_started_or_updated() {
        let log = Log::default();
        let mut scene = active_scene();
        let a = scene.create_object("a");
        let h = scene.add_component(a, probe("a", &log)).unwrap();
        scene.set_component_enabled(h, false).unwrap();
        step(&mut scene);
        assert!(log.borrow().is_empty());
        assert!(!scene.is_component_started(h));
    }

    #[test]
    fn removed_component_stops_immediately() {
        let log = Log::default();
        let mut scene = active_scene();
        let a = scene.create_object("a");
        let h = scene.add_component(a, probe("a", &log)).unwrap();
        step(&mut scene);
        assert!(scene.remove_component(h));
        assert!(!scene.component_exists(h));
        let stats = step(&mut scene);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.released_components, 1);
    }

    #[test]
    fn paused_scene_does_not_update() {
        let log = Log::default();
        let mut scene = active_scene();
        let a = scene.create_object("a");
        scene.add_component(a, probe("a", &log)).unwrap();
        assert!(scene.pause());
        step(&mut scene);
        assert!(log.borrow().is_empty());
        assert!(scene.resume());
        step(&mut scene);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn world_transform_composes_chain() {
        let mut scene = active_scene();
        let p = scene.create_object("p");
        let c = scene.create_child(p, "c").unwrap();
        scene.get_mut(p).unwrap().set_local_position(Vec2::new(10.0, 10.0));
        scene.get_mut(c).unwrap().set_local_position(Vec2::new(5.0, 5.0));
        assert_eq!(scene.global_position(c), Some(Vec2::new(15.0, 15.0)));

        scene.get_mut(p).unwrap().set_local_rotation(FRAC_PI_2);
        let pos = scene.global_position(c).unwrap();
        assert!(pos.approx_eq(Vec2::new(5.0, 15.0), 1e-4));
    }

    #[test]
    fn set_global_position_under_rotated_parent() {
        let mut scene = active_scene();
        let p = scene.create_object("p");
        let c = scene.create_child(p, "c").unwrap();
        scene.get_mut(p).unwrap().transform_mut().rotation = 0.7;
        scene.get_mut(p).unwrap().set_local_position(Vec2::new(3.0, -2.0));
        scene.set_global_position(c, Vec2::new(8.0, 1.0)).unwrap();
        assert!(scene.global_position(c).unwrap().approx_eq(Vec2::new(8.0, 1.0), 1e-4));
        scene.set_global_rotation(c, 0.2).unwrap();
        assert!((scene.global_rotation(c).unwrap() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn reparent_keeps_world_or_local() {
        let mut scene = active_scene();
        let a = scene.create_object("a");
        let b = scene.create_object("b");
        scene.get_mut(a).unwrap().set_local_position(Vec2::new(100.0, 0.0));
        scene.get_mut(b).unwrap().set_local_position(Vec2::new(1.0, 1.0));

        scene.set_parent(b, Some(a), ReparentMode::KeepWorld).unwrap();
        assert!(scene.global_position(b).unwrap().approx_eq(Vec2::new(1.0, 1.0), 1e-4));
        assert_eq!(scene.get(a).unwrap().children(), &[b]);
        assert_eq!(scene.roots(), &[a]);

        scene.set_parent(b, None, ReparentMode::KeepLocal).unwrap();
        assert!(scene.global_position(b).unwrap().approx_eq(Vec2::new(-99.0, 1.0), 1e-4));
        assert_eq!(scene.roots(), &[a, b]);
    }

    #[test]
    fn cyclic_reparent_is_rejected_and_leaves_graph_intact() {
        let mut scene = active_scene();
        let a = scene.create_object("a");
        let b = scene.create_child(a, "b").unwrap();
        let c = scene.create_child(b, "c").unwrap();

        let err = scene.add_child(c, a).unwrap_err();
        assert!(matches!(err, EngineError::HierarchyCycle { .. }));
        let err = scene.add_child(a, a).unwrap_err();
        assert!(matches!(err, EngineError::HierarchyCycle { .. }));

        assert_eq!(scene.roots(), &[a]);
        assert_eq!(scene.get(b).unwrap().parent(), Some(a));
        assert_eq!(scene.get(c).unwrap().parent(), Some(b));
    }

    #[test]
    fn remove_child_only_detaches_real_children() {
        let mut scene = active_scene();
        let a = scene.create_object("a");
        let b = scene.create_object("b");
        let c = scene.create_child(a, "c").unwrap();
        assert!(!scene.remove_child(b, c).unwrap());
        assert!(scene.remove_child(a, c).unwrap());
        assert_eq!(scene.roots(), &[a, b, c]);
    }

    #[test]
    fn detach_from_parent_keeps_world_position() {
        let mut scene = active_scene();
        let a = scene.create_object("a");
        let c = scene.create_child(a, "c").unwrap();
        scene.set_local_position(a, Vec2::new(4.0, 0.0)).unwrap();
        scene.set_local_rotation(a, FRAC_PI_2).unwrap();
        scene.set_local_position(c, Vec2::new(1.0, 0.0)).unwrap();

        assert!(scene.detach_from_parent(c).unwrap());
        assert!(!scene.detach_from_parent(c).unwrap());
        assert_eq!(scene.roots(), &[a, c]);
        let local = scene.local_transform(c).unwrap();
        assert!(local.position.approx_eq(Vec2::new(4.0, 1.0), 1e-4));
        assert!((local.rotation - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn dead_objects_reject_structural_changes() {
        let mut scene = active_scene();
        let a = scene.create_object("a");
        scene.destroy_object(a);
        assert!(matches!(scene.create_child(a, "x"), Err(EngineError::DeadObject { .. })));
        assert!(scene.add_component(a, Probe { label: "x", log: Log::default() }).is_err());
        let b = scene.create_object("b");
        assert!(scene.add_child(a, b).is_err());
    }

    #[test]
    fn explicit_renders_are_one_shot() {
        let log = Log::default();
        let mut scene = active_scene();
        let a = scene.create_object("a");
        let h = scene.add_component(a, probe("a", &log)).unwrap();
        assert!(scene.enqueue_render(h));
        assert_eq!(scene.take_explicit_renders(), vec![h]);
        assert!(scene.take_explicit_renders().is_empty());
    }

    #[test]
    fn release_clears_everything() {
        let mut scene = active_scene();
        scene.create_object("a");
        scene.destroy();
        assert_eq!(scene.state(), SceneState::PendingDestroy);
        scene.release();
        assert_eq!(scene.state(), SceneState::Destroyed);
        assert_eq!(scene.object_count(), 0);
        assert!(!scene.destroy());
    }
}
