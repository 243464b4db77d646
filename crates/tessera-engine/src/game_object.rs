//! Scene graph nodes.
//!
//! A [`GameObject`] is a named node with a local [`Transform`], an ordered
//! list of attached components and an ordered list of children. Objects are
//! owned by their [`Scene`](crate::scene::Scene); structural changes
//! (creating, parenting, destroying, attaching) go through the scene so the
//! parent/child links stay consistent. Per-object state such as the name,
//! the enabled flag and the local transform is edited here directly.

use tessera_core::id::{ComponentId, ObjectId};
use tessera_core::math::Vec2;
use tessera_core::transform::Transform;

use crate::component::{Component, ComponentHandle, Renderable};

// ---------------------------------------------------------------------------
// ComponentSlot
// ---------------------------------------------------------------------------

/// Storage for one attached component.
///
/// `component` is `None` only while the component is lent out to one of its
/// own hooks.
pub(crate) struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) enabled: bool,
    pub(crate) started: bool,
    /// Removed by the user; the slot is dropped at the next drain.
    pub(crate) detached: bool,
    pub(crate) component: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    pub(crate) fn new(id: ComponentId, component: Box<dyn Component>) -> Self {
        Self {
            id,
            enabled: true,
            started: false,
            detached: false,
            component: Some(component),
        }
    }

    pub(crate) fn get(&self) -> Option<&(dyn Component + 'static)> {
        if self.detached {
            return None;
        }
        self.component.as_deref()
    }

    pub(crate) fn get_mut(&mut self) -> Option<&mut (dyn Component + 'static)> {
        if self.detached {
            return None;
        }
        self.component.as_deref_mut()
    }
}

// ---------------------------------------------------------------------------
// GameObject
// ---------------------------------------------------------------------------

/// A node in a scene's object hierarchy.
pub struct GameObject {
    id: ObjectId,
    name: String,
    enabled: bool,
    destroyed: bool,
    transform: Transform,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    pub(crate) components: Vec<ComponentSlot>,
}

impl GameObject {
    pub(crate) fn new(id: ObjectId, name: String, parent: Option<ObjectId>) -> Self {
        Self {
            id,
            name,
            enabled: true,
            destroyed: false,
            transform: Transform::IDENTITY,
            parent,
            children: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The object's own flag. Whether it actually ticks also depends on its
    /// ancestors; see [`Scene::is_active_in_hierarchy`](crate::scene::Scene::is_active_in_hierarchy).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// `true` once destroy was requested, even before the object is released.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    /// Children in attach order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<ObjectId> {
        &mut self.children
    }

    /// Local transform, relative to the parent.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn local_position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn set_local_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    pub fn local_rotation(&self) -> f32 {
        self.transform.rotation
    }

    pub fn set_local_rotation(&mut self, radians: f32) {
        self.transform.rotation = radians;
    }

    // -- components -----------------------------------------------------------

    /// Number of attached components, not counting removed ones.
    pub fn component_count(&self) -> usize {
        self.components.iter().filter(|s| !s.detached).count()
    }

    /// Handles of attached components, in attach order.
    pub fn component_handles(&self) -> Vec<ComponentHandle> {
        self.components
            .iter()
            .filter(|s| !s.detached)
            .map(|s| ComponentHandle {
                object: self.id,
                id: s.id,
            })
            .collect()
    }

    /// First attached component of type `C`.
    ///
    /// A component whose hook is currently running is not visible here.
    pub fn get_component<C: Component>(&self) -> Option<&C> {
        self.components
            .iter()
            .filter_map(ComponentSlot::get)
            .find_map(|c| c.downcast_ref::<C>())
    }

    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .filter_map(ComponentSlot::get_mut)
            .find_map(|c| c.downcast_mut::<C>())
    }

    /// Every attached component of type `C`, in attach order.
    pub fn get_components<C: Component>(&self) -> impl Iterator<Item = &C> {
        self.components
            .iter()
            .filter_map(ComponentSlot::get)
            .filter_map(|c| c.downcast_ref::<C>())
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.get_component::<C>().is_some()
    }

    /// First attached component that can render.
    pub fn first_renderable(&self) -> Option<(ComponentHandle, &dyn Renderable)> {
        self.components.iter().find_map(|slot| {
            let r = slot.get()?.as_renderable()?;
            Some((
                ComponentHandle {
                    object: self.id,
                    id: slot.id,
                },
                r,
            ))
        })
    }

    pub(crate) fn slot(&self, id: ComponentId) -> Option<&ComponentSlot> {
        self.components.iter().find(|s| s.id == id)
    }

    pub(crate) fn slot_mut(&mut self, id: ComponentId) -> Option<&mut ComponentSlot> {
        self.components.iter_mut().find(|s| s.id == id)
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("destroyed", &self.destroyed)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.component_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag(&'static str);
    impl Component for Tag {}

    struct Other;
    impl Component for Other {}

    fn object_with(components: Vec<Box<dyn Component>>) -> GameObject {
        let mut go = GameObject::new(ObjectId::new(0, 0), "obj".into(), None);
        for (i, c) in components.into_iter().enumerate() {
            go.components.push(ComponentSlot::new(ComponentId(i as u64), c));
        }
        go
    }

    #[test]
    fn typed_lookup_returns_first_match() {
        let go = object_with(vec![Box::new(Other), Box::new(Tag("a")), Box::new(Tag("b"))]);
        assert_eq!(go.get_component::<Tag>().map(|t| t.0), Some("a"));
        let all: Vec<_> = go.get_components::<Tag>().map(|t| t.0).collect();
        assert_eq!(all, vec!["a", "b"]);
        assert!(go.has_component::<Other>());
    }

    #[test]
    fn detached_and_lent_components_are_hidden() {
        let mut go = object_with(vec![Box::new(Tag("a")), Box::new(Tag("b"))]);
        go.components[0].detached = true;
        assert_eq!(go.get_component::<Tag>().map(|t| t.0), Some("b"));
        assert_eq!(go.component_count(), 1);

        let lent = go.components[1].component.take();
        assert!(go.get_component::<Tag>().is_none());
        go.components[1].component = lent;
        assert!(go.get_component::<Tag>().is_some());
    }

    #[test]
    fn mutable_lookup_edits_in_place() {
        let mut go = object_with(vec![Box::new(Tag("a"))]);
        go.get_component_mut::<Tag>().unwrap().0 = "z";
        assert_eq!(go.get_component::<Tag>().unwrap().0, "z");
    }

    #[test]
    fn no_renderable_on_plain_components() {
        let go = object_with(vec![Box::new(Tag("a"))]);
        assert!(go.first_renderable().is_none());
    }
}
