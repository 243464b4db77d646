//! Serializable scene outline for inspectors and debugging.
//!
//! [`Scene::outline`] captures the live object tree as plain data: every
//! object with its local transform and its attached components, each with
//! the property values it exposes. The outline is a read-only view; it is
//! built fresh on each call and never fed back into the scene.

use serde::{Deserialize, Serialize};
use tessera_core::id::{ComponentId, ObjectId};
use tessera_core::inspect::PropertyValue;
use tessera_core::transform::Transform;

use crate::scene::{Scene, SceneState};

// ---------------------------------------------------------------------------
// Outline types
// ---------------------------------------------------------------------------

/// One inspectable property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub name: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentOutline {
    pub id: ComponentId,
    pub type_name: String,
    pub enabled: bool,
    /// Properties in the component's declaration order.
    pub properties: Vec<PropertyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectOutline {
    pub id: ObjectId,
    pub name: String,
    pub enabled: bool,
    /// Local transform.
    pub transform: Transform,
    pub components: Vec<ComponentOutline>,
    pub children: Vec<ObjectOutline>,
}

/// Snapshot of a scene's live hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneOutline {
    pub name: String,
    pub state: SceneState,
    pub roots: Vec<ObjectOutline>,
}

impl SceneOutline {
    /// Total number of objects in the outline.
    pub fn object_count(&self) -> usize {
        fn count(o: &ObjectOutline) -> usize {
            1 + o.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    /// Depth-first search by object name.
    pub fn find(&self, name: &str) -> Option<&ObjectOutline> {
        fn search<'a>(o: &'a ObjectOutline, name: &str) -> Option<&'a ObjectOutline> {
            if o.name == name {
                return Some(o);
            }
            o.children.iter().find_map(|c| search(c, name))
        }
        self.roots.iter().find_map(|r| search(r, name))
    }
}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

impl Scene {
    /// Capture the live object tree. Destroyed objects are left out.
    pub fn outline(&self) -> SceneOutline {
        SceneOutline {
            name: self.name().to_owned(),
            state: self.state(),
            roots: self
                .roots()
                .iter()
                .filter_map(|&id| self.outline_object(id))
                .collect(),
        }
    }

    fn outline_object(&self, id: ObjectId) -> Option<ObjectOutline> {
        let go = self.get(id).filter(|go| !go.is_destroyed())?;
        let components = go
            .component_handles()
            .into_iter()
            .filter_map(|handle| {
                let component = self.component_dyn(handle)?;
                Some(ComponentOutline {
                    id: handle.id,
                    type_name: component.type_name().to_owned(),
                    enabled: self.is_component_enabled(handle),
                    properties: component
                        .inspect()
                        .into_iter()
                        .map(|(name, value)| PropertyEntry {
                            name: name.to_owned(),
                            value,
                        })
                        .collect(),
                })
            })
            .collect();
        Some(ObjectOutline {
            id,
            name: go.name().to_owned(),
            enabled: go.is_enabled(),
            transform: *go.transform(),
            components,
            children: go
                .children()
                .iter()
                .filter_map(|&child| self.outline_object(child))
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
