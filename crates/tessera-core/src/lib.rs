//! Tessera core -- leaf types and host contracts for the Tessera 2D engine.
//!
//! Nothing in this crate knows about scenes or components. It provides the
//! pieces the engine layer composes:
//!
//! - [`math`]: `Vec2`, `Rect`, `Color`
//! - [`transform`]: local transforms and parent/child composition
//! - [`id`]: generational object ids
//! - [`random`]: the shared, seeded generator
//! - [`resources`]: named resource lookup with access counters
//! - [`input`] / [`surface`]: the contracts the host implements
//! - [`events`]: ordered listener lists
//! - [`inspect`]: static property descriptor tables
//!
//! # Quick Start
//!
//! ```
//! use tessera_core::prelude::*;
//!
//! let parent = Transform::from_position(Vec2::new(10.0, 10.0));
//! let child = Transform::from_position(Vec2::new(5.0, 5.0));
//! assert_eq!(parent.compose(&child).position, Vec2::new(15.0, 15.0));
//!
//! let random = Random::new(42);
//! let roll = random.range(0, 100);
//! assert!((0..100).contains(&roll));
//! ```

#![deny(unsafe_code)]

pub mod events;
pub mod id;
pub mod input;
pub mod inspect;
pub mod math;
pub mod random;
pub mod resources;
pub mod surface;
pub mod transform;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The inspected type has no property with this name.
    #[error("no property named '{name}'")]
    UnknownProperty { name: String },

    /// The property exists but has no setter.
    #[error("property '{name}' is read-only")]
    ReadOnlyProperty { name: String },

    /// The value's kind does not match the property's declared kind.
    #[error("property '{name}' expects {expected:?}, got {found:?}")]
    TypeMismatch {
        name: String,
        expected: inspect::ValueKind,
        found: inspect::ValueKind,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::events::{ListenerId, Listeners};
    pub use crate::id::{ComponentId, ObjectAllocator, ObjectId};
    pub use crate::input::{InputSource, InputState, KeyCode, MouseButton};
    pub use crate::inspect::{
        read_properties, read_property, write_property, Inspect, Property, PropertyValue,
        ValueKind,
    };
    pub use crate::math::{Color, Rect, Vec2};
    pub use crate::random::Random;
    pub use crate::resources::{Asset, AssetKind, Handle, Resources};
    pub use crate::surface::{DrawCmd, RecordingSurface, Surface, SurfaceOp};
    pub use crate::transform::Transform;
    pub use crate::CoreError;
}
