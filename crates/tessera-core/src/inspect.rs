//! Compile-time property descriptor tables for generic inspectors.
//!
//! Instead of enumerating members at runtime, a type that wants to be
//! inspectable implements [`Inspect`] and lists its editable members once,
//! as a static table of [`Property`] descriptors (name, value kind, getter,
//! optional setter). An editor UI can then read and write any inspectable
//! type through [`read_properties`] and [`write_property`] without knowing
//! the concrete type.
//!
//! ```
//! use tessera_core::inspect::{Inspect, Property, PropertyValue, ValueKind, read_properties, write_property};
//!
//! struct Health { current: i64, regen: f64 }
//!
//! impl Inspect for Health {
//!     const PROPERTIES: &'static [Property<Self>] = &[
//!         Property {
//!             name: "current",
//!             kind: ValueKind::Int,
//!             get: |h| PropertyValue::Int(h.current),
//!             set: Some(|h, v| if let PropertyValue::Int(n) = v { h.current = n }),
//!         },
//!         Property {
//!             name: "regen",
//!             kind: ValueKind::Float,
//!             get: |h| PropertyValue::Float(h.regen),
//!             set: None,
//!         },
//!     ];
//! }
//!
//! let mut hp = Health { current: 10, regen: 0.5 };
//! write_property(&mut hp, "current", PropertyValue::Int(7)).unwrap();
//! assert_eq!(read_properties(&hp)[0].1, PropertyValue::Int(7));
//! assert!(write_property(&mut hp, "regen", PropertyValue::Float(1.0)).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::math::{Color, Vec2};
use crate::CoreError;

/// The kind of value a property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Vec2,
    Color,
}

/// A dynamically typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Vec2(Vec2),
    Color(Color),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Color(_) => ValueKind::Color,
        }
    }
}

/// One entry of a type's descriptor table.
///
/// `set` receives a value whose kind already matches `kind`; setters only
/// need to destructure it. A `None` setter marks the property read-only.
pub struct Property<C> {
    pub name: &'static str,
    pub kind: ValueKind,
    pub get: fn(&C) -> PropertyValue,
    pub set: Option<fn(&mut C, PropertyValue)>,
}

impl<C> Property<C> {
    pub fn is_read_only(&self) -> bool {
        self.set.is_none()
    }
}

/// A type with a static property descriptor table.
pub trait Inspect: Sized + 'static {
    const PROPERTIES: &'static [Property<Self>];

    fn property(name: &str) -> Option<&'static Property<Self>> {
        Self::PROPERTIES.iter().find(|p| p.name == name)
    }
}

/// Read every property of `value`, in table order.
pub fn read_properties<C: Inspect>(value: &C) -> Vec<(&'static str, PropertyValue)> {
    C::PROPERTIES
        .iter()
        .map(|p| (p.name, (p.get)(value)))
        .collect()
}

/// Read one property by name.
pub fn read_property<C: Inspect>(value: &C, name: &str) -> Option<PropertyValue> {
    C::property(name).map(|p| (p.get)(value))
}

/// Write one property by name, checking that it exists, is writable and
/// that the value kind matches.
pub fn write_property<C: Inspect>(
    value: &mut C,
    name: &str,
    new_value: PropertyValue,
) -> Result<(), CoreError> {
    let prop = C::property(name).ok_or_else(|| CoreError::UnknownProperty {
        name: name.to_owned(),
    })?;
    let set = prop.set.ok_or_else(|| CoreError::ReadOnlyProperty {
        name: name.to_owned(),
    })?;
    if new_value.kind() != prop.kind {
        return Err(CoreError::TypeMismatch {
            name: name.to_owned(),
            expected: prop.kind,
            found: new_value.kind(),
        });
    }
    set(value, new_value);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
