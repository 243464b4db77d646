//! Named resource lookup.
//!
//! Loading and disposal of textures, fonts, sounds and shaders belongs to the
//! host application. The engine only needs to find an already-built value by
//! name, so [`Resources`] is a typed name → value map with a per-entry access
//! counter (useful for spotting unused or hot assets).
//!
//! Values are shared through [`Handle`]s. A handle never converts implicitly
//! into its value; call [`Handle::get`].

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Shared, typed reference to a registered resource.
pub struct Handle<T> {
    name: Rc<str>,
    value: Rc<T>,
}

impl<T> Handle<T> {
    /// The resource value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// The name the resource was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if both handles point at the same registered value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            value: Rc::clone(&self.value),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// What kind of backend asset a blob of source data describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Font,
    Sound,
    Shader,
}

/// Source data for a backend asset, handed over by the host.
///
/// The engine never decodes it; it only carries it to whoever draws or plays
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    kind: AssetKind,
    bytes: Vec<u8>,
}

impl Asset {
    /// Wrap source data.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty. An asset without source data is a
    /// programming error and is never recoverable.
    pub fn from_bytes(kind: AssetKind, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        assert!(!bytes.is_empty(), "{kind:?} asset constructed without source data");
        Self { kind, bytes }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

struct Entry {
    name: Rc<str>,
    type_id: TypeId,
    type_name: &'static str,
    value: Rc<dyn Any>,
    accesses: Cell<u64>,
}

/// Typed name → value registry with per-entry access counters.
#[derive(Default)]
pub struct Resources {
    entries: BTreeMap<String, Entry>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `name`, replacing any previous entry.
    ///
    /// Returns `true` if an entry was replaced. The access counter restarts
    /// at zero for the new value.
    pub fn insert<T: 'static>(&mut self, name: &str, value: T) -> bool {
        let entry = Entry {
            name: Rc::from(name),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Rc::new(value),
            accesses: Cell::new(0),
        };
        self.entries.insert(name.to_owned(), entry).is_some()
    }

    /// Look up `name` as a `T`.
    ///
    /// Every lookup that finds the name counts as an access, even when the
    /// stored value has a different type. Returns `None` for a missing name
    /// or a type mismatch.
    pub fn get<T: 'static>(&self, name: &str) -> Option<Handle<T>> {
        let entry = self.entries.get(name)?;
        entry.accesses.set(entry.accesses.get() + 1);
        if entry.type_id != TypeId::of::<T>() {
            tracing::debug!(
                resource = name,
                stored = entry.type_name,
                requested = std::any::type_name::<T>(),
                "resource lookup with mismatched type"
            );
            return None;
        }
        let value = Rc::clone(&entry.value).downcast::<T>().ok()?;
        Some(Handle {
            name: Rc::clone(&entry.name),
            value,
        })
    }

    /// How many lookups have hit `name` so far.
    pub fn access_count(&self, name: &str) -> Option<u64> {
        self.entries.get(name).map(|e| e.accesses.get())
    }

    /// Remove `name`. Outstanding handles keep their value alive.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, e)| (name, (e.type_name, e.accesses.get()))),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
