//! Object and component identifiers.
//!
//! An [`ObjectId`] is a 64-bit handle that packs a *generation* counter in the
//! high 32 bits and a slot *index* in the low 32 bits. The generation is bumped
//! every time a slot is released, so a handle to a released object can never
//! resolve to whatever reuses its slot later.
//!
//! [`ComponentId`]s are never recycled; a scene hands them out from a
//! monotonically increasing counter.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// A generational game object identifier.
///
/// Layout: `[generation: u32 | index: u32]`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    /// The slot index (low 32 bits).
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// The generation (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// ComponentId
// ---------------------------------------------------------------------------

/// Identifier of an attached component, unique within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ObjectAllocator
// ---------------------------------------------------------------------------

/// Allocates and recycles [`ObjectId`]s with generational tracking.
///
/// Free indices are kept in a FIFO queue so that generations are spread out
/// over time rather than concentrated on a hot slot.
#[derive(Debug, Default)]
pub struct ObjectAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_indices: VecDeque<u32>,
}

impl ObjectAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh [`ObjectId`], reusing a released slot if one is free.
    pub fn allocate(&mut self) -> ObjectId {
        if let Some(index) = self.free_indices.pop_front() {
            // Generation was already bumped on release.
            self.alive[index as usize] = true;
            ObjectId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            ObjectId::new(index, 0)
        }
    }

    /// Release `id`, bumping its slot generation so outstanding handles go
    /// stale.
    ///
    /// Returns `false` if the id was already released or never allocated.
    pub fn release(&mut self, id: ObjectId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let idx = id.index() as usize;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_indices.push_back(id.index());
        true
    }

    /// `true` if `id` refers to an allocated slot of the current generation.
    pub fn is_live(&self, id: ObjectId) -> bool {
        let idx = id.index() as usize;
        idx < self.generations.len() && self.alive[idx] && self.generations[idx] == id.generation()
    }

    /// Number of currently allocated ids.
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Number of slots ever created (upper bound for indices).
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    /// Release every id at once.
    pub fn clear(&mut self) {
        for idx in 0..self.generations.len() {
            if self.alive[idx] {
                self.alive[idx] = false;
                self.generations[idx] = self.generations[idx].wrapping_add(1);
                self.free_indices.push_back(idx as u32);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_unique_ids() {
        let mut alloc = ObjectAllocator::new();
        let ids: Vec<ObjectId> = (0..100).map(|_| alloc.allocate()).collect();
        let mut indices: Vec<u32> = ids.iter().map(|id| id.index()).collect();
        indices.sort();
        indices.dedup();
        assert_eq!(indices.len(), 100);
    }

    #[test]
    fn generation_increments_on_recycle() {
        let mut alloc = ObjectAllocator::new();
        let a = alloc.allocate();
        assert_eq!(a.generation(), 0);
        assert!(alloc.release(a));
        let b = alloc.allocate();
        assert_eq!(b.index(), a.index());
        assert_eq!(b.generation(), 1);
    }

    #[test]
    fn stale_id_never_revives() {
        let mut alloc = ObjectAllocator::new();
        let a = alloc.allocate();
        alloc.release(a);
        let _b = alloc.allocate();
        assert!(!alloc.is_live(a));
    }

    #[test]
    fn double_release_returns_false() {
        let mut alloc = ObjectAllocator::new();
        let a = alloc.allocate();
        assert!(alloc.release(a));
        assert!(!alloc.release(a));
    }

    #[test]
    fn clear_releases_everything() {
        let mut alloc = ObjectAllocator::new();
        let ids: Vec<_> = (0..5).map(|_| alloc.allocate()).collect();
        alloc.clear();
        assert_eq!(alloc.live_count(), 0);
        assert!(ids.iter().all(|id| !alloc.is_live(*id)));
    }

    #[test]
    fn raw_roundtrip() {
        let id = ObjectId::new(42, 7);
        assert_eq!(ObjectId::from_raw(id.to_raw()), id);
        assert_eq!(id.to_string(), "42v7");
    }
}
