//! Per-frame render ordering.
//!
//! Every frame the [`RenderQueue`] is rebuilt from scratch:
//!
//! 1. The active scene is walked depth-first, pre-order. Every enabled,
//!    visible, auto-queued renderable whose owner is active in the hierarchy
//!    is collected.
//! 2. Components explicitly enqueued with
//!    [`Scene::enqueue_render`] since the last render are appended.
//! 3. Entries are sorted by [`RenderKey`]: queue, then z-offset, then
//!    collection order.
//!
//! Dispatch then calls each entry's draw hook exactly once, in sorted order.
//! Nothing carries over between frames, so a component removed or hidden this
//! frame is never drawn from a stale entry.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tessera_core::surface::Surface;
use tracing::trace;

use crate::component::ComponentHandle;
use crate::scene::Scene;

// ---------------------------------------------------------------------------
// QueueType
// ---------------------------------------------------------------------------

/// Coarse render pass. Every `Base` entry draws before any `Overlay` entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum QueueType {
    #[default]
    Base,
    Overlay,
}

// ---------------------------------------------------------------------------
// RenderKey
// ---------------------------------------------------------------------------

/// Total draw order.
///
/// 1. `queue`: `Base` before `Overlay`
/// 2. `z`: ascending (back-to-front)
/// 3. `seq`: ascending collection order, so equal keys keep traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderKey {
    pub queue: QueueType,
    pub z: i32,
    pub seq: u32,
}

impl Ord for RenderKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.queue
            .cmp(&other.queue)
            .then(self.z.cmp(&other.z))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for RenderKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// RenderQueue
// ---------------------------------------------------------------------------

/// One collected renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderEntry {
    pub key: RenderKey,
    pub handle: ComponentHandle,
}

/// Counters from one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Entries collected by the scene walk.
    pub collected: usize,
    /// Entries added through explicit enqueue.
    pub explicit: usize,
    /// Draw hooks actually invoked.
    pub drawn: usize,
}

/// Reusable sorted list of this frame's renderables.
///
/// `clear` keeps the allocation, so steady-state frames do not allocate.
#[derive(Debug, Default)]
pub struct RenderQueue {
    entries: Vec<RenderEntry>,
    next_seq: u32,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in draw order. Only sorted after [`rebuild`](Self::rebuild).
    pub fn entries(&self) -> &[RenderEntry] {
        &self.entries
    }

    /// Handles in draw order.
    pub fn handles(&self) -> impl Iterator<Item = ComponentHandle> + '_ {
        self.entries.iter().map(|e| e.handle)
    }

    fn push(&mut self, queue: QueueType, z: i32, handle: ComponentHandle) {
        let key = RenderKey {
            queue,
            z,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.push(RenderEntry { key, handle });
    }

    /// Collect and sort this frame's entries from `scene`.
    ///
    /// `explicit` lists components enqueued by hand; handles that are
    /// already collected, detached, disabled, hidden or owned by an inactive
    /// object are skipped.
    pub fn rebuild(&mut self, scene: &Scene, explicit: &[ComponentHandle]) -> RenderStats {
        self.clear();
        let mut stats = RenderStats::default();

        for id in scene.walk_active() {
            let Some(go) = scene.get(id) else { continue };
            for slot in &go.components {
                if !slot.enabled {
                    continue;
                }
                let Some(r) = slot.get().and_then(|c| c.as_renderable()) else {
                    continue;
                };
                if r.visible() && r.auto_queue() {
                    self.push(
                        r.queue_type(),
                        r.z_offset(),
                        ComponentHandle {
                            object: id,
                            id: slot.id,
                        },
                    );
                    stats.collected += 1;
                }
            }
        }

        for &handle in explicit {
            if self.entries.iter().any(|e| e.handle == handle) {
                continue;
            }
            if !scene.is_component_enabled(handle)
                || !scene.is_active_in_hierarchy(handle.object)
            {
                continue;
            }
            let Some(r) = scene.component_dyn(handle).and_then(|c| c.as_renderable()) else {
                continue;
            };
            if r.visible() {
                self.push(r.queue_type(), r.z_offset(), handle);
                stats.explicit += 1;
            }
        }

        self.entries.sort_unstable_by_key(|e| e.key);
        trace!(
            collected = stats.collected,
            explicit = stats.explicit,
            "render queue rebuilt"
        );
        stats
    }

    /// Invoke every entry's draw hook once, in order.
    ///
    /// Returns the number of hooks invoked.
    pub fn dispatch(&self, scene: &Scene, surface: &mut dyn Surface) -> usize {
        let mut drawn = 0;
        for entry in &self.entries {
            let Some(world) = scene.world_transform(entry.handle.object) else {
                continue;
            };
            if let Some(r) = scene
                .component_dyn(entry.handle)
                .and_then(|c| c.as_renderable())
            {
                r.draw(surface, &world);
                drawn += 1;
            }
        }
        drawn
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn key(queue: QueueType, z: i32, seq: u32) -> RenderKey {
        RenderKey { queue, z, seq }
    }

    #[test]
    fn queue_dominates_z() {
        assert!(key(QueueType::Base, 1000, 9) < key(QueueType::Overlay, -1000, 0));
    }

    #[test]
    fn z_then_sequence() {
        assert!(key(QueueType::Base, -1, 5) < key(QueueType::Base, 0, 0));
        assert!(key(QueueType::Base, 3, 1) < key(QueueType::Base, 3, 2));
    }

    #[test]
    fn sorting_keeps_collection_order_for_ties() {
        let mut keys = vec![
            key(QueueType::Overlay, 0, 0),
            key(QueueType::Base, 2, 1),
            key(QueueType::Base, 1, 2),
            key(QueueType::Base, 2, 3),
            key(QueueType::Base, 1, 4),
        ];
        keys.sort_unstable();
        let seqs: Vec<u32> = keys.iter().map(|k| k.seq).collect();
        assert_eq!(seqs, vec![2, 4, 1, 3, 0]);
    }

    #[test]
    fn queue_type_defaults_to_base() {
        assert_eq!(QueueType::default(), QueueType::Base);
    }
}
