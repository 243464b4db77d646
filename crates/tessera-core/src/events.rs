//! Ordered listener lists.
//!
//! A [`Listeners`] is an explicit multicast slot: callers subscribe boxed
//! closures, get a [`ListenerId`] back, and unsubscribe with that id. The
//! owner invokes listeners synchronously, in registration order, by walking
//! [`Listeners::iter_mut`]. Nothing is dropped implicitly.
//!
//! `F` is usually an unsized closure type such as
//! `dyn FnMut(&ClickEvent)`, which lets the owner decide the call signature.
//!
//! ```
//! use tessera_core::events::Listeners;
//!
//! let mut on_score: Listeners<dyn FnMut(u32) -> u32> = Listeners::new();
//! let id = on_score.subscribe(Box::new(|n| n * 2));
//! on_score.subscribe(Box::new(|n| n + 1));
//!
//! let results: Vec<u32> = on_score.iter_mut().map(|f| f(10)).collect();
//! assert_eq!(results, vec![20, 11]);
//!
//! assert!(on_score.unsubscribe(id));
//! assert_eq!(on_score.len(), 1);
//! ```

use std::fmt;

/// Identifier returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registration-ordered list of boxed listeners.
pub struct Listeners<F: ?Sized> {
    entries: Vec<(ListenerId, Box<F>)>,
    next_id: u64,
}

impl<F: ?Sized> Listeners<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a listener; it runs after every listener already registered.
    pub fn subscribe(&mut self, listener: Box<F>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        match self.entries.iter().position(|(eid, _)| *eid == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listeners in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<F>> {
        self.entries.iter_mut().map(|(_, f)| f)
    }
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for Listeners<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
