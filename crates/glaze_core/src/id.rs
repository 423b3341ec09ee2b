//! Filter identity allocation
//!
//! Every mounted glass surface binds its distortion layer to a filter
//! definition through a [`FilterId`]. Identities come from a
//! [`FilterIdAllocator`] that is created once and passed to whoever mounts
//! surfaces; there is no module-level counter.
//!
//! Identities are never reused, so a surface that unmounts cannot have its id
//! handed to a newer surface that still has a stale reference in flight.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Unique identifier binding a surface layer to its own filter definition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(u64);

impl FilterId {
    /// Prefix for the element id used in generated SVG markup
    pub const PREFIX: &'static str = "glaze-filter";

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Id usable as an SVG/HTML element id (`glaze-filter-7`)
    pub fn element_id(&self) -> String {
        format!("{}-{}", Self::PREFIX, self.0)
    }

    /// `url(#...)` reference to the filter element
    pub fn url(&self) -> String {
        format!("url(#{})", self.element_id())
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::PREFIX, self.0)
    }
}

/// Collision-free source of [`FilterId`]s.
///
/// Allocation is a single atomic increment, so interleaved calls from
/// surfaces mounting at the same time (or from several threads sharing the
/// allocator behind an `Arc`) never observe the same value.
#[derive(Debug)]
pub struct FilterIdAllocator {
    next: AtomicU64,
    live: AtomicUsize,
}

impl FilterIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            live: AtomicUsize::new(0),
        }
    }

    /// Allocate a fresh identity
    pub fn allocate(&self) -> FilterId {
        let id = FilterId(self.next.fetch_add(1, Ordering::Relaxed));
        self.live.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("allocated filter id {}", id);
        id
    }

    /// Mark an identity as discarded (its owner unmounted).
    ///
    /// The value is retired, not recycled.
    pub fn release(&self, id: FilterId) {
        let _ = self
            .live
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
        tracing::trace!("released filter id {}", id);
    }

    /// Number of identities allocated and not yet released
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Total number of identities ever handed out
    pub fn allocated_count(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for FilterIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_are_distinct() {
        let alloc = FilterIdAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_ne!(a, b);
        assert_eq!(a.element_id(), "glaze-filter-1");
        assert_eq!(b.url(), "url(#glaze-filter-2)");
    }

    #[test]
    fn test_release_does_not_recycle() {
        let alloc = FilterIdAllocator::new();
        let a = alloc.allocate();
        alloc.release(a);
        let b = alloc.allocate();
        assert_ne!(a, b);
        assert_eq!(alloc.live_count(), 1);
        assert_eq!(alloc.allocated_count(), 2);
    }

    #[test]
    fn test_release_never_underflows() {
        let alloc = FilterIdAllocator::new();
        let a = alloc.allocate();
        alloc.release(a);
        alloc.release(a);
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn test_interleaved_allocation_is_collision_free() {
        let alloc = Arc::new(FilterIdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let alloc = alloc.clone();
                std::thread::spawn(move || (0..250).map(|_| alloc.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
