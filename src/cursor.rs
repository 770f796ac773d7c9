use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cache-padded counter holding the number of entries a store has made visible.
///
/// Only the writer holding the store's exclusive lock calls [`Cursor::publish`];
/// everyone else reads it without locking.
#[derive(Debug, Default)]
pub(crate) struct Cursor {
    value: CachePadded<AtomicUsize>,
}

impl Cursor {
    pub(crate) fn new(val: usize) -> Self {
        Self {
            value: CachePadded::new(AtomicUsize::new(val)),
        }
    }

    /// Makes `val` visible to readers. Pairs with [`Cursor::acquire`].
    #[inline]
    pub(crate) fn publish(&self, val: usize) {
        self.value.store(val, Ordering::Release);
    }

    #[inline]
    pub(crate) fn acquire(&self) -> usize {
        self.value.load(Ordering::Acquire)
    }

    /// For callers already serialized with the writer by a lock.
    #[inline]
    pub(crate) fn relaxed(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }
}
