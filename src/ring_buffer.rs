//! Defines `RingStore`, the fixed-capacity storage underneath a log feed.
//!
//! `RingStore` keeps the most recent `capacity` items in a circular array.
//! Once the array is full, every `add` evicts the oldest item and reuses its
//! slot; producers are never blocked or rejected.
//!
//! Writers take an exclusive `parking_lot::RwLock` for the duration of one
//! slot write. The logical size is additionally published through a
//! cache-padded atomic [`Cursor`] so that `len()` never touches the lock.
//! A reader that observes a size of `n` through `len()` is guaranteed to see
//! the fully written item at logical index `n - 1`, because the size is
//! published with `Release` inside the same critical section that wrote the
//! slot, and `get` re-reads it under the shared lock.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::sequence::Sequence;
use crate::snapshot::SnapshotCursor;
use parking_lot::RwLock;
use tracing::trace;

#[derive(Debug)]
struct Slots<T> {
    items: Box<[Option<T>]>,
    /// Physical slot of logical index 0.
    start: usize,
}

/// A fixed-capacity circular store with FIFO eviction.
///
/// Logical index `0` is always the oldest retained item and `len() - 1` the
/// newest. The physical slot of logical index `i` is
/// `(start + i) % capacity`.
#[derive(Debug)]
pub struct RingStore<T> {
    slots: RwLock<Slots<T>>,
    len: Cursor,
    capacity: usize,
}

impl<T> RingStore<T> {
    /// Creates an empty store able to retain `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let items = (0..capacity)
            .map(|_| None)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            slots: RwLock::new(Slots { items, start: 0 }),
            len: Cursor::new(0),
            capacity,
        })
    }

    /// Inserts `item` as the newest entry, evicting the oldest one if the
    /// store is full. Never blocks on fullness and never fails.
    pub fn add(&self, item: T) {
        let evicted = {
            let mut slots = self.slots.write();
            // Only mutated under the write lock, which we hold.
            let len = self.len.relaxed();

            if len < self.capacity {
                let slot = (slots.start + len) % self.capacity;
                slots.items[slot] = Some(item);
                self.len.publish(len + 1);
                None
            } else {
                let slot = slots.start;
                slots.start = (slot + 1) % self.capacity;
                slots.items[slot].replace(item)
            }
        };

        // Evicted item is dropped outside the critical section.
        if evicted.is_some() {
            trace!(capacity = self.capacity, "evicted oldest entry");
        }
    }

    /// Number of retained items. Grows by one per `add` until it reaches
    /// `capacity`, then stays there.
    #[inline]
    pub fn len(&self) -> usize {
        self.len.acquire()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> RingStore<T> {
    /// Reads the item at a logical index.
    ///
    /// The bounds check and the read happen under the same shared lock, so
    /// the item returned is the one at `index` at a single point in time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index < 0` or `index >= len()`.
    pub fn get(&self, index: i64) -> Result<T> {
        let slots = self.slots.read();
        let size = self.len.relaxed();

        index
            .physical_slot(slots.start, self.capacity, size)
            .and_then(|slot| slots.items[slot].clone())
            .ok_or(Error::OutOfRange { index, size })
    }

    /// Lazily walks up to `count` items starting at logical index `start_from`.
    ///
    /// A `start_from` outside `[0, len())` yields an empty sequence rather
    /// than an error, so a reader racing eviction never fails. A `count` that
    /// runs past the end is clamped to the items available now.
    ///
    /// The walk is not a point-in-time snapshot: each step is an independent
    /// [`RingStore::get`], so entries evicted mid-walk are replaced by newer
    /// ones at the same logical position. The bounds captured at creation are
    /// never exceeded.
    pub fn range(&self, start_from: i64, count: usize) -> SnapshotCursor<'_, T> {
        match usize::try_from(start_from) {
            Ok(start) if start < self.len() => SnapshotCursor::new(self, start, count),
            _ => SnapshotCursor::empty(self),
        }
    }

    /// Equivalent to `range(0, len())`.
    pub fn all(&self) -> SnapshotCursor<'_, T> {
        self.range(0, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn filled(capacity: usize, items: &[&'static str]) -> RingStore<&'static str> {
        let store = RingStore::new(capacity).unwrap();
        for item in items {
            store.add(*item);
        }
        store
    }

    #[test]
    fn test_ring_store_rejects_zero_capacity() {
        let err = RingStore::<u32>::new(0).unwrap_err();
        assert_eq!(err, Error::InvalidCapacity(0));
    }

    #[test]
    fn test_ring_store_capacity_one() {
        let store = filled(1, &["a", "b", "c"]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap(), "c");
    }

    #[test]
    fn test_ring_store_grows_until_full() {
        let store = RingStore::new(4).unwrap();
        assert!(store.is_empty());

        for (i, item) in [10, 20, 30].into_iter().enumerate() {
            store.add(item);
            assert_eq!(store.len(), i + 1);
        }

        assert_eq!(store.all().collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(store.capacity(), 4);
    }

    #[test]
    fn test_ring_store_fifo_eviction() {
        let store = filled(3, &["A", "B", "C"]);
        let before: Vec<_> = store.all().collect();

        store.add("D");
        let after: Vec<_> = store.all().collect();

        assert_eq!(store.len(), 3);
        assert_eq!(after[..2], before[1..]);
        assert_eq!(after[2], "D");
    }

    #[test]
    fn test_ring_store_keeps_most_recent_after_many_wraps() {
        let store = RingStore::new(5).unwrap();
        for i in 0..23 {
            store.add(i);
        }

        assert_eq!(store.len(), 5);
        assert_eq!(store.all().collect::<Vec<_>>(), vec![18, 19, 20, 21, 22]);
    }

    #[test]
    fn test_ring_store_get_bounds() {
        let store = filled(3, &["A", "B", "C", "D"]);

        assert_eq!(store.get(0).unwrap(), "B");
        assert_eq!(store.get(2).unwrap(), "D");
        assert_eq!(
            store.get(3).unwrap_err(),
            Error::OutOfRange { index: 3, size: 3 }
        );
        assert_eq!(
            store.get(-1).unwrap_err(),
            Error::OutOfRange { index: -1, size: 3 }
        );
    }

    #[test]
    fn test_ring_store_get_on_empty() {
        let store = RingStore::<u8>::new(2).unwrap();
        assert!(matches!(store.get(0), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_ring_store_range_clamping() {
        let store = filled(3, &["A", "B", "C", "D"]);

        assert_eq!(store.range(1, 5).collect::<Vec<_>>(), vec!["C", "D"]);
        assert_eq!(store.range(0, 1).collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(store.range(1, 0).count(), 0);
        assert_eq!(store.range(3, 1).count(), 0);
        assert_eq!(store.range(-1, 2).count(), 0);
        assert_eq!(store.range(2, usize::MAX).collect::<Vec<_>>(), vec!["D"]);
    }

    #[test]
    fn test_ring_store_concurrent_producers_and_reader() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 2_000;
        const CAPACITY: usize = 64;

        let store = RingStore::<(usize, usize)>::new(CAPACITY).unwrap();

        thread::scope(|s| {
            for producer in 0..PRODUCERS {
                let store = &store;
                s.spawn(move || {
                    for seq in 0..PER_PRODUCER {
                        store.add((producer, seq));
                    }
                });
            }

            s.spawn(|| {
                let mut last_size = 0;
                for _ in 0..500 {
                    let size = store.len();
                    assert!(size >= last_size, "size must never shrink");
                    assert!(size <= CAPACITY);
                    last_size = size;

                    // The newest published entry is fully visible.
                    if size > 0 {
                        assert!(store.get(size as i64 - 1).is_ok());
                    }

                    // Each producer's entries come back in the order it wrote them.
                    let mut seen = [None; PRODUCERS];
                    let mut walked = 0;
                    for (producer, seq) in store.all() {
                        if let Some(prev) = seen[producer] {
                            assert!(seq > prev);
                        }
                        seen[producer] = Some(seq);
                        walked += 1;
                    }
                    assert!(walked <= CAPACITY);
                }
            });
        });

        assert_eq!(store.len(), CAPACITY);
        assert_eq!(store.all().count(), CAPACITY);
    }
}
