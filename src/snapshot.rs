use crate::ring_buffer::RingStore;
use std::iter::FusedIterator;

/// Lazy, bounds-checked walk over a logical window of a [`RingStore`].
///
/// Created by [`RingStore::range`] and [`RingStore::all`]. The window end is
/// fixed when the cursor is created: `min(start_from + count, len())`. No
/// lock is held between steps; every step is one independent `get`.
///
/// Entries appended after creation are never yielded, but if the store evicts
/// while the walk is in progress, later positions resolve to newer entries
/// than they held at creation time.
#[derive(Debug)]
pub struct SnapshotCursor<'a, T> {
    store: &'a RingStore<T>,
    current: usize,
    max_index: usize,
}

impl<'a, T> SnapshotCursor<'a, T> {
    pub(crate) fn new(store: &'a RingStore<T>, start_from: usize, count: usize) -> Self {
        let end_index = store.len();
        Self {
            store,
            current: start_from,
            max_index: start_from.saturating_add(count).min(end_index),
        }
    }

    pub(crate) fn empty(store: &'a RingStore<T>) -> Self {
        Self {
            store,
            current: 0,
            max_index: 0,
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.max_index.saturating_sub(self.current)
    }
}

impl<T: Clone> Iterator for SnapshotCursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.current >= self.max_index {
            return None;
        }

        // `current` is below a size the store has already published, and
        // that size never shrinks, so this only fails on index overflow.
        let index = i64::try_from(self.current).ok()?;
        match self.store.get(index) {
            Ok(item) => {
                self.current += 1;
                Some(item)
            }
            Err(_) => {
                self.current = self.max_index;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl<T: Clone> FusedIterator for SnapshotCursor<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::ring_buffer::RingStore;

    #[test]
    fn test_snapshot_ignores_later_appends() {
        let store = RingStore::new(8).unwrap();
        store.add(1);
        store.add(2);

        let mut cursor = store.all();
        store.add(3);

        assert_eq!(cursor.next(), Some(1));
        assert_eq!(cursor.next(), Some(2));
        assert_eq!(cursor.next(), None);
        // Fused.
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_snapshot_sees_newer_entries_after_eviction() {
        let store = RingStore::new(3).unwrap();
        for i in 0..3 {
            store.add(i);
        }

        let mut cursor = store.all();
        assert_eq!(cursor.next(), Some(0));

        // Two evictions shift logical positions by two.
        store.add(3);
        store.add(4);

        assert_eq!(cursor.next(), Some(3));
        assert_eq!(cursor.next(), Some(4));
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_snapshot_size_hint() {
        let store = RingStore::new(4).unwrap();
        for i in 0..4 {
            store.add(i);
        }

        let mut cursor = store.range(1, 2);
        assert_eq!(cursor.size_hint(), (0, Some(2)));
        cursor.next();
        assert_eq!(cursor.size_hint(), (0, Some(1)));
        cursor.next();
        assert_eq!(cursor.size_hint(), (0, Some(0)));

        assert_eq!(store.range(9, 2).size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_each_call_restarts() {
        let store = RingStore::new(4).unwrap();
        store.add('x');
        store.add('y');

        assert_eq!(store.all().collect::<String>(), "xy");
        assert_eq!(store.all().collect::<String>(), "xy");
    }
}
