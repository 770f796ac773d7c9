/// Maps a logical index (0 = oldest retained entry) onto a physical slot.
pub(crate) trait Sequence: Sized {
    /// Returns `None` when the index does not address one of the `len`
    /// retained entries.
    fn physical_slot(self, start: usize, capacity: usize, len: usize) -> Option<usize>;
}

impl Sequence for i64 {
    #[inline]
    fn physical_slot(self, start: usize, capacity: usize, len: usize) -> Option<usize> {
        let logical = usize::try_from(self).ok().filter(|&i| i < len)?;
        Some((start + logical) % capacity)
    }
}
