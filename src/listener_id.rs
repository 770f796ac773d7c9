use crossbeam_utils::CachePadded;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle for one listener registration.
///
/// Registering the same listener twice yields two distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct ListenerIds {
    id: CachePadded<AtomicU64>,
}

impl ListenerIds {
    pub(crate) fn next_id(&self) -> ListenerId {
        ListenerId(self.id.fetch_add(1, Ordering::Relaxed))
    }
}
