//! Defines `ChangeBroadcaster`, the registry that fans out "log changed"
//! notifications.
//!
//! Subscriber churn is rare and notification happens on every append, so the
//! two paths are priced differently:
//!
//! 1. `subscribe` / `unsubscribe` take the exclusive side of a
//!    `parking_lot::RwLock` over the registration list and clear the cached
//!    snapshot while still holding it.
//! 2. `notify_all` loads the cached snapshot through an `ArcSwapOption`. On a
//!    miss it materializes the list under the shared lock and stores the
//!    result before releasing it, so a snapshot can never be cached after a
//!    mutation that should have invalidated it. Two threads rebuilding at once
//!    produce equal snapshots and either may win.
//!
//! Listeners always run with no lock held, on the notifying thread, in
//! registration order.

use crate::error::ListenerFailure;
use crate::listener_id::{ListenerId, ListenerIds};
use arc_swap::ArcSwapOption;
use parking_lot::RwLock;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Receives a notification every time the backing log changes.
///
/// A listener signals failure by panicking. The panic is caught, reported,
/// and does not stop delivery to the other listeners. Builds compiled with
/// `panic = "abort"` cannot isolate listener panics.
pub trait LogChangeListener: Send + Sync {
    fn on_log_changed(&self);
}

impl<F> LogChangeListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_log_changed(&self) {
        self()
    }
}

type Listener = Arc<dyn LogChangeListener>;

struct Registration {
    id: ListenerId,
    listener: Listener,
}

/// Copy-on-write registry of [`LogChangeListener`]s.
#[derive(Default)]
pub struct ChangeBroadcaster {
    ids: ListenerIds,
    listeners: RwLock<Vec<Registration>>,
    /// `None` after any mutation until the next `notify_all` rebuilds it.
    active: ArcSwapOption<Vec<Listener>>,
}

impl fmt::Debug for ChangeBroadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBroadcaster")
            .field("listeners", &self.listeners.read().len())
            .field("cached", &self.active.load().is_some())
            .finish()
    }
}

impl ChangeBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`. The same listener may be registered more than
    /// once and is then invoked once per registration.
    ///
    /// Any `Arc<L>` with `L: LogChangeListener` coerces at the call site, as
    /// does an already type-erased `Arc<dyn LogChangeListener>`.
    pub fn subscribe(&self, listener: Arc<dyn LogChangeListener>) -> ListenerId {
        let (id, total) = {
            let mut listeners = self.listeners.write();
            let id = self.ids.next_id();
            listeners.push(Registration { id, listener });
            self.active.store(None);
            (id, listeners.len())
        };

        debug!(%id, total, "log change listener registered");
        id
    }

    /// Removes the earliest registration of `listener`, compared by pointer.
    /// Returns `false` if it was not registered.
    pub fn unsubscribe<L>(&self, listener: &Arc<L>) -> bool
    where
        L: LogChangeListener + ?Sized,
    {
        let target = Arc::as_ptr(listener);
        self.remove_where(|reg| std::ptr::addr_eq(Arc::as_ptr(&reg.listener), target))
    }

    /// Removes exactly the registration identified by `id`.
    pub fn unsubscribe_id(&self, id: ListenerId) -> bool {
        self.remove_where(|reg| reg.id == id)
    }

    fn remove_where(&self, matches: impl Fn(&Registration) -> bool) -> bool {
        let (removed, total) = {
            let mut listeners = self.listeners.write();
            let Some(position) = listeners.iter().position(matches) else {
                return false;
            };

            let removed = listeners.remove(position);
            self.active.store(None);
            (removed, listeners.len())
        };

        debug!(id = %removed.id, total, "log change listener removed");
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached snapshot, rebuilding it if a mutation cleared it.
    fn active_listeners(&self) -> Arc<Vec<Listener>> {
        if let Some(active) = self.active.load_full() {
            return active;
        }

        let listeners = self.listeners.read();
        let snapshot = Arc::new(
            listeners
                .iter()
                .map(|reg| Arc::clone(&reg.listener))
                .collect::<Vec<_>>(),
        );
        self.active.store(Some(Arc::clone(&snapshot)));
        drop(listeners);

        debug!(listeners = snapshot.len(), "listener snapshot rebuilt");
        snapshot
    }

    /// Invokes every listener registered at call time, in registration order,
    /// on the calling thread.
    ///
    /// # Returns
    ///
    /// * `Ok(n)`: all `n` listeners returned normally.
    /// * `Err(ListenerFailure { .. })`: at least one listener panicked.
    ///   Every other listener was still invoked.
    pub fn notify_all(&self) -> Result<usize, ListenerFailure> {
        let listeners = self.active_listeners();

        let mut failed = 0;
        for (position, listener) in listeners.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_log_changed()));
            if outcome.is_err() {
                failed += 1;
                warn!(position, "log change listener panicked");
            }
        }

        if failed > 0 {
            return Err(ListenerFailure {
                failed,
                notified: listeners.len(),
            });
        }

        Ok(listeners.len())
    }
}
