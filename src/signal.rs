//! Async bridge from synchronous change notifications to a task that awaits
//! them, such as a UI redraw loop.

use crate::broadcaster::{ChangeBroadcaster, LogChangeListener};
use crate::listener_id::ListenerId;
use std::ops::Deref;
use std::sync::{Arc, Weak};
use tokio::sync::Notify;
use tokio::sync::futures::Notified;

/// A [`LogChangeListener`] that wakes one awaiting task per change burst.
///
/// Notifications coalesce: any number of changes between two awaits wake the
/// waiter once. A change that happens while nobody is waiting leaves a single
/// stored permit, so the next [`ChangeSignal::changed`] completes at once and
/// no change is ever missed.
///
/// Intended for one waiting task. Give each task its own signal.
#[derive(Debug, Default)]
pub struct ChangeSignal {
    notify: Notify,
}

impl ChangeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completes after the next change, or at once if a change arrived since
    /// the previous call.
    pub async fn changed(&self) {
        self.notify.notified().await
    }

    /// The raw future behind [`ChangeSignal::changed`], for use in `select!`.
    pub fn notified(&self) -> Notified<'_> {
        self.notify.notified()
    }
}

impl LogChangeListener for ChangeSignal {
    fn on_log_changed(&self) {
        self.notify.notify_one();
    }
}

/// A [`ChangeSignal`] registered on a feed for as long as this handle lives.
///
/// Returned by [`LogFeed::change_signal`](crate::LogFeed::change_signal).
/// Dropping it removes the registration, so a log view that is closed and
/// reopened does not leave a listener behind. The handle does not keep the
/// feed alive.
#[derive(Debug)]
pub struct ChangeSubscription {
    signal: Arc<ChangeSignal>,
    id: ListenerId,
    registry: Weak<ChangeBroadcaster>,
}

impl ChangeSubscription {
    pub(crate) fn register(registry: &Arc<ChangeBroadcaster>) -> Self {
        let signal = Arc::new(ChangeSignal::new());
        let id = registry.subscribe(signal.clone());

        Self {
            signal,
            id,
            registry: Arc::downgrade(registry),
        }
    }

    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Deref for ChangeSubscription {
    type Target = ChangeSignal;

    fn deref(&self) -> &Self::Target {
        &self.signal
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe_id(self.id);
        }
    }
}
