//! Defines `LogFeed`, the facade producers and the log view talk to.

use crate::broadcaster::{ChangeBroadcaster, LogChangeListener};
use crate::config::FeedConfig;
use crate::entry::{LogEntry, Severity};
use crate::error::{ListenerFailure, Result};
use crate::listener_id::ListenerId;
use crate::ring_buffer::RingStore;
use crate::signal::ChangeSubscription;
use crate::snapshot::SnapshotCursor;
use std::sync::Arc;
use tracing::warn;

/// Outcome of the notification pass that followed an append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners invoked, including the ones that panicked.
    pub notified: usize,
    /// Listeners that panicked.
    pub failed: usize,
}

impl Delivery {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// A bounded log of [`LogEntry`] values with change notification.
///
/// Any number of threads may append and read concurrently. Share it as
/// `Arc<LogFeed>`.
///
/// ```rust,ignore
/// let feed = LogFeed::new(3)?;
/// feed.register_listener(Arc::new(|| redraw()));
///
/// for message in ["A", "B", "C", "D"] {
///     feed.append(Severity::Debug, message);
/// }
/// // Only the three most recent entries are retained.
/// assert_eq!(feed.all().map(|e| e.message().to_owned()).collect::<Vec<_>>(), ["B", "C", "D"]);
/// ```
#[derive(Debug)]
pub struct LogFeed {
    messages: RingStore<LogEntry>,
    /// Shared with every [`ChangeSubscription`] so it can unregister on drop.
    listeners: Arc<ChangeBroadcaster>,
}

impl LogFeed {
    /// Creates an empty feed retaining at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`](crate::Error::InvalidCapacity) if
    /// `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            messages: RingStore::new(capacity)?,
            listeners: Arc::new(ChangeBroadcaster::new()),
        })
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }

    /// Records a new entry, then notifies every registered listener on the
    /// calling thread.
    ///
    /// The entry is visible to `len`, `range` and `all` before the first
    /// listener runs. Listener panics are caught and reported through the
    /// returned [`Delivery`] and a `warn!` event; they never reach the
    /// producer.
    pub fn append(&self, level: Severity, message: impl Into<Arc<str>>) -> Delivery {
        self.messages.add(LogEntry::new(level, message));

        match self.listeners.notify_all() {
            Ok(notified) => Delivery {
                notified,
                failed: 0,
            },
            Err(ListenerFailure { failed, notified }) => {
                warn!(failed, notified, "log change listeners failed during append");
                Delivery { notified, failed }
            }
        }
    }

    pub fn debug(&self, message: impl Into<Arc<str>>) -> Delivery {
        self.append(Severity::Debug, message)
    }

    pub fn error(&self, message: impl Into<Arc<str>>) -> Delivery {
        self.append(Severity::Error, message)
    }

    /// Number of retained entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.messages.capacity()
    }

    /// See [`RingStore::get`].
    pub fn get(&self, index: i64) -> Result<LogEntry> {
        self.messages.get(index)
    }

    /// See [`RingStore::range`].
    pub fn range(&self, start_from: i64, count: usize) -> SnapshotCursor<'_, LogEntry> {
        self.messages.range(start_from, count)
    }

    pub fn all(&self) -> SnapshotCursor<'_, LogEntry> {
        self.messages.all()
    }

    /// See [`ChangeBroadcaster::subscribe`].
    pub fn register_listener(&self, listener: Arc<dyn LogChangeListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Removes the earliest registration of `listener`; `false` if absent.
    pub fn unregister_listener<L>(&self, listener: &Arc<L>) -> bool
    where
        L: LogChangeListener + ?Sized,
    {
        self.listeners.unsubscribe(listener)
    }

    pub fn unregister_id(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe_id(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Registers a fresh [`ChangeSignal`](crate::ChangeSignal) for an async
    /// log view. The registration lasts until the returned handle is dropped.
    pub fn change_signal(&self) -> ChangeSubscription {
        ChangeSubscription::register(&self.listeners)
    }
}
