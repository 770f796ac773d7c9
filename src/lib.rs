//! A bounded, concurrency-safe log feed with change notification.
//!
//! [`LogFeed`] keeps the most recent `capacity` [`LogEntry`] values in a
//! fixed-size ring. Producers on any thread call [`LogFeed::append`]; once the
//! ring is full the oldest entry is evicted, so producers never block or get
//! rejected. A log view reads with [`LogFeed::len`], [`LogFeed::range`] and
//! [`LogFeed::all`], and learns about changes through listeners registered
//! with [`LogFeed::register_listener`] or through an async [`ChangeSignal`].
//!
//! ```rust,ignore
//! use logfeed::{LogFeed, Severity};
//! use std::sync::Arc;
//!
//! let feed = Arc::new(LogFeed::new(100)?);
//! let signal = feed.change_signal();
//!
//! feed.append(Severity::Info, "robot moved");
//!
//! signal.changed().await;
//! for entry in feed.all() {
//!     println!("{entry}");
//! }
//! ```

mod broadcaster;
mod config;
mod cursor;
mod entry;
mod error;
mod feed;
mod layer;
mod listener_id;
mod ring_buffer;
mod sequence;
mod signal;
mod snapshot;

pub use crate::broadcaster::{ChangeBroadcaster, LogChangeListener};
pub use crate::config::{DEFAULT_CAPACITY, FeedConfig};
pub use crate::entry::{LogEntry, Severity};
pub use crate::error::{Error, ListenerFailure, Result};
pub use crate::feed::{Delivery, LogFeed};
pub use crate::layer::FeedLayer;
pub use crate::listener_id::ListenerId;
pub use crate::ring_buffer::RingStore;
pub use crate::signal::{ChangeSignal, ChangeSubscription};
pub use crate::snapshot::SnapshotCursor;
