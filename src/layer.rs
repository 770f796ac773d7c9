//! A `tracing` layer that records events into a [`LogFeed`].
//!
//! Lets any part of a host application produce log entries through the usual
//! `tracing` macros instead of holding a feed handle.

use crate::entry::Severity;
use crate::feed::LogFeed;
use std::fmt::{self, Write};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Appends every `tracing` event to a shared [`LogFeed`].
///
/// The event's `message` becomes the entry text; other fields are appended
/// as `key=value`. Events emitted by this crate itself are skipped so that a
/// listener warning cannot feed back into the log it is reporting on.
///
/// Listeners registered on the feed run inside `on_event`. A listener that
/// itself emits `tracing` events through the same subscriber recurses.
#[derive(Debug, Clone)]
pub struct FeedLayer {
    feed: Arc<LogFeed>,
}

impl FeedLayer {
    pub fn new(feed: Arc<LogFeed>) -> Self {
        Self { feed }
    }
}

impl<S> Layer<S> for FeedLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.feed
            .append(Severity::from(*metadata.level()), visitor.finish());
    }
}

/// `true` for this crate's root target and its modules, not for other crates
/// whose names merely share the prefix.
fn is_own_target(target: &str) -> bool {
    target == env!("CARGO_CRATE_NAME")
        || target.starts_with(concat!(env!("CARGO_CRATE_NAME"), "::"))
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        if self.message.is_empty() {
            return self.fields.trim_start().to_string();
        }
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
