use thiserror::Error;

/// Failures surfaced by the log feed.
///
/// None of these are fatal: every variant is local to the call that produced it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Indexed access with a logical index that is not currently retained.
    #[error("logical index {index} is out of range for a store holding {size} entries")]
    OutOfRange { index: i64, size: usize },

    /// A store was requested with room for nothing.
    #[error("capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    #[error(transparent)]
    ListenerFailure(#[from] ListenerFailure),

    #[error("unknown severity `{0}`")]
    UnknownSeverity(String),
}

/// One or more listeners panicked during a single fan-out pass.
/// The remaining listeners were still invoked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{failed} of {notified} log change listeners panicked")]
pub struct ListenerFailure {
    pub failed: usize,
    pub notified: usize,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_failure_converts_into_error() {
        let failure = ListenerFailure {
            failed: 1,
            notified: 3,
        };
        let err: Error = failure.into();

        assert_eq!(err, Error::ListenerFailure(failure));
        assert_eq!(err.to_string(), "1 of 3 log change listeners panicked");
    }
}
