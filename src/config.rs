use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of entries a log window keeps when the host does not say otherwise.
pub const DEFAULT_CAPACITY: usize = 100;

/// Construction settings for a [`LogFeed`](crate::LogFeed).
///
/// Deserializable so a host application can embed it in its own config file;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum number of retained entries. Must be positive.
    pub capacity: usize,
}

impl FeedConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        assert_eq!(
            FeedConfig::new(0).validate(),
            Err(Error::InvalidCapacity(0))
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: FeedConfig = serde_json::from_str(r#"{"capacity": 3}"#).unwrap();
        assert_eq!(config, FeedConfig::new(3));

        let config: FeedConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FeedConfig::default());
    }
}
