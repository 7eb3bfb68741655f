//! Notary configuration.

use std::time::Duration;

use star_notary_core::{DEFAULT_VALIDATION_WINDOW_MS, MAX_STORY_BYTES};

/// Configuration for the notary services.
#[derive(Debug, Clone)]
pub struct NotaryConfig {
    /// How long a challenge stays answerable.
    pub validation_window: Duration,
    /// Largest accepted story, in bytes.
    pub max_story_bytes: usize,
}

impl NotaryConfig {
    pub fn validation_window_ms(&self) -> i64 {
        self.validation_window.as_millis() as i64
    }
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            validation_window: Duration::from_millis(DEFAULT_VALIDATION_WINDOW_MS as u64),
            max_story_bytes: MAX_STORY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NotaryConfig::default();
        assert_eq!(config.validation_window_ms(), 300_000);
        assert_eq!(config.max_story_bytes, 500);
    }
}
