// ── Runtime coordinator configuration ──
//
// Tuning for refresh cadence and command timeouts. Built by the config
// crate or the host and handed in; core never reads config files.

use std::time::Duration;

/// Refresh and command tuning shared by every coordinator of a hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Period of the background refresh task. Zero disables it.
    pub refresh_interval: Duration,
    /// Upper bound for a single state fetch.
    pub request_timeout: Duration,
    /// Upper bound for a single command send.
    pub command_timeout: Duration,
    /// Attempts made by `first_refresh` before giving up.
    pub first_refresh_attempts: u32,
    /// Pause between failed first-refresh attempts.
    pub retry_backoff: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(15),
            command_timeout: Duration::from_secs(30),
            first_refresh_attempts: 3,
            retry_backoff: Duration::from_secs(2),
        }
    }
}

impl CoordinatorConfig {
    /// One-shot variant of this config: no background refresh and a single
    /// first-refresh attempt. Timeouts are kept.
    #[must_use]
    pub fn oneshot(self) -> Self {
        Self {
            refresh_interval: Duration::ZERO,
            first_refresh_attempts: 1,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oneshot_disables_refresh_and_keeps_timeouts() {
        let config = CoordinatorConfig {
            request_timeout: Duration::from_millis(250),
            command_timeout: Duration::from_secs(7),
            ..CoordinatorConfig::default()
        }
        .oneshot();

        assert!(config.refresh_interval.is_zero());
        assert_eq!(config.first_refresh_attempts, 1);
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.command_timeout, Duration::from_secs(7));
        assert_eq!(config.retry_backoff, CoordinatorConfig::default().retry_backoff);
    }
}
