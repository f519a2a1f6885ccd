//! Timeout helpers used by the orchestrator and transports.
//!
//! The protocol engine itself never waits; only the transport session is
//! bounded by these values.

use std::time::Duration;

/// Default poller session timeout in milliseconds, used when the caller
/// doesn't configure one.
pub const DEFAULT_SESSION_TIMEOUT_MS: u64 = 1000;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
