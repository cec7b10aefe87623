//! Packet sender configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// The firmware drops packets that arrive faster than this.
pub const MIN_PACKET_DELAY_MS: u64 = 10;

// Default timeout for USB transfers
const DEFAULT_TRANSFER_TIMEOUT_MS: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Pause after every packet write.
    pub packet_delay_ms: u64,
    /// Timeout of a single control transfer.
    pub transfer_timeout_ms: u64,
    /// Upper bound on waiting for another send to finish. `None` waits forever.
    pub busy_timeout_ms: Option<u64>,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            packet_delay_ms: MIN_PACKET_DELAY_MS,
            transfer_timeout_ms: DEFAULT_TRANSFER_TIMEOUT_MS,
            busy_timeout_ms: None,
        }
    }
}

impl SenderConfig {
    pub fn packet_delay(&self) -> Duration {
        if self.packet_delay_ms < MIN_PACKET_DELAY_MS {
            warn!(
                configured = self.packet_delay_ms,
                minimum = MIN_PACKET_DELAY_MS,
                "packet delay below device minimum, using minimum"
            );
        }
        Duration::from_millis(self.packet_delay_ms.max(MIN_PACKET_DELAY_MS))
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_millis(self.transfer_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SenderConfig::default();
        assert_eq!(config.packet_delay(), Duration::from_millis(10));
        assert_eq!(config.transfer_timeout(), Duration::from_secs(1));
        assert_eq!(config.busy_timeout(), None);
    }

    #[test]
    fn test_delay_clamped_to_minimum() {
        let config = SenderConfig {
            packet_delay_ms: 2,
            ..Default::default()
        };
        assert_eq!(config.packet_delay(), Duration::from_millis(MIN_PACKET_DELAY_MS));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SenderConfig = serde_json::from_str(r#"{"busy_timeout_ms": 250}"#).unwrap();
        assert_eq!(config.busy_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.packet_delay_ms, MIN_PACKET_DELAY_MS);
    }
}
