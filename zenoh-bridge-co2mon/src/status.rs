//! Bridge status reporting.

use serde::{Deserialize, Serialize};
use zenoh::Session;

use co2sight_common::keyexpr::KeyExprBuilder;

use crate::error::Result;

/// Bridge status record, published on `<prefix>/@/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeStatus {
    /// Bridge name.
    pub bridge: String,
    /// Bridge version.
    pub version: String,
    /// Current status ("running" or "offline").
    pub status: String,
    /// Additional metadata.
    #[serde(flatten)]
    pub metadata: serde_json::Value,
}

impl BridgeStatus {
    /// Create a new status with "running" state.
    pub fn running(bridge: impl Into<String>, version: impl Into<String>) -> Self {
        Self::with_state(bridge, version, "running")
    }

    /// Create a status with "offline" state.
    pub fn offline(bridge: impl Into<String>, version: impl Into<String>) -> Self {
        Self::with_state(bridge, version, "offline")
    }

    fn with_state(
        bridge: impl Into<String>,
        version: impl Into<String>,
        status: &str,
    ) -> Self {
        Self {
            bridge: bridge.into(),
            version: version.into(),
            status: status.to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Add metadata to the status.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Publish this status to Zenoh as JSON.
    pub async fn publish(&self, session: &Session, keys: &KeyExprBuilder) -> Result<()> {
        let key = keys.status_key();
        let payload = serde_json::to_vec(self)?;

        session.put(&key, payload).await?;
        tracing::debug!(key = %key, status = %self.status, "Published bridge status");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_running() {
        let status = BridgeStatus::running("co2mon", "0.1.0");
        assert_eq!(status.bridge, "co2mon");
        assert_eq!(status.status, "running");
    }

    #[test]
    fn test_status_offline_has_no_metadata() {
        let status = BridgeStatus::offline("co2mon", "0.1.0");
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["status"], "offline");
        assert!(json.get("datadir").is_none());
    }

    #[test]
    fn test_metadata_is_flattened() {
        let status = BridgeStatus::running("co2mon", "0.1.0").with_metadata(serde_json::json!({
            "datadir": "/var/lib/co2mon/",
            "poll_interval_secs": 10
        }));

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"bridge\":\"co2mon\""));
        assert!(json.contains("\"datadir\":\"/var/lib/co2mon/\""));
        assert!(json.contains("\"poll_interval_secs\":10"));
    }
}
