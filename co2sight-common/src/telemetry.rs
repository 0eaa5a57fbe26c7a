use serde::{Deserialize, Serialize};

use crate::reading::NumericValue;

/// Source identifier attached to every sample produced by the CO2 bridge.
pub const PLUGIN_NAME: &str = "co2mon";

/// A single metric sample submitted to the monitoring backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Unix epoch milliseconds the sample refers to.
    pub timestamp: i64,

    /// Host the sensor is attached to.
    pub host: String,

    /// Submitting plugin (always [`PLUGIN_NAME`] for the CO2 bridge).
    pub plugin: String,

    /// Metric type.
    pub kind: MetricKind,

    /// Optional qualifier, e.g. `co2_ppm` for the CO2 gauge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// The measured value.
    pub value: NumericValue,
}

impl MetricSample {
    /// Create a new sample stamped with the current time.
    pub fn new(
        host: impl Into<String>,
        plugin: impl Into<String>,
        kind: MetricKind,
        value: impl Into<NumericValue>,
    ) -> Self {
        Self {
            timestamp: current_timestamp_millis(),
            host: host.into(),
            plugin: plugin.into(),
            kind,
            subtype: None,
            value: value.into(),
        }
    }

    /// Set the subtype qualifier.
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Override the sample time (Unix epoch milliseconds).
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Metric path: `<kind>` or `<kind>/<subtype>`.
    pub fn metric_name(&self) -> String {
        match &self.subtype {
            Some(subtype) => format!("{}/{}", self.kind.as_str(), subtype),
            None => self.kind.as_str().to_string(),
        }
    }
}

/// Metric type tag understood by the monitoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Gauge,
    Temperature,
}

impl MetricKind {
    /// Get the string representation used in key expressions.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Temperature => "temperature",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Get the current timestamp in milliseconds since Unix epoch.
pub fn current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_creation() {
        let sample = MetricSample::new("lab", PLUGIN_NAME, MetricKind::Gauge, 415i64)
            .with_subtype("co2_ppm")
            .with_timestamp(1_449_000_000_000);

        assert_eq!(sample.host, "lab");
        assert_eq!(sample.plugin, "co2mon");
        assert_eq!(sample.kind, MetricKind::Gauge);
        assert_eq!(sample.subtype.as_deref(), Some("co2_ppm"));
        assert_eq!(sample.value, NumericValue::Integer(415));
        assert_eq!(sample.timestamp, 1_449_000_000_000);
    }

    #[test]
    fn test_metric_name() {
        let gauge = MetricSample::new("lab", PLUGIN_NAME, MetricKind::Gauge, 415i64)
            .with_subtype("co2_ppm");
        let temp = MetricSample::new("lab", PLUGIN_NAME, MetricKind::Temperature, 24.6);

        assert_eq!(gauge.metric_name(), "gauge/co2_ppm");
        assert_eq!(temp.metric_name(), "temperature");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MetricKind::Gauge.as_str(), "gauge");
        assert_eq!(MetricKind::Temperature.to_string(), "temperature");
    }

    #[test]
    fn test_absent_subtype_not_serialized() {
        let temp = MetricSample::new("lab", PLUGIN_NAME, MetricKind::Temperature, 24.6);
        let json = serde_json::to_value(&temp).unwrap();

        assert!(json.get("subtype").is_none());
        assert_eq!(json["kind"], "temperature");
        assert_eq!(json["value"], 24.6);
    }
}
