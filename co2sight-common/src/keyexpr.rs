use crate::telemetry::MetricSample;

/// Default key expression prefix for all co2sight data.
pub const KEY_PREFIX: &str = "co2sight";

/// Builder for co2sight key expressions.
///
/// Key expressions follow the pattern:
/// `<prefix>/<host>/<kind>[/<subtype>]`, where the default prefix is
/// `co2sight/<plugin>`.
#[derive(Debug, Clone)]
pub struct KeyExprBuilder {
    prefix: String,
}

impl KeyExprBuilder {
    /// Create a builder for a plugin under the default prefix.
    pub fn new(plugin: &str) -> Self {
        Self {
            prefix: format!("{}/{}", KEY_PREFIX, plugin),
        }
    }

    /// Create a builder with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// The prefix every key starts with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the key a sample is published on.
    ///
    /// # Example
    /// ```
    /// use co2sight_common::keyexpr::KeyExprBuilder;
    /// use co2sight_common::telemetry::{MetricKind, MetricSample};
    ///
    /// let sample = MetricSample::new("lab", "co2mon", MetricKind::Gauge, 415i64)
    ///     .with_subtype("co2_ppm");
    /// let key = KeyExprBuilder::new("co2mon").build(&sample);
    /// assert_eq!(key, "co2sight/co2mon/lab/gauge/co2_ppm");
    /// ```
    pub fn build(&self, sample: &MetricSample) -> String {
        format!("{}/{}/{}", self.prefix, sample.host, sample.metric_name())
    }

    /// Build a wildcard key expression for all metrics from a host.
    ///
    /// # Example
    /// ```
    /// use co2sight_common::keyexpr::KeyExprBuilder;
    ///
    /// let key = KeyExprBuilder::new("co2mon").host_wildcard("lab");
    /// assert_eq!(key, "co2sight/co2mon/lab/**");
    /// ```
    pub fn host_wildcard(&self, host: &str) -> String {
        format!("{}/{}/**", self.prefix, host)
    }

    /// Build a key expression for bridge status.
    ///
    /// # Example
    /// ```
    /// use co2sight_common::keyexpr::KeyExprBuilder;
    ///
    /// let key = KeyExprBuilder::new("co2mon").status_key();
    /// assert_eq!(key, "co2sight/co2mon/@/status");
    /// ```
    pub fn status_key(&self) -> String {
        format!("{}/@/status", self.prefix)
    }
}
