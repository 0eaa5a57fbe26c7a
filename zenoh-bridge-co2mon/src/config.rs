//! Configuration for the CO2 bridge.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use co2sight_common::config::{LoggingConfig, ZenohConfig, load_config, parse_config};
use co2sight_common::serialization::Format;

use crate::error::{BridgeError, Result};

/// Directory the co2mon daemon writes its readings to.
pub const DEFAULT_DATADIR: &str = "/var/lib/co2mon/";

/// Complete bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Co2monBridgeConfig {
    /// Zenoh connection settings.
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// CO2 monitor settings.
    #[serde(default)]
    pub co2mon: Co2monConfig,

    /// Wire format for published samples.
    #[serde(default)]
    pub serialization: Format,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// CO2 monitor polling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Co2monConfig {
    /// Directory containing `heartbeat`, `CntR` and `Tamb`.
    #[serde(default = "default_datadir")]
    pub datadir: PathBuf,

    /// Key expression prefix (default: "co2sight/co2mon").
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Host name attached to samples.
    /// Use "auto" to detect automatically (default).
    #[serde(default = "default_host")]
    pub host: String,

    /// Poll interval in seconds (default: 10).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_datadir() -> PathBuf {
    PathBuf::from(DEFAULT_DATADIR)
}

fn default_key_prefix() -> String {
    "co2sight/co2mon".to_string()
}

fn default_host() -> String {
    "auto".to_string()
}

fn default_poll_interval() -> u64 {
    10
}

impl Default for Co2monConfig {
    fn default() -> Self {
        Self {
            datadir: default_datadir(),
            key_prefix: default_key_prefix(),
            host: default_host(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Co2monBridgeConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BridgeError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let config: Co2monBridgeConfig = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a JSON5 string.
    pub fn from_json5(content: &str) -> Result<Self> {
        let config: Co2monBridgeConfig = parse_config(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.co2mon.datadir.as_os_str().is_empty() {
            return Err(BridgeError::validation("co2mon.datadir cannot be empty"));
        }

        if self.co2mon.poll_interval_secs == 0 {
            return Err(BridgeError::validation(
                "co2mon.poll_interval_secs must be at least 1",
            ));
        }

        if self.co2mon.key_prefix.is_empty() {
            return Err(BridgeError::validation("co2mon.key_prefix cannot be empty"));
        }

        Ok(())
    }

    /// Resolve the host name (handles "auto").
    pub fn get_hostname(&self) -> String {
        if self.co2mon.host == "auto" {
            hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string())
        } else {
            self.co2mon.host.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co2sight_common::LogFormat;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            zenoh: { mode: "client", connect: ["tcp/10.0.0.1:7447"] },
            co2mon: {
                datadir: "/run/co2mon",
                key_prefix: "office/co2",
                host: "kitchen",
                poll_interval_secs: 30,
            },
            serialization: "cbor",
            logging: { level: "debug", format: "json" },
        }"#;

        let config = Co2monBridgeConfig::from_json5(json).unwrap();
        assert_eq!(config.zenoh.mode, "client");
        assert_eq!(config.co2mon.datadir, PathBuf::from("/run/co2mon"));
        assert_eq!(config.co2mon.key_prefix, "office/co2");
        assert_eq!(config.co2mon.poll_interval_secs, 30);
        assert_eq!(config.serialization, Format::Cbor);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.get_hostname(), "kitchen");
    }

    #[test]
    fn test_defaults() {
        let config = Co2monBridgeConfig::from_json5("{}").unwrap();

        assert_eq!(config.co2mon.datadir, PathBuf::from(DEFAULT_DATADIR));
        assert_eq!(config.co2mon.key_prefix, "co2sight/co2mon");
        assert_eq!(config.co2mon.host, "auto");
        assert_eq!(config.co2mon.poll_interval_secs, 10);
        assert_eq!(config.serialization, Format::Json);
        assert_eq!(config.zenoh.mode, "peer");
    }

    #[test]
    fn test_datadir_must_be_a_string() {
        let result = Co2monBridgeConfig::from_json5(r#"{ co2mon: { datadir: 42 } }"#);
        assert!(matches!(result, Err(BridgeError::ConfigParse(_))));

        let result = Co2monBridgeConfig::from_json5(r#"{ co2mon: { datadir: ["/a", "/b"] } }"#);
        assert!(matches!(result, Err(BridgeError::ConfigParse(_))));
    }

    #[test]
    fn test_validation() {
        let result = Co2monBridgeConfig::from_json5(r#"{ co2mon: { datadir: "" } }"#);
        assert!(matches!(result, Err(BridgeError::ConfigValidation(_))));

        let result = Co2monBridgeConfig::from_json5(r#"{ co2mon: { poll_interval_secs: 0 } }"#);
        assert!(matches!(result, Err(BridgeError::ConfigValidation(_))));
    }

    #[test]
    fn test_config_not_found() {
        let result = Co2monBridgeConfig::load_from_file("/nonexistent/co2mon.json5");
        assert!(matches!(result, Err(BridgeError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_auto_hostname_is_never_empty() {
        let config = Co2monBridgeConfig::from_json5("{}").unwrap();
        assert!(!config.get_hostname().is_empty());
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = Co2monBridgeConfig::from_json5(include_str!("../co2mon.json5")).unwrap();
        assert_eq!(config.co2mon, Co2monConfig::default());
        assert_eq!(config.serialization, Format::Json);
    }
}
