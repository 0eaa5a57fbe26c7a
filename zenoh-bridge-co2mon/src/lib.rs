//! Zenoh bridge for CO2 monitor readings.
//!
//! The co2mon daemon writes one text file per reading into a data directory
//! (`/var/lib/co2mon/` by default): `CntR` (CO2 ppm), `Tamb` (ambient
//! temperature) and `heartbeat`, a counter bumped once per measurement
//! cycle. This bridge polls those files and publishes a gauge and a
//! temperature sample for every new heartbeat.
//!
//! # Key Expressions
//!
//! ```text
//! co2sight/co2mon/<host>/gauge/co2_ppm
//! co2sight/co2mon/<host>/temperature
//! co2sight/co2mon/@/status
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod runner;
pub mod sensor;
pub mod sink;
pub mod status;

pub use bridge::{MetricBridge, PollOutcome};
pub use config::{Co2monBridgeConfig, Co2monConfig, DEFAULT_DATADIR};
pub use error::{BridgeError, Result};
pub use heartbeat::HeartbeatState;
pub use sensor::SensorDir;
pub use sink::{MetricSink, ZenohSink};
pub use status::BridgeStatus;
