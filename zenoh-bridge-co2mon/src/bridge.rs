//! Heartbeat-deduplicated polling of the co2mon data directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use co2sight_common::NumericValue;
use co2sight_common::reading::{AMBIENT_TEMPERATURE, CO2_CONCENTRATION, HEARTBEAT};
use co2sight_common::telemetry::{MetricKind, MetricSample, PLUGIN_NAME, current_timestamp_millis};

use crate::config::Co2monBridgeConfig;
use crate::error::Result;
use crate::heartbeat::{HeartbeatCheck, HeartbeatState, heartbeat_to_millis};
use crate::sensor::SensorDir;
use crate::sink::MetricSink;

/// Subtype attached to the CO2 gauge.
pub const CO2_SUBTYPE: &str = "co2_ppm";

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// A gauge and a temperature sample were dispatched.
    ///
    /// `heartbeat` is `None` when the device exposes no usable heartbeat.
    Dispatched {
        heartbeat: Option<NumericValue>,
        timestamp: i64,
    },

    /// The heartbeat had not advanced; nothing was read or dispatched.
    Stale {
        heartbeat: NumericValue,
        last_seen: NumericValue,
    },
}

impl PollOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, PollOutcome::Dispatched { .. })
    }
}

/// Bridges the sensor's data directory to a [`MetricSink`].
///
/// Owns the heartbeat state; `poll` takes `&mut self`, so two polls on the
/// same bridge can never interleave.
pub struct MetricBridge<S> {
    sensor: SensorDir,
    heartbeat: HeartbeatState,
    host: String,
    sink: S,
}

impl<S: MetricSink> MetricBridge<S> {
    pub fn new(datadir: impl Into<PathBuf>, host: impl Into<String>, sink: S) -> Self {
        Self {
            sensor: SensorDir::new(datadir),
            heartbeat: HeartbeatState::new(),
            host: host.into(),
            sink,
        }
    }

    /// Build a bridge from the loaded configuration.
    pub fn from_config(config: &Co2monBridgeConfig, sink: S) -> Self {
        Self::new(config.co2mon.datadir.clone(), config.get_hostname(), sink)
    }

    pub fn datadir(&self) -> &Path {
        self.sensor.path()
    }

    /// Point the bridge at another data directory. Applies from the next poll.
    pub fn set_datadir(&mut self, datadir: impl Into<PathBuf>) {
        let sensor = SensorDir::new(datadir);
        if sensor != self.sensor {
            info!(datadir = %sensor.path().display(), "Data directory changed");
            self.sensor = sensor;
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn heartbeat(&self) -> &HeartbeatState {
        &self.heartbeat
    }

    /// Run one poll tick.
    ///
    /// A missing or unreadable heartbeat is not an error: the samples are
    /// dispatched unconditionally with the current time. A failure reading
    /// CO2 or temperature aborts the tick before anything is dispatched, and
    /// leaves the heartbeat state untouched so the next tick retries.
    pub fn poll(&mut self) -> Result<PollOutcome> {
        let heartbeat = self.read_heartbeat();

        if let Some(hb) = heartbeat {
            if let HeartbeatCheck::Stale { last_seen } = self.heartbeat.check(hb) {
                trace!(heartbeat = %hb, last_seen = %last_seen, "Heartbeat unchanged");
                return Ok(PollOutcome::Stale {
                    heartbeat: hb,
                    last_seen,
                });
            }
        }

        let co2 = self.sensor.read(CO2_CONCENTRATION)?;
        let temperature = self.sensor.read(AMBIENT_TEMPERATURE)?;

        let timestamp = match heartbeat {
            Some(hb) => {
                self.heartbeat.accept(hb);
                heartbeat_to_millis(hb)
            }
            None => current_timestamp_millis(),
        };

        self.sink.dispatch(
            MetricSample::new(&self.host, PLUGIN_NAME, MetricKind::Gauge, co2.value)
                .with_subtype(CO2_SUBTYPE)
                .with_timestamp(timestamp),
        );
        self.sink.dispatch(
            MetricSample::new(
                &self.host,
                PLUGIN_NAME,
                MetricKind::Temperature,
                temperature.value,
            )
            .with_timestamp(timestamp),
        );

        debug!(
            co2 = %co2.value,
            temperature = %temperature.value,
            timestamp,
            "Dispatched samples"
        );

        Ok(PollOutcome::Dispatched {
            heartbeat,
            timestamp,
        })
    }

    /// Heartbeat value, or `None` when absent, garbled or still zero.
    fn read_heartbeat(&self) -> Option<NumericValue> {
        match self.sensor.read(HEARTBEAT) {
            Ok(reading) if reading.value.is_zero() => {
                trace!("Heartbeat is zero, treating as absent");
                None
            }
            Ok(reading) => Some(reading.value),
            Err(e) => {
                trace!(error = %e, "No heartbeat available");
                None
            }
        }
    }

    /// Poll forever at a fixed interval.
    ///
    /// Tick errors are logged and the loop carries on with the next tick.
    pub async fn run(mut self, interval: Duration) {
        info!(
            datadir = %self.datadir().display(),
            host = %self.host,
            interval_secs = interval.as_secs(),
            "Starting CO2 poller"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.poll() {
                Ok(PollOutcome::Dispatched { timestamp, .. }) => {
                    debug!(timestamp, "Poll dispatched samples");
                }
                Ok(PollOutcome::Stale { .. }) => {}
                Err(e) => {
                    warn!(error = %e, datadir = %self.datadir().display(), "Poll failed");
                }
            }
        }
    }
}
