//! Metric sinks: where dispatched samples go.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zenoh::Session;

use co2sight_common::keyexpr::KeyExprBuilder;
use co2sight_common::serialization::{Format, encode};
use co2sight_common::telemetry::MetricSample;

use crate::error::{BridgeError, Result};

/// Accepts samples from the bridge.
///
/// Dispatch is fire-and-forget: delivery guarantees belong to the sink.
pub trait MetricSink {
    fn dispatch(&self, sample: MetricSample);
}

impl MetricSink for mpsc::UnboundedSender<MetricSample> {
    fn dispatch(&self, sample: MetricSample) {
        if let Err(e) = self.send(sample) {
            warn!(metric = %e.0.metric_name(), "Sample receiver closed, dropping sample");
        }
    }
}

/// Sink that publishes every sample to Zenoh.
///
/// Samples are queued on a channel and published by a background task, so
/// `dispatch` never waits on the network.
#[derive(Debug, Clone)]
pub struct ZenohSink {
    tx: mpsc::UnboundedSender<MetricSample>,
}

impl ZenohSink {
    /// Start the publishing task and return the sink feeding it.
    ///
    /// The task ends once every clone of the sink has been dropped.
    pub fn spawn(session: Session, keys: KeyExprBuilder, format: Format) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<MetricSample>();

        let handle = tokio::spawn(async move {
            while let Some(sample) = rx.recv().await {
                if let Err(e) = publish_sample(&session, &keys, format, &sample).await {
                    warn!(error = %e, "Failed to publish sample");
                }
            }
            debug!("Sample channel closed, publisher stopped");
        });

        (Self { tx }, handle)
    }
}

impl MetricSink for ZenohSink {
    fn dispatch(&self, sample: MetricSample) {
        self.tx.dispatch(sample);
    }
}

/// Encode one sample and put it on its key expression.
pub async fn publish_sample(
    session: &Session,
    keys: &KeyExprBuilder,
    format: Format,
    sample: &MetricSample,
) -> Result<()> {
    let key = keys.build(sample);
    let payload = encode(sample, format)?;

    session
        .put(&key, payload)
        .encoding(format.mime_type())
        .await
        .map_err(|e| BridgeError::Publish {
            key: key.clone(),
            message: e.to_string(),
        })?;

    debug!(key = %key, value = %sample.value, timestamp = sample.timestamp, "Published");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use co2sight_common::telemetry::{MetricKind, PLUGIN_NAME};

    #[test]
    fn test_channel_sink_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tx.dispatch(MetricSample::new("lab", PLUGIN_NAME, MetricKind::Gauge, 415i64));
        tx.dispatch(MetricSample::new("lab", PLUGIN_NAME, MetricKind::Temperature, 24.6));

        assert_eq!(rx.try_recv().unwrap().kind, MetricKind::Gauge);
        assert_eq!(rx.try_recv().unwrap().kind, MetricKind::Temperature);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_drops_silently() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        tx.dispatch(MetricSample::new("lab", PLUGIN_NAME, MetricKind::Gauge, 415i64));
    }
}
