//! Signal listener: turns CO2Mon notifications into console lines.

use std::io::Write;

use tracing::{trace, warn};

use crate::bus::{BusTransport, CO2MON_INTERFACE, SignalMessage};
use crate::error::{ListenerError, Result};
use crate::notification::NotifiedReading;

/// Writes one `"<name> <value>"` line per named reading.
pub struct SignalListener<W> {
    out: W,
}

impl<W: Write> SignalListener<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the listener, returning the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Handle a single delivered message.
    ///
    /// Returns the reading that was printed, if any. Foreign interfaces,
    /// undecodable payloads and `UNKNOWN` readings print nothing.
    pub fn handle(&mut self, message: &SignalMessage) -> Result<Option<NotifiedReading>> {
        if message.interface.as_deref() != Some(CO2MON_INTERFACE) {
            trace!(interface = ?message.interface, "Ignoring foreign signal");
            return Ok(None);
        }

        let reading = match NotifiedReading::decode(&message.args) {
            Ok(reading) => reading,
            Err(e) => {
                warn!(error = %e, member = ?message.member, "Skipping undecodable signal");
                return Ok(None);
            }
        };

        if !reading.is_reportable() {
            trace!(code = reading.code, raw_value = reading.raw_value, "Skipping unnamed reading");
            return Ok(None);
        }

        writeln!(self.out, "{}", reading.line())?;
        self.out.flush()?;

        Ok(Some(reading))
    }

    /// Pump signals from `transport` until it fails.
    ///
    /// Never returns `Ok`: the loop only ends when the transport errors or
    /// the subscription closes. Cancel the future to stop listening.
    pub async fn run<T: BusTransport>(&mut self, transport: &mut T) -> Result<()> {
        loop {
            match transport.next_signal().await? {
                Some(message) => {
                    self.handle(&message)?;
                }
                None => return Err(ListenerError::SubscriptionClosed),
            }
        }
    }
}
