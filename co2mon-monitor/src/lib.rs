//! Console monitor for CO2 monitor bus notifications.
//!
//! The co2mon daemon announces every decoded measurement as a `NewValue`
//! signal on the `io.github.dmage.CO2Mon` interface with arguments
//! `(code: y, raw_value: q, name: s, value: v)`. This crate subscribes to
//! those signals and prints one `"<name> <value>"` line per named reading.

pub mod bus;
pub mod error;
pub mod listener;
pub mod notification;

pub use bus::{BusKind, BusTransport, DbusTransport, MATCH_RULE, SignalMessage};
pub use error::{ListenerError, Result};
pub use listener::SignalListener;
pub use notification::{ArgValue, DecodeError, NotifiedReading};
