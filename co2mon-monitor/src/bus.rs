//! D-Bus subscription for CO2Mon signals.

use std::future::Future;

use futures::StreamExt;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedValue, Value};
use zbus::{Connection, MatchRule, Message, MessageStream};

use crate::error::{ListenerError, Result};
use crate::notification::ArgValue;

/// Interface the co2mon daemon emits on.
pub const CO2MON_INTERFACE: &str = "io.github.dmage.CO2Mon";

/// Signal carrying a freshly decoded value.
pub const NEW_VALUE_MEMBER: &str = "NewValue";

/// Subscription filter: value-change signals only.
pub const MATCH_RULE: &str = "type='signal',interface='io.github.dmage.CO2Mon',member='NewValue'";

/// Which message bus to listen on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BusKind {
    /// System-wide bus (the daemon's default).
    #[default]
    System,
    /// Per-login session bus.
    Session,
}

/// A delivered signal: header fields plus its ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalMessage {
    pub interface: Option<String>,
    pub member: Option<String>,
    pub args: Vec<ArgValue>,
}

/// Source of signals matching the CO2Mon subscription.
pub trait BusTransport {
    /// Wait for the next matching signal.
    ///
    /// `Ok(None)` means the subscription ended (connection gone).
    fn next_signal(&mut self) -> impl Future<Output = Result<Option<SignalMessage>>> + Send;
}

/// Live D-Bus subscription.
///
/// The match rule is registered with the bus daemon on construction and
/// removed again when the transport is dropped.
pub struct DbusTransport {
    stream: MessageStream,
}

impl DbusTransport {
    /// Connect to `bus` and register the CO2Mon match rule.
    pub async fn subscribe(bus: BusKind) -> Result<Self> {
        let connection = match bus {
            BusKind::System => Connection::system().await?,
            BusKind::Session => Connection::session().await?,
        };

        let rule = MatchRule::try_from(MATCH_RULE)
            .map_err(|e| ListenerError::MatchRule(e.to_string()))?;
        let stream = MessageStream::for_match_rule(rule, &connection, None).await?;

        info!(bus = ?bus, rule = MATCH_RULE, "Subscribed to CO2Mon signals");

        Ok(Self { stream })
    }
}

impl BusTransport for DbusTransport {
    fn next_signal(&mut self) -> impl Future<Output = Result<Option<SignalMessage>>> + Send {
        async move {
            match self.stream.next().await {
                Some(Ok(message)) => Ok(Some(to_signal(&message))),
                Some(Err(e)) => Err(e.into()),
                None => Ok(None),
            }
        }
    }
}

/// Flatten a zbus message into a [`SignalMessage`].
///
/// Bodies that are not `(yqsv)` yield an empty argument list, which the
/// listener reports as undecodable.
fn to_signal(message: &Message) -> SignalMessage {
    let header = message.header();
    let interface = header.interface().map(|i| i.to_string());
    let member = header.member().map(|m| m.to_string());

    let args = match message
        .body()
        .deserialize::<(u8, u16, String, OwnedValue)>()
    {
        Ok((code, raw_value, name, value)) => vec![
            ArgValue::Byte(code),
            ArgValue::UInt16(raw_value),
            ArgValue::Str(name),
            arg_from_value(&value),
        ],
        Err(e) => {
            warn!(error = %e, member = ?member, "Unexpected signal body");
            Vec::new()
        }
    };

    debug!(interface = ?interface, member = ?member, args = args.len(), "Signal received");

    SignalMessage {
        interface,
        member,
        args,
    }
}

/// Unwrap a variant into a display-ready argument.
fn arg_from_value(value: &Value<'_>) -> ArgValue {
    match value {
        Value::U8(v) => ArgValue::Byte(*v),
        Value::U16(v) => ArgValue::UInt16(*v),
        Value::I16(v) => ArgValue::Int(i64::from(*v)),
        Value::I32(v) => ArgValue::Int(i64::from(*v)),
        Value::I64(v) => ArgValue::Int(*v),
        Value::U32(v) => ArgValue::UInt(u64::from(*v)),
        Value::U64(v) => ArgValue::UInt(*v),
        Value::F64(v) => ArgValue::Double(*v),
        Value::Bool(v) => ArgValue::Bool(*v),
        Value::Str(v) => ArgValue::Str(v.as_str().to_string()),
        Value::Value(inner) => arg_from_value(inner),
        other => ArgValue::Other(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CO2MON_OBJECT_PATH: &str = "/io/github/dmage/CO2Mon";

    #[test]
    fn test_match_rule_parses() {
        let rule = MatchRule::try_from(MATCH_RULE).unwrap();
        assert_eq!(rule.interface().map(|i| i.as_str()), Some(CO2MON_INTERFACE));
        assert_eq!(rule.member().map(|m| m.as_str()), Some(NEW_VALUE_MEMBER));
    }

    #[test]
    fn test_variant_unwrapping() {
        assert_eq!(arg_from_value(&Value::F64(23.5)), ArgValue::Double(23.5));
        assert_eq!(arg_from_value(&Value::U16(415)), ArgValue::UInt16(415));
        assert_eq!(
            arg_from_value(&Value::Value(Box::new(Value::F64(1.5)))),
            ArgValue::Double(1.5)
        );
    }

    #[test]
    fn test_signal_from_message() {
        let message = Message::signal(CO2MON_OBJECT_PATH, CO2MON_INTERFACE, NEW_VALUE_MEMBER)
            .unwrap()
            .build(&(0x42u8, 4750u16, "Tamb", Value::F64(23.5)))
            .unwrap();

        let signal = to_signal(&message);
        assert_eq!(signal.interface.as_deref(), Some(CO2MON_INTERFACE));
        assert_eq!(signal.member.as_deref(), Some(NEW_VALUE_MEMBER));
        assert_eq!(
            signal.args,
            vec![
                ArgValue::Byte(0x42),
                ArgValue::UInt16(4750),
                ArgValue::Str("Tamb".to_string()),
                ArgValue::Double(23.5),
            ]
        );
    }

    #[test]
    fn test_unexpected_body_yields_no_args() {
        let message = Message::signal(CO2MON_OBJECT_PATH, CO2MON_INTERFACE, NEW_VALUE_MEMBER)
            .unwrap()
            .build(&("x",))
            .unwrap();

        let signal = to_signal(&message);
        assert_eq!(signal.interface.as_deref(), Some(CO2MON_INTERFACE));
        assert!(signal.args.is_empty());
    }
}
