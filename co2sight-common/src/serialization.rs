use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Wire format for published samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON (default, readable with any Zenoh subscriber).
    #[default]
    Json,

    /// CBOR (compact binary).
    Cbor,
}

impl Format {
    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Cbor => "application/cbor",
        }
    }
}

/// Encode a value to bytes using the specified format.
pub fn encode<T: Serialize>(value: &T, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Json => serde_json::to_vec(value).map_err(Error::from),
        Format::Cbor => {
            let mut buf = Vec::new();
            ciborium::into_writer(value, &mut buf)?;
            Ok(buf)
        }
    }
}

/// Decode bytes to a value using the specified format.
pub fn decode<T: DeserializeOwned>(data: &[u8], format: Format) -> Result<T> {
    match format {
        Format::Json => serde_json::from_slice(data).map_err(Error::from),
        Format::Cbor => ciborium::from_reader(data).map_err(|e| Error::Cbor(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::NumericValue;
    use crate::telemetry::{MetricKind, MetricSample, PLUGIN_NAME};

    fn co2_sample() -> MetricSample {
        MetricSample::new("lab", PLUGIN_NAME, MetricKind::Gauge, 415i64).with_subtype("co2_ppm")
    }

    #[test]
    fn test_json_keeps_integer_tag() {
        let encoded = encode(&co2_sample(), Format::Json).unwrap();
        let decoded: MetricSample = decode(&encoded, Format::Json).unwrap();

        assert_eq!(decoded.value, NumericValue::Integer(415));
        assert_eq!(decoded.subtype.as_deref(), Some("co2_ppm"));
    }

    #[test]
    fn test_cbor_keeps_float_tag() {
        let sample = MetricSample::new("lab", PLUGIN_NAME, MetricKind::Temperature, 24.6);

        let encoded = encode(&sample, Format::Cbor).unwrap();
        let decoded: MetricSample = decode(&encoded, Format::Cbor).unwrap();

        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_cbor_is_smaller() {
        let json = encode(&co2_sample(), Format::Json).unwrap();
        let cbor = encode(&co2_sample(), Format::Cbor).unwrap();

        assert!(cbor.len() < json.len(), "CBOR should be smaller than JSON");
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(Format::Json.mime_type(), "application/json");
        assert_eq!(Format::Cbor.mime_type(), "application/cbor");
    }
}
