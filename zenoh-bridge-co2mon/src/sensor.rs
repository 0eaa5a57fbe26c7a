//! Access to the co2mon data directory.

use std::path::{Path, PathBuf};

use co2sight_common::{Reading, ReadingError};

/// The directory holding one text file per named reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDir {
    path: PathBuf,
}

impl SensorDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file named `name`.
    pub fn read(&self, name: &str) -> Result<Reading, ReadingError> {
        let path = self.path.join(name);
        let raw_text = std::fs::read_to_string(&path).map_err(|source| ReadingError::Io {
            name: name.to_string(),
            path,
            source,
        })?;

        Reading::parse(name, raw_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co2sight_common::NumericValue;
    use co2sight_common::reading::{AMBIENT_TEMPERATURE, CO2_CONCENTRATION, HEARTBEAT};

    #[test]
    fn test_read_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CO2_CONCENTRATION), "415\n").unwrap();
        std::fs::write(dir.path().join(AMBIENT_TEMPERATURE), "24.6").unwrap();

        let sensor = SensorDir::new(dir.path());

        let co2 = sensor.read(CO2_CONCENTRATION).unwrap();
        assert_eq!(co2.value, NumericValue::Integer(415));
        assert_eq!(co2.raw_text, "415\n");

        let temp = sensor.read(AMBIENT_TEMPERATURE).unwrap();
        assert_eq!(temp.value, NumericValue::Float(24.6));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let sensor = SensorDir::new(dir.path());

        let err = sensor.read(HEARTBEAT).unwrap_err();
        assert!(matches!(err, ReadingError::Io { .. }));
        assert_eq!(err.name(), "heartbeat");
    }

    #[test]
    fn test_garbled_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HEARTBEAT), "\u{0}\u{0}").unwrap();

        let err = SensorDir::new(dir.path()).read(HEARTBEAT).unwrap_err();
        assert!(matches!(err, ReadingError::Parse { .. }));
    }
}
