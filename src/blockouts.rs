//! Blockout directory.
//!
//! Maps trip names to the date range and reason written to each matched
//! volunteer. Values are passed to Planning Center verbatim.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Date range and reason for one trip
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockoutSpec {
    /// Start timestamp, as accepted by the API
    pub starts_at: String,
    /// End timestamp, as accepted by the API
    pub ends_at: String,
    /// Reason shown to schedulers
    pub reason: String,
}

/// Blockout specs keyed by trip name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BlockoutDirectory {
    trips: HashMap<String, BlockoutSpec>,
}

impl BlockoutDirectory {
    /// Parse a directory from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Load the directory file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs_err::read_to_string(path).map_err(|e| {
            Error::config(
                format!("Could not read blockout file {}: {e}", path.display()),
                "Create a JSON file mapping each trip to starts_at, ends_at and reason",
            )
        })?;
        let directory = Self::from_json(&text)
            .map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))?;
        tracing::debug!("Loaded blockouts for {} trips from {}", directory.len(), path.display());
        Ok(directory)
    }

    /// Spec for a trip, if one is configured.
    pub fn get(&self, trip: &str) -> Option<&BlockoutSpec> {
        self.trips.get(trip)
    }

    /// Add or replace a trip.
    pub fn insert(&mut self, trip: impl Into<String>, spec: BlockoutSpec) {
        self.trips.insert(trip.into(), spec);
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether no trips are configured.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    const SAMPLE: &str = r#"{
        "Mexico": {"starts_at": "2024-06-01T00:00:00Z", "ends_at": "2024-06-10T00:00:00Z", "reason": "trip"},
        "Peru": {"starts_at": "2024-07-01", "ends_at": "2024-07-12", "reason": "Peru mission"}
    }"#;

    #[test]
    fn looks_up_trips_by_exact_name() {
        let directory = BlockoutDirectory::from_json(SAMPLE).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get("Peru").unwrap().reason, "Peru mission");
        assert!(directory.get("peru").is_none());
    }

    #[test]
    fn missing_field_is_rejected() {
        let err = BlockoutDirectory::from_json(r#"{"Mexico": {"starts_at": "x", "reason": "y"}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn load_reports_missing_file_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BlockoutDirectory::load(&dir.path().join("blockouts.json")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn load_reports_bad_json_as_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockouts.json");
        fs_err::write(&path, "{not json").unwrap();
        assert!(matches!(BlockoutDirectory::load(&path), Err(Error::Parse { .. })));
    }
}
