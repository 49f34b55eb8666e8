//! Reading stops from the bundled JSON asset.
//!
//! The asset is an array of `{ "name": string, "lat": number, "lng": number }`
//! records. Older assets spell the name key `nazwa`, which is accepted too.
//! A record that does not match is skipped and reported; only a document that
//! is not an array at all fails the load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::model::Stop;

#[derive(thiserror::Error, Debug)]
/// Failure to read the stop asset as a whole.
pub enum AssetError {
    /// The document is not a JSON array.
    #[error("Malformed stop asset: {0}")]
    Json(#[from] serde_json::Error),
    /// The asset file could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
}

/// Single record of the asset.
#[derive(Debug, Deserialize)]
struct StopRecord {
    #[serde(alias = "nazwa")]
    name: String,
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An asset record that was left out of the load.
pub struct SkippedRecord {
    /// Position of the record in the asset array.
    pub index: usize,
    /// Decoder message explaining the mismatch.
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Stops decoded from an asset plus the records that were skipped.
pub struct ParsedStops {
    /// Decoded stops in asset order.
    pub stops: Vec<Stop>,
    /// Records that did not decode.
    pub skipped: Vec<SkippedRecord>,
}

/// Decode the stop asset from its JSON text.
///
/// # Errors
///
/// Returns [`AssetError::Json`] when the text is not a JSON array.
pub fn parse_stops(source: &str) -> Result<ParsedStops, AssetError> {
    let records: Vec<Value> = serde_json::from_str(source)?;
    let mut parsed = ParsedStops::default();

    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<StopRecord>(record) {
            Ok(record) => parsed
                .stops
                .push(Stop::new(record.name, record.lat, record.lng)),
            Err(err) => {
                warn!(index, error = %err, "skipping malformed stop record");
                parsed.skipped.push(SkippedRecord {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(parsed)
}

/// Read and decode the stop asset at `path`.
///
/// # Errors
///
/// Returns [`AssetError::Io`] when the file cannot be read and
/// [`AssetError::Json`] when its content is not a JSON array.
pub fn read_stops(path: &Path) -> Result<ParsedStops, AssetError> {
    let source = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_stops(&source)
}
