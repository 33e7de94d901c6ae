//! Lines file loading

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::types::{Segment, SegmentSeries};
use crate::{Result, ScopeError};

/// Extract the segment array stored under `key` from a lines document.
///
/// The key must be present and hold an array; an empty array is valid. Every
/// element must have numeric-pair `p1` and `p2` fields.
pub fn parse_segments(json: &str, key: &str) -> Result<Vec<Segment>> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| ScopeError::parse_error("lines file", e))?;

    let entries = document
        .get(key)
        .ok_or_else(|| ScopeError::FieldNotFound { field: key.to_string() })?
        .as_array()
        .ok_or_else(|| ScopeError::Parse {
            context: "lines file".to_string(),
            details: format!("'{}' is not an array", key),
        })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Segment::deserialize(entry)
                .map_err(|e| ScopeError::parse_error(format!("{}[{}]", key, index), e))
        })
        .collect()
}

/// Read a lines file and extract the segment array stored under `key`.
pub fn load_segments<P: AsRef<Path>>(path: P, key: &str) -> Result<Vec<Segment>> {
    let path = path.as_ref();
    debug!("Reading lines file {}", path.display());

    let json = std::fs::read_to_string(path)
        .map_err(|e| ScopeError::file_error(path.to_path_buf(), e))?;
    let segments = parse_segments(&json, key)?;

    info!("Loaded {} segments from {}", segments.len(), path.display());
    Ok(segments)
}

/// Read a lines file straight into coordinate sequences.
pub fn load_series<P: AsRef<Path>>(path: P, key: &str) -> Result<SegmentSeries> {
    let segments = load_segments(path, key)?;
    Ok(SegmentSeries::from_segments(&segments))
}
