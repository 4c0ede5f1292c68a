//! Uploaded documents hold two named numeric series:
//!
//! ```json
//! { "stock1": [4, 40, 32], "stock2": [6, 2, 1] }
//! ```
//!
//! The first two keys, in document order, become series 1 and series 2.
//! Observations are indexed by position since the document carries no dates.

use serde_json::{Map, Value};

use crate::{SeriesResponse, SpectraError};

/// Parse an uploaded JSON document into two positionally indexed series.
///
/// # Errors
/// - `Data` when the buffer is not valid JSON (carrying the parser message).
/// - `InvalidArg` when the document is not an object, has fewer than two keys,
///   or one of the first two values is not an array of numbers.
pub fn parse_upload(text: &str) -> Result<(SeriesResponse, SeriesResponse), SpectraError> {
    let doc: Value = serde_json::from_str(text).map_err(|e| SpectraError::Data(e.to_string()))?;
    let Value::Object(map) = doc else {
        return Err(SpectraError::InvalidArg(
            "uploaded document must be a JSON object with two keys".into(),
        ));
    };
    if map.len() < 2 {
        return Err(SpectraError::InvalidArg(format!(
            "uploaded document must contain two series, found {}",
            map.len()
        )));
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(keys = map.len(), "parsed uploaded document");

    let mut entries = first_two(&map);
    let (code2, values2) = entries.pop().ok_or_else(missing_series)?;
    let (code1, values1) = entries.pop().ok_or_else(missing_series)?;

    Ok((
        SeriesResponse::from_values(code1, numbers(code1, values1)?),
        SeriesResponse::from_values(code2, numbers(code2, values2)?),
    ))
}

fn first_two(map: &Map<String, Value>) -> Vec<(&str, &Value)> {
    map.iter().take(2).map(|(k, v)| (k.as_str(), v)).collect()
}

fn missing_series() -> SpectraError {
    SpectraError::InvalidArg("uploaded document must contain two series".into())
}

fn numbers(code: &str, value: &Value) -> Result<Vec<f64>, SpectraError> {
    let Value::Array(items) = value else {
        return Err(SpectraError::InvalidArg(format!(
            "series \"{code}\" must be an array of numbers"
        )));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| {
                SpectraError::InvalidArg(format!(
                    "series \"{code}\" has a non-numeric value at position {i}"
                ))
            })
        })
        .collect()
}
