//! Wire payloads of the remote analysis service.

use serde::{Deserialize, Serialize};

use crate::AnalysisResult;

/// Response of `POST /stationarity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationarityResponse {
    /// True when the submitted series is stationary.
    #[serde(rename = "isStationary", alias = "isStationarity")]
    pub is_stationary: bool,
}

/// Response of `POST /linear-combination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearCombinationResponse {
    /// Whether the resulting spread is stationary.
    #[serde(rename = "isStationary", alias = "isStationarity")]
    pub is_stationary: bool,
    /// The linear combination of the two inputs.
    pub spread: Vec<f64>,
    /// Periodogram of the spread.
    #[serde(default)]
    pub periodogram: Vec<f64>,
    /// Covariance of the two inputs.
    #[serde(default)]
    pub covariance: f64,
}

impl LinearCombinationResponse {
    /// Keep only the two series that feed rendering and export.
    #[must_use]
    pub fn into_result(self) -> AnalysisResult {
        AnalysisResult {
            spread: self.spread,
            periodogram: self.periodogram,
        }
    }
}

/// Error body returned by the service when it rejects input structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    /// Human-readable validation messages.
    pub messages: Vec<String>,
}
