//! Configuration types shared by the pipeline, connectors and front ends.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base URL of the analysis service.
pub const DEFAULT_ANALYSIS_BASE_URL: &str = "http://localhost:8000";

/// Default MOEX ISS securities endpoint (shares, TQBR board).
pub const DEFAULT_MARKET_DATA_BASE_URL: &str =
    "http://iss.moex.com/iss/engines/stock/markets/shares/boards/TQBR/securities";

/// Default file name of the exported workbook.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "spectral-analysis.xlsx";

/// Where the two input series come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMethod {
    /// Query the market-data provider for two instruments.
    #[default]
    Fetch,
    /// Read two series from an uploaded JSON document.
    File,
}

/// Global configuration for a `spectra` pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectraConfig {
    /// Base URL of the stationarity / linear-combination service.
    pub analysis_base_url: String,
    /// Securities endpoint of the market-data provider.
    pub market_data_base_url: String,
    /// Optional deadline applied to each remote call.
    ///
    /// `None` leaves calls unbounded; a hung service then hangs the run.
    pub request_timeout: Option<Duration>,
    /// File name used when exporting results without an explicit path.
    pub export_file_name: String,
}

impl Default for SpectraConfig {
    fn default() -> Self {
        Self {
            analysis_base_url: DEFAULT_ANALYSIS_BASE_URL.to_string(),
            market_data_base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            request_timeout: None,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}
