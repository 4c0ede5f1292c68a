//! Spectra-specific data transfer objects, instrument enumerations,
//! configuration primitives and the shared error type.
#![warn(missing_docs)]

mod analysis;
mod config;
mod error;
mod instrument;
mod series;
mod state;

pub use analysis::{LinearCombinationResponse, ServiceErrorBody, StationarityResponse};
pub use config::{
    DEFAULT_ANALYSIS_BASE_URL, DEFAULT_EXPORT_FILE_NAME, DEFAULT_MARKET_DATA_BASE_URL,
    SourceMethod, SpectraConfig,
};
pub use error::SpectraError;
pub use instrument::{Company, DateRange, Period, label_for};
pub use series::{
    AnalysisResult, AnalysisResults, MergedRow, MergedSeries, Observation, SeriesIndex,
    SeriesResponse,
};
pub use state::{Phase, PipelineState};
