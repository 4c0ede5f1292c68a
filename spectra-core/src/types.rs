//! Re-export of foundational types from `spectra-types`.
// Consolidated re-exports so downstream crates can depend on `spectra-core` only

pub use spectra_types::{
    AnalysisResult, AnalysisResults, Company, DateRange, LinearCombinationResponse, MergedRow,
    MergedSeries, Observation, Period, Phase, PipelineState, SeriesIndex, SeriesResponse,
    ServiceErrorBody, SourceMethod, SpectraConfig, SpectraError, StationarityResponse, label_for,
};

pub use spectra_types::{
    DEFAULT_ANALYSIS_BASE_URL, DEFAULT_EXPORT_FILE_NAME, DEFAULT_MARKET_DATA_BASE_URL,
};
