//! spectra-core
//!
//! Core types, traits, and utilities shared across the spectra workspace.
//!
//! - `types`: re-exported data structures (series, merged rows, payloads, errors).
//! - `connector`: the provider traits the pipeline is written against.
//! - `timeseries`: positional alignment of two series.
//! - `upload`: parsing of user-supplied JSON documents into two series.
#![warn(missing_docs)]

/// Provider traits for market data, the analysis service and result sinks.
pub mod connector;
/// Time-series utilities for aligning two series.
pub mod timeseries;
pub mod types;
/// Parsing of uploaded two-series documents.
pub mod upload;

pub use connector::{AnalysisService, MarketDataProvider, ResultSink};
pub use timeseries::merge::merge_series;
pub use types::*;
pub use upload::parse_upload;
