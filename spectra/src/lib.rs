//! Spectra runs a two-series spectral analysis against remote services.
//!
//! Overview
//! - Gathers two series from a market-data provider or an uploaded JSON document.
//! - Rejects stationary inputs using the analysis service's stationarity test.
//! - Aligns the pair positionally and requests their linear combination and
//!   its periodogram.
//! - Publishes progress as an observable [`PipelineSnapshot`] and forwards the
//!   three result collections to any registered `ResultSink`.
//! - Exports results as a three-sheet Excel workbook.
//!
//! Key behaviors
//! - A run is strictly sequential: stationarity of series 1, then series 2,
//!   then the linear combination. An error at any step ends the run in
//!   `Error` with a single user-facing message.
//! - When the market-data provider cannot deliver a series, the run returns
//!   to `Idle` without an error message and reports
//!   [`RunOutcome::SourceUnavailable`].
//! - A new submit or a [`Pipeline::clear`] supersedes any run in flight; the
//!   older run finishes its network calls but writes nothing.
//! - No call is retried. Calls are unbounded unless a request timeout is set.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use spectra::{Pipeline, SourceRequest};
//! use spectra_core::{Company, Period};
//!
//! let pipeline = Pipeline::builder()
//!     .with_market_data(Arc::new(spectra_moex::MoexConnector::new_default()))
//!     .with_analysis_service(Arc::new(spectra_service::AnalysisClient::new_default()))
//!     .build()?;
//!
//! let outcome = pipeline
//!     .submit(SourceRequest::Fetch {
//!         first: Company::Gazp,
//!         second: Company::Sber,
//!         period: Period::Year,
//!     })
//!     .await;
//! let results = pipeline.results();
//! pipeline.export(None)?;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
/// Excel workbook export.
pub mod export;
mod source;
mod state;

pub use core::{Pipeline, PipelineBuilder};
pub use source::{RunOutcome, SourceRequest, UploadedFile};
pub use state::PipelineSnapshot;
