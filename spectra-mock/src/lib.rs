//! Mock spectra connectors.
//!
//! - [`MockMarketData`] serves deterministic daily closes for every supported
//!   instrument.
//! - [`MockAnalysisService`] answers both analysis endpoints locally with a
//!   small reference implementation, so a full pipeline run works offline.
//! - [`DynamicMock`] defers every answer to a test-side controller.
use std::time::Duration;

use async_trait::async_trait;
use spectra_core::{
    AnalysisService, DateRange, LinearCombinationResponse, MarketDataProvider, SeriesResponse,
    SpectraError, StationarityResponse,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMock, DynamicMockController, MockBehavior};
pub use fixtures::stats;

/// Simulated latency of the `TIMEOUT` code.
pub const SLOW_CALL: Duration = Duration::from_millis(200);

/// Market-data connector backed by static fixtures.
///
/// Two reserved codes exercise failure paths: `FAIL` errors immediately and
/// `TIMEOUT` answers after [`SLOW_CALL`] with a not-found error.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMarketData;

impl MockMarketData {
    /// Connector name.
    pub const NAME: &'static str = "spectra-mock";

    /// Create the fixture connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

async fn maybe_fail_or_timeout(code: &str, capability: &'static str) -> Result<(), SpectraError> {
    match code {
        "FAIL" => Err(SpectraError::connector(
            MockMarketData::NAME,
            format!("forced failure: {capability}"),
        )),
        "TIMEOUT" => {
            tokio::time::sleep(SLOW_CALL).await;
            Ok(())
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn daily_closes(
        &self,
        code: &str,
        range: DateRange,
    ) -> Result<SeriesResponse, SpectraError> {
        maybe_fail_or_timeout(code, "daily_closes").await?;
        fixtures::closes::by_code(code, range)
            .ok_or_else(|| SpectraError::not_found(format!("candles for {code}")))
    }
}

/// Analysis service computed in-process.
///
/// Stationarity is a lag-1 autocorrelation threshold; the linear combination
/// is the OLS residual of series 1 on series 2 with its raw periodogram.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAnalysisService;

impl MockAnalysisService {
    /// Service name.
    pub const NAME: &'static str = "spectra-mock-analysis";

    /// Create the local service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn rejected(msg: &str) -> SpectraError {
    SpectraError::Service {
        messages: vec![msg.to_string()],
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn check_stationarity(
        &self,
        series: &[f64],
    ) -> Result<StationarityResponse, SpectraError> {
        if series.is_empty() {
            return Err(rejected("series must not be empty"));
        }
        Ok(StationarityResponse {
            is_stationary: stats::looks_stationary(series),
        })
    }

    async fn linear_combination(
        &self,
        pair: [&[f64]; 2],
    ) -> Result<LinearCombinationResponse, SpectraError> {
        let [a, b] = pair;
        if a.len().min(b.len()) < 2 {
            return Err(rejected("series are too short for a linear combination"));
        }
        let spread = stats::spread(a, b);
        Ok(LinearCombinationResponse {
            is_stationary: stats::looks_stationary(&spread),
            periodogram: stats::periodogram(&spread),
            covariance: stats::covariance(a, b),
            spread,
        })
    }
}
