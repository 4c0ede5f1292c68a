use async_trait::async_trait;

use crate::{
    DateRange, LinearCombinationResponse, MergedSeries, SeriesResponse, SpectraError,
    StationarityResponse,
};

/// Focused role trait for connectors that provide daily closing prices.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable connector name, used to tag errors and log lines.
    fn name(&self) -> &'static str;

    /// Fetch the daily closing series of `code` over `range`, in provider
    /// (chronological) order.
    async fn daily_closes(
        &self,
        code: &str,
        range: DateRange,
    ) -> Result<SeriesResponse, SpectraError>;

    /// Fetch a series, absorbing every failure into `None`.
    ///
    /// Callers treat `None` as "source unavailable".
    async fn fetch(&self, code: &str, range: DateRange) -> Option<SeriesResponse> {
        self.daily_closes(code, range)
            .await
            .map_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    connector = self.name(),
                    code,
                    error = %e,
                    "market data unavailable"
                );
                e
            })
            .ok()
    }
}

/// Focused role trait for the remote stationarity / linear-combination service.
///
/// Each call is attempted exactly once.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Human-readable service name.
    fn name(&self) -> &'static str;

    /// Run the stationarity test on a single value sequence.
    async fn check_stationarity(
        &self,
        series: &[f64],
    ) -> Result<StationarityResponse, SpectraError>;

    /// Compute the linear combination (spread) and its periodogram for two
    /// value sequences.
    async fn linear_combination(
        &self,
        pair: [&[f64]; 2],
    ) -> Result<LinearCombinationResponse, SpectraError>;
}

/// Receiver of the three result collections a run produces.
///
/// Rendering and export layers implement this; the pipeline calls the
/// setters in order raw, spread, periodogram.
pub trait ResultSink: Send + Sync {
    /// Replace the merged raw series.
    fn set_raw(&self, raw: MergedSeries);
    /// Replace the spread.
    fn set_spread(&self, spread: Vec<f64>);
    /// Replace the periodogram.
    fn set_periodogram(&self, periodogram: Vec<f64>);
}
