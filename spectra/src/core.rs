use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use spectra_core::{
    AnalysisResults, AnalysisService, DateRange, MarketDataProvider, MergedSeries,
    PipelineState, ResultSink, SeriesResponse, SpectraConfig, SpectraError, label_for,
    merge_series, parse_upload,
};
use tokio::sync::watch;

use crate::export;
use crate::source::{RunOutcome, SourceRequest};
use crate::state::{PipelineSnapshot, StateStore};

/// Orchestrator that turns a [`SourceRequest`] into the three result
/// collections, tracking progress in an observable state.
pub struct Pipeline {
    market_data: Arc<dyn MarketDataProvider>,
    analysis: Arc<dyn AnalysisService>,
    sinks: Vec<Arc<dyn ResultSink>>,
    cfg: SpectraConfig,
    today: Option<NaiveDate>,
    store: StateStore,
}

/// Builder for constructing a [`Pipeline`].
pub struct PipelineBuilder {
    market_data: Option<Arc<dyn MarketDataProvider>>,
    analysis: Option<Arc<dyn AnalysisService>>,
    sinks: Vec<Arc<dyn ResultSink>>,
    cfg: SpectraConfig,
    today: Option<NaiveDate>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    /// Create a builder with default configuration and no providers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            market_data: None,
            analysis: None,
            sinks: vec![],
            cfg: SpectraConfig::default(),
            today: None,
        }
    }

    /// Market-data provider used by fetch runs.
    #[must_use]
    pub fn with_market_data(mut self, p: Arc<dyn MarketDataProvider>) -> Self {
        self.market_data = Some(p);
        self
    }

    /// Analysis service used for stationarity and linear-combination calls.
    #[must_use]
    pub fn with_analysis_service(mut self, s: Arc<dyn AnalysisService>) -> Self {
        self.analysis = Some(s);
        self
    }

    /// Register an additional receiver of dispatched results.
    ///
    /// Sinks are called together with the built-in snapshot update, in
    /// registration order, and only while the run is current. Every submit
    /// and every clear first hands them empty collections. Sinks must not
    /// call back into the pipeline.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: SpectraConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Bound every remote call. Unset by default.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Anchor lookback periods at a fixed day instead of the local date.
    #[must_use]
    pub const fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no market-data provider or no analysis service
    /// has been registered.
    pub fn build(self) -> Result<Pipeline, SpectraError> {
        let market_data = self.market_data.ok_or_else(|| {
            SpectraError::InvalidArg(
                "no market-data provider registered; add one via with_market_data(...)".into(),
            )
        })?;
        let analysis = self.analysis.ok_or_else(|| {
            SpectraError::InvalidArg(
                "no analysis service registered; add one via with_analysis_service(...)".into(),
            )
        })?;
        Ok(Pipeline {
            market_data,
            analysis,
            sinks: self.sinks,
            cfg: self.cfg,
            today: self.today,
            store: StateStore::new(),
        })
    }
}

/// Where a run stopped short of an error.
enum Flow {
    Done,
    SourceUnavailable(String),
    Superseded,
}

impl Pipeline {
    /// Start building a new pipeline.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SpectraConfig {
        &self.cfg
    }

    /// Current phase and error message.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.store.snapshot().state
    }

    /// Current result collections.
    #[must_use]
    pub fn results(&self) -> AnalysisResults {
        self.store.snapshot().results
    }

    /// State, results and attached file name, read atomically.
    #[must_use]
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.store.snapshot()
    }

    /// Observe every snapshot change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.store.subscribe()
    }

    /// Drop results and the attached file reference, and return to `Idle`.
    ///
    /// An in-flight run is superseded and will not write anything afterwards.
    /// Calling it twice has the same effect as calling it once.
    pub fn clear(&self) {
        self.store.reset(|| self.empty_sinks());
        #[cfg(feature = "tracing")]
        tracing::debug!("pipeline cleared");
    }

    /// Run one request end to end.
    ///
    /// Failures never escape: they land in the observable state and in the
    /// returned [`RunOutcome`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "spectra::submit",
            skip(self, request),
            fields(method = ?request.method()),
        )
    )]
    pub async fn submit(&self, request: SourceRequest) -> RunOutcome {
        let generation = self
            .store
            .begin(request.upload_name(), || self.empty_sinks());

        match self.run(generation, request).await {
            Ok(Flow::Done) => {
                if self.store.finish(generation, PipelineState::success()) {
                    #[cfg(feature = "tracing")]
                    tracing::info!("analysis finished");
                    RunOutcome::Success
                } else {
                    RunOutcome::Superseded
                }
            }
            Ok(Flow::SourceUnavailable(code)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(code = %code, "series unavailable; returning to idle");
                if self.store.finish(generation, PipelineState::idle()) {
                    RunOutcome::SourceUnavailable { code }
                } else {
                    RunOutcome::Superseded
                }
            }
            Ok(Flow::Superseded) => RunOutcome::Superseded,
            Err(e) => {
                let msg = e.user_message();
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "analysis failed");
                if self.store.finish(generation, PipelineState::error(msg.clone())) {
                    RunOutcome::Failed(msg)
                } else {
                    RunOutcome::Superseded
                }
            }
        }
    }

    /// Export the current results to `path`, or to the configured file name.
    ///
    /// # Errors
    /// Returns `InvalidArg` when there is nothing to export, and `Data` when
    /// the workbook cannot be written.
    pub fn export(&self, path: Option<&Path>) -> Result<PathBuf, SpectraError> {
        let path = path.map_or_else(|| PathBuf::from(&self.cfg.export_file_name), Path::to_path_buf);
        export::export_workbook(&self.results(), &path)?;
        Ok(path)
    }

    async fn run(&self, generation: u64, request: SourceRequest) -> Result<Flow, SpectraError> {
        let (first, second) = match self.load(request).await? {
            Ok(pair) => pair,
            Err(code) => return Ok(Flow::SourceUnavailable(code)),
        };
        let (values1, values2) = (first.values(), second.values());

        self.ensure_not_stationary(&first.code, &values1).await?;
        self.ensure_not_stationary(&second.code, &values2).await?;

        let raw = merge_series(&first, &second);
        if !self.dispatch_raw(generation, raw) {
            return Ok(Flow::Superseded);
        }

        let result = self
            .bounded(
                "linear-combination",
                self.analysis.linear_combination([values1.as_slice(), values2.as_slice()]),
            )
            .await?
            .into_result();

        if !self.dispatch_spectrum(generation, result.spread, result.periodogram) {
            return Ok(Flow::Superseded);
        }
        Ok(Flow::Done)
    }

    /// Resolve both series. The inner `Err` carries the code of a series the
    /// market-data provider could not deliver.
    async fn load(
        &self,
        request: SourceRequest,
    ) -> Result<Result<(SeriesResponse, SeriesResponse), String>, SpectraError> {
        match request {
            SourceRequest::Fetch {
                first,
                second,
                period,
            } => {
                let range = period.window(self.today());
                let (a, b) = tokio::join!(
                    self.fetch(first.code(), range),
                    self.fetch(second.code(), range),
                );
                Ok(match (a, b) {
                    (Some(a), Some(b)) => Ok((a, b)),
                    (None, _) => Err(first.code().to_string()),
                    (_, None) => Err(second.code().to_string()),
                })
            }
            SourceRequest::File(None) => Err(SpectraError::NoFile),
            SourceRequest::File(Some(file)) => parse_upload(&file.contents).map(Ok),
        }
    }

    async fn fetch(&self, code: &str, range: DateRange) -> Option<SeriesResponse> {
        match self.cfg.request_timeout {
            None => self.market_data.fetch(code, range).await,
            Some(t) => tokio::time::timeout(t, self.market_data.fetch(code, range))
                .await
                .unwrap_or_else(|_| {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(code, "market data timed out");
                    None
                }),
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "spectra::stationarity", skip(self, values), fields(len = values.len())),
    )]
    async fn ensure_not_stationary(&self, code: &str, values: &[f64]) -> Result<(), SpectraError> {
        let resp = self
            .bounded("stationarity", self.analysis.check_stationarity(values))
            .await?;
        if resp.is_stationary {
            return Err(SpectraError::stationary(label_for(code)));
        }
        Ok(())
    }

    /// Apply the configured deadline to one remote call.
    async fn bounded<T, Fut>(&self, capability: &'static str, fut: Fut) -> Result<T, SpectraError>
    where
        Fut: core::future::Future<Output = Result<T, SpectraError>>,
    {
        match self.cfg.request_timeout {
            None => fut.await,
            Some(t) => tokio::time::timeout(t, fut)
                .await
                .unwrap_or_else(|_| Err(SpectraError::request_timeout(capability))),
        }
    }

    fn empty_sinks(&self) {
        for sink in &self.sinks {
            sink.set_raw(MergedSeries::default());
        }
        for sink in &self.sinks {
            sink.set_spread(Vec::new());
        }
        for sink in &self.sinks {
            sink.set_periodogram(Vec::new());
        }
    }

    fn dispatch_raw(&self, generation: u64, raw: MergedSeries) -> bool {
        self.store.update(generation, |s| {
            for sink in &self.sinks {
                sink.set_raw(raw.clone());
            }
            s.results.raw = raw;
        })
    }

    fn dispatch_spectrum(&self, generation: u64, spread: Vec<f64>, periodogram: Vec<f64>) -> bool {
        self.store.update(generation, |s| {
            for sink in &self.sinks {
                sink.set_spread(spread.clone());
            }
            for sink in &self.sinks {
                sink.set_periodogram(periodogram.clone());
            }
            s.results.spread = spread;
            s.results.periodogram = periodogram;
        })
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
