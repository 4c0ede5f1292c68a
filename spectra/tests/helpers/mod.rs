// Re-export helpers so tests can `use helpers::*;`
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{Days, NaiveDate};
use spectra::Pipeline;
use spectra_core::{
    LinearCombinationResponse, MergedSeries, Observation, ResultSink, SeriesIndex,
    SeriesResponse, StationarityResponse,
};
use spectra_mock::{DynamicMock, DynamicMockController, MockBehavior};

/// Fixed anchor for lookback periods.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 29).unwrap()
}

/// Daily-dated series starting 2023-04-03.
pub fn dated(code: &str, values: impl IntoIterator<Item = f64>) -> SeriesResponse {
    let start = NaiveDate::from_ymd_opt(2023, 4, 3).unwrap();
    SeriesResponse {
        code: code.to_string(),
        observations: values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Observation {
                date: SeriesIndex::Date(start + Days::new(i as u64)),
                value,
            })
            .collect(),
    }
}

/// An upward trend of `n` points starting at `base`.
pub fn trend(base: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| base + i as f64).collect()
}

pub fn stationary(is_stationary: bool) -> MockBehavior<StationarityResponse> {
    MockBehavior::Return(StationarityResponse { is_stationary })
}

pub fn lc(spread: Vec<f64>, periodogram: Vec<f64>) -> LinearCombinationResponse {
    LinearCombinationResponse {
        is_stationary: true,
        spread,
        periodogram,
        covariance: 0.0,
    }
}

/// Dynamic mock serving both sides of a pipeline anchored at [`today`].
pub fn dynamic_pipeline() -> (Pipeline, DynamicMockController) {
    dynamic_pipeline_with(|b| b)
}

pub fn dynamic_pipeline_with(
    f: impl FnOnce(spectra::PipelineBuilder) -> spectra::PipelineBuilder,
) -> (Pipeline, DynamicMockController) {
    let (mock, controller) = DynamicMock::new_with_controller("dyn");
    let builder = Pipeline::builder()
        .with_market_data(mock.clone())
        .with_analysis_service(mock)
        .today(today());
    (f(builder).build().expect("pipeline"), controller)
}

/// Records the order and size of every dispatched collection.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<(&'static str, usize)>>,
}

impl RecordingSink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(&'static str, usize)> {
        self.events.lock().unwrap().clone()
    }
}

impl ResultSink for RecordingSink {
    fn set_raw(&self, raw: MergedSeries) {
        self.events.lock().unwrap().push(("raw", raw.len()));
    }
    fn set_spread(&self, spread: Vec<f64>) {
        self.events.lock().unwrap().push(("spread", spread.len()));
    }
    fn set_periodogram(&self, periodogram: Vec<f64>) {
        self.events.lock().unwrap().push(("periodogram", periodogram.len()));
    }
}
