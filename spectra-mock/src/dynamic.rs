use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use spectra_core::{
    AnalysisService, DateRange, LinearCombinationResponse, MarketDataProvider, SeriesResponse,
    SpectraError, StationarityResponse,
};

/// Instruction for how a method should behave for a given input.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Return the provided value after sleeping on the tokio clock.
    Delay(Duration, T),
    /// Fail immediately with the provided error.
    Fail(SpectraError),
    /// Hang indefinitely (simulate a stalled service).
    Hang,
}

impl<T> MockBehavior<T> {
    async fn play(self) -> Result<T, SpectraError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Delay(d, v) => {
                tokio::time::sleep(d).await;
                Ok(v)
            }
            Self::Fail(e) => Err(e),
            Self::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

#[derive(Default)]
struct InternalState {
    series_rules: HashMap<String, MockBehavior<SeriesResponse>>,
    stationarity_script: VecDeque<MockBehavior<StationarityResponse>>,
    linear_combination_rule: Option<MockBehavior<LinearCombinationResponse>>,
    series_requests: Vec<(String, DateRange)>,
    stationarity_calls: Vec<Vec<f64>>,
    linear_combination_calls: Vec<[Vec<f64>; 2]>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior of `daily_closes` for a specific code.
    pub async fn set_series_behavior(
        &self,
        code: impl Into<String>,
        behavior: MockBehavior<SeriesResponse>,
    ) {
        let mut guard = self.state.lock().await;
        guard.series_rules.insert(code.into(), behavior);
    }

    /// Queue the behavior of the next unanswered `check_stationarity` call.
    ///
    /// Calls beyond the queue report a non-stationary series.
    pub async fn push_stationarity(&self, behavior: MockBehavior<StationarityResponse>) {
        let mut guard = self.state.lock().await;
        guard.stationarity_script.push_back(behavior);
    }

    /// Set the behavior of every `linear_combination` call.
    pub async fn set_linear_combination_behavior(
        &self,
        behavior: MockBehavior<LinearCombinationResponse>,
    ) {
        let mut guard = self.state.lock().await;
        guard.linear_combination_rule = Some(behavior);
    }

    /// Codes and ranges requested from the market-data side, in call order.
    pub async fn series_requests(&self) -> Vec<(String, DateRange)> {
        self.state.lock().await.series_requests.clone()
    }

    /// Series submitted to `check_stationarity`, in call order.
    pub async fn stationarity_calls(&self) -> Vec<Vec<f64>> {
        self.state.lock().await.stationarity_calls.clone()
    }

    /// Pairs submitted to `linear_combination`, in call order.
    pub async fn linear_combination_calls(&self) -> Vec<[Vec<f64>; 2]> {
        self.state.lock().await.linear_combination_calls.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// A market-data provider and analysis service that defer all behavior to an
/// external controller.
pub struct DynamicMock {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMock {
    /// Create a new dynamic mock and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<Self>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        (Arc::new(Self { name, state }), controller)
    }
}

#[async_trait]
impl MarketDataProvider for DynamicMock {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn daily_closes(
        &self,
        code: &str,
        range: DateRange,
    ) -> Result<SeriesResponse, SpectraError> {
        // Snapshot the behavior without holding the lock across the play.
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.series_requests.push((code.to_string(), range));
            guard.series_rules.get(code).cloned()
        };
        match behavior {
            Some(b) => b.play().await,
            None => Err(SpectraError::not_found(format!("candles for {code}"))),
        }
    }
}

#[async_trait]
impl AnalysisService for DynamicMock {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check_stationarity(
        &self,
        series: &[f64],
    ) -> Result<StationarityResponse, SpectraError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.stationarity_calls.push(series.to_vec());
            guard.stationarity_script.pop_front()
        };
        behavior
            .unwrap_or(MockBehavior::Return(StationarityResponse {
                is_stationary: false,
            }))
            .play()
            .await
    }

    async fn linear_combination(
        &self,
        pair: [&[f64]; 2],
    ) -> Result<LinearCombinationResponse, SpectraError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard
                .linear_combination_calls
                .push([pair[0].to_vec(), pair[1].to_vec()]);
            guard.linear_combination_rule.clone()
        };
        match behavior {
            Some(b) => b.play().await,
            None => Err(SpectraError::Transport(
                "no linear-combination behavior configured".into(),
            )),
        }
    }
}
