//! spectra-service
//!
//! Thin typed client over the two endpoints of the remote analysis service.
//! The service internals are opaque; only the request/response contract is
//! modelled here.
//!
//! Failure mapping
//! ---------------
//! - A non-2xx response whose body is `{ "messages": [..] }` is a structured
//!   rejection and becomes [`SpectraError::Service`].
//! - Connection failures and any other non-2xx response become
//!   [`SpectraError::Transport`] with a readable message.
//! - A 2xx body that does not match the contract is [`SpectraError::Data`].
#![warn(missing_docs)]

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use spectra_core::{
    AnalysisService, DEFAULT_ANALYSIS_BASE_URL, LinearCombinationResponse, ServiceErrorBody,
    SpectraError, StationarityResponse,
};

/// Path of the stationarity endpoint.
pub const STATIONARITY_PATH: &str = "/stationarity";
/// Path of the linear-combination endpoint.
pub const LINEAR_COMBINATION_PATH: &str = "/linear-combination";

/// HTTP client for the analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Static service name used to tag log lines.
    pub const NAME: &'static str = "spectra-service";

    /// Client against the default local service.
    #[must_use]
    pub fn new_default() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_ANALYSIS_BASE_URL.to_string(),
        }
    }

    /// Returns an unconfigured builder pointing at the default local service.
    #[must_use]
    pub fn builder() -> AnalysisClientBuilder {
        AnalysisClientBuilder::default()
    }

    /// Base URL this client posts to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, SpectraError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| SpectraError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| SpectraError::Data(format!("{path}: {e}")));
        }

        // The body is only informative; a failed read falls back to the status message.
        let bytes = resp.bytes().await.unwrap_or_default();
        Err(rejection(status, &bytes))
    }
}

fn rejection(status: reqwest::StatusCode, body: &[u8]) -> SpectraError {
    match serde_json::from_slice::<ServiceErrorBody>(body) {
        Ok(ServiceErrorBody { messages }) if !messages.is_empty() => {
            SpectraError::Service { messages }
        }
        _ => SpectraError::Transport(format!(
            "Request failed with status code {}",
            status.as_u16()
        )),
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "spectra_service::check_stationarity",
            skip(self, series),
            fields(len = series.len()),
        )
    )]
    async fn check_stationarity(
        &self,
        series: &[f64],
    ) -> Result<StationarityResponse, SpectraError> {
        self.post(STATIONARITY_PATH, series).await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "spectra_service::linear_combination",
            skip(self, pair),
            fields(len1 = pair[0].len(), len2 = pair[1].len()),
        )
    )]
    async fn linear_combination(
        &self,
        pair: [&[f64]; 2],
    ) -> Result<LinearCombinationResponse, SpectraError> {
        self.post(LINEAR_COMBINATION_PATH, &pair).await
    }
}

/// Builder for an [`AnalysisClient`].
#[derive(Debug, Clone)]
pub struct AnalysisClientBuilder {
    base_url: String,
    http: Option<reqwest::Client>,
    timeout: Option<Duration>,
}

impl Default for AnalysisClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ANALYSIS_BASE_URL.to_string(),
            http: None,
            timeout: None,
        }
    }
}

impl AnalysisClientBuilder {
    /// Base URL of the service, e.g. `http://localhost:8000`.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use an existing HTTP client. Takes precedence over [`Self::timeout`].
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Per-request timeout of the internally built client.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the base URL does not parse, or `Transport` if
    /// the HTTP client cannot be constructed.
    pub fn build(self) -> Result<AnalysisClient, SpectraError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| SpectraError::InvalidArg(format!("analysis url: {e}")))?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut b = reqwest::Client::builder();
                if let Some(t) = self.timeout {
                    b = b.timeout(t);
                }
                b.build()
                    .map_err(|e| SpectraError::Transport(e.to_string()))?
            }
        };
        Ok(AnalysisClient {
            http,
            base_url: self.base_url,
        })
    }
}
