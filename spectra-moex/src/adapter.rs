#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use spectra_core::{DEFAULT_MARKET_DATA_BASE_URL, DateRange, SpectraError};

/// Candle interval code for daily bars.
pub const DAILY_INTERVAL: &str = "24";

/// Top-level envelope of `candles.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandlesEnvelope {
    /// The candle table.
    pub candles: CandleTable,
}

/// Row-oriented candle table as served by ISS.
///
/// Rows are `[open, close, high, low, value, volume, begin, end]`; `columns`
/// names them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandleTable {
    /// Column names, in row order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Raw rows.
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

/// Candle table abstraction (so we can inject canned tables in tests).
#[async_trait]
pub trait IssCandles: Send + Sync {
    /// Fetch the daily candle table of `code` over `range`.
    async fn candles(&self, code: &str, range: DateRange) -> Result<CandleTable, SpectraError>;
}

/// Real adapter backed by a shared `reqwest::Client`.
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl RealAdapter {
    /// Adapter against the public ISS endpoint with a default HTTP client.
    #[must_use]
    pub fn new_default() -> Self {
        Self::new(reqwest::Client::new(), DEFAULT_MARKET_DATA_BASE_URL)
    }

    /// Wrap an existing client and securities base URL.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Securities endpoint this adapter queries.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, code: &str) -> String {
        format!(
            "{}/{}/candles.json",
            self.base_url.trim_end_matches('/'),
            code
        )
    }
}

fn map_http_err(e: &reqwest::Error, context: &str) -> SpectraError {
    if e.is_timeout() {
        return SpectraError::request_timeout(context.to_string());
    }
    if e.is_decode() {
        return SpectraError::Data(format!("{context}: {e}"));
    }
    SpectraError::connector("spectra-moex", format!("{context}: {e}"))
}

fn map_status(status: reqwest::StatusCode, context: &str) -> SpectraError {
    if status == reqwest::StatusCode::NOT_FOUND {
        SpectraError::not_found(context.to_string())
    } else if status.is_server_error() {
        SpectraError::connector("spectra-moex", format!("server error {status}: {context}"))
    } else {
        SpectraError::connector("spectra-moex", format!("status {status}: {context}"))
    }
}

#[async_trait]
impl IssCandles for RealAdapter {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "spectra_moex::candles",
            skip(self),
            fields(from = %range.from, till = %range.till),
        )
    )]
    async fn candles(&self, code: &str, range: DateRange) -> Result<CandleTable, SpectraError> {
        let context = format!("candles for {code}");
        let from = range.from_param();
        let till = range.till_param();
        let resp = self
            .http
            .get(self.endpoint(code))
            .query(&[
                ("from", from.as_str()),
                ("till", till.as_str()),
                ("interval", DAILY_INTERVAL),
                ("start", "0"),
            ])
            .send()
            .await
            .map_err(|e| map_http_err(&e, &context))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(map_status(status, &context));
        }

        let envelope: CandlesEnvelope = resp
            .json()
            .await
            .map_err(|e| SpectraError::Data(format!("{context}: {e}")))?;
        Ok(envelope.candles)
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn IssCandles {
    /// Build an `IssCandles` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn IssCandles>
    where
        F: Send + Sync + 'static + Fn(String, DateRange) -> Result<CandleTable, SpectraError>,
    {
        struct FnCandles<F>(F);
        #[async_trait]
        impl<F> IssCandles for FnCandles<F>
        where
            F: Send + Sync + 'static + Fn(String, DateRange) -> Result<CandleTable, SpectraError>,
        {
            async fn candles(
                &self,
                code: &str,
                range: DateRange,
            ) -> Result<CandleTable, SpectraError> {
                (self.0)(code.to_string(), range)
            }
        }
        Arc::new(FnCandles(f))
    }
}
