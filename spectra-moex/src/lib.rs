//! spectra-moex
//!
//! Market-data connector that implements `MarketDataProvider` on top of the
//! MOEX ISS candles endpoint. Each request asks for daily candles between two
//! dates and keeps the close value and the trading date of every row.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;

use std::sync::Arc;

use adapter::{CandleTable, IssCandles, RealAdapter};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use spectra_core::{
    Company, DateRange, MarketDataProvider, Observation, SeriesIndex, SeriesResponse,
    SpectraError,
};

pub use builder::MoexConnectorBuilder;

/// Position of the close value in an ISS candle row.
pub const CLOSE_COLUMN: usize = 1;
/// Position of the end timestamp in an ISS candle row.
pub const END_COLUMN: usize = 7;

/// Public connector type. Production users construct it with
/// `MoexConnector::new_default()` or through [`MoexConnector::builder`].
pub struct MoexConnector {
    candles: Arc<dyn IssCandles>,
}

impl MoexConnector {
    /// Static connector name used to tag errors.
    pub const NAME: &'static str = "spectra-moex";

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data")
    }

    fn normalize_error(e: SpectraError, what: &str) -> SpectraError {
        match e {
            SpectraError::Connector { connector: _, msg } => {
                if Self::looks_like_not_found(&msg) {
                    SpectraError::not_found(what.to_string())
                } else {
                    SpectraError::connector(Self::NAME, msg)
                }
            }
            SpectraError::Transport(msg) => SpectraError::connector(Self::NAME, msg),
            other => other,
        }
    }

    /// Build against the public ISS endpoint.
    #[must_use]
    pub fn new_default() -> Self {
        Self::from_adapter(RealAdapter::new_default())
    }

    /// Build from any candle-table adapter.
    pub fn from_adapter<A: IssCandles + 'static>(adapter: A) -> Self {
        Self {
            candles: Arc::new(adapter),
        }
    }

    /// Build from a shared adapter handle (tests inject closures this way).
    #[must_use]
    pub fn from_shared(candles: Arc<dyn IssCandles>) -> Self {
        Self { candles }
    }

    /// Fetch one supported instrument, absorbing failures into `None`.
    pub async fn fetch_company(&self, company: Company, range: DateRange) -> Option<SeriesResponse> {
        self.fetch(company.code(), range).await
    }
}

/// Convert an ISS candle table into a series for `code`.
///
/// Columns are located by name (`close`, `end`) when the header lists them and
/// fall back to the fixed ISS positions otherwise. The end timestamp
/// (`YYYY-MM-DD HH:MM:SS`) is truncated to its date.
///
/// # Errors
/// Returns `Data` when a row is too short, the close is not numeric, or the
/// timestamp does not start with a `YYYY-MM-DD` date.
pub fn table_to_series(code: &str, table: CandleTable) -> Result<SeriesResponse, SpectraError> {
    let locate = |name: &str, fallback: usize| {
        table
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .unwrap_or(fallback)
    };
    let close_at = locate("close", CLOSE_COLUMN);
    let end_at = locate("end", END_COLUMN);

    let observations = table
        .data
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let value = row.get(close_at).and_then(Value::as_f64).ok_or_else(|| {
                SpectraError::Data(format!("{code}: row {i} has no numeric close"))
            })?;
            let date = row
                .get(end_at)
                .and_then(Value::as_str)
                .and_then(parse_day)
                .ok_or_else(|| {
                    SpectraError::Data(format!("{code}: row {i} has no parsable end date"))
                })?;
            Ok(Observation {
                date: SeriesIndex::Date(date),
                value,
            })
        })
        .collect::<Result<Vec<_>, SpectraError>>()?;

    Ok(SeriesResponse {
        code: code.to_string(),
        observations,
    })
}

fn parse_day(ts: &str) -> Option<NaiveDate> {
    let day = ts.split(' ').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[async_trait]
impl MarketDataProvider for MoexConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn daily_closes(
        &self,
        code: &str,
        range: DateRange,
    ) -> Result<SeriesResponse, SpectraError> {
        let table = self
            .candles
            .candles(code, range)
            .await
            .map_err(|e| Self::normalize_error(e, &format!("candles for {code}")))?;
        table_to_series(code, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_drops_time_of_day() {
        assert_eq!(
            parse_day("2024-03-01 23:59:59"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_day("2024-03-01"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_day("yesterday"), None);
    }

    #[test]
    fn not_found_messages_map_to_not_found() {
        let e = MoexConnector::normalize_error(
            SpectraError::connector("x", "No data for range"),
            "candles for SBER",
        );
        assert!(matches!(e, SpectraError::NotFound { .. }));
    }
}
