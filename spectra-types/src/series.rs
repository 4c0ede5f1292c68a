//! Series observations, merged rows and the analysis result triple.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Position of an observation: a trading date for market data, or a plain
/// sequence index for uploaded series that carry no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesIndex {
    /// Calendar date of the observation.
    Date(NaiveDate),
    /// Zero-based position within the series.
    Index(usize),
}

impl fmt::Display for SeriesIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// One sample of one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Date or sequence index of the sample.
    pub date: SeriesIndex,
    /// Sampled value (closing price for market data).
    pub value: f64,
}

/// One instrument's full series in chronological (or sequence) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    /// Ticker or user-supplied key identifying the series.
    pub code: String,
    /// Ordered observations.
    pub observations: Vec<Observation>,
}

impl SeriesResponse {
    /// Build a series from values alone, indexing observations by position.
    pub fn from_values(code: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            code: code.into(),
            observations: values
                .into_iter()
                .enumerate()
                .map(|(i, value)| Observation {
                    date: SeriesIndex::Index(i),
                    value,
                })
                .collect(),
        }
    }

    /// The raw value sequence, in order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// One aligned time index of two series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    /// Date (or index) taken from the first series.
    pub date: SeriesIndex,
    /// Value of the first series at this position.
    pub first: f64,
    /// Value of the second series at this position.
    pub second: f64,
}

/// Two series aligned positionally, with their codes kept once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergedSeries {
    /// Code of the series whose values land in `MergedRow::first`.
    pub first_code: String,
    /// Code of the series whose values land in `MergedRow::second`.
    pub second_code: String,
    /// Aligned rows.
    pub rows: Vec<MergedRow>,
}

impl MergedSeries {
    /// Value of the series identified by `code` at row `index`.
    ///
    /// Returns `None` when the row does not exist or the code matches neither series.
    #[must_use]
    pub fn value(&self, index: usize, code: &str) -> Option<f64> {
        let row = self.rows.get(index)?;
        if code == self.first_code {
            Some(row.first)
        } else if code == self.second_code {
            Some(row.second)
        } else {
            None
        }
    }

    /// Number of aligned rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows were aligned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dates of every row, in order.
    #[must_use]
    pub fn dates(&self) -> Vec<SeriesIndex> {
        self.rows.iter().map(|r| r.date).collect()
    }
}

/// Outputs of the remote linear-combination computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The linear combination of the two inputs.
    pub spread: Vec<f64>,
    /// Spectral power density estimate of the spread.
    pub periodogram: Vec<f64>,
}

/// The three result collections a pipeline run produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// Merged raw series.
    pub raw: MergedSeries,
    /// Linear combination.
    pub spread: Vec<f64>,
    /// Periodogram.
    pub periodogram: Vec<f64>,
}

impl AnalysisResults {
    /// True when none of the three collections holds data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.spread.is_empty() && self.periodogram.is_empty()
    }
}
