//! Fixed instrument and lookback-period enumerations offered to users.

use core::fmt;
use core::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::SpectraError;

/// Supported MOEX instruments (TQBR board tickers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Company {
    /// Yandex.
    Yndx,
    /// Sberbank.
    Sber,
    /// Gazprom.
    Gazp,
    /// VTB.
    Vtbr,
    /// Rosneft.
    Rosn,
    /// Lukoil.
    Lkoh,
    /// Norilsk Nickel.
    Gmkn,
}

impl Company {
    /// Every supported instrument, in the order they are offered to users.
    pub const ALL: [Self; 7] = [
        Self::Yndx,
        Self::Sber,
        Self::Gazp,
        Self::Vtbr,
        Self::Rosn,
        Self::Lkoh,
        Self::Gmkn,
    ];

    /// Exchange ticker used in market-data requests.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Yndx => "YNDX",
            Self::Sber => "SBER",
            Self::Gazp => "GAZP",
            Self::Vtbr => "VTBR",
            Self::Rosn => "ROSN",
            Self::Lkoh => "LKOH",
            Self::Gmkn => "GMKN",
        }
    }

    /// Localized display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yndx => "Яндекс",
            Self::Sber => "Сбербанк",
            Self::Gazp => "Газпром",
            Self::Vtbr => "ВТБ",
            Self::Rosn => "Роснефть",
            Self::Lkoh => "Лукойл",
            Self::Gmkn => "ГМКНорНик",
        }
    }

    /// Look up a company by its ticker, ignoring ASCII case.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Company {
    type Err = SpectraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim())
            .ok_or_else(|| SpectraError::InvalidArg(format!("unsupported instrument: {s}")))
    }
}

/// Display label for a series code: the company label when the code is a
/// known ticker, otherwise the code itself (uploaded files use free-form keys).
#[must_use]
pub fn label_for(code: &str) -> String {
    Company::from_code(code).map_or_else(|| code.to_string(), |c| c.label().to_string())
}

/// Lookback window anchored at the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One year.
    #[default]
    Year,
    /// Six months.
    Half,
    /// Three months.
    Quarter,
    /// One month.
    Month,
}

impl Period {
    /// Every supported period, longest first.
    pub const ALL: [Self; 4] = [Self::Year, Self::Half, Self::Quarter, Self::Month];

    /// Length of the lookback window in calendar months.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Year => 12,
            Self::Half => 6,
            Self::Quarter => 3,
            Self::Month => 1,
        }
    }

    /// Localized display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Year => "Год",
            Self::Half => "Пол года",
            Self::Quarter => "Квартал",
            Self::Month => "Месяц",
        }
    }

    /// Resolve the `{from, till}` window ending at `today`.
    ///
    /// Month arithmetic clamps to the last valid day (31 March minus one month
    /// is 28/29 February).
    #[must_use]
    pub fn window(self, today: NaiveDate) -> DateRange {
        let from = today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN);
        DateRange { from, till: today }
    }

    const fn code(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Half => "half",
            Self::Quarter => "quarter",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = SpectraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| SpectraError::InvalidArg(format!("unsupported period: {s}")))
    }
}

/// Inclusive calendar window for a market-data query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day requested.
    pub from: NaiveDate,
    /// Last day requested.
    pub till: NaiveDate,
}

impl DateRange {
    /// `from` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn from_param(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    /// `till` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn till_param(&self) -> String {
        self.till.format("%Y-%m-%d").to_string()
    }
}
