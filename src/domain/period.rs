//! Historical lookback codes (`1mo`, `1y`, `max`, ...).

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HistoricalPeriod {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown historical period '{0}' (expected one of 1d 5d 1mo 3mo 6mo 1y 2y 5y 10y ytd max)")]
pub struct UnknownPeriod(pub String);

impl HistoricalPeriod {
    pub fn code(&self) -> &'static str {
        match self {
            HistoricalPeriod::OneDay => "1d",
            HistoricalPeriod::FiveDays => "5d",
            HistoricalPeriod::OneMonth => "1mo",
            HistoricalPeriod::ThreeMonths => "3mo",
            HistoricalPeriod::SixMonths => "6mo",
            HistoricalPeriod::OneYear => "1y",
            HistoricalPeriod::TwoYears => "2y",
            HistoricalPeriod::FiveYears => "5y",
            HistoricalPeriod::TenYears => "10y",
            HistoricalPeriod::YearToDate => "ytd",
            HistoricalPeriod::Max => "max",
        }
    }

    /// First date covered by the lookback ending at `as_of`; `None` for `max`.
    pub fn lookback_start(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        let months = |m: u32| as_of.checked_sub_months(Months::new(m));
        match self {
            HistoricalPeriod::OneDay => Some(as_of - Duration::days(1)),
            HistoricalPeriod::FiveDays => Some(as_of - Duration::days(5)),
            HistoricalPeriod::OneMonth => months(1),
            HistoricalPeriod::ThreeMonths => months(3),
            HistoricalPeriod::SixMonths => months(6),
            HistoricalPeriod::OneYear => months(12),
            HistoricalPeriod::TwoYears => months(24),
            HistoricalPeriod::FiveYears => months(60),
            HistoricalPeriod::TenYears => months(120),
            HistoricalPeriod::YearToDate => NaiveDate::from_ymd_opt(as_of.year(), 1, 1),
            HistoricalPeriod::Max => None,
        }
    }
}

impl fmt::Display for HistoricalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HistoricalPeriod {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let period = match s.trim().to_lowercase().as_str() {
            "1d" => HistoricalPeriod::OneDay,
            "5d" => HistoricalPeriod::FiveDays,
            "1mo" => HistoricalPeriod::OneMonth,
            "3mo" => HistoricalPeriod::ThreeMonths,
            "6mo" => HistoricalPeriod::SixMonths,
            "1y" => HistoricalPeriod::OneYear,
            "2y" => HistoricalPeriod::TwoYears,
            "5y" => HistoricalPeriod::FiveYears,
            "10y" => HistoricalPeriod::TenYears,
            "ytd" => HistoricalPeriod::YearToDate,
            "max" => HistoricalPeriod::Max,
            _ => return Err(UnknownPeriod(s.to_string())),
        };
        Ok(period)
    }
}

impl TryFrom<String> for HistoricalPeriod {
    type Error = UnknownPeriod;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HistoricalPeriod> for String {
    fn from(period: HistoricalPeriod) -> Self {
        period.code().to_string()
    }
}
