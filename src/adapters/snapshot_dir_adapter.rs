//! Snapshot directory market data adapter.
//!
//! Reads per-ticker files exported from a market data provider:
//!
//! - `<TICKER>_history.csv`: `date,open,high,low,close,volume`
//! - `<TICKER>_info.json`: `{"forwardPE": .., "priceToBook": .., "dividendYield": ..}`
//! - `<TICKER>_options.json`: `{"expirations": {"YYYY-MM-DD": {"calls": [..], "puts": [..]}}}`
//!
//! Bars dated after the as-of date are ignored, so a directory can be replayed
//! as of any past day.

use crate::domain::error::QuantError;
use crate::domain::fundamental::FundamentalSnapshot;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::options_chain::OptionChain;
use crate::domain::period::HistoricalPeriod;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct OptionsFile {
    #[serde(default)]
    expirations: BTreeMap<String, OptionChain>,
}

pub struct SnapshotDirAdapter {
    base_path: PathBuf,
    as_of: NaiveDate,
}

impl SnapshotDirAdapter {
    pub fn new(base_path: PathBuf, as_of: NaiveDate) -> Self {
        Self { base_path, as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn file_path(&self, ticker: &str, suffix: &str) -> PathBuf {
        self.base_path.join(format!("{ticker}_{suffix}"))
    }

    fn read(&self, ticker: &str, path: &Path) -> Result<String, QuantError> {
        fs::read_to_string(path).map_err(|e| {
            QuantError::data_unavailable(ticker, format!("failed to read {}: {e}", path.display()))
        })
    }

    /// Every bar on or before the as-of date, sorted by date.
    fn load_bars(&self, ticker: &str) -> Result<Vec<OhlcvBar>, QuantError> {
        let path = self.file_path(ticker, "history.csv");
        let content = self.read(ticker, &path)?;
        let source = path.display().to_string();

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| parse_error(&source, format!("CSV parse error: {e}")))?;
            let bar = parse_bar(&record, &source)?;
            if bar.date <= self.as_of {
                bars.push(bar);
            }
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn load_options(&self, ticker: &str) -> Result<Option<BTreeMap<NaiveDate, OptionChain>>, QuantError> {
        let path = self.file_path(ticker, "options.json");
        if !path.exists() {
            return Ok(None);
        }
        let content = self.read(ticker, &path)?;
        let source = path.display().to_string();
        let file: OptionsFile =
            serde_json::from_str(&content).map_err(|e| parse_error(&source, e.to_string()))?;

        let mut chains = BTreeMap::new();
        for (key, chain) in file.expirations {
            let expiry = NaiveDate::parse_from_str(&key, "%Y-%m-%d")
                .map_err(|e| parse_error(&source, format!("invalid expiration '{key}': {e}")))?;
            chains.insert(expiry, chain);
        }
        Ok(Some(chains))
    }
}

fn parse_error(source: &str, reason: impl Into<String>) -> QuantError {
    QuantError::DataParse {
        source_name: source.to_string(),
        reason: reason.into(),
    }
}

fn column<'r>(record: &'r csv::StringRecord, idx: usize, name: &str, source: &str) -> Result<&'r str, QuantError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| parse_error(source, format!("missing {name} column")))
}

fn number(record: &csv::StringRecord, idx: usize, name: &str, source: &str) -> Result<f64, QuantError> {
    column(record, idx, name, source)?
        .parse()
        .map_err(|e| parse_error(source, format!("invalid {name} value: {e}")))
}

fn parse_bar(record: &csv::StringRecord, source: &str) -> Result<OhlcvBar, QuantError> {
    let raw_date = column(record, 0, "date", source)?;
    // provider exports may carry a time and offset after the date
    let date_part = raw_date.get(..10).unwrap_or(raw_date);
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| parse_error(source, format!("invalid date format: {e}")))?;

    Ok(OhlcvBar {
        date,
        open: number(record, 1, "open", source)?,
        high: number(record, 2, "high", source)?,
        low: number(record, 3, "low", source)?,
        close: number(record, 4, "close", source)?,
        volume: number(record, 5, "volume", source)?,
    })
}

impl MarketDataPort for SnapshotDirAdapter {
    fn current_price(&self, ticker: &str) -> Result<f64, QuantError> {
        let bars = self.load_bars(ticker)?;
        let last = bars
            .last()
            .ok_or_else(|| QuantError::data_unavailable(ticker, "no recent bar"))?;
        if !last.close.is_finite() || last.close <= 0.0 {
            return Err(QuantError::data_unavailable(
                ticker,
                format!("invalid current price {}", last.close),
            ));
        }
        Ok(last.close)
    }

    fn historical_series(
        &self,
        ticker: &str,
        period: HistoricalPeriod,
    ) -> Result<Vec<OhlcvBar>, QuantError> {
        let bars = self.load_bars(ticker)?;
        Ok(match period.lookback_start(self.as_of) {
            Some(start) => bars.into_iter().filter(|b| b.date > start).collect(),
            None => bars,
        })
    }

    fn info_snapshot(&self, ticker: &str) -> Result<FundamentalSnapshot, QuantError> {
        let path = self.file_path(ticker, "info.json");
        let content = self.read(ticker, &path)?;
        serde_json::from_str(&content).map_err(|e| parse_error(&path.display().to_string(), e.to_string()))
    }

    fn option_expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, QuantError> {
        Ok(self
            .load_options(ticker)?
            .map(|chains| chains.into_keys().collect())
            .unwrap_or_default())
    }

    fn option_chain(&self, ticker: &str, expiration: NaiveDate) -> Result<OptionChain, QuantError> {
        self.load_options(ticker)?
            .and_then(|mut chains| chains.remove(&expiration))
            .ok_or_else(|| {
                QuantError::data_unavailable(ticker, format!("no option chain for {expiration}"))
            })
    }
}
