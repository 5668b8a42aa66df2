#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use quantlens::adapters::clock::FixedClock;
use quantlens::domain::error::QuantError;
use quantlens::domain::fundamental::FundamentalSnapshot;
pub use quantlens::domain::ohlcv::OhlcvBar;
use quantlens::domain::options_chain::{OptionChain, OptionRow};
use quantlens::domain::period::HistoricalPeriod;
use quantlens::ports::data_port::MarketDataPort;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

/// Canned provider responses keyed by ticker.
#[derive(Default)]
pub struct MockMarketData {
    pub prices: HashMap<String, f64>,
    pub bars: HashMap<String, Vec<OhlcvBar>>,
    pub info: HashMap<String, FundamentalSnapshot>,
    pub chains: HashMap<String, BTreeMap<NaiveDate, OptionChain>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, ticker: &str, price: f64) -> Self {
        self.prices.insert(ticker.to_string(), price);
        self
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.bars.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_info(mut self, ticker: &str, info: FundamentalSnapshot) -> Self {
        self.info.insert(ticker.to_string(), info);
        self
    }

    pub fn with_chain(mut self, ticker: &str, expiry: NaiveDate, chain: OptionChain) -> Self {
        self.chains
            .entry(ticker.to_string())
            .or_default()
            .insert(expiry, chain);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    fn check(&self, ticker: &str) -> Result<(), QuantError> {
        match self.errors.get(ticker) {
            Some(reason) => Err(QuantError::data_unavailable(ticker, reason.clone())),
            None => Ok(()),
        }
    }
}

impl MarketDataPort for MockMarketData {
    fn current_price(&self, ticker: &str) -> Result<f64, QuantError> {
        self.check(ticker)?;
        self.prices
            .get(ticker)
            .copied()
            .ok_or_else(|| QuantError::data_unavailable(ticker, "no recent bar"))
    }

    fn historical_series(
        &self,
        ticker: &str,
        _period: HistoricalPeriod,
    ) -> Result<Vec<OhlcvBar>, QuantError> {
        self.check(ticker)?;
        Ok(self.bars.get(ticker).cloned().unwrap_or_default())
    }

    fn info_snapshot(&self, ticker: &str) -> Result<FundamentalSnapshot, QuantError> {
        self.check(ticker)?;
        self.info
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuantError::data_unavailable(ticker, "no info snapshot"))
    }

    fn option_expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, QuantError> {
        self.check(ticker)?;
        Ok(self
            .chains
            .get(ticker)
            .map(|c| c.keys().copied().collect())
            .unwrap_or_default())
    }

    fn option_chain(&self, ticker: &str, expiration: NaiveDate) -> Result<OptionChain, QuantError> {
        self.check(ticker)?;
        self.chains
            .get(ticker)
            .and_then(|c| c.get(&expiration))
            .cloned()
            .ok_or_else(|| QuantError::data_unavailable(ticker, "no chain"))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(at(2024, 6, 3, 16, 0))
}

/// Daily bars ending the day before `end`, with a drift and a gentle
/// oscillation so every indicator has something to work with.
pub fn generate_bars(end: NaiveDate, count: usize, start_price: f64, drift: f64) -> Vec<OhlcvBar> {
    let first = end - Duration::days(count as i64);
    (0..count)
        .map(|i| {
            let close = start_price + drift * i as f64 + (i as f64 * 0.4).sin() * 2.0;
            OhlcvBar {
                date: first + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + i as f64 * 100.0,
            }
        })
        .collect()
}

pub fn option_row(strike: f64, volume: Option<f64>, oi: Option<f64>, iv: Option<f64>) -> OptionRow {
    OptionRow {
        strike,
        volume,
        open_interest: oi,
        implied_volatility: iv,
    }
}

pub fn sample_chain() -> OptionChain {
    OptionChain {
        calls: vec![
            option_row(95.0, Some(100.0), Some(1000.0), Some(0.33)),
            option_row(100.0, Some(300.0), Some(2000.0), Some(0.35)),
            option_row(105.0, Some(100.0), Some(500.0), Some(0.30)),
        ],
        puts: vec![
            option_row(95.0, Some(400.0), Some(1500.0), Some(0.38)),
            option_row(100.0, Some(350.0), None, Some(0.36)),
            option_row(105.0, None, Some(800.0), Some(0.31)),
        ],
    }
}

pub fn healthy_info() -> FundamentalSnapshot {
    FundamentalSnapshot {
        forward_pe: Some(18.0),
        price_to_book: Some(2.4),
        dividend_yield: Some(0.025),
    }
}

/// Writes a snapshot directory in the layout the file adapter reads.
pub fn write_snapshot(dir: &Path, ticker: &str, bars: &[OhlcvBar], info_json: &str, options_json: Option<&str>) {
    let mut csv = std::fs::File::create(dir.join(format!("{ticker}_history.csv"))).unwrap();
    writeln!(csv, "date,open,high,low,close,volume").unwrap();
    for b in bars {
        writeln!(
            csv,
            "{},{},{},{},{},{}",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        )
        .unwrap();
    }
    std::fs::write(dir.join(format!("{ticker}_info.json")), info_json).unwrap();
    if let Some(opts) = options_json {
        std::fs::write(dir.join(format!("{ticker}_options.json")), opts).unwrap();
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
