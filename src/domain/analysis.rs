//! Per-ticker analysis orchestration.
//!
//! [`QuantAnalyzer::analyze`] runs the technical, fundamental and options
//! stages independently, folds their warnings into [`DataQuality`] and
//! synthesizes a [`TradingSignal`]. It always returns a well-formed
//! [`AnalysisResult`]: expected data gaps surface as flags and warnings, and
//! anything unexpected (including a panic in a collaborator) becomes a
//! terminal result carrying an `error` field.

use crate::domain::error::QuantError;
use crate::domain::fundamental::{FundamentalMetricSet, validate_fundamentals};
use crate::domain::greeks::BlackScholesModel;
use crate::domain::indicator::SeriesIndicatorProvider;
use crate::domain::ohlcv::{OhlcvBar, is_chronological};
use crate::domain::options_chain::{OptionsChainAnalyzer, OptionsMetricSet};
use crate::domain::period::HistoricalPeriod;
use crate::domain::signal::{SignalInputs, TradingSignal, synthesize};
use crate::domain::technical::{SMA_LONG, TechnicalIndicatorSet, compute_technical_indicators};
use crate::ports::clock_port::ClockPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::diagnostic_port::DiagnosticSink;
use crate::ports::indicator_port::NumericIndicatorProvider;
use crate::ports::pricing_port::OptionsPricingModel;
use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Immutable analyzer settings fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Annualized, as a fraction (0.02 = 2%).
    pub risk_free_rate: f64,
    pub historical_period: HistoricalPeriod,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            historical_period: HistoricalPeriod::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataQuality {
    pub technical_data_complete: bool,
    pub fundamental_data_complete: bool,
    pub options_data_complete: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub current_price: Option<f64>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub analysis_timestamp: NaiveDateTime,
    pub technical_indicators: TechnicalIndicatorSet,
    #[serde(serialize_with = "empty_if_none")]
    pub fundamental_metrics: Option<FundamentalMetricSet>,
    pub options_metrics: OptionsMetricSet,
    #[serde(serialize_with = "empty_if_none")]
    pub trading_signal: Option<TradingSignal>,
    pub data_quality: DataQuality,
}

impl AnalysisResult {
    /// Empty result: no price, empty metric sets, every flag false.
    pub fn empty(ticker: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            ticker: ticker.to_string(),
            error: None,
            current_price: None,
            analysis_timestamp: timestamp,
            technical_indicators: TechnicalIndicatorSet::default(),
            fundamental_metrics: None,
            options_metrics: OptionsMetricSet::unavailable(),
            trading_signal: None,
            data_quality: DataQuality::default(),
        }
    }

    pub fn failed(ticker: &str, timestamp: NaiveDateTime, message: String) -> Self {
        let mut result = Self::empty(ticker, timestamp);
        result
            .data_quality
            .warnings
            .push(format!("Analysis failed: {message}"));
        result.error = Some(message);
        result
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

fn empty_if_none<T: Serialize, S: Serializer>(value: &Option<T>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => v.serialize(s),
        None => s.serialize_map(Some(0))?.end(),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Quantitative analyzer for single instruments.
///
/// Holds only configuration and references to its collaborators; `analyze`
/// takes `&self` and keeps no state between calls.
pub struct QuantAnalyzer<'a> {
    config: AnalyzerConfig,
    data: &'a dyn MarketDataPort,
    sink: &'a dyn DiagnosticSink,
    clock: &'a dyn ClockPort,
    indicators: Box<dyn NumericIndicatorProvider>,
    pricing: Box<dyn OptionsPricingModel>,
}

impl<'a> QuantAnalyzer<'a> {
    pub fn new(
        config: AnalyzerConfig,
        data: &'a dyn MarketDataPort,
        sink: &'a dyn DiagnosticSink,
        clock: &'a dyn ClockPort,
    ) -> Self {
        debug!(
            risk_free_rate = config.risk_free_rate,
            period = %config.historical_period,
            "analyzer initialised"
        );
        Self {
            config,
            data,
            sink,
            clock,
            indicators: Box::new(SeriesIndicatorProvider),
            pricing: Box::new(BlackScholesModel),
        }
    }

    pub fn with_indicator_provider(mut self, provider: Box<dyn NumericIndicatorProvider>) -> Self {
        self.indicators = provider;
        self
    }

    pub fn with_pricing_model(mut self, model: Box<dyn OptionsPricingModel>) -> Self {
        self.pricing = model;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, ticker: &str) -> AnalysisResult {
        let ticker = ticker.trim().to_uppercase();
        let started = Instant::now();
        let timestamp = self.clock.now();
        info!(ticker = %ticker, "starting quantitative analysis");

        let result = match panic::catch_unwind(AssertUnwindSafe(|| self.run(&ticker, timestamp))) {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => self.fail(&ticker, timestamp, e.to_string()),
            Err(payload) => self.fail(&ticker, timestamp, panic_message(payload)),
        };

        info!(
            ticker = %ticker,
            elapsed_ms = started.elapsed().as_millis() as u64,
            signal = %result.trading_signal.as_ref().map(|s| s.signal.to_string()).unwrap_or_default(),
            "analysis completed"
        );
        result
    }

    pub fn analyze_all<S: AsRef<str>>(&self, tickers: &[S]) -> Vec<AnalysisResult> {
        tickers.iter().map(|t| self.analyze(t.as_ref())).collect()
    }

    fn fail(&self, ticker: &str, timestamp: NaiveDateTime, message: String) -> AnalysisResult {
        error!(ticker, error = %message, "analysis failed");
        let result = AnalysisResult::failed(ticker, timestamp, message);
        for w in &result.data_quality.warnings {
            self.sink.record(ticker, w);
        }
        result
    }

    fn note(&self, result: &mut AnalysisResult, warning: String) {
        self.sink.record(&result.ticker, &warning);
        result.data_quality.warnings.push(warning);
    }

    fn note_all(&self, result: &mut AnalysisResult, warnings: Vec<String>) {
        for w in warnings {
            self.note(result, w);
        }
    }

    fn fetch_market_data(&self, ticker: &str) -> Result<(f64, Vec<OhlcvBar>), QuantError> {
        let price = self.data.current_price(ticker)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(QuantError::data_unavailable(
                ticker,
                format!("invalid current price {price}"),
            ));
        }
        let bars = self
            .data
            .historical_series(ticker, self.config.historical_period)?;
        if bars.is_empty() {
            return Err(QuantError::data_unavailable(ticker, "empty historical series"));
        }
        if bars.len() < SMA_LONG {
            warn!(ticker, bars = bars.len(), "limited historical data");
        }
        Ok((price, bars))
    }

    fn run(&self, ticker: &str, timestamp: NaiveDateTime) -> Result<AnalysisResult, QuantError> {
        let mut result = AnalysisResult::empty(ticker, timestamp);

        let (price, bars) = match self.fetch_market_data(ticker) {
            Ok(data) => data,
            Err(e) => {
                warn!(ticker, error = %e, "market data fetch failed");
                self.note(&mut result, "Failed to fetch market data".to_string());
                return Ok(result);
            }
        };
        if !is_chronological(&bars) {
            return Err(QuantError::AnalysisFailure {
                ticker: ticker.to_string(),
                reason: "historical series is not in chronological order".to_string(),
            });
        }
        result.current_price = Some(price);

        let technical = compute_technical_indicators(self.indicators.as_ref(), &bars);
        self.note_all(&mut result, technical.warnings);
        match technical.value {
            Some(set) => {
                result.technical_indicators = set;
                result.data_quality.technical_data_complete = true;
            }
            None => self.note(&mut result, "Failed to calculate technical indicators".to_string()),
        }

        match self.data.info_snapshot(ticker) {
            Ok(snapshot) => {
                let fundamental = validate_fundamentals(&snapshot);
                self.note_all(&mut result, fundamental.warnings);
                result.fundamental_metrics = Some(fundamental.value);
                result.data_quality.fundamental_data_complete = true;
            }
            Err(e) => self.note(&mut result, format!("Failed to get fundamental metrics: {e}")),
        }

        let options = OptionsChainAnalyzer {
            data: self.data,
            pricing: self.pricing.as_ref(),
            risk_free_rate: self.config.risk_free_rate,
        }
        .analyze(ticker, price, self.clock.today());
        self.note_all(&mut result, options.warnings);
        result.data_quality.options_data_complete = options.value.options_data_available;
        result.options_metrics = options.value;

        let signal = synthesize(&SignalInputs {
            current_price: price,
            technical: Some(&result.technical_indicators),
            fundamental: result.fundamental_metrics.as_ref(),
            options: Some(&result.options_metrics),
        });
        result.trading_signal = Some(signal);

        Ok(result)
    }
}
