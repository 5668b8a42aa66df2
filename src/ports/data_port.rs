//! Market data access port trait.
//!
//! Implementations own fetching, caching and timeouts; the analysis engine
//! only consumes what they hand back.

use crate::domain::error::QuantError;
use crate::domain::fundamental::FundamentalSnapshot;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::options_chain::OptionChain;
use crate::domain::period::HistoricalPeriod;
use chrono::NaiveDate;

pub trait MarketDataPort: Send + Sync {
    /// Latest traded price. Fails with `DataUnavailable` when there is no
    /// recent bar or the price is not positive.
    fn current_price(&self, ticker: &str) -> Result<f64, QuantError>;

    /// Daily bars in chronological order covering `period`.
    fn historical_series(
        &self,
        ticker: &str,
        period: HistoricalPeriod,
    ) -> Result<Vec<OhlcvBar>, QuantError>;

    fn info_snapshot(&self, ticker: &str) -> Result<FundamentalSnapshot, QuantError>;

    /// Listed expirations in provider order; empty when the ticker has no options.
    fn option_expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, QuantError>;

    fn option_chain(&self, ticker: &str, expiration: NaiveDate)
    -> Result<OptionChain, QuantError>;
}
