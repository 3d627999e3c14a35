//! Market data acquisition.
//!
//! Providers fetch daily bars for a ticker and date range. Every provider
//! result passes through [`canonicalize`] before the engine sees it, so the
//! engine can assume ordered, date-unique bars inside the requested range.

pub mod canonicalize;
pub mod circuit_breaker;
pub mod csv;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use self::canonicalize::canonicalize;
pub use self::csv::CsvProvider;
pub use circuit_breaker::CircuitBreaker;
pub use provider::{MarketDataProvider, ProviderError};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
