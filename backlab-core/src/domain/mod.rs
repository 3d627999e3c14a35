//! Domain types for the backtester.

pub mod bar;
pub mod order;
pub mod portfolio;
pub mod position;
pub mod series;
pub mod trade;

pub use bar::Bar;
pub use order::{Order, OrderSide};
pub use portfolio::{OrderRejection, Portfolio, PortfolioView};
pub use position::Position;
pub use series::{DataError, PriceSeries};
pub use trade::{EquityPoint, TradeRecord};
