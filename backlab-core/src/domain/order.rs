//! Orders emitted by strategies.
//!
//! Execution model: immediate full execution at the bar's close price.
//! There is no order book, no partial fill and no latency; the portfolio
//! applies an order in the same bar that produced it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// +1.0 for buys, -1.0 for sells.
    pub fn sign(self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single market order, filled in full at `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub side: OrderSide,
    pub price: f64,
    pub size: f64,
    pub date: NaiveDate,
}

impl Order {
    pub fn buy(date: NaiveDate, price: f64, size: f64) -> Self {
        Self {
            side: OrderSide::Buy,
            price,
            size,
            date,
        }
    }

    pub fn sell(date: NaiveDate, price: f64, size: f64) -> Self {
        Self {
            side: OrderSide::Sell,
            price,
            size,
            date,
        }
    }

    /// Signed change in position size this order causes.
    pub fn signed_size(&self) -> f64 {
        self.side.sign() * self.size
    }

    /// Cash moved by this order: `price × size`.
    pub fn notional(&self) -> f64 {
        self.price * self.size
    }
}
