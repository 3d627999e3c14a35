//! TradeRecord: append-only log entry for one executed order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::order::{Order, OrderSide};

/// One executed order. Never mutated after it is appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub action: OrderSide,
    pub price: f64,
    pub size: f64,
}

impl From<&Order> for TradeRecord {
    fn from(order: &Order) -> Self {
        Self {
            date: order.date,
            action: order.side,
            price: order.price,
            size: order.size,
        }
    }
}

/// One point of the equity curve: portfolio value at a bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}
