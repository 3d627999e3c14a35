//! Portfolio: the simulated broker account: cash plus one position.
//!
//! Orders are applied atomically: either the whole order is accepted and
//! both cash and position move by `price × size`, or it is rejected and
//! nothing changes. The accounting identity
//! `value == cash + position.size × price` holds after every call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::order::Order;
use super::position::Position;

/// Reasons the portfolio refuses an order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderRejection {
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("short sale not allowed: selling {size} with {held} held would leave {resulting}")]
    ShortSaleNotAllowed {
        size: f64,
        held: f64,
        resulting: f64,
    },
}

/// Read-only snapshot of portfolio state handed to strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioView {
    pub cash: f64,
    pub position_size: f64,
    pub avg_entry_price: f64,
}

impl PortfolioView {
    pub fn is_flat(&self) -> bool {
        self.position_size == 0.0
    }

    pub fn is_long(&self) -> bool {
        self.position_size > 0.0
    }
}

/// Aggregate portfolio state.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_cash: f64,
    pub position: Position,
    /// Realized PnL accumulated on position-reducing fills.
    pub realized_pnl: f64,
    allow_short: bool,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            initial_cash,
            position: Position::default(),
            realized_pnl: 0.0,
            allow_short: false,
        }
    }

    /// Permit sells that take the position below zero.
    pub fn with_short_selling(mut self, allow: bool) -> Self {
        self.allow_short = allow;
        self
    }

    /// Total value = cash + position size × reference price.
    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.position.market_value(price)
    }

    pub fn view(&self) -> PortfolioView {
        PortfolioView {
            cash: self.cash,
            position_size: self.position.size,
            avg_entry_price: self.position.avg_entry_price,
        }
    }

    /// Execute an order in full at its own price.
    ///
    /// BUY increases the position and decreases cash by `price × size`;
    /// SELL does the opposite. No commission, slippage or margin check.
    pub fn apply_order(&mut self, order: &Order) -> Result<(), OrderRejection> {
        if !order.price.is_finite() || order.price <= 0.0 {
            return Err(OrderRejection::InvalidOrder(format!(
                "price must be finite and positive, got {}",
                order.price
            )));
        }
        if !order.size.is_finite() || order.size <= 0.0 {
            return Err(OrderRejection::InvalidOrder(format!(
                "size must be finite and positive, got {}",
                order.size
            )));
        }

        let held = self.position.size;
        let delta = order.signed_size();
        let resulting = held + delta;

        if resulting < 0.0 && !self.allow_short {
            return Err(OrderRejection::ShortSaleNotAllowed {
                size: order.size,
                held,
                resulting,
            });
        }

        // Same-direction fills extend the position; opposite fills close part
        // (or all) of it and may flip it.
        if held == 0.0 || held.signum() == delta.signum() {
            let total_cost = self.position.avg_entry_price * held.abs() + order.notional();
            self.position.avg_entry_price = total_cost / resulting.abs();
            if held == 0.0 {
                self.position.entry_date = Some(order.date);
            }
        } else {
            let closed = delta.abs().min(held.abs());
            self.realized_pnl +=
                closed * (order.price - self.position.avg_entry_price) * held.signum();
            if resulting == 0.0 {
                self.position.avg_entry_price = 0.0;
                self.position.entry_date = None;
            } else if resulting.signum() != held.signum() {
                self.position.avg_entry_price = order.price;
                self.position.entry_date = Some(order.date);
            }
        }

        self.position.size = resulting;
        self.cash -= delta * order.price;
        Ok(())
    }
}
