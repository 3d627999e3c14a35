use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Position tracking for the single traded instrument.
///
/// `size` is signed: positive is long, negative is short, zero is flat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub size: f64,
    pub avg_entry_price: f64,
    pub entry_date: Option<NaiveDate>,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        self.size == 0.0
    }

    pub fn is_long(&self) -> bool {
        self.size > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.size < 0.0
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.size * current_price
    }
}
