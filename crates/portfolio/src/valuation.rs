use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market value of a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValue {
    pub symbol: String,
    pub quantity: u64,
    pub price: Decimal,
    pub market_value: Decimal,
}

/// A point-in-time appraisal of the whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub date: NaiveDate,
    pub cash: Decimal,
    /// Priced holdings, sorted by symbol.
    pub positions: Vec<PositionValue>,
    /// Held symbols the market could not price. They count as zero.
    pub unpriced: Vec<String>,
    pub holdings_value: Decimal,
    /// `cash + holdings_value`.
    pub total_value: Decimal,
}
