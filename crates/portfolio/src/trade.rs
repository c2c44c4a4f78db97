use core_types::OrderSide;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of a fully executed buy or sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeConfirmation {
    pub side: OrderSide,
    pub symbol: String,
    pub quantity: u64,
    pub unit_price: Decimal,
    /// `quantity * unit_price`: cash paid on a buy, cash received on a sell.
    pub notional: Decimal,
    pub balance_after: Decimal,
}

impl fmt::Display for TradeConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} shares of {}",
            self.side.past_tense(),
            self.quantity,
            self.symbol
        )
    }
}
