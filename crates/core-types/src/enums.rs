use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Past-tense verb used when reporting a filled order ("Bought", "Sold").
    pub fn past_tense(&self) -> &'static str {
        match self {
            OrderSide::Buy => "Bought",
            OrderSide::Sell => "Sold",
        }
    }
}
