use rust_decimal::Decimal;
use thiserror::Error;

/// Invariant violations detected while constructing core objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Stock symbol cannot be empty.")]
    EmptySymbol,

    #[error("Stock price must be positive, got {price} for {symbol}.")]
    NonPositivePrice { symbol: String, price: Decimal },

    #[error("Repricing {symbol} at {price} by {multiplier} exceeds the decimal range.")]
    PriceOverflow {
        symbol: String,
        price: Decimal,
        multiplier: Decimal,
    },

    #[error("Initial balance cannot be negative, got {0}.")]
    NegativeBalance(Decimal),

    #[error("Symbol {0} is listed more than once.")]
    DuplicateSymbol(String),
}
