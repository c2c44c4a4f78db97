use analytics::AnalyticsError;
use market::MarketError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    #[error("Quantity must be positive, got {0}.")]
    InvalidQuantity(i64),

    #[error("Unit price must be positive, got {0}.")]
    InvalidPrice(Decimal),

    #[error("Insufficient funds to buy {quantity} shares of {symbol}. Required: {required}, Available: {available}")]
    InsufficientFunds {
        symbol: String,
        quantity: u64,
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares to sell {requested} shares of {symbol}. Held: {held}")]
    InsufficientShares {
        symbol: String,
        requested: u64,
        held: u64,
    },

    #[error("Amount for {quantity} shares of {symbol} is too large to represent.")]
    Overflow { symbol: String, quantity: u64 },

    #[error("Portfolio total value is too large to represent.")]
    ValuationOverflow,

    #[error(transparent)]
    QuoteNotFound(#[from] MarketError),

    #[error("No performance history available.")]
    EmptyHistory,
}

impl From<AnalyticsError> for PortfolioError {
    fn from(e: AnalyticsError) -> Self {
        match e {
            AnalyticsError::EmptyHistory => PortfolioError::EmptyHistory,
        }
    }
}
