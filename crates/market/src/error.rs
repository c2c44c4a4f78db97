use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Invalid stock symbol: {0}")]
    NotFound(String),
}
