//! # TradeSim Core Types
//!
//! Layer 0 of the workspace. Holds the vocabulary shared by every other crate:
//! the `MarketQuote` record, the side of a trade, and the construction errors
//! raised when an invariant would be violated at creation time.
//!
//! This crate has no knowledge of markets, portfolios or I/O.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::OrderSide;
pub use error::CoreError;
pub use structs::{MarketQuote, PRICE_DP, normalize_symbol};
