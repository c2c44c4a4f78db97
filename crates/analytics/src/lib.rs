//! # TradeSim Analytics Engine
//!
//! Turns the portfolio's date-keyed valuation ledger into a `PerformanceReport`.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** this crate has no knowledge of markets, holdings or I/O. It
//!   takes `(date, value)` samples and returns numbers.
//! - **Stateless calculation:** the `AnalyticsEngine` holds no state, which makes
//!   it trivially reusable and easy to test.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the calculator.
//! - `PerformanceReport`, `LedgerEntry`: the calculated output.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{LedgerEntry, PerformanceReport};
