//! # TradeSim Portfolio Crate
//!
//! The investor's side of the simulation: cash, share holdings, and the
//! day-by-day valuation ledger.
//!
//! ## Architectural Principles
//!
//! - **All-or-nothing trades:** every precondition is checked before any field
//!   is touched, so a rejected order leaves the portfolio exactly as it was.
//! - **No zero holdings:** a symbol disappears from the holdings map the moment
//!   its share count reaches zero.
//! - **One sample per day:** `Portfolio::valuation` records its total under the
//!   date reported by an injected `Clock`. Revaluing on the same day overwrites
//!   that day's sample instead of appending another.
//!
//! ## Public API
//!
//! - `Portfolio`: the state manager.
//! - `Clock`, `SystemClock`, `ManualClock`: sources of "today".
//! - `TradeConfirmation`, `Valuation`, `PositionValue`: operation results.
//! - `PortfolioError`: the specific error types that can be returned from this crate.

pub mod clock;
pub mod error;
pub mod portfolio;
pub mod trade;
pub mod valuation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::PortfolioError;
pub use portfolio::Portfolio;
pub use trade::TradeConfirmation;
pub use valuation::{PositionValue, Valuation};

// The report type is part of this crate's API surface.
pub use analytics::{LedgerEntry, PerformanceReport};
