//! # TradeSim Market
//!
//! The simulated exchange: a fixed set of quotes whose prices drift by a random
//! multiplier each time the market is refreshed.
//!
//! ## Architectural Principles
//!
//! - **Injected randomness:** `Market::refresh_prices` never reaches for a global
//!   RNG. It pulls multipliers from a `PriceShock`, so a session can be seeded and
//!   tests can replay exact sequences.
//! - **Bounded drift:** every multiplier is clamped to `[0.95, 1.05]` before it is
//!   applied, so a single refresh can never move a price more than 5% or drive it
//!   to zero, whatever the source hands back.
//!
//! ## Public API
//!
//! - `Market`: symbol lookup and the randomized refresh.
//! - `PriceShock`, `RandomShock`, `ScriptedShock`: multiplier sources.
//! - `MarketError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod exchange;
pub mod shock;

pub use error::MarketError;
pub use exchange::Market;
pub use shock::{MAX_MULTIPLIER, MIN_MULTIPLIER, PriceShock, RandomShock, ScriptedShock};
