use crate::error::MarketError;
use crate::shock::{MAX_MULTIPLIER, MIN_MULTIPLIER, PriceShock};
use core_types::{CoreError, MarketQuote};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The simulated market: a fixed mapping from symbol to its live quote.
///
/// The set of symbols is decided at construction and never changes afterwards;
/// only prices move.
#[derive(Debug, Clone)]
pub struct Market {
    quotes: HashMap<String, MarketQuote>,
}

impl Market {
    /// Builds a market from its seed quotes. Listing a symbol twice is an error.
    pub fn new(quotes: impl IntoIterator<Item = MarketQuote>) -> Result<Self, CoreError> {
        let mut map = HashMap::new();
        for quote in quotes {
            let symbol = quote.symbol().to_string();
            if map.insert(symbol.clone(), quote).is_some() {
                return Err(CoreError::DuplicateSymbol(symbol));
            }
        }
        Ok(Self { quotes: map })
    }

    /// Moves every price by a multiplier drawn from `shocks`.
    ///
    /// Quotes are visited in symbol order so that a seeded source reproduces
    /// the same prices. Multipliers outside `[0.95, 1.05]` are clamped.
    pub fn refresh_prices(&mut self, shocks: &mut dyn PriceShock) {
        let mut symbols: Vec<String> = self.quotes.keys().cloned().collect();
        symbols.sort();

        for symbol in symbols {
            let multiplier = shocks
                .next_multiplier()
                .clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);
            let Some(quote) = self.quotes.get_mut(&symbol) else {
                continue;
            };
            let before = quote.price();
            match quote.reprice(multiplier) {
                Ok(after) => debug!(symbol = %symbol, %before, %after, %multiplier, "Repriced quote"),
                Err(e) => warn!(symbol = %symbol, error = %e, "Skipped reprice"),
            }
        }
    }

    /// Looks up the live quote for `symbol`.
    pub fn quote(&self, symbol: &str) -> Result<&MarketQuote, MarketError> {
        self.quotes
            .get(symbol)
            .ok_or_else(|| MarketError::NotFound(symbol.to_string()))
    }

    /// Shorthand for the current price of `symbol`.
    pub fn price(&self, symbol: &str) -> Result<Decimal, MarketError> {
        self.quote(symbol).map(MarketQuote::price)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.quotes.contains_key(symbol)
    }

    /// All quotes, sorted by symbol.
    pub fn quotes(&self) -> Vec<&MarketQuote> {
        let mut quotes: Vec<&MarketQuote> = self.quotes.values().collect();
        quotes.sort_by(|a, b| a.symbol().cmp(b.symbol()));
        quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
