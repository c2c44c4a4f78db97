use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::Serialize;

/// Decimal places a quote keeps after being repriced.
pub const PRICE_DP: u32 = 4;

/// Canonical form of a user-supplied ticker: surrounding whitespace removed, upper-cased.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The current tradable price of a single symbol.
///
/// The symbol is fixed at construction. The price can only be changed through
/// [`MarketQuote::reprice`], which refuses any update that would leave it at or
/// below zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketQuote {
    symbol: String,
    price: Decimal,
}

impl MarketQuote {
    /// Creates a quote, rejecting a blank symbol or a non-positive price.
    pub fn new(symbol: impl Into<String>, price: Decimal) -> Result<Self, CoreError> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(CoreError::EmptySymbol);
        }
        if price <= Decimal::ZERO {
            return Err(CoreError::NonPositivePrice { symbol, price });
        }
        Ok(Self { symbol, price })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Multiplies the price by `multiplier` in place and returns the new price,
    /// rounded to [`PRICE_DP`] places.
    ///
    /// The quote is left untouched if the result would not be strictly positive
    /// or would not fit in a `Decimal`.
    pub fn reprice(&mut self, multiplier: Decimal) -> Result<Decimal, CoreError> {
        let next = self
            .price
            .checked_mul(multiplier)
            .ok_or_else(|| CoreError::PriceOverflow {
                symbol: self.symbol.clone(),
                price: self.price,
                multiplier,
            })?
            .round_dp(PRICE_DP);
        if next <= Decimal::ZERO {
            return Err(CoreError::NonPositivePrice {
                symbol: self.symbol.clone(),
                price: next,
            });
        }
        self.price = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn valid_quote_keeps_its_price() {
        let quote = MarketQuote::new("MSFT", dec!(300.00)).unwrap();
        assert_eq!(quote.symbol(), "MSFT");
        assert_eq!(quote.price(), dec!(300.00));
    }

    #[test]
    fn blank_symbol_is_rejected() {
        assert_eq!(MarketQuote::new("", dec!(1)), Err(CoreError::EmptySymbol));
        assert_eq!(MarketQuote::new("   ", dec!(1)), Err(CoreError::EmptySymbol));
    }

    #[test]
    fn non_positive_price_is_rejected() {
        for price in [dec!(0), dec!(-0.01), dec!(-150)] {
            let err = MarketQuote::new("AMAZON", price).unwrap_err();
            assert!(matches!(err, CoreError::NonPositivePrice { .. }));
        }
    }

    #[test]
    fn symbol_is_trimmed() {
        let quote = MarketQuote::new("  GOOGLE ", dec!(2800)).unwrap();
        assert_eq!(quote.symbol(), "GOOGLE");
    }

    #[test]
    fn reprice_applies_multiplier() {
        let mut quote = MarketQuote::new("APPLE", dec!(150)).unwrap();
        assert_eq!(quote.reprice(dec!(1.04)).unwrap(), dec!(156.00));
        assert_eq!(quote.price(), dec!(156.00));
    }

    #[test]
    fn reprice_refuses_to_zero_the_price() {
        let mut quote = MarketQuote::new("APPLE", dec!(150)).unwrap();
        assert!(quote.reprice(dec!(0)).is_err());
        assert!(quote.reprice(dec!(-1)).is_err());
        assert_eq!(quote.price(), dec!(150));
    }

    #[test]
    fn reprice_rounds_to_price_precision() {
        let mut quote = MarketQuote::new("MSFT", dec!(300)).unwrap();
        assert_eq!(quote.reprice(dec!(1.012345)).unwrap(), dec!(303.7035));
    }

    #[test]
    fn reprice_refuses_to_round_down_to_zero() {
        let mut quote = MarketQuote::new("PENNY", dec!(0.0001)).unwrap();
        assert!(quote.reprice(dec!(0.4)).is_err());
        assert_eq!(quote.price(), dec!(0.0001));
    }

    #[test]
    fn reprice_past_decimal_range_leaves_quote_untouched() {
        let mut quote = MarketQuote::new("HUGE", Decimal::MAX).unwrap();
        assert_eq!(
            quote.reprice(dec!(1.05)),
            Err(CoreError::PriceOverflow {
                symbol: "HUGE".to_string(),
                price: Decimal::MAX,
                multiplier: dec!(1.05),
            })
        );
        assert_eq!(quote.price(), Decimal::MAX);
    }

    #[test]
    fn normalize_symbol_trims_and_uppercases() {
        assert_eq!(normalize_symbol("  msft\n"), "MSFT");
    }
}
