use crate::clock::{Clock, SystemClock};
use crate::error::PortfolioError;
use crate::trade::TradeConfirmation;
use crate::valuation::{PositionValue, Valuation};
use analytics::{AnalyticsEngine, PerformanceReport};
use chrono::NaiveDate;
use core_types::{CoreError, OrderSide};
use market::Market;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Manages the state of the investor's account: cash, holdings and the
/// valuation ledger.
#[derive(Debug, Clone)]
pub struct Portfolio {
    balance: Decimal,
    holdings: HashMap<String, u64>,
    performance_history: BTreeMap<NaiveDate, Decimal>,
    clock: Arc<dyn Clock>,
    analytics: AnalyticsEngine,
}

impl Portfolio {
    /// Creates a `Portfolio` that dates its valuations with the system clock.
    pub fn new(initial_balance: Decimal) -> Result<Self, CoreError> {
        Self::with_clock(initial_balance, Arc::new(SystemClock))
    }

    /// Creates a `Portfolio` that asks `clock` for the current date.
    pub fn with_clock(initial_balance: Decimal, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        if initial_balance < Decimal::ZERO {
            return Err(CoreError::NegativeBalance(initial_balance));
        }
        Ok(Self {
            balance: initial_balance,
            holdings: HashMap::new(),
            performance_history: BTreeMap::new(),
            clock,
            analytics: AnalyticsEngine::new(),
        })
    }

    /// Buys `quantity` shares of `symbol` at `unit_price`.
    ///
    /// Either the whole order is filled or nothing changes.
    pub fn buy(
        &mut self,
        symbol: &str,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<TradeConfirmation, PortfolioError> {
        let shares = Self::validate_order(quantity, unit_price)?;
        let cost = unit_price
            .checked_mul(Decimal::from(shares))
            .ok_or_else(|| Self::overflow(symbol, shares))?;

        if self.balance < cost {
            warn!(symbol = %symbol, quantity = shares, %cost, balance = %self.balance, "Rejected buy: insufficient funds");
            return Err(PortfolioError::InsufficientFunds {
                symbol: symbol.to_string(),
                quantity: shares,
                required: cost,
                available: self.balance,
            });
        }

        let held = self
            .quantity(symbol)
            .checked_add(shares)
            .ok_or_else(|| Self::overflow(symbol, shares))?;

        self.balance -= cost;
        self.holdings.insert(symbol.to_string(), held);

        info!(symbol = %symbol, quantity = shares, %unit_price, balance = %self.balance, "Bought shares");
        Ok(self.confirmation(OrderSide::Buy, symbol, shares, unit_price, cost))
    }

    /// Sells `quantity` shares of `symbol` at `unit_price`.
    ///
    /// Selling the last share of a symbol removes it from the holdings.
    pub fn sell(
        &mut self,
        symbol: &str,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<TradeConfirmation, PortfolioError> {
        let shares = Self::validate_order(quantity, unit_price)?;
        let held = self.quantity(symbol);

        if held < shares {
            warn!(symbol = %symbol, requested = shares, held, "Rejected sell: insufficient shares");
            return Err(PortfolioError::InsufficientShares {
                symbol: symbol.to_string(),
                requested: shares,
                held,
            });
        }

        let proceeds = unit_price
            .checked_mul(Decimal::from(shares))
            .ok_or_else(|| Self::overflow(symbol, shares))?;
        let balance = self
            .balance
            .checked_add(proceeds)
            .ok_or_else(|| Self::overflow(symbol, shares))?;

        self.balance = balance;

        let remaining = held - shares;
        if remaining == 0 {
            self.holdings.remove(symbol);
        } else {
            self.holdings.insert(symbol.to_string(), remaining);
        }

        info!(symbol = %symbol, quantity = shares, %unit_price, balance = %self.balance, "Sold shares");
        Ok(self.confirmation(OrderSide::Sell, symbol, shares, unit_price, proceeds))
    }

    /// Buys at the market's current price for `symbol`.
    pub fn buy_at_market(
        &mut self,
        market: &Market,
        symbol: &str,
        quantity: i64,
    ) -> Result<TradeConfirmation, PortfolioError> {
        let price = market.price(symbol)?;
        self.buy(symbol, quantity, price)
    }

    /// Sells at the market's current price for `symbol`.
    ///
    /// A held symbol the market no longer quotes cannot be sold; no fallback
    /// price is assumed.
    pub fn sell_at_market(
        &mut self,
        market: &Market,
        symbol: &str,
        quantity: i64,
    ) -> Result<TradeConfirmation, PortfolioError> {
        let price = market.price(symbol)?;
        self.sell(symbol, quantity, price)
    }

    /// Values the portfolio at the market's current prices without recording it.
    ///
    /// Fails with [`PortfolioError::Overflow`] when a position's value does not
    /// fit in a `Decimal`, and with [`PortfolioError::ValuationOverflow`] when the
    /// total does not.
    pub fn appraise(&self, market: &Market) -> Result<Valuation, PortfolioError> {
        let mut positions = Vec::with_capacity(self.holdings.len());
        let mut unpriced = Vec::new();
        let mut holdings_value = Decimal::ZERO;

        for (symbol, quantity) in self.holdings() {
            match market.price(symbol) {
                Ok(price) => {
                    let market_value = price
                        .checked_mul(Decimal::from(quantity))
                        .ok_or_else(|| Self::overflow(symbol, quantity))?;
                    holdings_value = holdings_value
                        .checked_add(market_value)
                        .ok_or_else(|| Self::overflow(symbol, quantity))?;
                    positions.push(PositionValue {
                        symbol: symbol.to_string(),
                        quantity,
                        price,
                        market_value,
                    });
                }
                Err(_) => {
                    warn!(symbol = %symbol, quantity, "No market price for holding, valuing at zero");
                    unpriced.push(symbol.to_string());
                }
            }
        }

        let total_value = self
            .balance
            .checked_add(holdings_value)
            .ok_or_else(|| {
                warn!(cash = %self.balance, %holdings_value, "Rejected valuation: total exceeds decimal range");
                PortfolioError::ValuationOverflow
            })?;

        Ok(Valuation {
            date: self.clock.today(),
            cash: self.balance,
            positions,
            unpriced,
            holdings_value,
            total_value,
        })
    }

    /// Values the portfolio and records the total as today's ledger sample.
    ///
    /// Nothing is recorded when the valuation fails.
    pub fn valuation(&mut self, market: &Market) -> Result<Valuation, PortfolioError> {
        let valuation = self.appraise(market)?;
        self.record_snapshot(valuation.date, valuation.total_value);
        Ok(valuation)
    }

    /// Builds the performance report over every recorded sample.
    pub fn performance_report(&self) -> Result<PerformanceReport, PortfolioError> {
        let ledger = self.performance_history();
        Ok(self.analytics.calculate(&ledger)?)
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Shares held of `symbol`, zero when not held.
    pub fn quantity(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn holds(&self, symbol: &str) -> bool {
        self.holdings.contains_key(symbol)
    }

    /// All holdings, sorted by symbol.
    pub fn holdings(&self) -> Vec<(&str, u64)> {
        let mut holdings: Vec<(&str, u64)> = self
            .holdings
            .iter()
            .map(|(symbol, quantity)| (symbol.as_str(), *quantity))
            .collect();
        holdings.sort_by(|a, b| a.0.cmp(b.0));
        holdings
    }

    /// Recorded `(date, total value)` samples in chronological order.
    pub fn performance_history(&self) -> Vec<(NaiveDate, Decimal)> {
        self.performance_history
            .iter()
            .map(|(date, value)| (*date, *value))
            .collect()
    }

    fn record_snapshot(&mut self, date: NaiveDate, total_value: Decimal) {
        match self.performance_history.insert(date, total_value) {
            Some(previous) => debug!(%date, %previous, %total_value, "Overwrote ledger sample"),
            None => debug!(%date, %total_value, "Recorded ledger sample"),
        }
    }

    fn overflow(symbol: &str, quantity: u64) -> PortfolioError {
        warn!(symbol = %symbol, quantity, "Rejected: amount exceeds decimal range");
        PortfolioError::Overflow {
            symbol: symbol.to_string(),
            quantity,
        }
    }

    fn validate_order(quantity: i64, unit_price: Decimal) -> Result<u64, PortfolioError> {
        let shares = u64::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or(PortfolioError::InvalidQuantity(quantity))?;
        if unit_price <= Decimal::ZERO {
            return Err(PortfolioError::InvalidPrice(unit_price));
        }
        Ok(shares)
    }

    fn confirmation(
        &self,
        side: OrderSide,
        symbol: &str,
        quantity: u64,
        unit_price: Decimal,
        notional: Decimal,
    ) -> TradeConfirmation {
        TradeConfirmation {
            side,
            symbol: symbol.to_string(),
            quantity,
            unit_price,
            notional,
            balance_after: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use core_types::MarketQuote;
    use market::MarketError;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn portfolio_on(balance: Decimal, clock: &Arc<ManualClock>) -> Portfolio {
        Portfolio::with_clock(balance, clock.clone()).unwrap()
    }

    fn make_market(quotes: &[(&str, Decimal)]) -> Market {
        Market::new(
            quotes
                .iter()
                .map(|(symbol, price)| MarketQuote::new(*symbol, *price).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn negative_initial_balance_is_rejected() {
        assert_eq!(
            Portfolio::new(dec!(-0.01)).unwrap_err(),
            CoreError::NegativeBalance(dec!(-0.01))
        );
        assert!(Portfolio::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn buy_debits_cash_and_credits_shares() {
        let mut portfolio = Portfolio::new(dec!(10000)).unwrap();
        let fill = portfolio.buy("X", 10, dec!(150)).unwrap();

        assert_eq!(portfolio.balance(), dec!(8500));
        assert_eq!(portfolio.quantity("X"), 10);
        assert_eq!(fill.notional, dec!(1500));
        assert_eq!(fill.balance_after, dec!(8500));
        assert_eq!(fill.to_string(), "Bought 10 shares of X");

        portfolio.buy("X", 5, dec!(100)).unwrap();
        assert_eq!(portfolio.quantity("X"), 15);
        assert_eq!(portfolio.balance(), dec!(8000));
    }

    #[test]
    fn buy_may_spend_the_entire_balance() {
        let mut portfolio = Portfolio::new(dec!(1500)).unwrap();
        portfolio.buy("X", 10, dec!(150)).unwrap();
        assert_eq!(portfolio.balance(), Decimal::ZERO);
    }

    #[test]
    fn buy_beyond_balance_changes_nothing() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        let err = portfolio.buy("X", 7, dec!(150)).unwrap_err();

        assert_eq!(
            err,
            PortfolioError::InsufficientFunds {
                symbol: "X".to_string(),
                quantity: 7,
                required: dec!(1050),
                available: dec!(1000),
            }
        );
        assert_eq!(portfolio.balance(), dec!(1000));
        assert!(portfolio.holdings().is_empty());
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        portfolio.buy("X", 1, dec!(10)).unwrap();

        for quantity in [0, -1, i64::MIN] {
            assert_eq!(
                portfolio.buy("X", quantity, dec!(10)).unwrap_err(),
                PortfolioError::InvalidQuantity(quantity)
            );
            assert_eq!(
                portfolio.sell("X", quantity, dec!(10)).unwrap_err(),
                PortfolioError::InvalidQuantity(quantity)
            );
        }
        assert_eq!(portfolio.balance(), dec!(990));
        assert_eq!(portfolio.quantity("X"), 1);
    }

    #[test]
    fn oversized_order_cost_is_rejected() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();

        assert_eq!(
            portfolio.buy("X", i64::MAX, dec!(100000000000)).unwrap_err(),
            PortfolioError::Overflow {
                symbol: "X".to_string(),
                quantity: i64::MAX as u64,
            }
        );
        assert_eq!(portfolio.balance(), dec!(1000));
        assert!(!portfolio.holds("X"));
    }

    #[test]
    fn share_count_past_u64_is_rejected() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        let tiny = Decimal::new(1, 28);
        portfolio.buy("X", i64::MAX, tiny).unwrap();
        portfolio.buy("X", i64::MAX, tiny).unwrap();
        let balance = portfolio.balance();

        assert!(matches!(
            portfolio.buy("X", i64::MAX, tiny),
            Err(PortfolioError::Overflow { .. })
        ));
        assert_eq!(portfolio.balance(), balance);
        assert_eq!(portfolio.quantity("X"), 2 * (i64::MAX as u64));
    }

    #[test]
    fn sale_proceeds_past_decimal_range_are_rejected() {
        let mut portfolio = Portfolio::new(Decimal::MAX).unwrap();
        portfolio.buy("X", 1, dec!(1)).unwrap();

        assert!(matches!(
            portfolio.sell("X", 1, Decimal::MAX),
            Err(PortfolioError::Overflow { .. })
        ));
        assert_eq!(portfolio.balance(), Decimal::MAX - dec!(1));
        assert_eq!(portfolio.quantity("X"), 1);
    }

    #[test]
    fn oversized_position_value_fails_without_recording() {
        let clock = Arc::new(ManualClock::new(date(1)));
        let mut portfolio = portfolio_on(dec!(1000), &clock);
        portfolio.buy("X", i64::MAX, Decimal::new(1, 28)).unwrap();
        let market = make_market(&[("X", dec!(100000000000))]);

        assert!(matches!(
            portfolio.valuation(&market),
            Err(PortfolioError::Overflow { .. })
        ));
        assert!(portfolio.performance_history().is_empty());
    }

    #[test]
    fn oversized_total_value_fails_without_recording() {
        let clock = Arc::new(ManualClock::new(date(1)));
        let mut portfolio = portfolio_on(Decimal::MAX, &clock);
        portfolio.buy("X", 1, dec!(1)).unwrap();
        let market = make_market(&[("X", dec!(10))]);

        assert_eq!(
            portfolio.valuation(&market).unwrap_err(),
            PortfolioError::ValuationOverflow
        );
        assert!(portfolio.performance_history().is_empty());
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert_eq!(
            portfolio.buy("X", 1, dec!(-5)).unwrap_err(),
            PortfolioError::InvalidPrice(dec!(-5))
        );
        assert_eq!(portfolio.balance(), dec!(1000));
    }

    #[test]
    fn partial_sell_keeps_remaining_shares() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        portfolio.buy("X", 10, dec!(10)).unwrap();
        portfolio.sell("X", 4, dec!(12)).unwrap();

        assert_eq!(portfolio.quantity("X"), 6);
        assert_eq!(portfolio.balance(), dec!(948));
    }

    #[test]
    fn selling_everything_removes_the_symbol() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        portfolio.buy("X", 10, dec!(10)).unwrap();
        let fill = portfolio.sell("X", 10, dec!(11)).unwrap();

        assert!(!portfolio.holds("X"));
        assert!(portfolio.holdings().is_empty());
        assert_eq!(fill.to_string(), "Sold 10 shares of X");
        assert_eq!(portfolio.balance(), dec!(1010));
    }

    #[test]
    fn overselling_changes_nothing() {
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        portfolio.buy("X", 3, dec!(10)).unwrap();

        assert_eq!(
            portfolio.sell("X", 4, dec!(10)).unwrap_err(),
            PortfolioError::InsufficientShares {
                symbol: "X".to_string(),
                requested: 4,
                held: 3,
            }
        );
        assert_eq!(
            portfolio.sell("Y", 1, dec!(10)).unwrap_err(),
            PortfolioError::InsufficientShares {
                symbol: "Y".to_string(),
                requested: 1,
                held: 0,
            }
        );
        assert_eq!(portfolio.quantity("X"), 3);
        assert_eq!(portfolio.balance(), dec!(970));
    }

    #[test]
    fn market_orders_use_the_live_price() {
        let market = make_market(&[("MSFT", dec!(300))]);
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();

        let fill = portfolio.buy_at_market(&market, "MSFT", 2).unwrap();
        assert_eq!(fill.unit_price, dec!(300));
        assert_eq!(portfolio.balance(), dec!(400));

        portfolio.sell_at_market(&market, "MSFT", 1).unwrap();
        assert_eq!(portfolio.balance(), dec!(700));
    }

    #[test]
    fn selling_a_symbol_the_market_dropped_is_not_found() {
        let market = make_market(&[("MSFT", dec!(300))]);
        let mut portfolio = Portfolio::new(dec!(1000)).unwrap();
        portfolio.buy("GHOST", 2, dec!(50)).unwrap();

        assert_eq!(
            portfolio.sell_at_market(&market, "GHOST", 2).unwrap_err(),
            PortfolioError::QuoteNotFound(MarketError::NotFound("GHOST".to_string()))
        );
        assert_eq!(portfolio.quantity("GHOST"), 2);
        assert_eq!(portfolio.balance(), dec!(900));
    }

    #[test]
    fn valuation_sums_cash_and_priced_holdings() {
        let clock = Arc::new(ManualClock::new(date(3)));
        let market = make_market(&[("APPLE", dec!(150)), ("MSFT", dec!(300))]);
        let mut portfolio = portfolio_on(dec!(10000), &clock);
        portfolio.buy("MSFT", 2, dec!(250)).unwrap();
        portfolio.buy("APPLE", 10, dec!(100)).unwrap();

        let valuation = portfolio.valuation(&market).unwrap();

        assert_eq!(valuation.date, date(3));
        assert_eq!(valuation.cash, dec!(8500));
        assert_eq!(valuation.holdings_value, dec!(2100));
        assert_eq!(valuation.total_value, dec!(10600));
        let symbols: Vec<&str> = valuation.positions.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["APPLE", "MSFT"]);
        assert_eq!(valuation.positions[1].market_value, dec!(600));
        assert!(valuation.unpriced.is_empty());
    }

    #[test]
    fn unpriced_holdings_count_as_zero() {
        let clock = Arc::new(ManualClock::new(date(3)));
        let market = make_market(&[("MSFT", dec!(300))]);
        let mut portfolio = portfolio_on(dec!(1000), &clock);
        portfolio.buy("GHOST", 4, dec!(25)).unwrap();
        portfolio.buy("MSFT", 1, dec!(300)).unwrap();

        let valuation = portfolio.valuation(&market).unwrap();

        assert_eq!(valuation.unpriced, vec!["GHOST".to_string()]);
        assert_eq!(valuation.total_value, dec!(600) + dec!(300));
    }

    #[test]
    fn appraise_does_not_touch_the_ledger() {
        let clock = Arc::new(ManualClock::new(date(3)));
        let portfolio = portfolio_on(dec!(1000), &clock);
        portfolio.appraise(&make_market(&[("MSFT", dec!(300))])).unwrap();
        assert!(portfolio.performance_history().is_empty());
    }

    #[test]
    fn revaluing_on_the_same_day_overwrites_the_sample() {
        let clock = Arc::new(ManualClock::new(date(3)));
        let market = make_market(&[("MSFT", dec!(300))]);
        let mut portfolio = portfolio_on(dec!(1000), &clock);

        portfolio.valuation(&market).unwrap();
        portfolio.buy("MSFT", 1, dec!(200)).unwrap();
        portfolio.valuation(&market).unwrap();

        assert_eq!(portfolio.performance_history(), vec![(date(3), dec!(1100))]);
    }

    #[test]
    fn history_is_kept_in_date_order() {
        let clock = Arc::new(ManualClock::new(date(10)));
        let market = make_market(&[("MSFT", dec!(300))]);
        let mut portfolio = portfolio_on(dec!(1000), &clock);

        portfolio.valuation(&market).unwrap();
        clock.set(date(2));
        portfolio.buy("MSFT", 1, dec!(100)).unwrap();
        portfolio.valuation(&market).unwrap();

        assert_eq!(
            portfolio.performance_history(),
            vec![(date(2), dec!(1200)), (date(10), dec!(1000))]
        );
        let report = portfolio.performance_report().unwrap();
        assert_eq!(report.starting_value, dec!(1200));
        assert_eq!(report.ending_value, dec!(1000));
    }

    #[test]
    fn report_before_any_valuation_is_empty_history() {
        let portfolio = Portfolio::new(dec!(1000)).unwrap();
        assert_eq!(
            portfolio.performance_report().unwrap_err(),
            PortfolioError::EmptyHistory
        );
    }

    #[test]
    fn zero_value_portfolio_reports_undefined_return() {
        let clock = Arc::new(ManualClock::new(date(1)));
        let market = make_market(&[("MSFT", dec!(300))]);
        let mut portfolio = portfolio_on(Decimal::ZERO, &clock);

        portfolio.valuation(&market).unwrap();
        let report = portfolio.performance_report().unwrap();
        assert_eq!(report.overall_return_pct, None);
    }
}
