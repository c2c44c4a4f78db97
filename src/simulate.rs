//! Non-interactive, day-by-day simulation over a manual clock.

use crate::render;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use market::{Market, PriceShock};
use portfolio::{ManualClock, PerformanceReport, Portfolio};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// Spreads the opening balance evenly across every listed symbol (whole shares
/// only), then lets the market drift for `days` days, taking one valuation per day.
///
/// The ledger ends up with `days + 1` samples: the opening day plus one per simulated day.
pub fn run_buy_and_hold(
    mut market: Market,
    shocks: &mut dyn PriceShock,
    initial_balance: Decimal,
    start: NaiveDate,
    days: u32,
) -> Result<PerformanceReport> {
    let clock = Arc::new(ManualClock::new(start));
    let mut portfolio = Portfolio::with_clock(initial_balance, clock.clone())?;

    allocate_equal_weight(&mut portfolio, &market)?;
    portfolio.valuation(&market)?;

    for _ in 0..days {
        clock.advance_days(1);
        market.refresh_prices(shocks);
        let valuation = portfolio.valuation(&market)?;
        info!(date = %valuation.date, total = %valuation.total_value, "Simulated day");
    }

    Ok(portfolio.performance_report()?)
}

fn allocate_equal_weight(portfolio: &mut Portfolio, market: &Market) -> Result<()> {
    if market.is_empty() {
        return Ok(());
    }
    let budget = portfolio.balance() / Decimal::from(market.len());

    for quote in market.quotes() {
        let shares = budget
            .checked_div(quote.price())
            .and_then(|per_share| per_share.floor().to_i64())
            .with_context(|| format!("Share count for {} does not fit in an i64", quote.symbol()))?;
        if shares > 0 {
            portfolio.buy_at_market(market, quote.symbol(), shares)?;
        }
    }
    Ok(())
}

/// Prints the report either as tables or as pretty JSON.
pub fn print_report<W: Write>(out: &mut W, report: &PerformanceReport, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Performance History:")?;
    writeln!(out, "{}", render::performance_table(report))?;
    writeln!(out, "Starting Value: {}", render::money(report.starting_value))?;
    writeln!(out, "Ending Value: {}", render::money(report.ending_value))?;
    for line in render::performance_summary(report) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
