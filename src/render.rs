//! Terminal rendering of market, portfolio and performance data.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use market::Market;
use portfolio::{PerformanceReport, Valuation};
use rust_decimal::Decimal;

/// `$1234.50`
pub fn money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// `10.00%`, or `undefined` when the return has no meaningful base.
pub fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(pct) => format!("{:.2}%", pct.round_dp(2)),
        None => "undefined".to_string(),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn market_table(market: &Market) -> Table {
    let mut table = new_table(vec!["Symbol", "Price"]);
    for quote in market.quotes() {
        table.add_row(vec![Cell::new(quote.symbol()), right(money(quote.price()))]);
    }
    table
}

pub fn valuation_table(valuation: &Valuation) -> Table {
    let mut table = new_table(vec!["Symbol", "Shares", "Price", "Current Value"]);
    for position in &valuation.positions {
        table.add_row(vec![
            Cell::new(&position.symbol),
            right(position.quantity.to_string()),
            right(money(position.price)),
            right(money(position.market_value)),
        ]);
    }
    for symbol in &valuation.unpriced {
        table.add_row(vec![
            Cell::new(symbol),
            right("-".to_string()),
            right("n/a".to_string()),
            right(money(Decimal::ZERO)),
        ]);
    }
    table
}

pub fn performance_table(report: &PerformanceReport) -> Table {
    let mut table = new_table(vec!["Date", "Total Value"]);
    for entry in &report.entries {
        table.add_row(vec![Cell::new(entry.date), right(money(entry.value))]);
    }
    table
}

/// The lines printed under the performance table.
pub fn performance_summary(report: &PerformanceReport) -> Vec<String> {
    vec![
        format!("Overall Return: {}", percent(report.overall_return_pct)),
        format!(
            "Max Drawdown: {} ({})",
            money(report.max_drawdown),
            percent(report.max_drawdown_pct)
        ),
    ]
}
