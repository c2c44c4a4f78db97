use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One valuation sample: the total portfolio value recorded on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Performance of the portfolio over the whole ledger.
///
/// This is the output of the `AnalyticsEngine` and is handed to the CLI as-is
/// for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Samples in chronological order.
    pub entries: Vec<LedgerEntry>,

    // I. Return
    pub starting_value: Decimal,
    pub ending_value: Decimal,
    pub net_change: Decimal,
    pub overall_return_pct: Option<Decimal>, // None when the starting value is 0

    // II. Drawdown
    pub max_drawdown: Decimal,
    pub max_drawdown_pct: Option<Decimal>, // None when the peak value is 0
}

impl PerformanceReport {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.first().map(|e| e.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date)
    }
}
