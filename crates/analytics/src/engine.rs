use crate::error::AnalyticsError;
use crate::report::{LedgerEntry, PerformanceReport};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

/// A stateless calculator for deriving performance metrics from the valuation ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `ledger` - `(date, total value)` samples. Order does not matter; the
    ///   report is always computed over the samples sorted by date.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport`, or `AnalyticsError::EmptyHistory`
    /// when there is nothing to report on.
    pub fn calculate(
        &self,
        ledger: &[(NaiveDate, Decimal)],
    ) -> Result<PerformanceReport, AnalyticsError> {
        let mut entries: Vec<LedgerEntry> = ledger
            .iter()
            .map(|&(date, value)| LedgerEntry { date, value })
            .collect();
        entries.sort_by_key(|e| e.date);

        let (Some(first), Some(last)) = (entries.first().copied(), entries.last().copied()) else {
            return Err(AnalyticsError::EmptyHistory);
        };

        let net_change = last.value - first.value;
        let overall_return_pct = Self::percent_of(net_change, first.value);
        let (max_drawdown, max_drawdown_pct) = Self::calculate_drawdown(&entries);

        debug!(
            samples = entries.len(),
            %net_change,
            ?overall_return_pct,
            "Calculated performance report"
        );

        Ok(PerformanceReport {
            entries,
            starting_value: first.value,
            ending_value: last.value,
            net_change,
            overall_return_pct,
            max_drawdown,
            max_drawdown_pct,
        })
    }

    /// `part / whole * 100`, or `None` when `whole` is zero or the percentage
    /// does not fit in a `Decimal`.
    fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
        if whole.is_zero() {
            return None;
        }
        part.checked_div(whole)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }

    /// Largest peak-to-trough decline over the (date-sorted) ledger.
    fn calculate_drawdown(entries: &[LedgerEntry]) -> (Decimal, Option<Decimal>) {
        let Some(first) = entries.first() else {
            return (Decimal::ZERO, None);
        };

        let mut peak = first.value;
        let mut max_drawdown = Decimal::ZERO;
        let mut peak_at_max = first.value;

        for entry in entries {
            if entry.value > peak {
                peak = entry.value;
            }
            let drawdown = peak - entry.value;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
                peak_at_max = peak;
            }
        }

        (max_drawdown, Self::percent_of(max_drawdown, peak_at_max))
    }
}
