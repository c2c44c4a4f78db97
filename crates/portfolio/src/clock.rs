use chrono::{Days, Local, NaiveDate};
use std::fmt::Debug;
use std::sync::RwLock;

/// Tells the portfolio which calendar day a valuation belongs to.
pub trait Clock: Debug + Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to. Used by tests and by simulated runs.
#[derive(Debug)]
pub struct ManualClock {
    today: RwLock<NaiveDate>,
}

impl ManualClock {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            today: RwLock::new(start),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.today.write().unwrap_or_else(|e| e.into_inner()) = date;
    }

    /// Moves the clock forward and returns the new date. Saturates at the end of the calendar.
    pub fn advance_days(&self, days: u64) -> NaiveDate {
        let mut today = self.today.write().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = today.checked_add_days(Days::new(days)) {
            *today = next;
        }
        *today
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.read().unwrap_or_else(|e| e.into_inner())
    }
}
