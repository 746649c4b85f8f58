//! Injected time source
//!
//! Window and projection math never reads ambient time directly; a `Clock`
//! is supplied so computations are reproducible in tests.

use chrono::{DateTime, NaiveDate, Utc};

/// Provides "now" for period-window and projection computations
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pinned time for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pin the clock to midnight UTC of the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
