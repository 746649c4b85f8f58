//! Period window calculator
//!
//! Computes the half-open calendar window containing a reference date for a
//! budget period, plus the immediately preceding window of equal period
//! length. Windows are anchored to a start date: weekly windows keep its
//! weekday, monthly windows keep its day-of-month (clamped to shorter
//! months), yearly windows keep its month/day (Feb 29 clamps to Feb 28 in
//! non-leap years). Consecutive windows are contiguous with no gaps or
//! overlaps.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Budget / report period length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Weekly,
    Monthly,
    Yearly,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Natural calendar anchor for reports and forecasts: Monday of the
    /// current week, the 1st of the month, or January 1st.
    pub fn calendar_anchor(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Weekly => today - Duration::days(today.weekday().num_days_from_monday() as i64),
            Self::Monthly => today.with_day(1).unwrap(),
            Self::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap(),
        }
    }

    /// Human-readable label for a window of this kind
    pub fn label(&self, window: &Window) -> String {
        match self {
            Self::Weekly => format!("Week of {}", window.start),
            Self::Monthly => window.start.format("%B %Y").to_string(),
            Self::Yearly => window.start.format("%Y").to_string(),
        }
    }
}

impl std::str::FromStr for PeriodKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown period kind: {}", s)),
        }
    }
}

impl std::fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A half-open date interval [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Create a window, rejecting empty or inverted ranges
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(Error::Validation(format!(
                "window end {} must be after start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The window of equal day-length immediately before this one.
    ///
    /// Used for period-over-period comparison of arbitrary report ranges;
    /// anchored period windows come from `PeriodWindows` instead.
    pub fn preceding(&self) -> Window {
        let len = self.end - self.start;
        Window {
            start: self.start - len,
            end: self.start,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Current and previous anchored windows for one period kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindows {
    pub current: Window,
    pub previous: Window,
}

impl PeriodWindows {
    /// Compute the window containing `reference` and the one before it,
    /// anchored to `anchor`.
    pub fn containing(kind: PeriodKind, anchor: NaiveDate, reference: NaiveDate) -> Self {
        let boundary = |n: i64| period_boundary(kind, anchor, n);

        // Index of the window containing the reference date
        let mut n = match kind {
            PeriodKind::Weekly => (reference - anchor).num_days().div_euclid(7),
            PeriodKind::Monthly => {
                (reference.year() as i64 * 12 + reference.month() as i64)
                    - (anchor.year() as i64 * 12 + anchor.month() as i64)
            }
            PeriodKind::Yearly => reference.year() as i64 - anchor.year() as i64,
        };
        // The month/year estimate can land one window ahead when the
        // reference falls before the boundary day
        while boundary(n) > reference {
            n -= 1;
        }
        while boundary(n + 1) <= reference {
            n += 1;
        }

        PeriodWindows {
            current: Window {
                start: boundary(n),
                end: boundary(n + 1),
            },
            previous: Window {
                start: boundary(n - 1),
                end: boundary(n),
            },
        }
    }

    /// The `count` completed windows immediately before the window
    /// containing `reference`, oldest first.
    pub fn history(
        kind: PeriodKind,
        anchor: NaiveDate,
        reference: NaiveDate,
        count: usize,
    ) -> Vec<Window> {
        let current = Self::containing(kind, anchor, reference).current;
        let mut windows = Vec::with_capacity(count);
        let mut end = current.start;
        for _ in 0..count {
            let w = Self::containing(kind, anchor, end - Duration::days(1)).current;
            windows.push(w);
            end = w.start;
        }
        windows.reverse();
        windows
    }

    /// The window immediately after the one containing `reference`
    pub fn next(kind: PeriodKind, anchor: NaiveDate, reference: NaiveDate) -> Window {
        let current = Self::containing(kind, anchor, reference).current;
        Self::containing(kind, anchor, current.end).current
    }
}

/// Start of the nth window after (or before, for negative n) the anchor
fn period_boundary(kind: PeriodKind, anchor: NaiveDate, n: i64) -> NaiveDate {
    match kind {
        PeriodKind::Weekly => anchor + Duration::days(7 * n),
        PeriodKind::Monthly => {
            let months = anchor.year() as i64 * 12 + (anchor.month() as i64 - 1) + n;
            let year = months.div_euclid(12) as i32;
            let month = months.rem_euclid(12) as u32 + 1;
            clamped_ymd(year, month, anchor.day())
        }
        PeriodKind::Yearly => clamped_ymd(anchor.year() + n as i32, anchor.month(), anchor.day()),
    }
}

/// Build a date, clamping the day to the month's last day when needed
fn clamped_ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    let mut d = day;
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, d) {
            return date;
        }
        d -= 1;
    }
}
