// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use crate::models::ActivePeriod;
use crate::utils::{fmt_period_label, parse_date};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Inclusive calendar-day range used to scope reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Day-aligned instants a period covers, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Bounds {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

/// First and last day of the month containing `now`.
pub fn default_period(now: NaiveDate) -> Period {
    let first = now.with_day(1).unwrap_or(now);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    Period { from: first, to: last }
}

/// Floor `from` to 00:00:00.000 and ceil `to` to 23:59:59.999.
pub fn normalize_bounds(from: NaiveDate, to: NaiveDate) -> LedgerResult<Bounds> {
    let invalid = || LedgerError::InvalidPeriod {
        from: from.to_string(),
        to: to.to_string(),
    };
    let start = from.and_hms_milli_opt(0, 0, 0, 0).ok_or_else(invalid)?;
    let end = to.and_hms_milli_opt(23, 59, 59, 999).ok_or_else(invalid)?;
    if end < start {
        return Err(invalid());
    }
    Ok(Bounds { start, end })
}

impl Period {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn parse(from: &str, to: &str) -> LedgerResult<Self> {
        Ok(Self {
            from: parse_date(from)?,
            to: parse_date(to)?,
        })
    }

    pub fn from_active(active: &ActivePeriod) -> LedgerResult<Self> {
        Self::parse(&active.from, &active.to)
    }

    pub fn to_active(&self) -> ActivePeriod {
        ActivePeriod {
            from: self.from.format("%Y-%m-%d").to_string(),
            to: self.to.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn bounds(&self) -> LedgerResult<Bounds> {
        normalize_bounds(self.from, self.to)
    }

    pub fn is_valid(&self) -> bool {
        self.to >= self.from
    }

    /// Every calendar day in the period; empty when `to` precedes `from`.
    pub fn days(&self) -> Vec<NaiveDate> {
        if !self.is_valid() {
            return Vec::new();
        }
        self.from.iter_days().take_while(|d| *d <= self.to).collect()
    }

    pub fn label(&self) -> String {
        fmt_period_label(self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_period_covers_leap_february() {
        let p = default_period(d(2024, 2, 15));
        assert_eq!(p.to_active().from, "2024-02-01");
        assert_eq!(p.to_active().to, "2024-02-29");
    }

    #[test]
    fn default_period_handles_december_and_short_months() {
        assert_eq!(default_period(d(2023, 12, 31)), Period::new(d(2023, 12, 1), d(2023, 12, 31)));
        assert_eq!(default_period(d(2023, 2, 1)).to, d(2023, 2, 28));
        assert_eq!(default_period(d(2024, 4, 30)).to, d(2024, 4, 30));
    }

    #[test]
    fn bounds_include_the_whole_last_day() {
        let b = normalize_bounds(d(2024, 3, 1), d(2024, 3, 31)).unwrap();
        assert!(b.contains(d(2024, 3, 31).and_hms_opt(23, 59, 59).unwrap()));
        assert!(b.contains(d(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!b.contains(d(2024, 4, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!b.contains(d(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap()));
    }

    #[test]
    fn reversed_period_is_invalid_and_has_no_days() {
        let p = Period::parse("2024-02-01", "2024-01-01").unwrap();
        assert!(matches!(p.bounds(), Err(LedgerError::InvalidPeriod { .. })));
        assert!(p.days().is_empty());
    }

    #[test]
    fn single_day_period() {
        let p = Period::new(d(2024, 3, 5), d(2024, 3, 5));
        assert_eq!(p.days(), vec![d(2024, 3, 5)]);
    }
}
