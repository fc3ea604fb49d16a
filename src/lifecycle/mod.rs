//! Maintenance agreement lifecycle
//!
//! An agreement runs for [`AGREEMENT_TERM_DAYS`] from its start date. Two
//! values are derived from its dates and kept apart:
//!
//! - `maturity`: whole months between start and end, a static property of the term
//! - `status`: where `today` sits relative to the end date, a live property
//!
//! Both are recomputed on every read. Persisting them is only a cache.

mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use crate::core::{DeskError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an agreement term
pub const AGREEMENT_TERM_DAYS: i64 = 365;

/// Agreements with this many days left or fewer are near expiry
pub const NEAR_EXPIRY_DAYS: i64 = 60;

/// Tri-state agreement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    /// More than [`NEAR_EXPIRY_DAYS`] days remain
    Active,
    /// Near expiry
    Duration,
    /// End date reached or passed
    Expire,
}

impl AgreementStatus {
    pub fn from_remaining_days(remaining_days: i64) -> Self {
        if remaining_days > NEAR_EXPIRY_DAYS {
            AgreementStatus::Active
        } else if remaining_days > 0 {
            AgreementStatus::Duration
        } else {
            AgreementStatus::Expire
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementStatus::Active => "active",
            AgreementStatus::Duration => "duration",
            AgreementStatus::Expire => "expire",
        }
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived lifecycle of one agreement at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    /// `"N MONTH"` / `"N MONTHS"`
    pub maturity: String,
    pub maturity_months: i64,
    /// Days from `now` to the end date, negative once expired
    pub remaining_days: i64,
    pub status: AgreementStatus,
}

impl Lifecycle {
    /// `"N DAY"` / `"N DAYS"`
    pub fn remaining_label(&self) -> String {
        count_label(self.remaining_days, "DAY")
    }
}

/// Classifies an agreement term relative to `now`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use maintdesk::lifecycle::{classify, AgreementStatus};
///
/// let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// let lifecycle = classify(date(2024, 1, 1), date(2025, 1, 1), date(2024, 10, 1));
///
/// assert_eq!(lifecycle.remaining_days, 92);
/// assert_eq!(lifecycle.status, AgreementStatus::Active);
/// assert_eq!(lifecycle.maturity, "12 MONTHS");
/// ```
pub fn classify(start: NaiveDate, end: NaiveDate, now: NaiveDate) -> Lifecycle {
    let remaining_days = days_between(now, end);
    let maturity_months = months_between(start, end);

    Lifecycle {
        maturity: count_label(maturity_months, "MONTH"),
        maturity_months,
        remaining_days,
        status: AgreementStatus::from_remaining_days(remaining_days),
    }
}

/// End date of a term starting on `start`. Fails when the end date falls
/// past the last date the calendar can represent.
pub fn term_end(start: NaiveDate) -> Result<NaiveDate> {
    start
        .checked_add_signed(Duration::days(AGREEMENT_TERM_DAYS))
        .ok_or(DeskError::DateOutOfRange(start, AGREEMENT_TERM_DAYS))
}

/// Signed number of days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Whole calendar months from `from` to `to`; partial months are dropped.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return -months_between(to, from);
    }

    let mut months =
        i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month());
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

fn count_label(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}S")
    }
}
