//! Report date resolution.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime};
use tracing::{debug, warn};

use super::patterns::REPORT_DATE;

/// How the report date was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Read from the group total label.
    Label,
    /// Taken from the configured override.
    Override,
    /// Derived from the current time minus the publication lag.
    Fallback,
}

/// The resolved report date and its local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDate {
    /// Calendar date in the report timezone.
    pub date: NaiveDate,
    /// Epoch milliseconds of the date's local midnight.
    pub midnight_ms: i64,
    /// Where the date came from.
    pub source: DateSource,
}

/// Resolves the report date from page text.
///
/// Group totals are published for the previous day, so a page without a date
/// label is assumed to report `lag_days` before today. The assumption can be
/// replaced with an explicit date via [`DateResolver::with_override`].
#[derive(Debug, Clone)]
pub struct DateResolver {
    offset: FixedOffset,
    lag_days: u32,
    override_date: Option<NaiveDate>,
}

impl DateResolver {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            lag_days: 1,
            override_date: None,
        }
    }

    /// Set the publication lag used when no label is present.
    pub fn with_lag_days(mut self, days: u32) -> Self {
        self.lag_days = days;
        self
    }

    /// Use a fixed date when no label is present.
    pub fn with_override(mut self, date: Option<NaiveDate>) -> Self {
        self.override_date = date;
        self
    }

    /// Resolve the report date of `text` as seen at `now`.
    pub fn resolve(&self, text: &str, now: DateTime<FixedOffset>) -> ReportDate {
        let (date, source) = if let Some(date) = label_date(text) {
            (date, DateSource::Label)
        } else if let Some(date) = self.override_date {
            debug!("No report date label, using configured date {}", date);
            (date, DateSource::Override)
        } else {
            let today = now.with_timezone(&self.offset).date_naive();
            let date = today.checked_sub_days(Days::new(self.lag_days.into())).unwrap_or(today);
            warn!("No report date label, assuming {} ({} day(s) before today)", date, self.lag_days);
            (date, DateSource::Fallback)
        };

        ReportDate {
            date,
            midnight_ms: midnight_ms(date, self.offset),
            source,
        }
    }
}

/// Read the date embedded in the daily group total label.
pub fn label_date(text: &str) -> Option<NaiveDate> {
    let caps = REPORT_DATE.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        warn!("Ignoring invalid report date label: {}", &caps[0]);
    }
    date
}

/// Epoch milliseconds of `date` at 00:00 in `offset`.
pub fn midnight_ms(date: NaiveDate, offset: FixedOffset) -> i64 {
    (date.and_time(NaiveTime::MIN) - offset).and_utc().timestamp_millis()
}
