//! Business-day arithmetic used to gate reminder enrollment.
//!
//! A business day is a Monday-Friday calendar day. Timestamps are normalized
//! to local midnight before counting, so the time of day never changes a count.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Offset, TimeZone, Utc, Weekday};

/// Source of the current instant for the state machine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for replaying commands at a known time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Count the business days in `[start, end]`, both ends inclusive.
///
/// Returns 0 when `start > end`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }

    let count = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_business_day(*day))
        .count();

    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Elapsed business days between two instants, counted on local calendar dates.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Local, TimeZone, Utc};
/// use dealflow::calendar::elapsed_business_days;
///
/// // Monday 2024-06-03, 09:00 local time
/// let monday = Local
///     .with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
///     .single()
///     .unwrap()
///     .with_timezone(&Utc);
///
/// assert_eq!(elapsed_business_days(monday, monday + Duration::days(3)), 4);
/// assert_eq!(elapsed_business_days(monday + Duration::days(1), monday), 0);
/// ```
pub fn elapsed_business_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    business_days_between(local_date(start), local_date(end))
}

/// Walk forward one local calendar day at a time until `days` business days
/// have been passed, keeping the local wall-clock time of `start`.
///
/// If that wall-clock time does not exist on the target date (a DST gap), the
/// start's UTC offset is used instead.
pub fn add_business_days(start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    if days == 0 {
        return start;
    }

    let local_start = start.with_timezone(&Local);
    let mut date = local_start.date_naive();
    let mut counted = 0;

    while counted < days {
        date += Duration::days(1);
        if is_business_day(date) {
            counted += 1;
        }
    }

    let wall_clock = date.and_time(local_start.time());
    match Local.from_local_datetime(&wall_clock).earliest() {
        Some(scheduled) => scheduled.with_timezone(&Utc),
        None => {
            let offset = Duration::seconds(local_start.offset().fix().local_minus_utc().into());
            Utc.from_utc_datetime(&(wall_clock - offset))
        }
    }
}

pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}
