use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::Serialize;

use super::tally::Tally;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sunday first, matching how the weekday charts are laid out.
const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSpec {
    /// The last N calendar days ending today, oldest first.
    LastDays(u32),
    /// The last N calendar months ending with the current one, oldest first.
    LastMonths(u32),
    /// 24 buckets, one per hour of the day.
    HourOfDay,
    /// 7 buckets, Sunday through Saturday.
    DayOfWeek,
}

impl WindowSpec {
    pub fn len(&self) -> usize {
        match self {
            WindowSpec::LastDays(n) | WindowSpec::LastMonths(n) => *n as usize,
            WindowSpec::HourOfDay => 24,
            WindowSpec::DayOfWeek => 7,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowBucket<T> {
    pub label: String,
    #[serde(flatten)]
    pub tally: T,
}

/// Buckets records into a fixed, pre-seeded time window.
///
/// The output has `spec.len()` buckets, zero-valued where no record landed.
/// A `LastDays`/`LastMonths` window reaching past the earliest representable
/// date is cut short there. Records without a timestamp, or outside the
/// window ending at `today`, are not counted.
pub fn bucket_by_time_window<R, T, F>(
    records: &[R],
    timestamp: F,
    spec: WindowSpec,
    today: NaiveDate,
) -> Vec<WindowBucket<T>>
where
    T: Tally<R>,
    F: Fn(&R) -> Option<NaiveDateTime>,
{
    let mut buckets: Vec<WindowBucket<T>> = labels(spec, today)
        .into_iter()
        .map(|label| WindowBucket {
            label,
            tally: T::default(),
        })
        .collect();

    for record in records {
        let Some(at) = timestamp(record) else {
            continue;
        };
        if let Some(slot) = slot_of(spec, today, at) {
            buckets[slot].tally.add(record);
        }
    }

    buckets
}

/// Same as [`bucket_by_time_window`], anchored at the current UTC date.
pub fn bucket_by_time_window_now<R, T, F>(
    records: &[R],
    timestamp: F,
    spec: WindowSpec,
) -> Vec<WindowBucket<T>>
where
    T: Tally<R>,
    F: Fn(&R) -> Option<NaiveDateTime>,
{
    bucket_by_time_window(records, timestamp, spec, Utc::now().date_naive())
}

/// Lifts a calendar date onto the timeline used for bucketing.
pub fn at_midnight(date: Option<NaiveDate>) -> Option<NaiveDateTime> {
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn labels(spec: WindowSpec, today: NaiveDate) -> Vec<String> {
    let span = span(spec, today);
    match spec {
        WindowSpec::LastDays(_) => (0..span)
            .rev()
            .filter_map(|back| {
                Duration::try_days(back).and_then(|offset| today.checked_sub_signed(offset))
            })
            .map(|day| day.format("%a").to_string())
            .collect(),
        WindowSpec::LastMonths(_) => {
            let current = month_index(today);
            (0..span)
                .rev()
                .map(|back| MONTH_LABELS[(current - back).rem_euclid(12) as usize].to_string())
                .collect()
        }
        WindowSpec::HourOfDay => (0..24).map(|hour| format!("{hour:02}:00")).collect(),
        WindowSpec::DayOfWeek => WEEKDAY_LABELS.iter().map(|l| l.to_string()).collect(),
    }
}

/// Number of slots in a trailing window, stopping at `NaiveDate::MIN`.
fn span(spec: WindowSpec, today: NaiveDate) -> i64 {
    match spec {
        WindowSpec::LastDays(n) => {
            let representable = (today - NaiveDate::MIN).num_days() + 1;
            (n as i64).min(representable)
        }
        WindowSpec::LastMonths(n) => {
            let representable = month_index(today) - month_index(NaiveDate::MIN) + 1;
            (n as i64).min(representable)
        }
        WindowSpec::HourOfDay | WindowSpec::DayOfWeek => spec.len() as i64,
    }
}

fn slot_of(spec: WindowSpec, today: NaiveDate, at: NaiveDateTime) -> Option<usize> {
    let span = span(spec, today);
    match spec {
        WindowSpec::LastDays(_) => {
            let back = (today - at.date()).num_days();
            (0..span).contains(&back).then(|| (span - 1 - back) as usize)
        }
        WindowSpec::LastMonths(_) => {
            let back = month_index(today) - month_index(at.date());
            (0..span).contains(&back).then(|| (span - 1 - back) as usize)
        }
        WindowSpec::HourOfDay => Some(at.hour() as usize),
        WindowSpec::DayOfWeek => Some(at.weekday().num_days_from_sunday() as usize),
    }
}

/// Months since year zero, so month distance is plain subtraction.
fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}
