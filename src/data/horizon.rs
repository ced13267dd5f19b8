//! Column headers, date ranges and chart axis labels per time horizon.
//!
//! Everything takes `now` as a parameter so labels are reproducible; the UI
//! passes the local wall-clock time.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::metrics::TimeHorizon;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of labels on the chart's x-axis.
pub const CHART_LABELS: usize = 7;

/// Titles of the three comparison columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHeaders {
    pub last_period: &'static str,
    pub period_to_date: &'static str,
    pub rolling_period: &'static str,
}

/// Concrete date ranges shown under the column titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRanges {
    pub last_period: String,
    pub period_to_date: String,
    pub rolling_period: String,
}

impl TimeHorizon {
    /// Column titles for this horizon.
    pub fn headers(&self) -> ColumnHeaders {
        match self {
            TimeHorizon::Hour => ColumnHeaders {
                last_period: "Last Hour",
                period_to_date: "Hour to Date",
                rolling_period: "Last 60 Min",
            },
            TimeHorizon::Day => ColumnHeaders {
                last_period: "Yesterday",
                period_to_date: "Today to Date",
                rolling_period: "Last 24 Hours",
            },
            TimeHorizon::Week => ColumnHeaders {
                last_period: "Last Completed Week",
                period_to_date: "Week to Date",
                rolling_period: "Last 7 Days",
            },
            TimeHorizon::Month => ColumnHeaders {
                last_period: "Last Month",
                period_to_date: "Month to Date",
                rolling_period: "Last 28 Days",
            },
        }
    }

    /// Whether individual points are marked on the trend line.
    ///
    /// Hourly series are too dense for markers.
    pub fn shows_point_markers(&self) -> bool {
        !matches!(self, TimeHorizon::Hour)
    }
}

/// Date ranges for the column headers, relative to `now`.
pub fn date_ranges(horizon: TimeHorizon, now: NaiveDateTime) -> DateRanges {
    match horizon {
        TimeHorizon::Hour => {
            let this_hour_start = start_of_hour(now);
            let last_hour_start = this_hour_start - Duration::hours(1);
            let rolling_start = now - Duration::minutes(60);

            DateRanges {
                last_period: format_date_time(last_hour_start),
                period_to_date: format!("{} to now", format_date_time(this_hour_start)),
                rolling_period: format!("{} to now", format_date_time(rolling_start)),
            }
        }
        TimeHorizon::Day => {
            let yesterday = now - Duration::days(1);
            let today_start = now.date().and_time(NaiveTime::MIN);

            DateRanges {
                last_period: format_date(yesterday.date()),
                period_to_date: format!("{} to now", format_date_time(today_start)),
                rolling_period: format!("{} to now", format_date(yesterday.date())),
            }
        }
        TimeHorizon::Week => {
            let days_since_monday = i64::from(now.weekday().num_days_from_monday());
            let this_week_start = now.date() - Duration::days(days_since_monday);
            let last_week_start = this_week_start - Duration::days(7);
            let rolling_start = now - Duration::days(7);

            DateRanges {
                last_period: format!("Week of {}", format_date(last_week_start)),
                period_to_date: format!("{} to now", format_date(this_week_start)),
                rolling_period: format!("{} to now", format_date(rolling_start.date())),
            }
        }
        TimeHorizon::Month => {
            let this_month_start = first_of_month(now.date());
            let last_month_start = months_back(this_month_start, 1);
            let rolling_start = now - Duration::days(28);

            DateRanges {
                last_period: month_name(last_month_start).to_string(),
                period_to_date: format!("{} to now", format_date(this_month_start)),
                rolling_period: format!("{} to now", format_date(rolling_start.date())),
            }
        }
    }
}

/// Date ranges relative to the local wall clock.
pub fn current_date_ranges(horizon: TimeHorizon) -> DateRanges {
    date_ranges(horizon, Local::now().naive_local())
}

/// X-axis labels for the trend chart, oldest first.
///
/// Hour and day views both label the last seven days (the series itself is
/// hourly); week steps back by weeks and month by calendar months.
pub fn chart_dates(horizon: TimeHorizon, now: NaiveDateTime) -> Vec<String> {
    let today = now.date();
    (0..CHART_LABELS as i64)
        .rev()
        .map(|i| match horizon {
            TimeHorizon::Hour | TimeHorizon::Day => format_date(today - Duration::days(i)),
            TimeHorizon::Week => format_date(today - Duration::days(i * 7)),
            TimeHorizon::Month => {
                month_name(months_back(first_of_month(today), i as u32)).to_string()
            }
        })
        .collect()
}

/// Chart labels relative to the local wall clock.
pub fn current_chart_dates(horizon: TimeHorizon) -> Vec<String> {
    chart_dates(horizon, Local::now().naive_local())
}

/// Label for a single sparkline point (e.g., "10/18 2PM").
pub fn point_label(at: NaiveDateTime) -> String {
    let (pm, hour12) = at.hour12();
    format!(
        "{}/{} {}{}",
        at.month(),
        at.day(),
        hour12,
        if pm { "PM" } else { "AM" }
    )
}

fn format_date(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

fn format_date_time(at: NaiveDateTime) -> String {
    let (pm, hour12) = at.hour12();
    format!(
        "{}/{} {}:00 {}",
        at.month(),
        at.day(),
        hour12,
        if pm { "PM" } else { "AM" }
    )
}

fn start_of_hour(at: NaiveDateTime) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(at.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
    at.date().and_time(time)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}
