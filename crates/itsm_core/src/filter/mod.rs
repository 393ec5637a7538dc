use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::config::AllFilterScope;
use crate::domain::Incident;
use crate::error::{codes, AppError};
use crate::normalize::timestamps::{display_date, local_date, start_of_day};

pub const CUSTOM_RANGE_PROMPT: &str = "Please select a date range";

/// Named date-range filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Last7Days,
    Last30Days,
    MonthToDate,
    YearToDate,
    /// Inclusive calendar-date bounds. Either side may be missing while the user is still
    /// picking dates; filtering then fails with a prompt instead of guessing.
    Custom {
        from: Option<Date>,
        to: Option<Date>,
    },
}

impl DateWindow {
    pub fn custom(from: Date, to: Date) -> Self {
        DateWindow::Custom {
            from: Some(from),
            to: Some(to),
        }
    }
}

/// Check a custom range: both bounds present and `from <= to`.
pub fn resolve_custom_range(
    from: Option<Date>,
    to: Option<Date>,
) -> Result<(Date, Date), AppError> {
    let (Some(from), Some(to)) = (from, to) else {
        return Err(AppError::new(
            codes::FILTER_CUSTOM_RANGE_INCOMPLETE,
            "Please select both 'From' and 'To' dates to apply the filter.",
        )
        .with_details(format!("from={from:?}; to={to:?}")));
    };
    if from > to {
        return Err(AppError::new(
            codes::FILTER_CUSTOM_RANGE_INVERTED,
            "The 'From' date must not be after the 'To' date.",
        )
        .with_details(format!("from={from}; to={to}")));
    }
    Ok((from, to))
}

fn month_start(today: Date) -> Date {
    today - Duration::days(i64::from(today.day()) - 1)
}

fn year_start(today: Date) -> Date {
    today - Duration::days(i64::from(today.ordinal()) - 1)
}

/// A window resolved against a fixed `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bounds {
    Everything,
    SameDay(Date),
    Between(OffsetDateTime, OffsetDateTime),
    Since(OffsetDateTime),
    Dates(Date, Date),
    Year(i32),
}

fn resolve_bounds(
    window: &DateWindow,
    now: OffsetDateTime,
    all_scope: AllFilterScope,
) -> Result<Bounds, AppError> {
    let today = now.date();
    let offset = now.offset();
    let bounds = match *window {
        DateWindow::All => match all_scope {
            AllFilterScope::Unrestricted => Bounds::Everything,
            AllFilterScope::CurrentYear => Bounds::Year(today.year()),
        },
        DateWindow::Today => Bounds::SameDay(today),
        DateWindow::Last7Days => Bounds::Between(now - Duration::days(7), now),
        DateWindow::Last30Days => Bounds::Between(now - Duration::days(30), now),
        DateWindow::MonthToDate => Bounds::Since(start_of_day(month_start(today), offset)),
        DateWindow::YearToDate => Bounds::Since(start_of_day(year_start(today), offset)),
        DateWindow::Custom { from, to } => {
            let (from, to) = resolve_custom_range(from, to)?;
            Bounds::Dates(from, to)
        }
    };
    Ok(bounds)
}

impl Bounds {
    fn contains(&self, ts: OffsetDateTime, now: OffsetDateTime) -> bool {
        let day = local_date(ts, now.offset());
        match *self {
            Bounds::Everything => true,
            Bounds::SameDay(d) => day == d,
            Bounds::Between(lo, hi) => ts >= lo && ts <= hi,
            Bounds::Since(lo) => ts >= lo,
            Bounds::Dates(from, to) => day >= from && day <= to,
            Bounds::Year(y) => day.year() == y,
        }
    }
}

/// Select incidents whose `created_at` falls inside `window`, keeping input order.
///
/// Calendar comparisons use `now`'s UTC offset as the local calendar.
pub fn filter_by_window(
    incidents: &[Incident],
    window: &DateWindow,
    now: OffsetDateTime,
    all_scope: AllFilterScope,
) -> Result<Vec<Incident>, AppError> {
    let bounds = resolve_bounds(window, now, all_scope).inspect_err(|e| {
        warn!(code = %e.code, ?window, "custom date window is not usable");
    })?;

    let out = incidents
        .iter()
        .filter(|inc| bounds.contains(inc.created_at, now))
        .cloned()
        .collect::<Vec<_>>();

    debug!(
        ?window,
        input = incidents.len(),
        kept = out.len(),
        "filtered incidents by window"
    );
    Ok(out)
}

/// Inclusive calendar span a window covers, used to lay out a continuous daily axis.
///
/// `All` without year scoping spans from the oldest incident to today; with no incidents
/// there is nothing to span and `None` is returned.
pub fn window_span(
    window: &DateWindow,
    now: OffsetDateTime,
    all_scope: AllFilterScope,
    incidents: &[Incident],
) -> Result<Option<(Date, Date)>, AppError> {
    let today = now.date();
    let span = match *window {
        DateWindow::Today => Some((today, today)),
        DateWindow::Last7Days => Some(((now - Duration::days(7)).date(), today)),
        DateWindow::Last30Days => Some(((now - Duration::days(30)).date(), today)),
        DateWindow::MonthToDate => Some((month_start(today), today)),
        DateWindow::YearToDate => Some((year_start(today), today)),
        DateWindow::Custom { from, to } => Some(resolve_custom_range(from, to)?),
        DateWindow::All => match all_scope {
            AllFilterScope::CurrentYear => Some((year_start(today), today)),
            AllFilterScope::Unrestricted => {
                let offset = now.offset();
                let oldest = incidents
                    .iter()
                    .map(|inc| local_date(inc.created_at, offset))
                    .min();
                let newest = incidents
                    .iter()
                    .map(|inc| local_date(inc.created_at, offset))
                    .max();
                match (oldest, newest) {
                    (Some(lo), Some(hi)) => Some((lo, hi.max(today))),
                    _ => None,
                }
            }
        },
    };
    Ok(span)
}

/// Header text describing the active window, e.g. `01 Nov 2024 - 14 Nov 2024`.
pub fn window_label(window: &DateWindow, now: OffsetDateTime) -> String {
    let today = now.date();
    let range = |from: Date, to: Date| format!("{} - {}", display_date(from), display_date(to));
    match *window {
        DateWindow::Today => display_date(today),
        DateWindow::Last7Days => range((now - Duration::days(7)).date(), today),
        DateWindow::Last30Days => range((now - Duration::days(30)).date(), today),
        DateWindow::MonthToDate => range(month_start(today), today),
        DateWindow::YearToDate | DateWindow::All => range(year_start(today), today),
        DateWindow::Custom {
            from: Some(from),
            to: Some(to),
        } => range(from, to),
        DateWindow::Custom { .. } => CUSTOM_RANGE_PROMPT.to_string(),
    }
}
