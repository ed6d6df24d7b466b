//! Calendar-day helpers over due dates.
//!
//! All comparisons happen in local time. Each helper has an `_at` form that
//! takes the reference moment explicitly; the plain form uses `Local::now()`.
//! Callers check for a missing due date before calling in.

use crate::models::Task;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt;

fn local_day(date: DateTime<Utc>) -> NaiveDate {
    date.with_timezone(&Local).date_naive()
}

pub fn is_today(date: DateTime<Utc>) -> bool {
    is_today_at(date, Local::now())
}

pub fn is_today_at(date: DateTime<Utc>, now: DateTime<Local>) -> bool {
    local_day(date) == now.date_naive()
}

pub fn is_tomorrow(date: DateTime<Utc>) -> bool {
    is_tomorrow_at(date, Local::now())
}

pub fn is_tomorrow_at(date: DateTime<Utc>, now: DateTime<Local>) -> bool {
    now.date_naive().succ_opt() == Some(local_day(date))
}

/// True when `date` falls before 00:00 of the current local day.
pub fn is_overdue(date: DateTime<Utc>) -> bool {
    is_overdue_at(date, Local::now())
}

pub fn is_overdue_at(date: DateTime<Utc>, now: DateTime<Local>) -> bool {
    local_day(date) < now.date_naive()
}

/// `DD.MM.YYYY`, zero padded.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%d.%m.%Y").to_string()
}

/// The instant on `date`'s local calendar day at local `time`.
///
/// `None` when that wall-clock time does not exist locally (DST gap).
pub fn on_local_day_at(date: DateTime<Utc>, time: NaiveTime) -> Option<DateTime<Utc>> {
    let naive = local_day(date).and_time(time);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Deadline bucket shown next to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    Today,
    Tomorrow,
    On(String),
}

impl DueStatus {
    pub fn label(&self) -> &str {
        match self {
            DueStatus::Overdue => "Gecikti",
            DueStatus::Today => "Bugün",
            DueStatus::Tomorrow => "Yarın",
            DueStatus::On(date) => date,
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn due_status(task: &Task) -> Option<DueStatus> {
    due_status_at(task, Local::now())
}

/// Completed tasks are never reported as overdue.
pub fn due_status_at(task: &Task, now: DateTime<Local>) -> Option<DueStatus> {
    let due = task.due_date?;
    let status = if is_overdue_at(due, now) && !task.completed {
        DueStatus::Overdue
    } else if is_today_at(due, now) {
        DueStatus::Today
    } else if is_tomorrow_at(due, now) {
        DueStatus::Tomorrow
    } else {
        DueStatus::On(format_date(due))
    };
    Some(status)
}
