use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to parse due date '{input}': {reason}")]
pub struct ParseDueDateError {
    input: String,
    reason: String,
}

/// Parses a due date given either as DD.MM.YYYY (start of that local day)
/// or in natural language ("tomorrow", "next friday", "2025-12-01").
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, ParseDueDateError> {
    parse_due_date_at(input, Local::now())
}

pub fn parse_due_date_at(
    input: &str,
    now: DateTime<Local>,
) -> Result<DateTime<Utc>, ParseDueDateError> {
    let trimmed = input.trim();
    let error = |reason: String| ParseDueDateError {
        input: input.to_string(),
        reason,
    };

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d.%m.%Y") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| error("no such local time".to_string()));
    }

    parse_date_string(trimmed, now, Dialect::Uk)
        .map(|local| local.with_timezone(&Utc))
        .map_err(|e| error(e.to_string()))
}
