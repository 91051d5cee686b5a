//! 5-field cron expressions for schedule triggers.
//!
//! Only the subset the schedule editor produces is understood structurally
//! (wildcards, steps, single values, ranges, lists). [`humanize`] renders the
//! common shapes as readable text and passes anything else through verbatim,
//! so a malformed expression never breaks rendering.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CronParseError {
    #[error("expected 5 fields, found {0}")]
    WrongFieldCount(usize),

    #[error("invalid {field} field: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("{field} value {value} out of range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronField {
    /// `*`
    Any,
    /// `*/n`
    Step(u32),
    /// `n`
    Value(u32),
    /// `a-b`
    Range(u32, u32),
    /// `a,b,c`
    List(Vec<u32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    pub minute: CronField,
    pub hour: CronField,
    pub day_of_month: CronField,
    pub month: CronField,
    pub day_of_week: CronField,
}

pub fn parse(expr: &str) -> Result<CronSchedule, CronParseError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(CronParseError::WrongFieldCount(fields.len()));
    }

    Ok(CronSchedule {
        minute: parse_field(fields[0], "minute", 0, 59)?,
        hour: parse_field(fields[1], "hour", 0, 23)?,
        day_of_month: parse_field(fields[2], "day-of-month", 1, 31)?,
        month: parse_field(fields[3], "month", 1, 12)?,
        day_of_week: parse_field(fields[4], "day-of-week", 0, 6)?,
    })
}

fn parse_field(
    raw: &str,
    field: &'static str,
    min: u32,
    max: u32,
) -> Result<CronField, CronParseError> {
    let invalid = || CronParseError::InvalidField {
        field,
        value: raw.to_string(),
    };
    let check = |value: u32| {
        if value < min || value > max {
            Err(CronParseError::OutOfRange {
                field,
                value,
                min,
                max,
            })
        } else {
            Ok(value)
        }
    };

    if raw == "*" {
        return Ok(CronField::Any);
    }
    if let Some(step) = raw.strip_prefix("*/") {
        let step: u32 = step.parse().map_err(|_| invalid())?;
        if step == 0 || step > max {
            return Err(invalid());
        }
        return Ok(CronField::Step(step));
    }
    if let Some((start, end)) = raw.split_once('-') {
        let start = check(start.parse().map_err(|_| invalid())?)?;
        let end = check(end.parse().map_err(|_| invalid())?)?;
        if start > end {
            return Err(invalid());
        }
        return Ok(CronField::Range(start, end));
    }
    if raw.contains(',') {
        let values = raw
            .split(',')
            .map(|part| check(part.parse().map_err(|_| invalid())?))
            .collect::<Result<Vec<u32>, _>>()?;
        return Ok(CronField::List(values));
    }
    Ok(CronField::Value(check(raw.parse().map_err(|_| invalid())?)?))
}

/// Render a cron expression as human-readable text.
///
/// Expressions outside the recognized shapes (including malformed ones) are
/// returned unchanged.
pub fn humanize(expr: &str) -> String {
    let Ok(schedule) = parse(expr) else {
        return expr.to_string();
    };

    // Month and day-of-month restrictions beyond a single day are not
    // produced by the editor; fall through to the raw string for those.
    if schedule.month != CronField::Any {
        return expr.to_string();
    }

    match (&schedule.minute, &schedule.hour) {
        (CronField::Any, CronField::Any) => "Every minute".to_string(),
        (CronField::Step(n), CronField::Any) => format!("Every {n} minutes"),
        (CronField::Value(0), CronField::Any) => "Every hour".to_string(),
        (CronField::Value(0), CronField::Step(n)) => format!("Every {n} hours"),
        (CronField::Value(minute), CronField::Value(hour)) => {
            let time = format_time(*hour, *minute);
            match (&schedule.day_of_month, &schedule.day_of_week) {
                (CronField::Any, CronField::Any) => format!("Daily at {time}"),
                (CronField::Any, CronField::Range(1, 5)) => format!("Weekdays at {time}"),
                (CronField::Any, CronField::List(days)) if days.as_slice() == [0, 6] => {
                    format!("Weekends at {time}")
                }
                (CronField::Any, CronField::Value(day)) => {
                    format!("{} at {time}", plural_weekday(*day))
                }
                (CronField::Value(day), CronField::Any) => {
                    format!("Monthly on day {day} at {time}")
                }
                _ => expr.to_string(),
            }
        }
        _ => expr.to_string(),
    }
}

fn format_time(hour: u32, minute: u32) -> String {
    let (hour12, meridiem) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{hour12}:{minute:02} {meridiem}")
}

fn plural_weekday(day: u32) -> &'static str {
    match day {
        0 => "Sundays",
        1 => "Mondays",
        2 => "Tuesdays",
        3 => "Wednesdays",
        4 => "Thursdays",
        5 => "Fridays",
        _ => "Saturdays",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_morning() {
        assert_eq!(humanize("0 9 * * 1-5"), "Weekdays at 9:00 AM");
    }

    #[test]
    fn every_fifteen_minutes() {
        assert_eq!(humanize("*/15 * * * *"), "Every 15 minutes");
    }

    #[test]
    fn daily_afternoon() {
        assert_eq!(humanize("30 14 * * *"), "Daily at 2:30 PM");
    }

    #[test]
    fn single_weekday() {
        assert_eq!(humanize("0 9 * * 1"), "Mondays at 9:00 AM");
    }

    #[test]
    fn weekend_list() {
        assert_eq!(humanize("0 10 * * 0,6"), "Weekends at 10:00 AM");
    }

    #[test]
    fn monthly_day() {
        assert_eq!(humanize("0 8 1 * *"), "Monthly on day 1 at 8:00 AM");
    }

    #[test]
    fn midnight_is_twelve_am() {
        assert_eq!(humanize("0 0 * * *"), "Daily at 12:00 AM");
    }

    #[test]
    fn wrong_field_count_passes_through() {
        assert_eq!(humanize("0 9 * *"), "0 9 * *");
        assert!(matches!(
            parse("0 9 * *"),
            Err(CronParseError::WrongFieldCount(4))
        ));
    }

    #[test]
    fn garbage_passes_through() {
        assert_eq!(humanize("every tuesday"), "every tuesday");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn out_of_range_minute_rejected() {
        assert!(matches!(
            parse("72 9 * * *"),
            Err(CronParseError::OutOfRange { field: "minute", value: 72, .. })
        ));
    }

    #[test]
    fn unrecognized_but_valid_shape_passes_through() {
        // Parses fine but has no friendly rendering.
        assert_eq!(humanize("5 */3 2 1 *"), "5 */3 2 1 *");
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(parse("0 9 * * 5-1").is_err());
    }
}
