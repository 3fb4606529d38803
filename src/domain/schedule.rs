//! Cron expressions accepted by schedule triggers.
//!
//! Definitions use the classic five-field crontab layout
//! (`minute hour day-of-month month day-of-week`, Sunday = 0) or a six-field
//! layout with a leading seconds column. Syntax checking is delegated to the
//! `cron` crate, which always expects a seconds column and numbers weekdays
//! from Sunday = 1, so both layouts have their weekday column translated
//! before parsing.

use std::fmt;
use std::str::FromStr;

use cron::Schedule;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    #[error("cron expression is empty")]
    Empty,
    #[error("cron expression must have five or six fields, found {0}")]
    FieldCount(usize),
    #[error("invalid cron expression: {0}")]
    Syntax(String),
}

/// A syntactically valid cron expression, kept in the form it was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    source: String,
}

impl CronExpression {
    pub fn parse(input: &str) -> Result<Self, CronError> {
        let fields: Vec<&str> = input.split_whitespace().collect();
        let normalized = match fields.len() {
            0 => return Err(CronError::Empty),
            5 => {
                let weekday = shift_weekday_field(fields[4]);
                format!(
                    "0 {} {} {} {} {weekday}",
                    fields[0], fields[1], fields[2], fields[3]
                )
            }
            6 => {
                let weekday = shift_weekday_field(fields[5]);
                format!(
                    "{} {} {} {} {} {weekday}",
                    fields[0], fields[1], fields[2], fields[3], fields[4]
                )
            }
            other => return Err(CronError::FieldCount(other)),
        };

        Schedule::from_str(&normalized).map_err(|err| CronError::Syntax(err.to_string()))?;

        Ok(Self {
            source: input.trim().to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Translate crontab weekday numbers (0-7, both 0 and 7 meaning Sunday) into
/// the 1-7 numbering of the `cron` crate. Numeric ranges are expanded into
/// lists since a range ending on Sunday (`5-7`) wraps in the crate's
/// numbering. Names, wildcards and open steps are left untouched.
fn shift_weekday_field(field: &str) -> String {
    field
        .split(',')
        .map(shift_weekday_item)
        .collect::<Vec<_>>()
        .join(",")
}

fn shift_weekday_item(item: &str) -> String {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, Some(step)),
        None => (item, None),
    };

    if let Some((start, end)) = numeric_range(range) {
        let step = match step.map(str::parse::<usize>) {
            None => 1,
            Some(Ok(step)) if step > 0 => step,
            // Leave malformed steps for the parser to reject.
            Some(_) => return item.to_string(),
        };
        let mut days: Vec<u8> = (start..=end)
            .step_by(step)
            .map(|day| day % 7 + 1)
            .collect();
        days.sort_unstable();
        days.dedup();
        return days
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",");
    }

    let shifted = range
        .split('-')
        .map(shift_weekday)
        .collect::<Vec<_>>()
        .join("-");
    match step {
        Some(step) => format!("{shifted}/{step}"),
        None => shifted,
    }
}

fn numeric_range(range: &str) -> Option<(u8, u8)> {
    let (start, end) = range.split_once('-')?;
    let start = start.parse::<u8>().ok()?;
    let end = end.parse::<u8>().ok()?;
    (start <= end && end <= 7).then_some((start, end))
}

fn shift_weekday(token: &str) -> String {
    match token.parse::<u8>() {
        Ok(7) => "1".to_string(),
        Ok(day) if day < 7 => (day + 1).to_string(),
        _ => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_five_field_expressions() {
        let expr = CronExpression::parse("0 17 * * *").expect("valid cron");
        assert_eq!(expr.as_str(), "0 17 * * *");
    }

    #[test]
    fn accepts_six_field_expressions() {
        CronExpression::parse("30 0 9 * * *").expect("valid cron");
    }

    #[test]
    fn six_field_weekdays_use_crontab_numbering() {
        CronExpression::parse("0 9 * * 0").expect("five-field sunday");
        CronExpression::parse("0 0 9 * * 0").expect("six-field sunday");
        CronExpression::parse("0 0 9 * * 5-7").expect("six-field friday to sunday");
    }

    #[test]
    fn accepts_ranges_ending_on_sunday() {
        CronExpression::parse("0 9 * * 5-7").expect("friday to sunday");
        CronExpression::parse("0 9 * * 6-7").expect("weekend");
        CronExpression::parse("0 9 * * 0-7").expect("every day");
        CronExpression::parse("0 9 * * 3-7/2").expect("stepped range");
    }

    #[test]
    fn accepts_crontab_weekday_numbering() {
        CronExpression::parse("0 9 * * 0").expect("sunday as 0");
        CronExpression::parse("0 9 * * 1-5").expect("weekdays");
        CronExpression::parse("0 9 * * 7").expect("sunday as 7");
        CronExpression::parse("*/15 * * * MON").expect("weekday names");
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            CronExpression::parse("* * * *"),
            Err(CronError::FieldCount(4))
        );
        assert_eq!(CronExpression::parse("   "), Err(CronError::Empty));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            CronExpression::parse("61 17 * * *"),
            Err(CronError::Syntax(_))
        ));
        assert!(matches!(
            CronExpression::parse("0 25 * * *"),
            Err(CronError::Syntax(_))
        ));
    }

    #[test]
    fn weekday_shift_preserves_steps_and_lists() {
        assert_eq!(shift_weekday_field("0,3-5"), "1,4,5,6");
        assert_eq!(shift_weekday_field("*/2"), "*/2");
        assert_eq!(shift_weekday_field("1-5/2"), "2,4,6");
        assert_eq!(shift_weekday_field("5-7"), "1,6,7");
        assert_eq!(shift_weekday_field("0-7"), "1,2,3,4,5,6,7");
        assert_eq!(shift_weekday_field("MON-FRI"), "MON-FRI");
    }
}
