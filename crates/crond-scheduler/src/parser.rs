//! Parser for the five-field time specification.
//!
//! Each token is matched against, in order: `*`, `*/N`, `A-B`, `A,B,...`, `N`.
//! Every literal is checked against the unit's domain.

use crate::error::CronError;
use crate::field::{Field, Unit};
use crate::schedule::Schedule;

/// Split a time specification on whitespace runs and parse its five fields.
pub fn parse_time_spec(spec: &str) -> Result<Schedule, CronError> {
    let tokens: Vec<&str> = spec.split_whitespace().collect();
    if tokens.len() != Unit::ALL.len() {
        return Err(CronError::FieldCount {
            found: tokens.len(),
        });
    }

    Ok(Schedule::new(
        parse_field(tokens[0], Unit::Minute)?,
        parse_field(tokens[1], Unit::Hour)?,
        parse_field(tokens[2], Unit::DayOfMonth)?,
        parse_field(tokens[3], Unit::Month)?,
        parse_field(tokens[4], Unit::DayOfWeek)?,
    ))
}

/// Parse a single whitespace-free token for `unit`.
pub fn parse_field(token: &str, unit: Unit) -> Result<Field, CronError> {
    if token == "*" {
        return Ok(Field::Wildcard);
    }

    if let Some(step) = token.strip_prefix("*/") {
        let step = parse_number(step, token, unit)?;
        if step == 0 {
            return Err(CronError::field(unit, token, "interval step must be positive"));
        }
        if !(unit.min()..=unit.max()).any(|v| v % step == 0) {
            return Err(CronError::DegenerateInterval { unit, step });
        }
        return Ok(Field::Interval(step));
    }

    if let Some((lo, hi)) = token.split_once('-') {
        let lo = parse_value(lo, token, unit)?;
        let hi = parse_value(hi, token, unit)?;
        if lo > hi {
            return Err(CronError::field(
                unit,
                token,
                format!("range start {lo} is after end {hi}"),
            ));
        }
        return Ok(Field::Range { lo, hi });
    }

    if token.contains(',') {
        let values = token
            .split(',')
            .map(|part| parse_value(part, token, unit))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Field::List(values));
    }

    Ok(Field::Number(parse_value(token, token, unit)?))
}

/// A literal that must also fall inside the unit's domain.
fn parse_value(text: &str, token: &str, unit: Unit) -> Result<u32, CronError> {
    let n = parse_number(text, token, unit)?;
    if n < unit.min() || n > unit.max() {
        return Err(CronError::field(
            unit,
            token,
            format!("{n} is outside {}-{}", unit.min(), unit.max()),
        ));
    }
    Ok(n)
}

fn parse_number(text: &str, token: &str, unit: Unit) -> Result<u32, CronError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CronError::field(
            unit,
            token,
            format!("'{text}' is not a number"),
        ));
    }
    text.parse()
        .map_err(|_| CronError::field(unit, token, format!("'{text}' is too large")))
}
