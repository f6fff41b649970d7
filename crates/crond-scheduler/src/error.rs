//! Errors raised while parsing schedules or searching for the next run.

use thiserror::Error;

use crate::field::Unit;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    #[error(
        "time specification must contain 5 fields (minute hour day-of-month month day-of-week), found {found}"
    )]
    FieldCount { found: usize },

    #[error("invalid {unit} field '{token}': {reason}")]
    FieldParse {
        unit: Unit,
        token: String,
        reason: String,
    },

    #[error("{unit} interval '*/{step}' matches no value in {}-{}", .unit.min(), .unit.max())]
    DegenerateInterval { unit: Unit, step: u32 },

    #[error("crontab entry must contain 5 time fields and a command")]
    MissingCommand,

    #[error("schedule has no execution within {years} years")]
    NoUpcomingRun { years: i32 },
}

impl CronError {
    pub(crate) fn field(unit: Unit, token: &str, reason: impl Into<String>) -> Self {
        Self::FieldParse {
            unit,
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}
