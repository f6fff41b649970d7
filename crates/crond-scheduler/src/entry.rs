//! A crontab line: time specification plus the command it triggers.

use chrono::{DateTime, TimeZone};

use crate::error::CronError;
use crate::field::Unit;
use crate::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronEntry {
    pub schedule: Schedule,
    /// Everything after the five time fields, rejoined with single spaces.
    pub command: String,
}

impl CronEntry {
    /// Split `"<min> <hour> <dom> <month> <dow> <command...>"`.
    pub fn parse(line: &str) -> Result<Self, CronError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let fields = Unit::ALL.len();
        if parts.len() <= fields {
            return Err(CronError::MissingCommand);
        }

        let schedule = Schedule::parse(&parts[..fields].join(" "))?;
        Ok(Self {
            schedule,
            command: parts[fields..].join(" "),
        })
    }

    pub fn next_execution<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<DateTime<Tz>, CronError> {
        self.schedule.next_execution(now)
    }
}

impl std::fmt::Display for CronEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.schedule, self.command)
    }
}
