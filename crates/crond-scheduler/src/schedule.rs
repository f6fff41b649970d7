//! Five-field schedule and the next-execution search.
//!
//! The search walks minute → hour → day → month → year. Each unit asks its
//! field for the next acceptable value and hands the `wrapped` signal to the
//! unit above, which then starts one step later. Day-of-month and day-of-week
//! are OR'd unless one of them is `*`.
//!
//! A carry out of the day or month step restarts the walk at 00:00 on the
//! first day of the target month, so the lower units are re-evaluated against
//! the new month's length and weekdays.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::calendar::days_in_month;
use crate::error::CronError;
use crate::field::{Field, Unit};
use crate::parser;

/// How far past `now` the search looks before giving up. Covers the
/// eight-year gap between leap days around a non-leap century.
pub const SEARCH_YEARS: i32 = 28;

/// A parsed crontab time specification.
///
/// Immutable once parsed; share it freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    minute: Field,
    hour: Field,
    day_of_month: Field,
    month: Field,
    day_of_week: Field,
}

impl Schedule {
    pub(crate) fn new(
        minute: Field,
        hour: Field,
        day_of_month: Field,
        month: Field,
        day_of_week: Field,
    ) -> Self {
        Self {
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        }
    }

    /// Parse `"<minute> <hour> <day-of-month> <month> <day-of-week>"`.
    pub fn parse(spec: &str) -> Result<Self, CronError> {
        parser::parse_time_spec(spec)
    }

    pub fn minute(&self) -> &Field {
        &self.minute
    }

    pub fn hour(&self) -> &Field {
        &self.hour
    }

    pub fn day_of_month(&self) -> &Field {
        &self.day_of_month
    }

    pub fn month(&self) -> &Field {
        &self.month
    }

    pub fn day_of_week(&self) -> &Field {
        &self.day_of_week
    }

    /// The first minute strictly after `now` that satisfies the schedule,
    /// in `now`'s timezone.
    pub fn next_execution<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<DateTime<Tz>, CronError> {
        let tz = now.timezone();
        let limit_year = now.naive_local().year() + SEARCH_YEARS;
        let mut after = now.naive_local();

        loop {
            let local = self.next_local(after, limit_year)?;
            match tz.from_local_datetime(&local) {
                LocalResult::Single(t) if t > *now => return Ok(t),
                LocalResult::Ambiguous(early, late) => {
                    if early > *now {
                        return Ok(early);
                    }
                    if late > *now {
                        return Ok(late);
                    }
                }
                _ => {}
            }
            tracing::debug!(%local, "local time unusable in this timezone, searching on");
            after = local;
        }
    }

    /// Successive executions after `after`, each one computed from the previous.
    pub fn upcoming<Tz: TimeZone>(&self, after: DateTime<Tz>) -> Upcoming<'_, Tz> {
        Upcoming {
            schedule: self,
            cursor: Some(after),
        }
    }

    /// Whether the wall-clock minute of `at` satisfies every field.
    pub fn matches<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        self.matches_local(&at.naive_local())
    }

    fn matches_local(&self, at: &NaiveDateTime) -> bool {
        let dim = days_in_month(at.year(), at.month());
        let by_month_day = self.day_of_month.contains(at.day(), 1, dim);
        let by_week_day = self
            .day_of_week
            .contains(at.weekday().number_from_monday(), 1, 7);
        let day_ok = match (self.day_of_month.is_wildcard(), self.day_of_week.is_wildcard()) {
            (true, true) => true,
            (false, true) => by_month_day,
            (true, false) => by_week_day,
            (false, false) => by_month_day || by_week_day,
        };

        day_ok
            && self.minute.contains(at.minute(), Unit::Minute.min(), Unit::Minute.max())
            && self.hour.contains(at.hour(), Unit::Hour.min(), Unit::Hour.max())
            && self.month.contains(at.month(), Unit::Month.min(), Unit::Month.max())
    }

    fn next_local(&self, after: NaiveDateTime, limit_year: i32) -> Result<NaiveDateTime, CronError> {
        let mut date = after.date();
        let mut hour = after.hour();
        // Never re-trigger within the current minute.
        let mut minute = after.minute() + 1;

        while date.year() <= limit_year {
            let m = self.minute.next_value(minute, Unit::Minute.min(), Unit::Minute.max());
            let hour_base = hour + u32::from(m.wrapped);
            let h = self.hour.next_value(hour_base, Unit::Hour.min(), Unit::Hour.max());

            let mut next_hour = h.value;
            let mut next_minute = m.value;
            if h.wrapped || h.value != hour_base {
                next_minute = self.first_minute();
            }

            let day_base = if h.wrapped {
                match date.succ_opt() {
                    Some(d) => d,
                    None => break,
                }
            } else {
                date
            };

            let Some(day) = self.next_day(day_base) else {
                date = first_of_next_month(day_base).ok_or_else(|| self.exhausted())?;
                tracing::debug!(%date, "no qualifying day left in month, carrying");
                hour = 0;
                minute = 0;
                continue;
            };
            if day != day_base {
                next_hour = self.first_hour();
                next_minute = self.first_minute();
            }

            let mo = self.month.next_value(day.month(), Unit::Month.min(), Unit::Month.max());
            if mo.wrapped || mo.value != day.month() {
                let year = day.year() + i32::from(mo.wrapped);
                date = NaiveDate::from_ymd_opt(year, mo.value, 1).ok_or_else(|| self.exhausted())?;
                tracing::debug!(%date, "month not accepted, jumping");
                hour = 0;
                minute = 0;
                continue;
            }

            return day
                .and_hms_opt(next_hour, next_minute, 0)
                .ok_or_else(|| self.exhausted());
        }

        Err(self.exhausted())
    }

    /// Earliest qualifying day from `base` to the end of `base`'s month.
    fn next_day(&self, base: NaiveDate) -> Option<NaiveDate> {
        let dim = days_in_month(base.year(), base.month());
        let dom = self.day_of_month.next_value(base.day(), 1, dim);
        let by_month_day = (!dom.wrapped && dom.value <= dim)
            .then(|| base.with_day(dom.value))
            .flatten();

        let weekday = base.weekday().number_from_monday();
        let dow = self.day_of_week.next_value(weekday, 1, 7);
        let offset = (i64::from(dow.value) - i64::from(weekday)).rem_euclid(7);
        let by_week_day = base
            .checked_add_signed(Duration::days(offset))
            .filter(|d| d.month() == base.month());

        match (self.day_of_month.is_wildcard(), self.day_of_week.is_wildcard()) {
            (false, true) => by_month_day,
            (true, false) => by_week_day,
            _ => match (by_month_day, by_week_day) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }

    fn first_minute(&self) -> u32 {
        self.minute.first_value(Unit::Minute.min(), Unit::Minute.max())
    }

    fn first_hour(&self) -> u32 {
        self.hour.first_value(Unit::Hour.min(), Unit::Hour.max())
    }

    fn exhausted(&self) -> CronError {
        CronError::NoUpcomingRun {
            years: SEARCH_YEARS,
        }
    }
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

impl FromStr for Schedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}

/// Iterator returned by [`Schedule::upcoming`]. Ends when the search horizon is exhausted.
pub struct Upcoming<'a, Tz: TimeZone> {
    schedule: &'a Schedule,
    cursor: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Iterator for Upcoming<'_, Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor.take()?;
        match self.schedule.next_execution(&current) {
            Ok(next) => {
                self.cursor = Some(next.clone());
                Some(next)
            }
            Err(e) => {
                tracing::debug!("upcoming runs for '{}' ended: {e}", self.schedule);
                None
            }
        }
    }
}
