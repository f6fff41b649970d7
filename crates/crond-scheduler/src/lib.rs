//! # crond scheduler
//!
//! Computes when a five-field crontab schedule fires next.
//!
//! ## Fields
//! ```text
//! ┌──────── minute        0-59
//! │ ┌────── hour          0-23
//! │ │ ┌──── day-of-month  1-31
//! │ │ │ ┌── month         1-12
//! │ │ │ │ ┌ day-of-week   1-7 (1 = Monday, 7 = Sunday)
//! * * * * *
//! ```
//! Each field is `*`, `*/N`, `A-B`, `A,B,...` or `N`. When both day fields are
//! restricted a day qualifies if it matches either one.
//!
//! ## Example
//! ```
//! use chrono::{TimeZone, Utc};
//! use crond_scheduler::Schedule;
//!
//! let schedule: Schedule = "5 * * * *".parse().unwrap();
//! let now = Utc.with_ymd_and_hms(2019, 12, 31, 23, 6, 0).unwrap();
//! let next = schedule.next_execution(&now).unwrap();
//! assert_eq!(next, Utc.with_ymd_and_hms(2020, 1, 1, 0, 5, 0).unwrap());
//! ```

pub mod calendar;
pub mod crontab;
pub mod entry;
pub mod error;
pub mod field;
pub mod parser;
pub mod schedule;

pub use crontab::{Crontab, CrontabLine};
pub use entry::CronEntry;
pub use error::CronError;
pub use field::{Field, NextValue, Unit};
pub use schedule::{SEARCH_YEARS, Schedule, Upcoming};
