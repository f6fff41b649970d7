//! Time-unit constraints and the per-field "next value" query.

use std::fmt;

/// One of the five positions in a crontab time specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Minute,
    Hour,
    /// Upper bound depends on month and year; 31 is the static limit.
    DayOfMonth,
    Month,
    /// ISO numbering: 1 = Monday … 7 = Sunday.
    DayOfWeek,
}

impl Unit {
    /// Units in crontab column order.
    pub const ALL: [Unit; 5] = [
        Unit::Minute,
        Unit::Hour,
        Unit::DayOfMonth,
        Unit::Month,
        Unit::DayOfWeek,
    ];

    pub fn min(&self) -> u32 {
        match self {
            Unit::Minute | Unit::Hour => 0,
            Unit::DayOfMonth | Unit::Month | Unit::DayOfWeek => 1,
        }
    }

    pub fn max(&self) -> u32 {
        match self {
            Unit::Minute => 59,
            Unit::Hour => 23,
            Unit::DayOfMonth => 31,
            Unit::Month => 12,
            Unit::DayOfWeek => 7,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Minute => write!(f, "minute"),
            Unit::Hour => write!(f, "hour"),
            Unit::DayOfMonth => write!(f, "day-of-month"),
            Unit::Month => write!(f, "month"),
            Unit::DayOfWeek => write!(f, "day-of-week"),
        }
    }
}

/// Result of asking a field for the smallest qualifying value at or after some point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextValue {
    pub value: u32,
    /// The search ran past the domain maximum and restarted from the minimum,
    /// so the next unit up has to advance.
    pub wrapped: bool,
}

impl NextValue {
    fn stay(value: u32) -> Self {
        Self { value, wrapped: false }
    }

    fn wrap(value: u32) -> Self {
        Self { value, wrapped: true }
    }
}

/// A parsed constraint on one time unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `*`
    Wildcard,
    /// `5`
    Number(u32),
    /// `1,3,5` (kept in the order written)
    List(Vec<u32>),
    /// `2-6`, inclusive on both ends
    Range { lo: u32, hi: u32 },
    /// `*/10`: every value divisible by the step
    Interval(u32),
}

impl Field {
    /// Smallest value `>= current` accepted by this field within `[min, max]`,
    /// wrapping to the smallest accepted value when none is left.
    ///
    /// `Number` and `List` do not clamp to `max`; callers with a shrinking domain
    /// (day-of-month) must treat a value above their bound like a wrap.
    /// `Range`, like `Number`, returns its start for a `current` below `lo`
    /// without wrapping.
    pub fn next_value(&self, current: u32, min: u32, max: u32) -> NextValue {
        match self {
            Field::Wildcard => {
                if current > max {
                    NextValue::wrap(min)
                } else {
                    NextValue::stay(current.max(min))
                }
            }
            Field::Number(n) => {
                if current > *n {
                    NextValue::wrap(*n)
                } else {
                    NextValue::stay(*n)
                }
            }
            Field::Range { lo, hi } => {
                if current < *lo {
                    NextValue::stay(*lo)
                } else if current <= *hi {
                    NextValue::stay(current)
                } else {
                    NextValue::wrap(*lo)
                }
            }
            Field::List(values) => {
                if values.contains(&current) {
                    return NextValue::stay(current);
                }
                match values.iter().copied().filter(|v| *v > current).min() {
                    Some(v) => NextValue::stay(v),
                    None => NextValue::wrap(values.iter().copied().min().unwrap_or(min)),
                }
            }
            Field::Interval(step) => {
                let step = (*step).max(1);
                if current % step == 0 && current <= max {
                    return NextValue::stay(current);
                }
                if let Some(v) = (current.saturating_add(1)..=max).find(|v| v % step == 0) {
                    return NextValue::stay(v);
                }
                // No multiple at all in [min, max] degrades to a bare wrap.
                NextValue::wrap((min..=max).find(|v| v % step == 0).unwrap_or(min))
            }
        }
    }

    /// The earliest value this field accepts in `[min, max]`.
    pub fn first_value(&self, min: u32, max: u32) -> u32 {
        self.next_value(min, min, max).value
    }

    /// Whether `value` satisfies this field within `[min, max]`.
    pub fn contains(&self, value: u32, min: u32, max: u32) -> bool {
        if value < min || value > max {
            return false;
        }
        match self {
            Field::Wildcard => true,
            Field::Number(n) => value == *n,
            Field::List(values) => values.contains(&value),
            Field::Range { lo, hi } => (*lo..=*hi).contains(&value),
            Field::Interval(step) => *step > 0 && value % step == 0,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Field::Wildcard)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Wildcard => write!(f, "*"),
            Field::Number(n) => write!(f, "{n}"),
            Field::List(values) => {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", joined.join(","))
            }
            Field::Range { lo, hi } => write!(f, "{lo}-{hi}"),
            Field::Interval(step) => write!(f, "*/{step}"),
        }
    }
}
