//! Meeting recurrence patterns
//!
//! Schedules are stored as a typed pattern parsed from the two strings the
//! clients submit: a pattern keyword (`weekly`, `biweekly`, `monthly_day`,
//! `monthly_date`) and its details (`Tuesday`, `4th Tuesday`, `15`).
//! `next_occurrence` answers "when does this club meet next?" strictly
//! after a given date.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::RecurrenceError;

/// A club's recurring-meeting pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Recurrence {
    /// Every week on the given weekday
    Weekly { weekday: Weekday },
    /// Every other week on the given weekday
    Biweekly { weekday: Weekday },
    /// The nth weekday of each month, e.g. "4th Tuesday". If a month has
    /// no nth occurrence, the last one is used.
    MonthlyByWeekday { ordinal: u8, weekday: Weekday },
    /// A fixed day of each month, clamped to the month's last day
    MonthlyByDate { day: u8 },
}

impl Recurrence {
    /// Parse the stored `(pattern, details)` string pair
    pub fn parse(pattern: &str, details: &str) -> Result<Self, RecurrenceError> {
        let details = details.trim();
        match pattern.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly {
                weekday: parse_weekday(details)?,
            }),
            "biweekly" => Ok(Self::Biweekly {
                weekday: parse_weekday(details)?,
            }),
            "monthly_day" => {
                let mut parts = details.split_whitespace();
                let (ordinal, weekday) = match (parts.next(), parts.next(), parts.next()) {
                    (Some(ord), Some(day), None) => (parse_ordinal(ord)?, parse_weekday(day)?),
                    _ => return Err(RecurrenceError::MalformedDetails(details.to_string())),
                };
                Ok(Self::MonthlyByWeekday { ordinal, weekday })
            }
            "monthly_date" => {
                let day: u8 = details
                    .parse()
                    .map_err(|_| RecurrenceError::InvalidDayOfMonth(details.to_string()))?;
                if !(1..=31).contains(&day) {
                    return Err(RecurrenceError::InvalidDayOfMonth(details.to_string()));
                }
                Ok(Self::MonthlyByDate { day })
            }
            other => Err(RecurrenceError::UnknownPattern(other.to_string())),
        }
    }

    /// The next meeting date strictly after `from`
    #[must_use]
    pub fn next_occurrence(&self, from: NaiveDate) -> NaiveDate {
        match *self {
            Self::Weekly { weekday } => next_weekday_after(from, weekday),
            Self::Biweekly { weekday } => next_weekday_after(from, weekday) + Days::new(7),
            Self::MonthlyByWeekday { ordinal, weekday } => {
                let this_month = nth_weekday_of_month(from.year(), from.month(), ordinal, weekday);
                if this_month > from {
                    this_month
                } else {
                    let (year, month) = next_month(from.year(), from.month());
                    nth_weekday_of_month(year, month, ordinal, weekday)
                }
            }
            Self::MonthlyByDate { day } => {
                let this_month = clamped_date(from.year(), from.month(), day);
                if this_month > from {
                    this_month
                } else {
                    let (year, month) = next_month(from.year(), from.month());
                    clamped_date(year, month, day)
                }
            }
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Weekly { weekday } => write!(f, "weekly on {weekday}"),
            Self::Biweekly { weekday } => write!(f, "every other week on {weekday}"),
            Self::MonthlyByWeekday { ordinal, weekday } => {
                write!(f, "the {} {weekday} of each month", ordinal_label(ordinal))
            }
            Self::MonthlyByDate { day } => write!(f, "day {day} of each month"),
        }
    }
}

fn parse_weekday(s: &str) -> Result<Weekday, RecurrenceError> {
    s.parse()
        .map_err(|_| RecurrenceError::InvalidWeekday(s.to_string()))
}

fn parse_ordinal(s: &str) -> Result<u8, RecurrenceError> {
    let digits = s
        .trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let ordinal: u8 = digits
        .parse()
        .map_err(|_| RecurrenceError::InvalidOrdinal(s.to_string()))?;
    if !(1..=5).contains(&ordinal) {
        return Err(RecurrenceError::InvalidOrdinal(s.to_string()));
    }
    Ok(ordinal)
}

fn ordinal_label(ordinal: u8) -> String {
    let suffix = match ordinal {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{ordinal}{suffix}")
}

fn next_weekday_after(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let today = from.weekday().num_days_from_monday();
    let target = weekday.num_days_from_monday();
    let ahead = (target + 7 - today) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    from + Days::new(u64::from(ahead))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn clamped_date(year: i32, month: u32, day: u8) -> NaiveDate {
    // Day is clamped into range, month/year come from a valid date
    let day = u32::from(day).clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn nth_weekday_of_month(year: i32, month: u32, ordinal: u8, weekday: Weekday) -> NaiveDate {
    let first = clamped_date(year, month, 1);
    let offset =
        (weekday.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;
    let mut day = 1 + offset + (u32::from(ordinal) - 1) * 7;
    let dim = days_in_month(year, month);
    while day > dim {
        day -= 7;
    }
    clamped_date(year, month, day as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_the_stored_string_forms() {
        assert_eq!(
            Recurrence::parse("weekly", "Tuesday").unwrap(),
            Recurrence::Weekly {
                weekday: Weekday::Tue
            }
        );
        assert_eq!(
            Recurrence::parse("biweekly", "sun").unwrap(),
            Recurrence::Biweekly {
                weekday: Weekday::Sun
            }
        );
        assert_eq!(
            Recurrence::parse("monthly_day", "4th Tuesday").unwrap(),
            Recurrence::MonthlyByWeekday {
                ordinal: 4,
                weekday: Weekday::Tue
            }
        );
        assert_eq!(
            Recurrence::parse("monthly_date", "15").unwrap(),
            Recurrence::MonthlyByDate { day: 15 }
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Recurrence::parse("fortnightly", "Tuesday").is_err());
        assert!(Recurrence::parse("weekly", "Someday").is_err());
        assert!(Recurrence::parse("monthly_day", "9th Tuesday").is_err());
        assert!(Recurrence::parse("monthly_day", "Tuesday").is_err());
        assert!(Recurrence::parse("monthly_date", "32").is_err());
        assert!(Recurrence::parse("monthly_date", "0").is_err());
    }

    #[test]
    fn weekly_lands_on_the_next_matching_weekday() {
        let rec = Recurrence::parse("weekly", "Tuesday").unwrap();
        // 2026-01-05 is a Monday
        assert_eq!(rec.next_occurrence(date(2026, 1, 5)), date(2026, 1, 6));
        // From a Tuesday: strictly after, so a week out
        assert_eq!(rec.next_occurrence(date(2026, 1, 6)), date(2026, 1, 13));
    }

    #[test]
    fn biweekly_adds_a_week() {
        let rec = Recurrence::parse("biweekly", "Tuesday").unwrap();
        assert_eq!(rec.next_occurrence(date(2026, 1, 5)), date(2026, 1, 13));
    }

    #[test]
    fn monthly_by_weekday_rolls_to_next_month() {
        let rec = Recurrence::parse("monthly_day", "4th Tuesday").unwrap();
        // 4th Tuesday of January 2026 is the 27th
        assert_eq!(rec.next_occurrence(date(2026, 1, 5)), date(2026, 1, 27));
        // Already past it: 4th Tuesday of February 2026 is the 24th
        assert_eq!(rec.next_occurrence(date(2026, 1, 27)), date(2026, 2, 24));
    }

    #[test]
    fn fifth_weekday_falls_back_to_last_occurrence() {
        let rec = Recurrence::parse("monthly_day", "5th Monday").unwrap();
        // February 2026 has four Mondays; the last is the 23rd
        assert_eq!(rec.next_occurrence(date(2026, 2, 1)), date(2026, 2, 23));
    }

    #[test]
    fn monthly_date_clamps_short_months() {
        let rec = Recurrence::parse("monthly_date", "31").unwrap();
        assert_eq!(rec.next_occurrence(date(2026, 1, 31)), date(2026, 2, 28));
        assert_eq!(rec.next_occurrence(date(2026, 2, 28)), date(2026, 3, 31));
    }

    #[test]
    fn monthly_date_rolls_over_december() {
        let rec = Recurrence::parse("monthly_date", "15").unwrap();
        assert_eq!(rec.next_occurrence(date(2026, 12, 20)), date(2027, 1, 15));
    }
}
