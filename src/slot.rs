//! Time-of-day slots and the half-open overlap rule used for admission.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike};
use thiserror::Error;

const DAY_SECS: u32 = 86_400;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("startTime must be before endTime ({start} >= {end})")]
    Empty { start: String, end: String },
}

/// A half-open `[start, end)` range within a single day, in seconds from
/// midnight. An end time of `00:00` closes the day (`24:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    start: u32,
    end: u32,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, SlotError> {
        let slot = Self::between(start, end);
        if slot.start >= slot.end {
            return Err(SlotError::Empty {
                start: format_time(start),
                end: format_end_time(end),
            });
        }
        Ok(slot)
    }

    /// Builds a slot from stored bounds without validating them.
    pub fn between(start: NaiveTime, end: NaiveTime) -> Self {
        let end = match end.num_seconds_from_midnight() {
            0 => DAY_SECS,
            secs => secs,
        };
        Self {
            start: start.num_seconds_from_midnight(),
            end,
        }
    }

    /// Two slots conflict unless one ends at or before the other starts.
    /// Touching slots (`a.end == b.start`) do not conflict.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn span_hours(&self) -> f64 {
        f64::from(self.end - self.start) / 3600.0
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

/// Like [`parse_time`], but also accepts `24:00` as the end of the day,
/// stored as midnight.
pub fn parse_end_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    match raw.trim() {
        "24:00" | "24:00:00" => Ok(NaiveTime::MIN),
        other => parse_time(other),
    }
}

/// `HH:MM`, or `HH:MM:SS` when the seconds are not zero.
pub fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// Renders a stored midnight end as `24:00`.
pub fn format_end_time(time: NaiveTime) -> String {
    if time == NaiveTime::MIN {
        "24:00".to_string()
    } else {
        format_time(time)
    }
}

/// Accepts a bare ISO date or an RFC 3339 timestamp, keeping its calendar day.
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
}

/// Serde adapter for start times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(|_| de::Error::custom(format!("invalid time `{raw}`, expected HH:MM")))
    }
}

/// Serde adapter for end times, where `24:00` closes the day.
pub mod hhmm_end {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_end_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_end_time(&raw)
            .map_err(|_| de::Error::custom(format!("invalid time `{raw}`, expected HH:MM or 24:00")))
    }
}

/// Serde adapter for calendar days, lenient on input.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(|_| de::Error::custom(format!("invalid date `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> NaiveTime {
        parse_time(raw).unwrap()
    }

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(t(start), parse_end_time(end).unwrap()).unwrap()
    }

    #[test]
    fn back_to_back_slots_do_not_overlap() {
        let morning = slot("09:00", "11:00");
        let next = slot("11:00", "12:00");
        assert!(!morning.overlaps(&next));
        assert!(!next.overlaps(&morning));
    }

    #[test]
    fn inside_containing_and_partial_overlaps_conflict() {
        let existing = slot("09:00", "11:00");
        assert!(slot("10:00", "10:30").overlaps(&existing));
        assert!(slot("08:00", "12:00").overlaps(&existing));
        assert!(slot("08:00", "09:30").overlaps(&existing));
        assert!(slot("10:30", "11:30").overlaps(&existing));
        assert!(slot("09:00", "11:00").overlaps(&existing));
    }

    #[test]
    fn disjoint_slots_do_not_overlap() {
        assert!(!slot("06:00", "07:00").overlaps(&slot("09:00", "11:00")));
        assert!(!slot("13:00", "14:00").overlaps(&slot("09:00", "11:00")));
    }

    // Start-inside, end-inside and containment, as the three cases are
    // usually written out in queries. They must agree with `overlaps`.
    fn three_case_conflict(new: &TimeSlot, existing: &TimeSlot) -> bool {
        (existing.start <= new.start && existing.end > new.start)
            || (existing.start < new.end && existing.end >= new.end)
            || (existing.start >= new.start && existing.end <= new.end)
    }

    #[test]
    fn three_case_formulation_matches_half_open_rule() {
        let marks: Vec<NaiveTime> = (0..=16)
            .map(|q| NaiveTime::from_hms_opt(8 + q / 4, (q % 4) * 15, 0).unwrap())
            .collect();
        let slots: Vec<TimeSlot> = marks
            .iter()
            .flat_map(|s| marks.iter().filter_map(move |e| TimeSlot::new(*s, *e).ok()))
            .collect();

        for a in &slots {
            for b in &slots {
                assert_eq!(a.overlaps(b), three_case_conflict(a, b), "{a:?} vs {b:?}");
                assert_eq!(a.overlaps(b), b.overlaps(a));
            }
        }
    }

    #[test]
    fn empty_and_inverted_slots_are_rejected() {
        assert!(TimeSlot::new(t("10:00"), t("10:00")).is_err());
        assert!(TimeSlot::new(t("11:00"), t("10:00")).is_err());
    }

    #[test]
    fn inverted_slot_error_names_both_bounds() {
        let err = TimeSlot::new(t("11:00"), t("09:00:30")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "startTime must be before endTime (11:00 >= 09:00:30)"
        );
    }

    #[test]
    fn last_hour_of_the_day_is_bookable() {
        let evening = slot("22:00", "23:00");
        let last = slot("23:00", "24:00");
        assert!(!evening.overlaps(&last));
        assert!(!last.overlaps(&evening));
        assert!(slot("22:30", "24:00").overlaps(&last));
        assert_eq!(last.span_hours(), 1.0);
        assert_eq!(slot("23:00", "00:00"), last);
        assert_eq!(slot("00:00", "24:00").span_hours(), 24.0);
    }

    #[test]
    fn midnight_only_closes_a_slot() {
        assert!(parse_time("24:00").is_err());
        assert_eq!(parse_end_time("24:00").unwrap(), NaiveTime::MIN);
        assert_eq!(parse_end_time("24:00:00").unwrap(), NaiveTime::MIN);
        assert_eq!(parse_end_time("10:15").unwrap(), t("10:15"));
    }

    #[test]
    fn seconds_are_kept_and_rendered() {
        let earlier = slot("08:00", "09:00:30");
        let later = slot("09:00:30", "10:00");
        assert!(!earlier.overlaps(&later));
        assert!(slot("09:00", "09:30").overlaps(&later));

        assert_eq!(format_time(t("09:00:30")), "09:00:30");
        assert_eq!(format_time(t("09:00")), "09:00");
        assert_eq!(format_end_time(NaiveTime::MIN), "24:00");
        assert_eq!(format_end_time(t("17:45")), "17:45");
    }

    #[test]
    fn span_is_measured_in_hours() {
        assert_eq!(slot("09:00", "11:00").span_hours(), 2.0);
        assert_eq!(slot("10:00", "10:30").span_hours(), 0.5);
    }

    #[test]
    fn parses_short_and_long_time_forms() {
        assert_eq!(t("09:30"), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(t("09:30:15"), NaiveTime::from_hms_opt(9, 30, 15).unwrap());
        assert!(parse_time("9h30").is_err());
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(parse_date("2025-06-15").unwrap(), day);
        assert_eq!(parse_date("2025-06-15T00:00:00Z").unwrap(), day);
        assert!(parse_date("15/06/2025").is_err());
    }
}
