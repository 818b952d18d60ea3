use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Weekday};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Number of delivery days offered per week (Monday to Saturday).
pub const WINDOW_LEN: i64 = 6;

// Weekday index (Monday = 0) after which the window rolls to next week.
// Thursday onward rolls; Wednesday still orders for the current week.
const ROLLOVER_AFTER: u32 = 2;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeekDate {
    pub date: NaiveDate,
    pub weekday: Weekday,
}

impl WeekDate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            weekday: date.weekday(),
        }
    }

    /// Short display label, e.g. "19 Oct".
    pub fn label(&self) -> String {
        self.date.format("%d %b").to_string()
    }

    pub fn day_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// Canonical date key, e.g. "2026-10-19".
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Label shown in date pickers, e.g. "19 Oct (Monday)".
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.label(), self.day_name())
    }
}

pub fn compute_week_window(today: NaiveDate) -> Vec<WeekDate> {
    let w = today.weekday().num_days_from_monday();
    let start = if w > ROLLOVER_AFTER {
        let days_until_monday = (7 - w as i64) % 7;
        today + Duration::days(days_until_monday)
    } else {
        today - Duration::days(w as i64)
    };

    (0..WINDOW_LEN)
        .map(|i| WeekDate::new(start + Duration::days(i)))
        .collect()
}

pub fn current_week_window() -> Vec<WeekDate> {
    compute_week_window(Local::now().date_naive())
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.trim().to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday: {}", s)),
    }
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn keys(window: &[WeekDate]) -> Vec<String> {
        window.iter().map(|w| w.key()).collect()
    }

    #[test]
    fn test_window_early_week_uses_current_week() {
        // Monday and Wednesday both stay on the current week
        for today in ["2026-10-12", "2026-10-14"] {
            let window = compute_week_window(d(today));
            assert_eq!(window.len(), 6);
            assert_eq!(window[0].date, d("2026-10-12"));
            assert_eq!(window[5].date, d("2026-10-17"));
        }
    }

    #[test]
    fn test_window_thursday_rolls_to_next_week() {
        let window = compute_week_window(d("2026-10-15"));
        assert_eq!(window[0].date, d("2026-10-19"));
        assert_eq!(window[0].weekday, Weekday::Mon);
    }

    #[test]
    fn test_window_saturday_rolls_to_next_week() {
        let window = compute_week_window(d("2026-10-17"));
        assert_eq!(
            keys(&window),
            vec!["2026-10-19", "2026-10-20", "2026-10-21", "2026-10-22", "2026-10-23", "2026-10-24"]
        );
        assert_eq!(window[5].weekday, Weekday::Sat);
    }

    #[test]
    fn test_window_sunday_starts_tomorrow() {
        let window = compute_week_window(d("2026-10-18"));
        assert_eq!(window[0].date, d("2026-10-19"));
    }

    #[test]
    fn test_window_crosses_year_end() {
        let window = compute_week_window(d("2026-12-31"));
        assert_eq!(window[0].date, d("2027-01-04"));
    }

    #[test]
    fn test_week_date_labels() {
        let wd = WeekDate::new(d("2026-10-19"));
        assert_eq!(wd.label(), "19 Oct");
        assert_eq!(wd.day_name(), "Monday");
        assert_eq!(wd.key(), "2026-10-19");
        assert_eq!(wd.option_label(), "19 Oct (Monday)");
    }

    #[test]
    fn test_parse_weekday_str() {
        assert_eq!(parse_weekday_str("Friday").unwrap(), Weekday::Fri);
        assert_eq!(parse_weekday_str(" sat ").unwrap(), Weekday::Sat);
        assert!(parse_weekday_str("Funday").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = d("2026-10-19").and_hms_opt(9, 5, 3).unwrap();
        assert_eq!(format_timestamp(ts), "2026-10-19 09:05:03");
    }
}
