//! Human-readable labels for lead timestamps.
//!
//! The remote service ships timestamps as ISO-8601 strings; parsing is
//! lazy and a malformed value always degrades to a fixed placeholder
//! label instead of failing the view that renders it.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Placeholder rendered wherever a timestamp cannot be parsed.
pub const INVALID_DATE_LABEL: &str = "Data inválida";

/// Parses a remote-service timestamp.
///
/// Accepts RFC 3339 with offset and the bare `YYYY-MM-DDTHH:MM:SS`
/// shape some endpoints emit (assumed UTC).
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    None
}

/// Relative label for the lead list ("how long ago"), evaluated now.
pub fn relative_label(ts: &str) -> String {
    relative_label_at(ts, Utc::now())
}

/// Relative label for the lead list, against an explicit reference time.
///
/// Under one minute renders "Agora mesmo", under an hour the elapsed
/// minutes, under a day the floored hours. Beyond that the label is
/// decided by calendar-day comparison ("Hoje"/"Ontem"), falling back to
/// a short date. Future timestamps skip the elapsed branches and go
/// straight to the calendar comparison.
pub fn relative_label_at(ts: &str, now: DateTime<Utc>) -> String {
    let Some(date) = parse_timestamp(ts) else {
        return INVALID_DATE_LABEL.to_string();
    };

    let elapsed = now.signed_duration_since(date);
    if elapsed >= Duration::zero() && elapsed < Duration::hours(24) {
        if elapsed < Duration::hours(1) {
            let minutes = elapsed.num_minutes();
            if minutes < 1 {
                return "Agora mesmo".to_string();
            }
            return format!("{}min atrás", minutes);
        }
        return format!("{}h atrás", elapsed.num_hours());
    }

    let day = date.date_naive();
    let today = now.date_naive();
    if day == today {
        return format!("Hoje, {}", date.format("%H:%M"));
    }
    if Some(day) == today.pred_opt() {
        return format!("Ontem, {}", date.format("%H:%M"));
    }
    date.format("%d/%m/%y, %H:%M").to_string()
}

/// Full-date label for the detail view.
pub fn full_label(ts: &str) -> String {
    match parse_timestamp(ts) {
        Some(date) => date.format("%d/%m/%Y, %H:%M").to_string(),
        None => INVALID_DATE_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()
    }

    fn ts(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    #[test]
    fn under_a_minute_is_just_now() {
        let label = relative_label_at(&ts(now() - Duration::seconds(30)), now());
        assert_eq!(label, "Agora mesmo");
    }

    #[test]
    fn under_an_hour_renders_minutes() {
        let label = relative_label_at(&ts(now() - Duration::minutes(5)), now());
        assert_eq!(label, "5min atrás");
    }

    #[test]
    fn ninety_minutes_floors_to_one_hour() {
        let label = relative_label_at(&ts(now() - Duration::minutes(90)), now());
        assert_eq!(label, "1h atrás");
    }

    #[test]
    fn under_a_day_renders_hours() {
        let label = relative_label_at(&ts(now() - Duration::hours(23)), now());
        assert_eq!(label, "23h atrás");
    }

    #[test]
    fn yesterday_same_clock_time_is_ontem() {
        let label = relative_label_at(&ts(now() - Duration::hours(24)), now());
        assert_eq!(label, "Ontem, 15:00");
    }

    #[test]
    fn two_days_back_uses_short_date() {
        let label = relative_label_at(&ts(now() - Duration::days(3)), now());
        assert_eq!(label, "07/03/25, 15:00");
    }

    #[test]
    fn future_timestamp_same_day_is_hoje() {
        let label = relative_label_at(&ts(now() + Duration::hours(2)), now());
        assert_eq!(label, "Hoje, 17:00");
    }

    #[test]
    fn unparseable_input_degrades_to_placeholder() {
        assert_eq!(relative_label_at("not-a-date", now()), INVALID_DATE_LABEL);
        assert_eq!(relative_label_at("", now()), INVALID_DATE_LABEL);
        assert_eq!(full_label("garbage"), INVALID_DATE_LABEL);
    }

    #[test]
    fn bare_datetime_without_offset_parses_as_utc() {
        let label = relative_label_at("2025-03-10T14:30:00", now());
        assert_eq!(label, "30min atrás");
    }

    #[test]
    fn full_label_uses_four_digit_year() {
        assert_eq!(full_label("2025-03-01T08:05:00Z"), "01/03/2025, 08:05");
    }
}
