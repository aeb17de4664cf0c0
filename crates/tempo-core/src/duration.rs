//! Human-readable formatting for durations and clock times.

use chrono::{DateTime, Local, Timelike};

/// Format a time span as "N hour(s) and N minute(s) and N second(s)".
///
/// Zero components are omitted; a zero total yields the empty string.
pub fn format_duration(diff: chrono::Duration) -> String {
    let total_seconds = diff.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours} hour{}", if hours != 1 { "s" } else { "" }));
    }
    if minutes > 0 {
        parts.push(format!(
            "{minutes} minute{}",
            if minutes != 1 { "s" } else { "" }
        ));
    }
    if seconds > 0 {
        parts.push(format!(
            "{seconds} second{}",
            if seconds != 1 { "s" } else { "" }
        ));
    }
    parts.join(" and ")
}

/// Format a clock time the way it would be spoken ("7 o'clock", "30 past 7").
pub fn format_clock_time(time: &DateTime<Local>) -> String {
    let hour = time.hour();
    let minute = time.minute();
    if minute == 0 {
        format!("{hour} o'clock")
    } else {
        format!("{minute} past {hour}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration_single_unit() {
        assert_eq!(format_duration(chrono::Duration::seconds(45)), "45 seconds");
        assert_eq!(format_duration(chrono::Duration::hours(2)), "2 hours");
    }

    #[test]
    fn test_format_duration_combined() {
        assert_eq!(
            format_duration(chrono::Duration::minutes(5) + chrono::Duration::seconds(30)),
            "5 minutes and 30 seconds"
        );
        assert_eq!(
            format_duration(
                chrono::Duration::hours(1)
                    + chrono::Duration::minutes(2)
                    + chrono::Duration::seconds(3)
            ),
            "1 hour and 2 minutes and 3 seconds"
        );
    }

    #[test]
    fn test_format_duration_singular() {
        assert_eq!(
            format_duration(chrono::Duration::seconds(3661)),
            "1 hour and 1 minute and 1 second"
        );
    }

    #[test]
    fn test_format_duration_zero_is_empty() {
        assert_eq!(format_duration(chrono::Duration::zero()), "");
    }

    #[test]
    fn test_format_duration_negative_is_empty() {
        assert_eq!(format_duration(chrono::Duration::seconds(-5)), "");
    }

    #[test]
    fn test_format_clock_time() {
        let on_the_hour = Local.with_ymd_and_hms(2025, 3, 1, 7, 0, 0).unwrap();
        assert_eq!(format_clock_time(&on_the_hour), "7 o'clock");

        let half_past = Local.with_ymd_and_hms(2025, 3, 1, 19, 30, 0).unwrap();
        assert_eq!(format_clock_time(&half_past), "30 past 19");
    }
}
