//! Parameter extraction — structured values for each action.

use chrono::{DateTime, Local};
use tempo_core::message::{SpanTag, TokenSpan};
use tempo_core::traits::Analyzer;

use crate::action::Action;

/// A live entry summary, used only for LIST rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSummary {
    pub id: String,
    pub time_left: String,
}

/// Transient value object built fresh per request.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
    pub alarm_time: Option<DateTime<Local>>,
    /// Key of the entry removed by a delete-last request, if any.
    pub deleted: Option<String>,
    pub timers: Vec<TimerSummary>,
}

impl Parameters {
    /// Canonical human string for the requested span ("1 hour and
    /// 30 minutes"). Doubles as the registry key: two requests that
    /// normalize to the same duration name replace, not stack.
    ///
    /// Built from the raw unit counts, so "90 minutes" and "1 hour and
    /// 30 minutes" stay distinct keys.
    pub fn duration_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(hours) = self.hours.filter(|h| *h > 0) {
            parts.push(format!("{hours} hour{}", if hours != 1 { "s" } else { "" }));
        }
        if let Some(minutes) = self.minutes.filter(|m| *m > 0) {
            parts.push(format!(
                "{minutes} minute{}",
                if minutes != 1 { "s" } else { "" }
            ));
        }
        if let Some(seconds) = self.seconds.filter(|s| *s > 0) {
            parts.push(format!(
                "{seconds} second{}",
                if seconds != 1 { "s" } else { "" }
            ));
        }
        parts.join(" and ")
    }

    /// Total requested span.
    pub fn total_duration(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.hours.unwrap_or(0)))
            + chrono::Duration::minutes(i64::from(self.minutes.unwrap_or(0)))
            + chrono::Duration::seconds(i64::from(self.seconds.unwrap_or(0)))
    }
}

/// Build parameters for an action from the analyzer's view of the text.
///
/// LIST parameters (the registry snapshot) are filled in by the
/// orchestrator; HELP and DELETE-LAST need no extraction.
pub fn find_parameters(
    action: Action,
    analyzer: &dyn Analyzer,
    text: &str,
    now: DateTime<Local>,
) -> Parameters {
    let mut parameters = Parameters::default();
    match action {
        Action::Set => {
            // Last match per unit wins.
            for token in analyzer.extract_numbers(text) {
                match token.next_word.to_lowercase().as_str() {
                    "hour" | "hours" => parameters.hours = Some(token.value),
                    "minute" | "minutes" => parameters.minutes = Some(token.value),
                    "second" | "seconds" => parameters.seconds = Some(token.value),
                    _ => {}
                }
            }
        }
        Action::SetAlarm => {
            parameters.alarm_time = parse_alarm_time(&analyzer.extract_time_spans(text), now);
        }
        _ => {}
    }
    parameters
}

/// Resolve an absolute alarm time from tagged spans.
///
/// First pass: strict 2–4 digit groups read as HHMM ("730" → 7:30,
/// "1945" → 19:45), today's date, zero seconds. Second pass: time-entity
/// spans in the "N o'clock" or bare integer-hour form, minute 0. Anything
/// richer ("noon", "half past") resolves to `None` — extraction fails
/// softly, never raises.
pub fn parse_alarm_time(spans: &[TokenSpan], now: DateTime<Local>) -> Option<DateTime<Local>> {
    for span in spans.iter().filter(|s| s.tag == SpanTag::Num) {
        let digits = span.text.trim();
        if digits.len() < 2 || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let (hour_str, minute_str) = digits.split_at(digits.len() - 2);
        let hour: u32 = if hour_str.is_empty() {
            0
        } else {
            match hour_str.parse() {
                Ok(h) => h,
                Err(_) => continue,
            }
        };
        let minute: u32 = match minute_str.parse() {
            Ok(m) => m,
            Err(_) => continue,
        };
        if hour > 23 || minute > 59 {
            continue;
        }
        if let Some(time) = at_today(now, hour, minute) {
            return Some(time);
        }
    }

    for span in spans.iter().filter(|s| s.tag == SpanTag::Time) {
        let lowered = span.text.to_lowercase();
        let Some(first) = lowered.split_whitespace().next() else {
            continue;
        };
        let Ok(hour) = first.parse::<u32>() else {
            continue;
        };
        if hour > 23 {
            continue;
        }
        if let Some(time) = at_today(now, hour, 0) {
            return Some(time);
        }
    }

    None
}

fn at_today(now: DateTime<Local>, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    now.date_naive()
        .and_hms_opt(hour, minute, 0)
        .and_then(|naive| naive.and_local_timezone(Local).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::WordScanner;
    use chrono::Timelike;

    fn now() -> DateTime<Local> {
        Local::now()
    }

    #[test]
    fn test_duration_name() {
        let p = Parameters {
            hours: Some(1),
            minutes: Some(30),
            ..Default::default()
        };
        assert_eq!(p.duration_name(), "1 hour and 30 minutes");

        let p = Parameters {
            seconds: Some(1),
            ..Default::default()
        };
        assert_eq!(p.duration_name(), "1 second");

        assert_eq!(Parameters::default().duration_name(), "");
    }

    #[test]
    fn test_duration_name_keeps_raw_units() {
        let p = Parameters {
            minutes: Some(90),
            ..Default::default()
        };
        assert_eq!(p.duration_name(), "90 minutes");
    }

    #[test]
    fn test_set_extraction() {
        let p = find_parameters(
            Action::Set,
            &WordScanner,
            "set timer for 10 minutes and 30 seconds",
            now(),
        );
        assert_eq!(p.hours, None);
        assert_eq!(p.minutes, Some(10));
        assert_eq!(p.seconds, Some(30));
        assert_eq!(p.total_duration(), chrono::Duration::seconds(630));
    }

    #[test]
    fn test_set_extraction_singular_units() {
        let p = find_parameters(Action::Set, &WordScanner, "set a timer for 1 hour", now());
        assert_eq!(p.hours, Some(1));
        assert_eq!(p.duration_name(), "1 hour");
    }

    #[test]
    fn test_set_extraction_last_match_per_unit_wins() {
        let p = find_parameters(
            Action::Set,
            &WordScanner,
            "set timer for 5 minutes no wait 10 minutes",
            now(),
        );
        assert_eq!(p.minutes, Some(10));
    }

    #[test]
    fn test_set_extraction_nothing_found() {
        let p = find_parameters(Action::Set, &WordScanner, "set a timer", now());
        assert_eq!(p.duration_name(), "");
        assert_eq!(p.total_duration(), chrono::Duration::zero());
    }

    #[test]
    fn test_alarm_hhmm() {
        let t = parse_alarm_time(&[TokenSpan::num("730")], now()).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (7, 30, 0));

        let t = parse_alarm_time(&[TokenSpan::num("1945")], now()).unwrap();
        assert_eq!((t.hour(), t.minute()), (19, 45));
    }

    #[test]
    fn test_alarm_hhmm_rejects_bad_minutes() {
        assert!(parse_alarm_time(&[TokenSpan::num("1990")], now()).is_none());
        assert!(parse_alarm_time(&[TokenSpan::num("2500")], now()).is_none());
    }

    #[test]
    fn test_alarm_oclock_fallback() {
        let spans = [TokenSpan::time("7 o'clock")];
        let t = parse_alarm_time(&spans, now()).unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 0));
    }

    #[test]
    fn test_alarm_soft_failure() {
        assert!(parse_alarm_time(&[TokenSpan::time("noon")], now()).is_none());
        assert!(parse_alarm_time(&[], now()).is_none());
    }

    #[test]
    fn test_alarm_end_to_end_through_scanner() {
        let p = find_parameters(
            Action::SetAlarm,
            &WordScanner,
            "set an alarm for 730",
            now(),
        );
        let t = p.alarm_time.unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 30));
    }
}
