//! Intent classification over whole-word keyword sets.

use std::collections::HashSet;

/// The closed set of actions this skill handles.
///
/// Declaration order is classifier priority: `SetAlarm` must precede `Set`,
/// or "set an alarm for 730" would be swallowed by the single-keyword
/// timer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Help,
    SetAlarm,
    Set,
    List,
    DeleteLast,
    /// A scheduled entry fired. Only ever entered from the registry's fire
    /// path, never produced by classification.
    Triggered,
}

impl Action {
    /// Matchable variants, in priority order.
    const MATCH_ORDER: [Action; 5] = [
        Action::Help,
        Action::SetAlarm,
        Action::Set,
        Action::List,
        Action::DeleteLast,
    ];

    /// Keywords that must all appear in the utterance for this variant.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Action::Help => &["help"],
            Action::SetAlarm => &["set", "alarm"],
            Action::Set => &["set"],
            Action::List => &["list"],
            Action::DeleteLast => &["delete", "last"],
            Action::Triggered => &[],
        }
    }

    /// Classify an utterance: the first variant (in priority order) whose
    /// every keyword is present wins.
    ///
    /// Matching strips punctuation, lowercases, and collapses the text into
    /// a word set, so word order and repetition are irrelevant. `None` is a
    /// normal outcome, not an error: the utterance belongs to another skill.
    pub fn find_matching(text: &str) -> Option<Action> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();
        let words: HashSet<&str> = cleaned.split_whitespace().collect();

        Self::MATCH_ORDER
            .iter()
            .copied()
            .find(|action| action.keywords().iter().all(|kw| words.contains(kw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matching_action() {
        let cases: &[(&str, Option<Action>)] = &[
            ("Please help", Some(Action::Help)),
            ("help me out!", Some(Action::Help)),
            ("set timer for 10 minutes", Some(Action::Set)),
            ("set an alarm for 730", Some(Action::SetAlarm)),
            ("list all active timers", Some(Action::List)),
            ("can you list the timers?", Some(Action::List)),
            ("delete the last timer", Some(Action::DeleteLast)),
            ("banana", None),
            ("this should return none", None),
            ("trigger something else", None),
        ];
        for (text, expected) in cases {
            assert_eq!(Action::find_matching(text), *expected, "text: {text}");
        }
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(Action::find_matching("Help!"), Action::find_matching("help"));
        assert_eq!(
            Action::find_matching("SET TIMER, for 10 minutes."),
            Some(Action::Set)
        );
    }

    #[test]
    fn test_alarm_takes_priority_over_set() {
        // Both keyword sets are satisfied; declaration order decides.
        assert_eq!(
            Action::find_matching("set alarm for 7 oclock"),
            Some(Action::SetAlarm)
        );
    }
}
