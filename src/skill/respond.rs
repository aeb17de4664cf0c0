//! Response sentences for each action, rendered from parameters.

use tempo_core::duration::format_clock_time;
use tempo_memory::EntryKind;
use tempo_nlu::{Action, Parameters};

/// Render the response for a classified action.
pub fn render(action: Action, parameters: &Parameters) -> String {
    match action {
        Action::Help => help(),
        Action::Set => set(parameters),
        Action::SetAlarm => set_alarm(parameters),
        Action::List => list(parameters),
        Action::DeleteLast => delete_last(parameters),
        // Triggered never enters the request path; rendered by triggered().
        Action::Triggered => String::new(),
    }
}

pub fn help() -> String {
    "This skill manages timers and alarms. Say 'set a timer for 10 minutes', \
     'set an alarm for 730', 'list the timers', or 'delete the last timer'."
        .to_string()
}

fn set(parameters: &Parameters) -> String {
    format!("Timer set for {}.", parameters.duration_name())
}

fn set_alarm(parameters: &Parameters) -> String {
    match parameters.alarm_time {
        Some(fire_at) => format!("Alarm set for {}.", format_clock_time(&fire_at)),
        None => nothing_to_schedule(),
    }
}

fn list(parameters: &Parameters) -> String {
    let timers = &parameters.timers;
    if timers.is_empty() {
        return "There are no active timers.".to_string();
    }
    let mut out = format!(
        "There are {} active timer{}.",
        timers.len(),
        if timers.len() != 1 { "s" } else { "" }
    );
    for timer in timers {
        out.push_str(&format!(
            "\nTimer {} will be due in {}.",
            timer.id, timer.time_left
        ));
    }
    out
}

fn delete_last(parameters: &Parameters) -> String {
    match &parameters.deleted {
        Some(key) => format!("The last created timer for {key} has been deleted."),
        None => "No active timer to delete.".to_string(),
    }
}

/// Rendered when extraction produced nothing worth scheduling.
pub fn nothing_to_schedule() -> String {
    "I couldn't find a duration or time in that request.".to_string()
}

/// Broadcast notification for a fired entry.
pub fn triggered(kind: EntryKind, key: &str) -> String {
    match kind {
        EntryKind::Timer => format!("Alert, Alert! The timer {key} is due. Alert, Alert!"),
        EntryKind::Alarm => format!("Alert, Alert! The alarm for {key} is due. Alert, Alert!"),
    }
}
