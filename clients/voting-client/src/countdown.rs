use crate::types::{TimeWindow, VotingStatus};

/// `3725` -> `1h 2m 5s`.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h}h {m}m {s}s")
}

/// Countdown text for the status banner, recomputed from the mirrored
/// window on every render.
pub fn countdown_line(status: VotingStatus, window: TimeWindow, now: u64) -> String {
    match status {
        VotingStatus::NotStarted if !window.is_scheduled() => "Voting has not been scheduled.".to_string(),
        VotingStatus::NotStarted => match window.start.checked_sub(now).filter(|d| *d > 0) {
            Some(left) => format!("Starts in: {}", format_duration(left)),
            None => "Starting soon...".to_string(),
        },
        VotingStatus::InProgress => match window.end.checked_sub(now).filter(|d| *d > 0) {
            Some(left) => format!("Ends in: {}", format_duration(left)),
            None => "Voting is ending...".to_string(),
        },
        VotingStatus::Ended => "Voting has ended.".to_string(),
    }
}
