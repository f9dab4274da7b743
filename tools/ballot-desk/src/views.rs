//! Plain-text rendering of the navbar and the two dashboards.

use std::fmt::Write;

use voting_client::countdown::countdown_line;
use voting_client::{ViewState, VotingStatus};

pub fn navbar(state: &ViewState) -> String {
    let mut out = String::from("== Decentralized Voting ==");
    match state.account {
        Some(account) => {
            if state.is_commissioner {
                out.push_str(" [Admin]");
            }
            let _ = write!(out, " {}", account.short());
        }
        None => out.push_str(" (not connected, type `connect`)"),
    }
    out
}

pub fn admin_dashboard(state: &ViewState) -> String {
    if !state.is_commissioner {
        return "Access Denied: You are not the Election Commissioner.".to_string();
    }
    [
        "-- Admin Dashboard --",
        "  register-candidate <name> <party> <age> [gender]",
        "  set-period <start-secs-from-now> <end-secs-from-start>   (end must be > 3600)",
        "  distribute <voter-address> [amount]",
        "  stop | announce",
    ]
    .join("\n")
}

pub fn voter_dashboard(state: &ViewState, now: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "-- {} --", state.voting_status.headline());
    let _ = writeln!(out, "{}", countdown_line(state.voting_status, state.window, now));

    if state.is_registered() {
        let _ = writeln!(out, "You are registered! Voter ID: {}", state.user_voter_id);
    } else {
        let _ = writeln!(out, "Voter Registration: register-voter <name> <age> [gender]");
    }

    let _ = writeln!(out, "Candidates:");
    if state.candidates.is_empty() {
        let _ = writeln!(out, "  No candidates registered yet.");
    }
    for c in &state.candidates {
        let _ = writeln!(
            out,
            "  #{} {} ({}) | Age: {} | Gender: {} | Votes: {}",
            c.candidate_id, c.name, c.party, c.age, c.gender, c.votes
        );
    }
    if state.voting_status == VotingStatus::InProgress {
        let hint = if state.can_vote() { "vote <candidate-id>" } else { "voting unavailable while busy" };
        let _ = writeln!(out, "{hint}");
    }
    out.trim_end().to_string()
}

/// Whole screen: navbar, busy banner, admin view for the commissioner,
/// voter view for everyone.
pub fn render(state: &ViewState, now: u64) -> String {
    let mut sections = vec![navbar(state)];
    if state.loading {
        sections.push("Processing Blockchain Transaction...".to_string());
    }
    if state.account.is_none() {
        return sections.join("\n");
    }
    if state.is_commissioner {
        sections.push(admin_dashboard(state));
    }
    sections.push(voter_dashboard(state, now));
    sections.join("\n\n")
}
