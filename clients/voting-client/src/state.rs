use crate::address::Address;
use crate::types::{Candidate, TimeWindow, VotingStatus};

/// Where the current mutating action is in its lifecycle. `Synced` and
/// `Failed` are passed through on the way back to `Idle`; each transition
/// is traced at `debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Confirming,
    Synced,
    Failed,
}

/// Everything the presentation layer reads. All of it mirrors the remote
/// contracts and is only valid until the next sync.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub is_commissioner: bool,
    pub voting_status: VotingStatus,
    pub candidates: Vec<Candidate>,
    pub window: TimeWindow,
    /// 0 = not registered.
    pub user_voter_id: u64,
    pub loading: bool,
    /// Single user-visible error slot; empty when there is nothing to show.
    pub error: String,
    pub phase: Phase,
    /// Number of completed syncs.
    pub syncs: u64,
}

impl ViewState {
    pub fn is_registered(&self) -> bool {
        self.user_voter_id != 0
    }

    pub fn can_vote(&self) -> bool {
        self.voting_status == VotingStatus::InProgress && !self.loading
    }

    /// Mirrored contract state, without the session and lifecycle fields.
    pub fn remote_view(&self) -> (bool, VotingStatus, &[Candidate], TimeWindow, u64) {
        (
            self.is_commissioner,
            self.voting_status,
            &self.candidates,
            self.window,
            self.user_voter_id,
        )
    }
}
