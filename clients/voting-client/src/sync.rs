//! Pulls the mirrored election state from the voting contract.
//!
//! The five reads are independent. Each one lands in its own `Result`, so a
//! missing method or a bad return value only costs that one field: the
//! previous local value is kept and the failure is logged.

use tracing::{debug, warn};

use crate::address::Address;
use crate::error::{CallError, ReadError};
use crate::remote::VotingContract;
use crate::state::ViewState;
use crate::types::{Candidate, TimeWindow, VoterRecord, VotingStatus};

/// One round of reads, field by field.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub commissioner: Result<Address, ReadError>,
    pub status: Result<VotingStatus, ReadError>,
    pub candidates: Result<Vec<Candidate>, ReadError>,
    pub voters: Result<Vec<VoterRecord>, ReadError>,
    pub window: Result<TimeWindow, ReadError>,
}

impl Snapshot {
    pub async fn fetch<V: VotingContract>(contract: &V) -> Snapshot {
        let (commissioner, status, candidates, voters, window) = tokio::join!(
            contract.election_commission(),
            read_status(contract),
            contract.candidate_list(),
            contract.voter_list(),
            read_window(contract),
        );
        Snapshot {
            commissioner: commissioner.map_err(|e| ReadError::new("commissioner", e)),
            status: status.map_err(|e| ReadError::new("voting status", e)),
            candidates: candidates.map_err(|e| ReadError::new("candidates", e)),
            voters: voters.map_err(|e| ReadError::new("voters", e)),
            window: window.map_err(|e| ReadError::new("time window", e)),
        }
    }

    pub fn failures(&self) -> Vec<&ReadError> {
        [
            self.commissioner.as_ref().err(),
            self.status.as_ref().err(),
            self.candidates.as_ref().err(),
            self.voters.as_ref().err(),
            self.window.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

async fn read_status<V: VotingContract>(contract: &V) -> Result<VotingStatus, CallError> {
    let raw = contract.voting_status().await?;
    VotingStatus::try_from(raw).map_err(|code| CallError::other(format!("unknown voting status {code}")))
}

async fn read_window<V: VotingContract>(contract: &V) -> Result<TimeWindow, CallError> {
    let (start, end) = tokio::join!(contract.start_time(), contract.end_time());
    Ok(TimeWindow {
        start: start?,
        end: end?,
    })
}

pub fn is_commissioner(account: Address, commissioner: Address) -> bool {
    account == commissioner
}

/// Voter id registered for `account`, or 0.
///
/// Linear in the number of voters; runs on every sync.
pub fn resolve_voter_id(voters: &[VoterRecord], account: Address) -> u64 {
    voters
        .iter()
        .find(|v| v.voter_address == account)
        .map(|v| v.voter_id)
        .unwrap_or(0)
}

impl ViewState {
    /// Folds a snapshot into the view. Failed fields keep their old value.
    pub fn apply(&mut self, snapshot: Snapshot, account: Address) {
        for failure in snapshot.failures() {
            warn!(field = failure.field, error = %failure.source, "sync read failed");
        }
        if let Ok(commissioner) = snapshot.commissioner {
            self.is_commissioner = is_commissioner(account, commissioner);
        }
        if let Ok(status) = snapshot.status {
            self.voting_status = status;
        }
        if let Ok(candidates) = snapshot.candidates {
            self.candidates = candidates;
        }
        if let Ok(voters) = snapshot.voters {
            self.user_voter_id = resolve_voter_id(&voters, account);
        }
        if let Ok(window) = snapshot.window {
            self.window = window;
        }
    }
}

/// Re-reads everything mirrored from the voting contract into `state`.
pub async fn sync<V: VotingContract>(state: &mut ViewState, contract: &V, account: Address) {
    state.loading = true;
    let snapshot = Snapshot::fetch(contract).await;
    state.apply(snapshot, account);
    state.syncs += 1;
    state.loading = false;
    debug!(syncs = state.syncs, candidates = state.candidates.len(), "state synced");
}
