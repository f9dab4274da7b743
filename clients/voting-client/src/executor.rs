//! Uniform lifecycle for every state-changing call:
//! submit, wait for confirmation, resync, report.

use std::future::Future;

use tracing::{debug, error, info};

use crate::address::Address;
use crate::error::CallError;
use crate::remote::{PendingTransaction, VotingContract};
use crate::state::{Phase, ViewState};
use crate::sync::sync;

pub const USER_REJECTED_MESSAGE: &str = "User rejected transaction";
pub const GENERIC_FAILURE_MESSAGE: &str = "Transaction failed";

/// What an action reports back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub success: bool,
    pub message: String,
}

impl TxOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        TxOutcome {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        TxOutcome {
            success: false,
            message: message.into(),
        }
    }
}

/// User-facing text for a failed transaction.
///
/// A user rejection wins over everything else, then the revert reason,
/// then the generic fallback.
pub fn failure_message(err: &CallError) -> String {
    if err.is_user_rejection() {
        return USER_REJECTED_MESSAGE.to_string();
    }
    match err.reason.as_deref() {
        Some(reason) if !reason.is_empty() => reason.to_string(),
        _ => GENERIC_FAILURE_MESSAGE.to_string(),
    }
}

/// Sets the shared error slot and returns the matching outcome.
pub fn reject(state: &mut ViewState, message: impl Into<String>) -> TxOutcome {
    let message = message.into();
    state.error = message.clone();
    TxOutcome::failed(message)
}

fn enter(state: &mut ViewState, phase: Phase) {
    debug!(?phase, "transaction phase");
    state.phase = phase;
}

/// Runs `submit` (not started until awaited here) through the lifecycle.
///
/// The follow-up sync only starts after confirmation. Loading is always
/// cleared and the phase always ends back at `Idle`.
pub async fn execute<V, T, F>(
    state: &mut ViewState,
    contract: &V,
    account: Address,
    submit: F,
    success: impl Into<String>,
) -> TxOutcome
where
    V: VotingContract,
    T: PendingTransaction,
    F: Future<Output = Result<T, CallError>>,
{
    state.loading = true;
    state.error.clear();
    enter(state, Phase::Submitting);

    let confirmed = match submit.await {
        Ok(tx) => {
            enter(state, Phase::Confirming);
            info!(tx = %hex::encode(tx.hash()), "transaction submitted");
            tx.confirmed().await
        }
        Err(e) => Err(e),
    };

    let outcome = match confirmed {
        Ok(receipt) => {
            info!(block = receipt.block_number, "transaction confirmed");
            sync(state, contract, account).await;
            enter(state, Phase::Synced);
            TxOutcome::ok(success)
        }
        Err(e) => {
            error!(error = %e, "transaction error");
            enter(state, Phase::Failed);
            reject(state, failure_message(&e))
        }
    };

    state.loading = false;
    enter(state, Phase::Idle);
    outcome
}
