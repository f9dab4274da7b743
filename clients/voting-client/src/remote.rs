//! The fixed call interface to the wallet provider and the two contracts.
//!
//! Everything behind these traits is remote and authoritative. Handles are
//! cheap to build and are never mutated after construction; a new signer or
//! chain means new handles.

use std::future::Future;

use tokio::sync::mpsc;

use crate::address::Address;
use crate::error::CallError;
use crate::types::{Candidate, Gender, VoterRecord};

pub type TxHash = [u8; 32];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// A submitted transaction that has not been confirmed yet.
pub trait PendingTransaction {
    fn hash(&self) -> TxHash;

    /// Resolves once the transaction is included. There is no timeout.
    fn confirmed(self) -> impl Future<Output = Result<Receipt, CallError>>;
}

pub trait VotingContract {
    type Tx: PendingTransaction;

    fn election_commission(&self) -> impl Future<Output = Result<Address, CallError>>;
    /// Raw status code; see [`crate::types::VotingStatus`].
    fn voting_status(&self) -> impl Future<Output = Result<u8, CallError>>;
    fn candidate_list(&self) -> impl Future<Output = Result<Vec<Candidate>, CallError>>;
    fn voter_list(&self) -> impl Future<Output = Result<Vec<VoterRecord>, CallError>>;
    fn start_time(&self) -> impl Future<Output = Result<u64, CallError>>;
    fn end_time(&self) -> impl Future<Output = Result<u64, CallError>>;
    fn token_address(&self) -> impl Future<Output = Result<Address, CallError>>;

    fn register_candidate(
        &self,
        name: &str,
        party: &str,
        age: u32,
        gender: Gender,
    ) -> impl Future<Output = Result<Self::Tx, CallError>>;
    fn set_voting_period(
        &self,
        start_offset: u64,
        end_offset: u64,
    ) -> impl Future<Output = Result<Self::Tx, CallError>>;
    fn emergency_stop_voting(&self) -> impl Future<Output = Result<Self::Tx, CallError>>;
    fn announce_voting_result(&self) -> impl Future<Output = Result<Self::Tx, CallError>>;
    fn register_voter(
        &self,
        name: &str,
        age: u32,
        gender: Gender,
    ) -> impl Future<Output = Result<Self::Tx, CallError>>;
    fn cast_vote(
        &self,
        voter_id: u64,
        candidate_id: u64,
    ) -> impl Future<Output = Result<Self::Tx, CallError>>;
}

pub trait TokenContract {
    type Tx: PendingTransaction;

    fn balance_of(&self, owner: Address) -> impl Future<Output = Result<u128, CallError>>;
    /// `amount` is in base units.
    fn transfer(&self, to: Address, amount: u128) -> impl Future<Output = Result<Self::Tx, CallError>>;
}

/// Change notifications pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

/// A live listener registration. Hand it back to
/// [`WalletProvider::unsubscribe`] to release it.
#[derive(Debug)]
pub struct Subscription {
    pub id: u64,
    pub events: mpsc::UnboundedReceiver<WalletEvent>,
}

/// A wallet (browser extension, node with unlocked accounts, devnet).
pub trait WalletProvider {
    type Voting: VotingContract;
    type Token: TokenContract;

    /// Prompts the user for account access.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, CallError>>;
    /// Already-authorized accounts, without prompting.
    fn accounts(&self) -> impl Future<Output = Result<Vec<Address>, CallError>>;
    fn chain_id(&self) -> impl Future<Output = Result<u64, CallError>>;

    fn subscribe(&self) -> Subscription;
    fn unsubscribe(&self, id: u64);

    fn voting_contract(&self, at: Address, signer: Address) -> Self::Voting;
    fn token_contract(&self, at: Address, signer: Address) -> Self::Token;
}
