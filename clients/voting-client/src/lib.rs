//! Client side of an on-chain election.
//!
//! Connects a wallet, mirrors the voting contract's state into a
//! [`ViewState`], and pushes the commissioner's and voters' transactions
//! through one lifecycle (submit, confirm, resync). The contracts stay the
//! authority for every rule; checks made here are only there to spare the
//! user a doomed transaction.

pub mod address;
pub mod client;
pub mod connector;
pub mod countdown;
pub mod devnet;
pub mod error;
pub mod executor;
pub mod remote;
pub mod session;
pub mod state;
pub mod sync;
pub mod types;
pub mod units;

pub use address::Address;
pub use client::{ClientConfig, VotingClient};
pub use error::{CallError, ClientError, ReadError};
pub use executor::TxOutcome;
pub use state::{Phase, ViewState};
pub use types::{Candidate, Gender, TimeWindow, VoterRecord, VotingStatus};
