//! In-process chain for local runs and tests.
//!
//! Implements the wallet and both contracts behind the traits in
//! [`crate::remote`]. The clock only moves when told to. Reverts carry
//! reasons the way a deployed election contract would return them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::address::Address;
use crate::client::DEFAULT_VOTING_CONTRACT;
use crate::error::CallError;
use crate::remote::{
    PendingTransaction, Receipt, Subscription, TokenContract, TxHash, VotingContract, WalletEvent,
    WalletProvider,
};
use crate::types::{Candidate, Gender, VoterRecord, VotingStatus};
use crate::units::{parse_units, UnitsError, TOKEN_DECIMALS};

/// Minimum voting duration the election accepts, in seconds.
pub const MIN_VOTING_DURATION: u64 = 3600;
pub const MIN_AGE: u32 = 18;

const ANVIL_ACCOUNTS: [&str; 4] = [
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
    "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
    "0x90F79bf6EB2c4f870365E785982E1f101E93b906",
];
const DEFAULT_TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// EIP-1193 "unauthorized": the account is not one the wallet exposes.
pub const UNAUTHORIZED_CODE: i64 = 4100;

/// Initial chain contents. The first account is the one the wallet exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevnetSeed {
    pub chain_id: u64,
    /// Unix seconds at genesis.
    pub clock: u64,
    pub accounts: Vec<Address>,
    pub commissioner: Address,
    pub voting_contract: Address,
    /// `None` deploys the election without a token.
    pub token_contract: Option<Address>,
    /// Whole tokens minted to the commissioner.
    pub token_supply: String,
}

impl Default for DevnetSeed {
    fn default() -> Self {
        let accounts: Vec<Address> = ANVIL_ACCOUNTS.iter().filter_map(|a| a.parse().ok()).collect();
        DevnetSeed {
            chain_id: 31337,
            clock: 1_700_000_000,
            commissioner: accounts.first().copied().unwrap_or_default(),
            accounts,
            voting_contract: DEFAULT_VOTING_CONTRACT,
            token_contract: DEFAULT_TOKEN.parse().ok(),
            token_supply: "1000".to_string(),
        }
    }
}

impl DevnetSeed {
    pub fn from_json(json: &str) -> serde_json::Result<DevnetSeed> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Default)]
struct Election {
    commission: Address,
    candidates: Vec<Candidate>,
    voters: Vec<VoterRecord>,
    start: u64,
    end: u64,
    stopped: bool,
    announced: bool,
}

impl Election {
    fn status(&self, now: u64) -> VotingStatus {
        if self.stopped {
            VotingStatus::Ended
        } else if self.start == 0 || now < self.start {
            VotingStatus::NotStarted
        } else if now < self.end {
            VotingStatus::InProgress
        } else {
            VotingStatus::Ended
        }
    }

    fn only_commission(&self, caller: Address) -> Result<(), CallError> {
        if caller != self.commission {
            return Err(CallError::revert("Only the election commission can do this"));
        }
        Ok(())
    }

    fn register_candidate(
        &mut self,
        caller: Address,
        now: u64,
        name: &str,
        party: &str,
        age: u32,
        gender: Gender,
    ) -> Result<(), CallError> {
        self.only_commission(caller)?;
        if self.status(now) != VotingStatus::NotStarted {
            return Err(CallError::revert("Candidate registration is closed"));
        }
        if name.trim().is_empty() || party.trim().is_empty() {
            return Err(CallError::revert("Name and party are required"));
        }
        if age < MIN_AGE {
            return Err(CallError::revert("Candidate must be at least 18"));
        }
        let candidate_id = self.candidates.len() as u64 + 1;
        self.candidates.push(Candidate {
            candidate_id,
            name: name.to_string(),
            party: party.to_string(),
            age,
            gender,
            candidate_address: caller,
            votes: 0,
        });
        Ok(())
    }

    fn set_voting_period(&mut self, caller: Address, now: u64, start_offset: u64, end_offset: u64) -> Result<(), CallError> {
        self.only_commission(caller)?;
        if end_offset <= MIN_VOTING_DURATION {
            return Err(CallError::revert("End duration must be more than 1 hour"));
        }
        self.start = now.saturating_add(start_offset);
        self.end = self.start.saturating_add(end_offset);
        Ok(())
    }

    fn emergency_stop(&mut self, caller: Address, now: u64) -> Result<(), CallError> {
        self.only_commission(caller)?;
        if self.status(now) == VotingStatus::Ended {
            return Err(CallError::revert("Voting already ended"));
        }
        self.stopped = true;
        Ok(())
    }

    fn announce_result(&mut self, caller: Address, now: u64) -> Result<(), CallError> {
        self.only_commission(caller)?;
        if self.status(now) != VotingStatus::Ended {
            return Err(CallError::revert("Voting has not ended"));
        }
        if self.announced {
            return Err(CallError::revert("Result already announced"));
        }
        self.announced = true;
        Ok(())
    }

    fn register_voter(&mut self, caller: Address, name: &str, age: u32, gender: Gender) -> Result<(), CallError> {
        if age < MIN_AGE {
            return Err(CallError::revert("Voter must be at least 18"));
        }
        if self.voters.iter().any(|v| v.voter_address == caller) {
            return Err(CallError::revert("Voter already registered"));
        }
        let voter_id = self.voters.len() as u64 + 1;
        self.voters.push(VoterRecord {
            voter_id,
            name: name.to_string(),
            age,
            gender,
            voter_address: caller,
            vote_candidate_id: 0,
        });
        Ok(())
    }

    fn cast_vote(&mut self, caller: Address, now: u64, voter_id: u64, candidate_id: u64, balance: u128) -> Result<(), CallError> {
        if self.status(now) != VotingStatus::InProgress {
            return Err(CallError::revert("Voting is not in progress"));
        }
        if balance == 0 {
            return Err(CallError::revert("Voter must hold the voting token"));
        }
        let voter = self
            .voters
            .iter_mut()
            .find(|v| v.voter_id == voter_id && v.voter_address == caller)
            .ok_or_else(|| CallError::revert("Invalid voter"))?;
        if voter.vote_candidate_id != 0 {
            return Err(CallError::revert("You have already voted"));
        }
        let candidate = self
            .candidates
            .iter_mut()
            .find(|c| c.candidate_id == candidate_id)
            .ok_or_else(|| CallError::revert("Invalid candidate"))?;
        candidate.votes += 1;
        voter.vote_candidate_id = candidate_id;
        Ok(())
    }
}

#[derive(Debug)]
struct Chain {
    chain_id: u64,
    now: u64,
    block: u64,
    accounts: Vec<Address>,
    active: Option<Address>,
    authorized: bool,
    reject_next: bool,
    failing: HashSet<String>,
    remote_calls: u64,
    listeners: HashMap<u64, mpsc::UnboundedSender<WalletEvent>>,
    next_listener: u64,
    voting_address: Address,
    token_address: Option<Address>,
    election: Election,
    balances: HashMap<Address, u128>,
}

impl Chain {
    /// Counts the call and applies any failure injected for `method`.
    fn call(&mut self, method: &str) -> Result<(), CallError> {
        self.remote_calls += 1;
        if self.failing.contains(method) {
            return Err(CallError::other(format!("missing revert data in call to {method}")));
        }
        Ok(())
    }

    fn check_deployed(&self, at: Address) -> Result<(), CallError> {
        if at != self.voting_address && Some(at) != self.token_address {
            return Err(CallError::other(format!("could not decode result data from {at}")));
        }
        Ok(())
    }

    fn emit(&mut self, event: WalletEvent) {
        self.listeners.retain(|_, tx| tx.send(event.clone()).is_ok());
    }

    fn exposed_accounts(&self) -> Vec<Address> {
        match (self.authorized, self.active) {
            (true, Some(a)) => vec![a],
            _ => Vec::new(),
        }
    }

    fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<(), CallError> {
        if to.is_zero() {
            return Err(CallError::revert("ERC20: transfer to the zero address"));
        }
        let from_balance = self.balances.get(&from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(CallError::revert("ERC20: transfer amount exceeds balance"));
        }
        self.balances.insert(from, from_balance - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }
}

/// Handle to a simulated chain. Clones share the same chain.
#[derive(Debug, Clone)]
pub struct Devnet {
    chain: Arc<Mutex<Chain>>,
}

impl Default for Devnet {
    fn default() -> Self {
        Devnet::build(DevnetSeed::default(), 1000 * 10u128.pow(TOKEN_DECIMALS as u32))
    }
}

impl Devnet {
    pub fn from_seed(seed: DevnetSeed) -> Result<Devnet, UnitsError> {
        let supply = parse_units(&seed.token_supply, TOKEN_DECIMALS)?;
        Ok(Devnet::build(seed, supply))
    }

    fn build(seed: DevnetSeed, supply: u128) -> Devnet {
        let mut balances = HashMap::new();
        if seed.token_contract.is_some() {
            balances.insert(seed.commissioner, supply);
        }
        let chain = Chain {
            chain_id: seed.chain_id,
            now: seed.clock,
            block: 1,
            active: seed.accounts.first().copied(),
            accounts: seed.accounts,
            authorized: false,
            reject_next: false,
            failing: HashSet::new(),
            remote_calls: 0,
            listeners: HashMap::new(),
            next_listener: 1,
            voting_address: seed.voting_contract,
            token_address: seed.token_contract,
            election: Election {
                commission: seed.commissioner,
                ..Election::default()
            },
            balances,
        };
        Devnet {
            chain: Arc::new(Mutex::new(chain)),
        }
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.chain.lock().accounts.clone()
    }

    pub fn commissioner(&self) -> Address {
        self.chain.lock().election.commission
    }

    pub fn now(&self) -> u64 {
        self.chain.lock().now
    }

    pub fn advance(&self, seconds: u64) {
        let mut chain = self.chain.lock();
        chain.now += seconds;
        chain.block += 1;
    }

    /// Marks the wallet as already authorized, as after an earlier visit.
    pub fn authorize(&self) {
        self.chain.lock().authorized = true;
    }

    /// Selects another wallet account and notifies listeners.
    pub fn switch_account(&self, account: Address) {
        let mut chain = self.chain.lock();
        chain.active = Some(account);
        if !chain.accounts.contains(&account) {
            chain.accounts.push(account);
        }
        let exposed = chain.exposed_accounts();
        if chain.authorized {
            chain.emit(WalletEvent::AccountsChanged(exposed));
        }
    }

    /// Revokes the site's authorization; listeners see an empty account list.
    pub fn lock_wallet(&self) {
        let mut chain = self.chain.lock();
        chain.authorized = false;
        chain.emit(WalletEvent::AccountsChanged(Vec::new()));
    }

    pub fn switch_chain(&self, chain_id: u64) {
        let mut chain = self.chain.lock();
        chain.chain_id = chain_id;
        chain.emit(WalletEvent::ChainChanged(chain_id));
    }

    /// The next prompt or transaction is declined by the user.
    pub fn reject_next(&self) {
        self.chain.lock().reject_next = true;
    }

    /// Makes every call to `method` fail until [`Devnet::heal`]. Contract
    /// reads use their ABI names, wallet queries their RPC names
    /// (`eth_accounts`, `eth_chainId`, `eth_requestAccounts`).
    pub fn fail_read(&self, method: &str) {
        self.chain.lock().failing.insert(method.to_string());
    }

    pub fn heal(&self) {
        self.chain.lock().failing.clear();
    }

    pub fn remote_calls(&self) -> u64 {
        self.chain.lock().remote_calls
    }

    pub fn listener_count(&self) -> usize {
        self.chain.lock().listeners.len()
    }

    pub fn balance(&self, owner: Address) -> u128 {
        self.chain.lock().balances.get(&owner).copied().unwrap_or(0)
    }

    pub fn status(&self) -> VotingStatus {
        let chain = self.chain.lock();
        chain.election.status(chain.now)
    }

    pub fn result_announced(&self) -> bool {
        self.chain.lock().election.announced
    }

    fn read<T>(&self, method: &str, at: Address, f: impl FnOnce(&Chain) -> Result<T, CallError>) -> Result<T, CallError> {
        let mut chain = self.chain.lock();
        chain.call(method)?;
        chain.check_deployed(at)?;
        f(&chain)
    }

    fn send(
        &self,
        method: &str,
        at: Address,
        signer: Address,
        f: impl FnOnce(&mut Chain) -> Result<(), CallError>,
    ) -> Result<DevnetTx, CallError> {
        let mut chain = self.chain.lock();
        chain.call(method)?;
        chain.check_deployed(at)?;
        if !chain.exposed_accounts().contains(&signer) {
            return Err(CallError {
                code: Some(UNAUTHORIZED_CODE),
                reason: None,
                message: format!("account {signer} has not been authorized by the user"),
            });
        }
        if std::mem::take(&mut chain.reject_next) {
            return Err(CallError::rejected());
        }
        f(&mut chain)?;
        chain.block += 1;
        let mut hash = [0u8; 32];
        hash[..8].copy_from_slice(&chain.block.to_be_bytes());
        hash[12..].copy_from_slice(signer.as_bytes());
        debug!(method, %signer, block = chain.block, "devnet transaction applied");
        Ok(DevnetTx {
            hash,
            block_number: chain.block,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DevnetTx {
    hash: TxHash,
    block_number: u64,
}

impl PendingTransaction for DevnetTx {
    fn hash(&self) -> TxHash {
        self.hash
    }

    async fn confirmed(self) -> Result<Receipt, CallError> {
        Ok(Receipt {
            tx_hash: self.hash,
            block_number: self.block_number,
        })
    }
}

impl WalletProvider for Devnet {
    type Voting = DevnetVoting;
    type Token = DevnetToken;

    async fn request_accounts(&self) -> Result<Vec<Address>, CallError> {
        let mut chain = self.chain.lock();
        chain.call("eth_requestAccounts")?;
        if std::mem::take(&mut chain.reject_next) {
            return Err(CallError::rejected());
        }
        chain.authorized = true;
        Ok(chain.exposed_accounts())
    }

    async fn accounts(&self) -> Result<Vec<Address>, CallError> {
        let mut chain = self.chain.lock();
        chain.call("eth_accounts")?;
        Ok(chain.exposed_accounts())
    }

    async fn chain_id(&self) -> Result<u64, CallError> {
        let mut chain = self.chain.lock();
        chain.call("eth_chainId")?;
        Ok(chain.chain_id)
    }

    fn subscribe(&self) -> Subscription {
        let mut chain = self.chain.lock();
        let (tx, events) = mpsc::unbounded_channel();
        let id = chain.next_listener;
        chain.next_listener += 1;
        chain.listeners.insert(id, tx);
        Subscription { id, events }
    }

    fn unsubscribe(&self, id: u64) {
        self.chain.lock().listeners.remove(&id);
    }

    fn voting_contract(&self, at: Address, signer: Address) -> DevnetVoting {
        DevnetVoting {
            net: self.clone(),
            at,
            signer,
        }
    }

    fn token_contract(&self, at: Address, signer: Address) -> DevnetToken {
        DevnetToken {
            net: self.clone(),
            at,
            signer,
        }
    }
}

/// Voting contract handle bound to a signer.
#[derive(Debug, Clone)]
pub struct DevnetVoting {
    net: Devnet,
    at: Address,
    signer: Address,
}

impl VotingContract for DevnetVoting {
    type Tx = DevnetTx;

    async fn election_commission(&self) -> Result<Address, CallError> {
        self.net.read("electionCommission", self.at, |c| Ok(c.election.commission))
    }

    async fn voting_status(&self) -> Result<u8, CallError> {
        self.net
            .read("getVotingStatus", self.at, |c| Ok(c.election.status(c.now).into()))
    }

    async fn candidate_list(&self) -> Result<Vec<Candidate>, CallError> {
        self.net.read("getCandidateList", self.at, |c| Ok(c.election.candidates.clone()))
    }

    async fn voter_list(&self) -> Result<Vec<VoterRecord>, CallError> {
        self.net.read("getVoterList", self.at, |c| Ok(c.election.voters.clone()))
    }

    async fn start_time(&self) -> Result<u64, CallError> {
        self.net.read("startTime", self.at, |c| Ok(c.election.start))
    }

    async fn end_time(&self) -> Result<u64, CallError> {
        self.net.read("endTime", self.at, |c| Ok(c.election.end))
    }

    async fn token_address(&self) -> Result<Address, CallError> {
        self.net
            .read("gldToken", self.at, |c| Ok(c.token_address.unwrap_or(Address::ZERO)))
    }

    async fn register_candidate(&self, name: &str, party: &str, age: u32, gender: Gender) -> Result<DevnetTx, CallError> {
        let signer = self.signer;
        self.net.send("registerCandidate", self.at, signer, |c| {
            let now = c.now;
            c.election.register_candidate(signer, now, name, party, age, gender)
        })
    }

    async fn set_voting_period(&self, start_offset: u64, end_offset: u64) -> Result<DevnetTx, CallError> {
        let signer = self.signer;
        self.net.send("setVotingPeriod", self.at, signer, |c| {
            let now = c.now;
            c.election.set_voting_period(signer, now, start_offset, end_offset)
        })
    }

    async fn emergency_stop_voting(&self) -> Result<DevnetTx, CallError> {
        let signer = self.signer;
        self.net.send("emergencyStopVoting", self.at, signer, |c| {
            let now = c.now;
            c.election.emergency_stop(signer, now)
        })
    }

    async fn announce_voting_result(&self) -> Result<DevnetTx, CallError> {
        let signer = self.signer;
        self.net.send("announceVotingResult", self.at, signer, |c| {
            let now = c.now;
            c.election.announce_result(signer, now)
        })
    }

    async fn register_voter(&self, name: &str, age: u32, gender: Gender) -> Result<DevnetTx, CallError> {
        let signer = self.signer;
        self.net.send("registerVoter", self.at, signer, |c| {
            c.election.register_voter(signer, name, age, gender)
        })
    }

    async fn cast_vote(&self, voter_id: u64, candidate_id: u64) -> Result<DevnetTx, CallError> {
        let signer = self.signer;
        self.net.send("castVote", self.at, signer, |c| {
            let now = c.now;
            let balance = c.balances.get(&signer).copied().unwrap_or(0);
            c.election.cast_vote(signer, now, voter_id, candidate_id, balance)
        })
    }
}

/// ERC20 handle bound to a signer.
#[derive(Debug, Clone)]
pub struct DevnetToken {
    net: Devnet,
    at: Address,
    signer: Address,
}

impl TokenContract for DevnetToken {
    type Tx = DevnetTx;

    async fn balance_of(&self, owner: Address) -> Result<u128, CallError> {
        self.net
            .read("balanceOf", self.at, |c| Ok(c.balances.get(&owner).copied().unwrap_or(0)))
    }

    async fn transfer(&self, to: Address, amount: u128) -> Result<DevnetTx, CallError> {
        let signer = self.signer;
        self.net.send("transfer", self.at, signer, |c| c.transfer(signer, to, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn election() -> (Election, Address) {
        let commission: Address = ANVIL_ACCOUNTS[0].parse().unwrap();
        (
            Election {
                commission,
                ..Election::default()
            },
            commission,
        )
    }

    #[test]
    fn status_follows_window_and_stop() {
        let (mut e, commission) = election();
        assert_eq!(e.status(100), VotingStatus::NotStarted);
        e.set_voting_period(commission, 100, 60, 7200).unwrap();
        assert_eq!(e.status(159), VotingStatus::NotStarted);
        assert_eq!(e.status(160), VotingStatus::InProgress);
        assert_eq!(e.status(160 + 7200), VotingStatus::Ended);
        e.emergency_stop(commission, 200).unwrap();
        assert_eq!(e.status(200), VotingStatus::Ended);
    }

    #[test]
    fn commission_only_actions() {
        let (mut e, _) = election();
        let outsider: Address = ANVIL_ACCOUNTS[1].parse().unwrap();
        let err = e.register_candidate(outsider, 0, "Ada", "Blue", 40, Gender::Female).unwrap_err();
        assert_eq!(err.reason.as_deref(), Some("Only the election commission can do this"));
        assert!(e.set_voting_period(outsider, 0, 0, 7200).is_err());
    }

    #[test]
    fn period_must_exceed_an_hour() {
        let (mut e, commission) = election();
        let err = e.set_voting_period(commission, 0, 10, 3600).unwrap_err();
        assert_eq!(err.reason.as_deref(), Some("End duration must be more than 1 hour"));
        assert!(e.set_voting_period(commission, 0, 10, 3601).is_ok());
    }

    #[test]
    fn announce_once_after_end() {
        let (mut e, commission) = election();
        e.set_voting_period(commission, 1, 0, 7200).unwrap();
        assert!(e.announce_result(commission, 10).is_err());
        e.announce_result(commission, 8000).unwrap();
        let err = e.announce_result(commission, 8000).unwrap_err();
        assert_eq!(err.reason.as_deref(), Some("Result already announced"));
    }

    #[test]
    fn one_vote_per_voter() {
        let (mut e, commission) = election();
        let voter: Address = ANVIL_ACCOUNTS[2].parse().unwrap();
        e.register_candidate(commission, 0, "Ada", "Blue", 40, Gender::Female).unwrap();
        e.register_voter(voter, "Bo", 30, Gender::Male).unwrap();
        assert!(e.register_voter(voter, "Bo", 30, Gender::Male).is_err());
        e.set_voting_period(commission, 1, 0, 7200).unwrap();
        assert_eq!(
            e.cast_vote(voter, 10, 1, 1, 0).unwrap_err().reason.as_deref(),
            Some("Voter must hold the voting token")
        );
        e.cast_vote(voter, 10, 1, 1, 5).unwrap();
        assert_eq!(e.candidates[0].votes, 1);
        assert_eq!(
            e.cast_vote(voter, 10, 1, 1, 5).unwrap_err().reason.as_deref(),
            Some("You have already voted")
        );
    }

    #[test]
    fn seed_parses_from_json() {
        let seed = DevnetSeed::from_json(
            r#"{
                "chain_id": 11155111,
                "accounts": ["0x70997970C51812dc3A010C7d01b50e0d17dc79C8"],
                "commissioner": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "token_contract": null,
                "token_supply": "5"
            }"#,
        )
        .unwrap();
        assert_eq!(seed.chain_id, 11155111);
        assert_eq!(seed.token_contract, None);
        assert_eq!(seed.voting_contract, DEFAULT_VOTING_CONTRACT);
        let net = Devnet::from_seed(seed).unwrap();
        assert_eq!(net.balance(net.commissioner()), 0);
    }

    #[tokio::test]
    async fn listeners_come_and_go() {
        let net = Devnet::default();
        let mut sub = net.subscribe();
        assert_eq!(net.listener_count(), 1);
        net.switch_chain(5);
        assert_eq!(sub.events.try_recv().unwrap(), WalletEvent::ChainChanged(5));
        net.unsubscribe(sub.id);
        assert_eq!(net.listener_count(), 0);
    }

    #[tokio::test]
    async fn only_exposed_accounts_sign() {
        let net = Devnet::default();
        let voting = net.voting_contract(DEFAULT_VOTING_CONTRACT, net.commissioner());
        let err = voting.emergency_stop_voting().await.unwrap_err();
        assert_eq!(err.code, Some(UNAUTHORIZED_CODE));

        net.request_accounts().await.unwrap();
        assert!(voting.register_candidate("Ada", "Blue", 40, Gender::Female).await.is_ok());

        net.switch_account(net.accounts()[1]);
        let err = voting.register_candidate("Cy", "Red", 50, Gender::Male).await.unwrap_err();
        assert_eq!(err.code, Some(UNAUTHORIZED_CODE));
        assert_eq!(net.chain.lock().election.candidates.len(), 1);
    }

    #[tokio::test]
    async fn sends_to_unknown_contracts_fail() {
        let net = Devnet::default();
        let voter = net.accounts()[1];
        net.switch_account(voter);
        net.request_accounts().await.unwrap();
        let nowhere: Address = ANVIL_ACCOUNTS[3].parse().unwrap();
        let voting = net.voting_contract(nowhere, voter);
        let err = voting.register_voter("Bo", 30, Gender::Male).await.unwrap_err();
        assert_eq!(err.reason, None);
        assert!(net.chain.lock().election.voters.is_empty());
    }

    #[tokio::test]
    async fn wallet_queries_can_fail() {
        let net = Devnet::default();
        net.fail_read("eth_chainId");
        assert!(net.chain_id().await.is_err());
        assert!(WalletProvider::accounts(&net).await.is_ok());
        net.heal();
        assert_eq!(net.chain_id().await.unwrap(), 31337);
    }
}
