use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::address::Address;
use crate::connector::WalletConnector;
use crate::error::ClientError;
use crate::executor::{execute, reject, TxOutcome};
use crate::remote::{TokenContract, VotingContract, WalletEvent, WalletProvider};
use crate::session::ContractSession;
use crate::state::ViewState;
use crate::sync::sync;
use crate::types::Gender;
use crate::units::{parse_units, TOKEN_DECIMALS};

/// Voting contract address used when nothing else is configured.
pub const DEFAULT_VOTING_CONTRACT: Address = Address::from_bytes([
    0xf8, 0xfd, 0xc8, 0x47, 0x33, 0xf7, 0x3a, 0xdb, 0x0e, 0xad, 0xf0, 0xb1, 0xad, 0xc9, 0xac, 0x70,
    0x2f, 0x52, 0x2f, 0xee,
]);

pub const NOT_CONNECTED_MESSAGE: &str = "Wallet not connected";
pub const NOT_REGISTERED_MESSAGE: &str = "You are not registered to vote!";
pub const NO_TOKEN_CONTRACT_MESSAGE: &str = "Token contract not loaded";
pub const INVALID_AMOUNT_MESSAGE: &str = "Invalid token amount";
pub const NO_PROVIDER_MESSAGE: &str = "Wallet provider is not installed!";
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect wallet.";
pub const INIT_FAILED_MESSAGE: &str = "Failed to initialize wallet connection.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub voting_contract: Address,
    pub token_symbol: String,
    pub token_decimals: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            voting_contract: DEFAULT_VOTING_CONTRACT,
            token_symbol: "GLD".to_string(),
            token_decimals: TOKEN_DECIMALS,
        }
    }
}

/// The one object the presentation layer talks to.
///
/// Holds the wallet connection, the contract session for the active
/// account and the mirrored [`ViewState`]. Every action returns a
/// [`TxOutcome`]; nothing here panics or propagates on a failed call.
pub struct VotingClient<P: WalletProvider> {
    config: ClientConfig,
    wallet: WalletConnector<P>,
    session: Option<ContractSession<P>>,
    state: ViewState,
}

impl<P: WalletProvider> VotingClient<P> {
    pub fn new(provider: Option<P>, config: ClientConfig) -> Self {
        VotingClient {
            config,
            wallet: WalletConnector::new(provider),
            session: None,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn wallet(&self) -> &WalletConnector<P> {
        &self.wallet
    }

    pub fn session(&self) -> Option<&ContractSession<P>> {
        self.session.as_ref()
    }

    /// Silent start-up: picks up an account the wallet already authorized.
    pub async fn init(&mut self) {
        match self.wallet.init().await {
            Ok(Some(account)) => self.open_session(account).await,
            Ok(None) => self.state.chain_id = self.wallet.chain_id(),
            Err(e) => {
                error!(error = %e, "initialization error");
                self.state.error = INIT_FAILED_MESSAGE.to_string();
            }
        }
    }

    /// Asks the wallet for account access and loads the election.
    pub async fn connect(&mut self) -> Result<Address, ClientError> {
        if self.wallet.provider().is_none() {
            self.state.error = NO_PROVIDER_MESSAGE.to_string();
            return Err(ClientError::WalletUnavailable);
        }
        self.state.loading = true;
        self.state.error.clear();
        let result = self.wallet.connect().await;
        self.state.loading = false;
        match result {
            Ok(account) => {
                self.open_session(account).await;
                Ok(account)
            }
            Err(e) => {
                error!(error = %e, "wallet connection failed");
                self.state.error = CONNECT_FAILED_MESSAGE.to_string();
                Err(e)
            }
        }
    }

    /// Drops the session and every mirrored value. The error slot and the
    /// sync counter survive.
    fn reset(&mut self) {
        self.session = None;
        self.state = ViewState {
            account: self.wallet.account(),
            chain_id: self.wallet.chain_id(),
            error: std::mem::take(&mut self.state.error),
            syncs: self.state.syncs,
            ..ViewState::default()
        };
    }

    /// Builds a fresh session for `account` and syncs it.
    async fn open_session(&mut self, account: Address) {
        self.reset();
        self.state.account = Some(account);
        let Some(provider) = self.wallet.provider() else {
            return;
        };
        let session = ContractSession::open(provider, account, self.config.voting_contract).await;
        sync(&mut self.state, &session.voting, account).await;
        self.session = Some(session);
    }

    /// Applies queued wallet notifications. Returns how many were handled.
    ///
    /// Every action and query runs this first, so nothing goes out on a
    /// session the wallet has already replaced.
    pub async fn process_wallet_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.wallet.next_event() {
            handled += 1;
            match event {
                WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                    Some(&account) => {
                        info!(%account, "account changed");
                        self.open_session(account).await;
                    }
                    None => {
                        info!("wallet disconnected");
                        self.reset();
                    }
                },
                WalletEvent::ChainChanged(chain_id) => {
                    warn!(chain_id, "chain changed, reloading");
                    self.reset();
                    if let Some(account) = self.wallet.account() {
                        self.open_session(account).await;
                    }
                }
            }
        }
        handled
    }

    pub fn disconnect(&mut self) {
        self.wallet.disconnect();
        self.reset();
    }

    /// Releases the wallet listener.
    pub fn shutdown(&mut self) {
        self.wallet.shutdown();
    }

    /// Manual resync. No-op without a session.
    pub async fn refresh(&mut self) {
        self.process_wallet_events().await;
        if let Some(session) = self.session.as_ref() {
            sync(&mut self.state, &session.voting, session.account()).await;
        }
    }

    async fn holds_token(session: &ContractSession<P>) -> bool {
        let Some(token) = session.token.as_ref() else {
            return false;
        };
        match token.balance_of(session.account()).await {
            Ok(balance) => balance > 0,
            Err(e) => {
                error!(error = %e, "token check failed");
                false
            }
        }
    }

    pub async fn has_positive_token_balance(&mut self) -> bool {
        self.process_wallet_events().await;
        match self.session.as_ref() {
            Some(session) => Self::holds_token(session).await,
            None => false,
        }
    }

    /// Raw token balance of the active account, when it can be read.
    pub async fn token_balance(&mut self) -> Option<u128> {
        self.process_wallet_events().await;
        let session = self.session.as_ref()?;
        let token = session.token.as_ref()?;
        token.balance_of(session.account()).await.ok()
    }

    pub async fn register_candidate(&mut self, name: &str, party: &str, age: u32, gender: Gender) -> TxOutcome {
        self.process_wallet_events().await;
        let Some(session) = self.session.as_ref() else {
            return reject(&mut self.state, NOT_CONNECTED_MESSAGE);
        };
        let submit = session.voting.register_candidate(name, party, age, gender);
        execute(
            &mut self.state,
            &session.voting,
            session.account(),
            submit,
            "Candidate registered successfully!",
        )
        .await
    }

    /// Offsets are seconds from now (start) and from the start (end).
    pub async fn set_voting_period(&mut self, start_offset: u64, end_offset: u64) -> TxOutcome {
        self.process_wallet_events().await;
        let Some(session) = self.session.as_ref() else {
            return reject(&mut self.state, NOT_CONNECTED_MESSAGE);
        };
        let submit = session.voting.set_voting_period(start_offset, end_offset);
        execute(&mut self.state, &session.voting, session.account(), submit, "Voting period set!").await
    }

    pub async fn emergency_stop(&mut self) -> TxOutcome {
        self.process_wallet_events().await;
        let Some(session) = self.session.as_ref() else {
            return reject(&mut self.state, NOT_CONNECTED_MESSAGE);
        };
        let submit = session.voting.emergency_stop_voting();
        execute(&mut self.state, &session.voting, session.account(), submit, "Voting stopped!").await
    }

    pub async fn announce_result(&mut self) -> TxOutcome {
        self.process_wallet_events().await;
        let Some(session) = self.session.as_ref() else {
            return reject(&mut self.state, NOT_CONNECTED_MESSAGE);
        };
        let submit = session.voting.announce_voting_result();
        execute(&mut self.state, &session.voting, session.account(), submit, "Result announced!").await
    }

    pub async fn register_voter(&mut self, name: &str, age: u32, gender: Gender) -> TxOutcome {
        self.process_wallet_events().await;
        let Some(session) = self.session.as_ref() else {
            return reject(&mut self.state, NOT_CONNECTED_MESSAGE);
        };
        let submit = session.voting.register_voter(name, age, gender);
        execute(&mut self.state, &session.voting, session.account(), submit, "Voter registered!").await
    }

    /// Checks the cached voter id, then the token balance, and only then
    /// submits. Both checks are conveniences; the contract decides.
    pub async fn vote(&mut self, candidate_id: u64) -> TxOutcome {
        self.process_wallet_events().await;
        let voter_id = self.state.user_voter_id;
        if voter_id == 0 {
            return reject(&mut self.state, NOT_REGISTERED_MESSAGE);
        }
        let Some(session) = self.session.as_ref() else {
            return reject(&mut self.state, NOT_CONNECTED_MESSAGE);
        };
        if !Self::holds_token(session).await {
            let message = format!("You do not hold the required {} Token to vote!", self.config.token_symbol);
            warn!(voter_id, "vote blocked: no token balance");
            return reject(&mut self.state, message);
        }
        let submit = session.voting.cast_vote(voter_id, candidate_id);
        execute(&mut self.state, &session.voting, session.account(), submit, "Vote cast successfully!").await
    }

    /// Sends `amount` whole tokens (decimal string) to `to`.
    pub async fn distribute_tokens(&mut self, to: Address, amount: &str) -> TxOutcome {
        self.process_wallet_events().await;
        let Some(session) = self.session.as_ref() else {
            return reject(&mut self.state, NOT_CONNECTED_MESSAGE);
        };
        let Some(token) = session.token.as_ref() else {
            return reject(&mut self.state, NO_TOKEN_CONTRACT_MESSAGE);
        };
        let units = match parse_units(amount, self.config.token_decimals) {
            Ok(units) => units,
            Err(e) => {
                warn!(amount, error = %e, "rejecting token amount");
                return reject(&mut self.state, INVALID_AMOUNT_MESSAGE);
            }
        };
        let submit = token.transfer(to, units);
        let success = format!("Sent {} {} to {}", amount.trim(), self.config.token_symbol, to);
        execute(&mut self.state, &session.voting, session.account(), submit, success).await
    }
}
