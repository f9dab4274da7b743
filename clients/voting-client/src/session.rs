use tracing::{info, warn};

use crate::address::Address;
use crate::remote::{VotingContract, WalletProvider};

/// Contract handles bound to one signing account.
///
/// Replaced wholesale when the account or chain changes.
pub struct ContractSession<P: WalletProvider> {
    account: Address,
    pub voting: P::Voting,
    pub token: Option<P::Token>,
}

impl<P: WalletProvider> ContractSession<P> {
    /// Binds the voting contract at `voting_address` and looks up the token
    /// it uses. A missing token is not an error: the election may not be
    /// token-gated yet.
    pub async fn open(provider: &P, account: Address, voting_address: Address) -> Self {
        let voting = provider.voting_contract(voting_address, account);
        let token = match voting.token_address().await {
            Ok(at) if at.is_zero() => {
                warn!("voting contract reports no token");
                None
            }
            Ok(at) => {
                info!(token = %at, "token contract found");
                Some(provider.token_contract(at, account))
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch token address");
                None
            }
        };
        ContractSession {
            account,
            voting,
            token,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}
