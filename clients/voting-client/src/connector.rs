use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::error::ClientError;
use crate::remote::{Subscription, WalletEvent, WalletProvider};

/// Tracks which account and chain the wallet currently exposes.
///
/// Owns the single change-listener registration; it is released on
/// [`WalletConnector::shutdown`] or when the connector is dropped.
pub struct WalletConnector<P: WalletProvider> {
    provider: Option<P>,
    listener: Option<Subscription>,
    account: Option<Address>,
    chain_id: Option<u64>,
}

impl<P: WalletProvider> WalletConnector<P> {
    /// `None` models a browser without an injected provider.
    pub fn new(provider: Option<P>) -> Self {
        WalletConnector {
            provider,
            listener: None,
            account: None,
            chain_id: None,
        }
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Registers the change listener. Calling it again is a no-op.
    pub fn register_listeners(&mut self) -> Result<(), ClientError> {
        let provider = self.provider.as_ref().ok_or(ClientError::WalletUnavailable)?;
        if self.listener.is_none() {
            let sub = provider.subscribe();
            debug!(id = sub.id, "wallet listener registered");
            self.listener = Some(sub);
        }
        Ok(())
    }

    /// Start-up probe: adopts an already-authorized account without
    /// prompting. Returns the adopted account, if any.
    pub async fn init(&mut self) -> Result<Option<Address>, ClientError> {
        if self.provider.is_none() {
            return Ok(None);
        }
        self.register_listeners()?;
        let provider = self.provider.as_ref().ok_or(ClientError::WalletUnavailable)?;
        self.chain_id = Some(provider.chain_id().await?);
        let accounts = provider.accounts().await?;
        self.account = accounts.first().copied();
        info!(chain_id = ?self.chain_id, account = ?self.account, "wallet initialised");
        Ok(self.account)
    }

    /// Prompts for account access and adopts the first authorized account.
    pub async fn connect(&mut self) -> Result<Address, ClientError> {
        self.register_listeners()?;
        let provider = self.provider.as_ref().ok_or(ClientError::WalletUnavailable)?;
        let accounts = provider.request_accounts().await?;
        let account = *accounts.first().ok_or(ClientError::NoAccounts)?;
        if self.chain_id.is_none() {
            self.chain_id = Some(provider.chain_id().await?);
        }
        self.account = Some(account);
        info!(%account, "wallet connected");
        Ok(account)
    }

    /// Next queued wallet event, applied to the tracked account/chain.
    /// Never waits.
    pub fn next_event(&mut self) -> Option<WalletEvent> {
        let listener = self.listener.as_mut()?;
        match listener.events.try_recv() {
            Ok(event) => {
                match &event {
                    WalletEvent::AccountsChanged(accounts) => {
                        self.account = accounts.first().copied();
                    }
                    WalletEvent::ChainChanged(id) => {
                        self.chain_id = Some(*id);
                    }
                }
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("wallet listener closed by provider");
                self.listener = None;
                None
            }
        }
    }

    /// Forgets the account; the wallet itself keeps its authorization.
    pub fn disconnect(&mut self) {
        self.account = None;
    }

    pub fn shutdown(&mut self) {
        if let (Some(provider), Some(sub)) = (self.provider.as_ref(), self.listener.take()) {
            provider.unsubscribe(sub.id);
            debug!(id = sub.id, "wallet listener released");
        }
    }
}

impl<P: WalletProvider> Drop for WalletConnector<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
