//! Error types shared by the connector, synchronizer and executor.

use std::fmt;

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// A failed remote call, as reported by the wallet provider.
///
/// `reason` is the contract's revert reason when the node returned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallError {
    pub code: Option<i64>,
    pub reason: Option<String>,
    pub message: String,
}

impl CallError {
    pub fn revert(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        CallError {
            code: None,
            message: format!("execution reverted: {reason}"),
            reason: Some(reason),
        }
    }

    pub fn rejected() -> Self {
        CallError {
            code: Some(USER_REJECTED_CODE),
            reason: None,
            message: "user rejected transaction".to_string(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        CallError {
            code: None,
            reason: None,
            message: message.into(),
        }
    }

    /// True when the provider flagged the request as declined by the user:
    /// code 4001, or a message mentioning a user rejection or carrying the
    /// `ACTION_REJECTED` tag.
    pub fn is_user_rejection(&self) -> bool {
        if self.code == Some(USER_REJECTED_CODE) {
            return true;
        }
        let message = self.message.to_ascii_lowercase();
        message.contains("user rejected") || message.contains("action_rejected")
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for CallError {}

/// One field of a sync that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    pub field: &'static str,
    pub source: CallError,
}

impl ReadError {
    pub fn new(field: &'static str, source: CallError) -> Self {
        ReadError { field, source }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reading {} failed: {}", self.field, self.source)
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No wallet provider is present.
    WalletUnavailable,
    /// The permission prompt or transaction was declined.
    UserRejected,
    /// The provider returned no authorized account.
    NoAccounts,
    NotConnected,
    Remote(CallError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::WalletUnavailable => write!(f, "no wallet provider available"),
            ClientError::UserRejected => write!(f, "request rejected by the user"),
            ClientError::NoAccounts => write!(f, "wallet returned no accounts"),
            ClientError::NotConnected => write!(f, "wallet not connected"),
            ClientError::Remote(e) => write!(f, "remote call failed: {e}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Remote(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CallError> for ClientError {
    fn from(e: CallError) -> Self {
        if e.is_user_rejection() {
            ClientError::UserRejected
        } else {
            ClientError::Remote(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_detected_by_code_or_text() {
        assert!(CallError::rejected().is_user_rejection());
        assert!(CallError::other("MetaMask Tx Signature: User Rejected the request").is_user_rejection());
        assert!(CallError::other("ACTION_REJECTED").is_user_rejection());
        assert!(!CallError::revert("Already voted").is_user_rejection());
    }

    #[test]
    fn rejection_maps_to_client_error() {
        assert_eq!(ClientError::from(CallError::rejected()), ClientError::UserRejected);
        assert!(matches!(
            ClientError::from(CallError::other("timeout")),
            ClientError::Remote(_)
        ));
    }
}
