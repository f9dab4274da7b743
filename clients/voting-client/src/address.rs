use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A 20-byte account or contract address.
///
/// Parsing accepts `0x`/`0X`-prefixed hex in any letter case, so two
/// addresses that differ only in case compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// `0x1234...abcd`: first six characters, an ellipsis, last four.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    MissingPrefix,
    BadLength(usize),
    BadHex,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::MissingPrefix => write!(f, "address must start with 0x"),
            AddressError::BadLength(n) => write!(f, "address must have 40 hex digits, got {n}"),
            AddressError::BadHex => write!(f, "address contains non-hex characters"),
        }
    }
}

impl std::error::Error for AddressError {}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;
        if digits.len() != 40 {
            return Err(AddressError::BadLength(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::BadHex)?;
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        let upper: Address = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01".parse().unwrap();
        let lower: Address = "0xabcdef0123456789abcdef0123456789abcdef01".parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!("abcd".parse::<Address>(), Err(AddressError::MissingPrefix));
        assert_eq!("0x1234".parse::<Address>(), Err(AddressError::BadLength(4)));
        assert_eq!(
            "0xzz00000000000000000000000000000000000000".parse::<Address>(),
            Err(AddressError::BadHex)
        );
    }

    #[test]
    fn short_form() {
        let a: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(a.short(), "0xf39f...2266");
    }

    #[test]
    fn serde_uses_hex_string() {
        let a: Address = serde_json::from_str("\"0x70997970C51812dc3A010C7d01b50e0d17dc79C8\"").unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            "\"0x70997970c51812dc3a010c7d01b50e0d17dc79c8\""
        );
        assert!(serde_json::from_str::<Address>("\"nope\"").is_err());
    }
}
