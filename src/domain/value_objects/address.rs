//! Ledger address value object
//!
//! A fixed-width (20 byte) identifier for an artifact or account on the
//! execution ledger. The all-zero address doubles as the renounced-ownership
//! sentinel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{decode_fixed_hex, encode_hex, ParseIdError};

/// Execution-ledger address (20 bytes, `0x`-prefixed hex)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// The null address; the sentinel value for renounced ownership
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the null/renounced sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex(&s.to_ascii_lowercase())
            .map(Self)
            .ok_or_else(|| ParseIdError::new("address", s))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_hex(&self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_roundtrip() {
        let s = "0x00112233445566778899aabbccddeeff00112233";
        let addr: Address = s.parse().unwrap();
        assert_eq!(addr.to_string(), s);
    }

    #[test]
    fn parse_is_case_insensitive() {
        let lower: Address = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd".parse().unwrap();
        let upper: Address = "0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD".parse().unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn rejects_wrong_width() {
        assert!("0x1234".parse::<Address>().is_err());
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!("00112233445566778899aabbccddeeff00112233"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn zero_sentinel() {
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero, Address::ZERO);
        assert!(!"0x0000000000000000000000000000000000000001"
            .parse::<Address>()
            .unwrap()
            .is_zero());
    }

    #[test]
    fn serde_as_string() {
        let addr: Address = "0x00112233445566778899aabbccddeeff00112233".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x00112233445566778899aabbccddeeff00112233\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
