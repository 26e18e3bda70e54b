//! Value objects - immutable, validated domain primitives

mod address;
mod tx_hash;

pub use address::Address;
pub use tx_hash::TxHash;

use std::fmt;

/// Error returned when parsing a ledger identifier fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    input: String,
}

impl ParseIdError {
    pub(crate) fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.kind, self.input)
    }
}

impl std::error::Error for ParseIdError {}

/// Decode a `0x`-prefixed, fixed-width hex string into raw bytes.
pub(crate) fn decode_fixed_hex<const N: usize>(s: &str) -> Option<[u8; N]> {
    let hex = s.strip_prefix("0x")?;
    if hex.len() != N * 2 {
        return None;
    }
    let mut out = [0u8; N];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).ok()?;
        out[i] = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(out)
}

/// Encode raw bytes as a lowercase `0x`-prefixed hex string.
pub(crate) fn encode_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 + bytes.len() * 2);
    s.push_str("0x");
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_fixed_hex_roundtrip() {
        let encoded = encode_hex(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(encoded, "0xdeadbeef");
        let decoded: [u8; 4] = decode_fixed_hex(&encoded).unwrap();
        assert_eq!(decoded, [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decode_fixed_hex_rejects_wrong_width() {
        assert_eq!(decode_fixed_hex::<4>("0xdead"), None);
    }

    #[test]
    fn decode_fixed_hex_rejects_missing_prefix() {
        assert_eq!(decode_fixed_hex::<2>("dead"), None);
    }

    #[test]
    fn decode_fixed_hex_rejects_non_hex() {
        assert_eq!(decode_fixed_hex::<2>("0xzzzz"), None);
    }
}
