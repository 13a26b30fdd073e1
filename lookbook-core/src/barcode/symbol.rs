//! EAN-13 identifiers derived from item file names.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::error::{CatalogError, Result, SYMBOL_ID_DIGITS};

/// Identifiers are reduced into `0..10^12` so they fit the 12 data digits.
const ID_MODULUS: u64 = 1_000_000_000_000;

/// Compute the EAN-13 check digit for 12 data digits.
///
/// Digits are weighted 1, 3, 1, 3, ... from the left; the check digit is
/// `(10 - (sum mod 10)) mod 10`.
pub fn ean13_check_digit(digits: &[u8; SYMBOL_ID_DIGITS]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// A 12-digit, zero-padded barcode identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolId(String);

impl SymbolId {
    /// Derive the identifier for an item from its file name.
    ///
    /// The first 8 bytes of the SHA3-256 digest of the UTF-8 name are read as
    /// a big-endian `u64` and reduced modulo 10^12. The result is stable
    /// across processes and platforms.
    pub fn from_item_name(name: &str) -> Self {
        let digest = Sha3_256::digest(name.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self::from_number(u64::from_be_bytes(prefix) % ID_MODULUS)
    }

    /// Zero-pad a number below 10^12 into an identifier.
    pub fn from_number(value: u64) -> Self {
        Self(format!("{:012}", value % ID_MODULUS))
    }

    /// Parse exactly 12 ASCII digits.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != SYMBOL_ID_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CatalogError::InvalidSymbolId(format!(
                "expected {} digits, got '{}'",
                SYMBOL_ID_DIGITS, s
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digits(&self) -> [u8; SYMBOL_ID_DIGITS] {
        let mut out = [0u8; SYMBOL_ID_DIGITS];
        for (slot, b) in out.iter_mut().zip(self.0.bytes()) {
            *slot = b - b'0';
        }
        out
    }

    pub fn check_digit(&self) -> u8 {
        ean13_check_digit(&self.digits())
    }

    /// The 13-digit payload carried by the rendered symbol.
    pub fn payload(&self) -> String {
        format!("{}{}", self.0, self.check_digit())
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SymbolId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SymbolId> for String {
    fn from(id: SymbolId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_digit_known_values() {
        // 4006381333931 and 9780306406157 are well-known valid EAN-13 codes
        assert_eq!(ean13_check_digit(&[4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3]), 1);
        assert_eq!(ean13_check_digit(&[9, 7, 8, 0, 3, 0, 6, 4, 0, 6, 1, 5]), 7);
        assert_eq!(ean13_check_digit(&[0; 12]), 0);
    }

    #[test]
    fn test_check_digit_matches_weighted_sum() {
        for seed in 0..200u64 {
            let id = SymbolId::from_number(seed.wrapping_mul(7_919_000_003) % ID_MODULUS);
            let digits = id.digits();
            let weighted: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &d)| d as u32 * [1, 3][i % 2])
                .sum();
            assert_eq!(id.check_digit() as u32, (10 - weighted % 10) % 10);
            assert_eq!(id.payload().len(), 13);
            assert!(id.payload().starts_with(id.as_str()));
        }
    }

    #[test]
    fn test_from_item_name_is_stable() {
        let a = SymbolId::from_item_name("red_dress.jpg");
        let b = SymbolId::from_item_name("red_dress.jpg");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 12);
        assert!(a.as_str().bytes().all(|c| c.is_ascii_digit()));
        assert_ne!(a, SymbolId::from_item_name("blue_dress.jpg"));
    }

    #[test]
    fn test_from_item_name_uses_digest_prefix() {
        let digest = Sha3_256::digest(b"coat.png");
        let prefix = u64::from_str_radix(&hex::encode(&digest[..8]), 16).unwrap();
        assert_eq!(
            SymbolId::from_item_name("coat.png"),
            SymbolId::from_number(prefix % ID_MODULUS)
        );
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(SymbolId::from_number(42).as_str(), "000000000042");
    }

    #[test]
    fn test_parse() {
        assert!(SymbolId::parse("012345678901").is_ok());
        assert!(SymbolId::parse("01234567890").is_err());
        assert!(SymbolId::parse("0123456789012").is_err());
        assert!(SymbolId::parse("01234567890a").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = SymbolId::from_number(123);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"000000000123\"");
        let back: SymbolId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<SymbolId>("\"12\"").is_err());
    }
}
