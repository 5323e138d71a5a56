//! MAC address value type backing the `smac`, `dmac`, `dvcmac` and `amac` extensions.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const ADDRESS_LENGTH: usize = 6;

const MULTICAST_FLAG: u8 = 0x01;
const LOCAL_FLAG: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// A 48-bit hardware address.
///
/// Accepts six hex octets separated by any of space, `-`, `_`, `.`, `:`
/// or nothing at all. Separators may differ between gaps
/// (`00-ff:00.ff00ff` is valid). Always renders as `00:ff:00:ff:00:ff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; ADDRESS_LENGTH]);

impl MacAddress {
    pub const fn new(octets: [u8; ADDRESS_LENGTH]) -> Self {
        Self(octets)
    }

    pub fn parse(text: &str) -> Result<Self, MacError> {
        let trimmed = text.trim();
        let bytes = trimmed.as_bytes();
        let mut octets = [0u8; ADDRESS_LENGTH];
        let mut pos = 0;

        for (idx, octet) in octets.iter_mut().enumerate() {
            let (hi, lo) = match (bytes.get(pos).and_then(|b| hex_value(*b)), bytes.get(pos + 1).and_then(|b| hex_value(*b))) {
                (Some(hi), Some(lo)) => (hi, lo),
                _ => return Err(MacError::InvalidFormat(text.to_string())),
            };
            *octet = (hi << 4) | lo;
            pos += 2;

            if idx < ADDRESS_LENGTH - 1 && bytes.get(pos).map_or(false, |b| is_separator(*b)) {
                pos += 1;
            }
        }

        if pos != bytes.len() {
            return Err(MacError::InvalidFormat(text.to_string()));
        }

        Ok(Self(octets))
    }

    pub fn octets(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Group bit (I/G) of the first octet.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & MULTICAST_FLAG == MULTICAST_FLAG
    }

    /// Locally administered bit (U/L) of the first octet.
    pub fn is_local(&self) -> bool {
        self.0[0] & LOCAL_FLAG == LOCAL_FLAG
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn is_separator(b: u8) -> bool {
    matches!(b, b'-' | b':' | b'.' | b'_') || b.is_ascii_whitespace()
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for MacAddress {
    type Error = MacError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for MacAddress {
    fn from(octets: [u8; ADDRESS_LENGTH]) -> Self {
        Self(octets)
    }
}

impl Serialize for MacAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORMALIZED: &str = "00:ff:00:ff:00:ff";
    const LOCAL: &str = "ff:ff:ff:ff:ff:ff";
    const MULTICAST: &str = "01:80:c2:00:00:00";

    // ── Separators ───────────────────────────────────────────────

    #[test]
    fn test_parse_normalized() {
        assert_eq!(MacAddress::parse(NORMALIZED).unwrap().to_string(), NORMALIZED);
    }

    #[test]
    fn test_parse_all_separator_styles() {
        let inputs = [
            "00-ff-00-ff-00-ff",
            "00_ff_00_ff_00_ff",
            "00 ff 00 ff 00 ff",
            "00.ff.00.ff.00.ff",
            "00ff00ff00ff",
            "00:FF:00:FF:00:FF",
        ];
        for input in inputs {
            let mac = MacAddress::parse(input)
                .unwrap_or_else(|e| panic!("{} should parse: {}", input, e));
            assert_eq!(mac.to_string(), NORMALIZED, "input: {}", input);
        }
    }

    #[test]
    fn test_parse_mixed_separators() {
        let mac = MacAddress::parse("00-ff:00.ff00_ff").unwrap();
        assert_eq!(mac.to_string(), NORMALIZED);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let mac = MacAddress::parse("  00:ff:00:ff:00:ff \t").unwrap();
        assert_eq!(mac.to_string(), NORMALIZED);
    }

    // ── Rejection ────────────────────────────────────────────────

    #[test]
    fn test_parse_five_octets_rejected() {
        let err = MacAddress::parse("00:ff:00:ff:00").unwrap_err();
        assert!(matches!(err, MacError::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_seven_octets_rejected() {
        assert!(MacAddress::parse("00:ff:00:ff:00:ff:00").is_err());
    }

    #[test]
    fn test_parse_double_separator_rejected() {
        assert!(MacAddress::parse("00::ff:00:ff:00:ff").is_err());
    }

    #[test]
    fn test_parse_non_hex_rejected() {
        assert!(MacAddress::parse("0g:ff:00:ff:00:ff").is_err());
        assert!(MacAddress::parse("+f:ff:00:ff:00:ff").is_err());
        assert!(MacAddress::parse("").is_err());
    }

    // ── Bits & Ordering ──────────────────────────────────────────

    #[test]
    fn test_is_local() {
        assert!(MacAddress::parse(LOCAL).unwrap().is_local());
        assert!(!MacAddress::parse(MULTICAST).unwrap().is_local());
    }

    #[test]
    fn test_is_multicast() {
        assert!(MacAddress::parse(MULTICAST).unwrap().is_multicast());
        assert!(!MacAddress::parse(NORMALIZED).unwrap().is_multicast());
    }

    #[test]
    fn test_equality_and_ordering() {
        let multicast = MacAddress::parse(MULTICAST).unwrap();
        let local = MacAddress::parse(LOCAL).unwrap();
        assert_ne!(multicast, local);
        assert_eq!(multicast, MacAddress::parse("01-80-c2-00-00-00").unwrap());
        assert!(multicast < local);
        assert_eq!(multicast.cmp(&multicast), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_bytes_access() {
        let mac = MacAddress::parse(MULTICAST).unwrap();
        assert_eq!(mac.octets(), [0x01, 0x80, 0xc2, 0x00, 0x00, 0x00]);
        assert_eq!(mac.as_bytes().len(), ADDRESS_LENGTH);
        assert_eq!(MacAddress::from(mac.octets()), mac);
    }

    #[test]
    fn test_serialize_as_string() {
        let mac = MacAddress::parse("00.00.0c.07.ac.00").unwrap();
        assert_eq!(serde_json::to_string(&mac).unwrap(), r#""00:00:0c:07:ac:00""#);
    }
}
