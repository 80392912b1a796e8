//! Dual-stack IP address value type.
//!
//! Every address occupies 16 bytes. IPv4 addresses are stored as
//! `[0; 8] ++ [0xFF; 4] ++ a.b.c.d`: the first 64 bits are zero, the third
//! 32-bit word is the filling constant and the last word holds the address in
//! network byte order. Anything else is IPv6, stored in network byte order.
//!
//! With this layout plain byte-wise comparison orders IPv4 addresses
//! numerically, and ANDing two IPv4 values keeps the filling word intact.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::{BitAnd, Not};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WifError};

const SIZE_IN_BYTES: usize = 16;
const V4_SIZE_IN_BYTES: usize = 4;
const V4_OFFSET: usize = 12;
const FILLING_OFFSET: usize = 8;
const IPV4_FILLING: [u8; 4] = [0xFF; 4];

/// Address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

/// Byte order of raw input handed to [`IpAddress::from_bytes`].
///
/// `Little` copies the bytes as given (this is what text parsing produces),
/// `Big` takes them in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// 128-bit address holding either an IPv4 or an IPv6 value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IpAddress {
    bytes: [u8; SIZE_IN_BYTES],
}

impl IpAddress {
    /// The all-zero address. It is reported as empty and as IPv6.
    pub const fn new() -> Self {
        Self {
            bytes: [0; SIZE_IN_BYTES],
        }
    }

    /// IPv4 address from its integer value in host order.
    pub fn from_u32(value: u32) -> Self {
        Self::v4_from_network(value.to_be_bytes())
    }

    /// Build an address from raw bytes: 4 bytes for IPv4, 16 for IPv6.
    pub fn from_bytes(bytes: &[u8], version: IpVersion, endianness: Endianness) -> Result<Self> {
        let expected = match version {
            IpVersion::V4 => V4_SIZE_IN_BYTES,
            IpVersion::V6 => SIZE_IN_BYTES,
        };
        if bytes.len() != expected {
            return Err(WifError::InvalidArgument(format!(
                "{:?} address needs {} bytes, got {}",
                version,
                expected,
                bytes.len()
            )));
        }

        let address = match version {
            IpVersion::V4 => {
                let mut v4 = [0u8; V4_SIZE_IN_BYTES];
                v4.copy_from_slice(bytes);
                if endianness == Endianness::Big {
                    v4.reverse();
                }
                Self::v4_from_network(v4)
            }
            IpVersion::V6 => {
                let mut v6 = [0u8; SIZE_IN_BYTES];
                v6.copy_from_slice(bytes);
                if endianness == Endianness::Big {
                    v6.reverse();
                }
                Self { bytes: v6 }
            }
        };
        Ok(address)
    }

    fn v4_from_network(octets: [u8; V4_SIZE_IN_BYTES]) -> Self {
        let mut bytes = [0u8; SIZE_IN_BYTES];
        bytes[FILLING_OFFSET..V4_OFFSET].copy_from_slice(&IPV4_FILLING);
        bytes[V4_OFFSET..].copy_from_slice(&octets);
        Self { bytes }
    }

    /// True for the zero address and for `0.0.0.0`.
    ///
    /// Both read as "no address" to the classifiers; the two cannot be told
    /// apart from an unset value.
    pub fn is_empty(&self) -> bool {
        let upper_zero = self.bytes[..FILLING_OFFSET].iter().all(|&b| b == 0);
        if !upper_zero {
            return false;
        }
        let lower = &self.bytes[FILLING_OFFSET..];
        lower.iter().all(|&b| b == 0) || (self.is_ipv4() && self.v4_as_int() == 0)
    }

    pub fn is_ipv4(&self) -> bool {
        self.bytes[..FILLING_OFFSET].iter().all(|&b| b == 0)
            && self.bytes[FILLING_OFFSET..V4_OFFSET] == IPV4_FILLING
    }

    pub fn is_ipv6(&self) -> bool {
        !self.is_ipv4()
    }

    pub fn version(&self) -> IpVersion {
        if self.is_ipv4() {
            IpVersion::V4
        } else {
            IpVersion::V6
        }
    }

    /// Integer value of the IPv4 part in host order.
    pub fn v4_as_int(&self) -> u32 {
        u32::from_be_bytes(self.v4_octets())
    }

    /// The last four bytes, i.e. the IPv4 address in network order.
    pub fn v4_octets(&self) -> [u8; 4] {
        let mut octets = [0u8; V4_SIZE_IN_BYTES];
        octets.copy_from_slice(&self.bytes[V4_OFFSET..]);
        octets
    }

    /// Copy of the raw storage.
    pub fn octets(&self) -> [u8; 16] {
        self.bytes
    }

    /// Raw storage.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    /// Storage viewed as 16-bit words in native byte order.
    pub fn as_u16_words(&self) -> [u16; 8] {
        let mut words = [0u16; 8];
        for (word, chunk) in words.iter_mut().zip(self.bytes.chunks_exact(2)) {
            *word = u16::from_ne_bytes([chunk[0], chunk[1]]);
        }
        words
    }

    /// Storage viewed as 32-bit words in native byte order.
    pub fn as_u32_words(&self) -> [u32; 4] {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(self.bytes.chunks_exact(4)) {
            *word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    /// Storage viewed as 64-bit words in native byte order.
    pub fn as_u64_words(&self) -> [u64; 2] {
        let mut words = [0u64; 2];
        for (word, chunk) in words.iter_mut().zip(self.bytes.chunks_exact(8)) {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            *word = u64::from_ne_bytes(raw);
        }
        words
    }

    /// Convert to the standard library representation of the detected family.
    pub fn to_std(&self) -> IpAddr {
        if self.is_ipv4() {
            IpAddr::V4(Ipv4Addr::from(self.v4_octets()))
        } else {
            IpAddr::V6(Ipv6Addr::from(self.bytes))
        }
    }

    fn from_words(words: [u64; 2]) -> Self {
        let mut bytes = [0u8; SIZE_IN_BYTES];
        bytes[..8].copy_from_slice(&words[0].to_ne_bytes());
        bytes[8..].copy_from_slice(&words[1].to_ne_bytes());
        Self { bytes }
    }
}

impl From<u32> for IpAddress {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(address: Ipv4Addr) -> Self {
        Self::v4_from_network(address.octets())
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(address: Ipv6Addr) -> Self {
        Self {
            bytes: address.octets(),
        }
    }
}

impl From<IpAddr> for IpAddress {
    fn from(address: IpAddr) -> Self {
        match address {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<IpAddress> for IpAddr {
    fn from(address: IpAddress) -> Self {
        address.to_std()
    }
}

impl FromStr for IpAddress {
    type Err = WifError;

    /// A colon only appears in IPv6 text, so it selects the parser.
    fn from_str(s: &str) -> Result<Self> {
        if s.contains(':') {
            s.parse::<Ipv6Addr>()
                .map(Self::from)
                .map_err(|_| WifError::Format(s.to_string()))
        } else {
            s.parse::<Ipv4Addr>()
                .map(Self::from)
                .map_err(|_| WifError::Format(s.to_string()))
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_std())
    }
}

impl fmt::Debug for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IpAddress({})", self)
    }
}

impl BitAnd for IpAddress {
    type Output = IpAddress;

    fn bitand(self, rhs: IpAddress) -> IpAddress {
        let l = self.as_u64_words();
        let r = rhs.as_u64_words();
        Self::from_words([l[0] & r[0], l[1] & r[1]])
    }
}

impl Not for IpAddress {
    type Output = IpAddress;

    fn not(self) -> IpAddress {
        let words = self.as_u64_words();
        Self::from_words([!words[0], !words[1]])
    }
}

impl Serialize for IpAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
