//! IP prefix (subnet) with containment test and total ordering.

use std::cmp::Ordering;
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WifError};
use crate::storage::ip_address::{IpAddress, IpVersion};

pub const IPV4_MAX_PREFIX_LENGTH: u8 = 32;
pub const IPV6_MAX_PREFIX_LENGTH: u8 = 128;

/// Masked base address plus mask and prefix length.
///
/// The base is always stored already masked, so two prefixes built from
/// different hosts of the same subnet compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    prefix: IpAddress,
    mask: IpAddress,
    length: u8,
}

fn validate_length(length: u8, max: u8) -> Result<()> {
    if length > max {
        return Err(WifError::InvalidArgument(format!(
            "IP prefix is too long. Given: {}, max: {}",
            length, max
        )));
    }
    Ok(())
}

fn v4_mask(length: u8) -> IpAddress {
    let shift = u32::from(IPV4_MAX_PREFIX_LENGTH - length);
    IpAddress::from_u32(u32::MAX.checked_shl(shift).unwrap_or(0))
}

fn v6_mask(length: u8) -> IpAddress {
    let full_bytes = usize::from(length / 8);
    let rest_bits = length % 8;
    let mut data = [0u8; 16];

    data[..full_bytes].fill(u8::MAX);
    if rest_bits != 0 {
        data[full_bytes] = u8::MAX << (8 - rest_bits);
    }
    IpAddress::from(Ipv6Addr::from(data))
}

impl IpPrefix {
    /// Prefix of `length` leading bits of `address`.
    pub fn new(address: IpAddress, length: u8) -> Result<Self> {
        let mask = if address.is_ipv4() {
            validate_length(length, IPV4_MAX_PREFIX_LENGTH)?;
            v4_mask(length)
        } else {
            validate_length(length, IPV6_MAX_PREFIX_LENGTH)?;
            v6_mask(length)
        };
        Ok(Self {
            prefix: address & mask,
            mask,
            length,
        })
    }

    /// Single-host prefix (/32 or /128).
    pub fn host(address: IpAddress) -> Self {
        let (mask, length) = match address.version() {
            IpVersion::V4 => (v4_mask(IPV4_MAX_PREFIX_LENGTH), IPV4_MAX_PREFIX_LENGTH),
            IpVersion::V6 => (v6_mask(IPV6_MAX_PREFIX_LENGTH), IPV6_MAX_PREFIX_LENGTH),
        };
        Self {
            prefix: address & mask,
            mask,
            length,
        }
    }

    /// Parse the address text and build a prefix from it.
    pub fn from_str_with_length(address: &str, length: u8) -> Result<Self> {
        Self::new(address.parse()?, length)
    }

    pub fn prefix_length(&self) -> u8 {
        self.length
    }

    /// The masked base address.
    pub fn prefix(&self) -> &IpAddress {
        &self.prefix
    }

    pub fn mask(&self) -> &IpAddress {
        &self.mask
    }

    pub fn version(&self) -> IpVersion {
        self.prefix.version()
    }

    /// Number of addresses covered. Saturates at `u128::MAX` for `::/0`.
    pub fn size(&self) -> u128 {
        let max = match self.version() {
            IpVersion::V4 => IPV4_MAX_PREFIX_LENGTH,
            IpVersion::V6 => IPV6_MAX_PREFIX_LENGTH,
        };
        1u128
            .checked_shl(u32::from(max - self.length))
            .unwrap_or(u128::MAX)
    }

    /// True if `address` lies inside the prefix. Families must agree.
    pub fn matches(&self, address: &IpAddress) -> bool {
        if address.version() != self.prefix.version() {
            return false;
        }
        (*address & self.mask) == self.prefix
    }

    /// True if every address of `other` also lies inside `self`.
    pub fn contains(&self, other: &IpPrefix) -> bool {
        other.length >= self.length && self.matches(&other.prefix)
    }
}

impl From<IpAddress> for IpPrefix {
    fn from(address: IpAddress) -> Self {
        Self::host(address)
    }
}

impl Ord for IpPrefix {
    /// IPv4 before IPv6, then by base address, then shorter prefixes first.
    fn cmp(&self, other: &Self) -> Ordering {
        let family = |p: &IpPrefix| p.prefix.is_ipv6();
        family(self)
            .cmp(&family(other))
            .then_with(|| self.prefix.cmp(&other.prefix))
            .then_with(|| self.length.cmp(&other.length))
    }
}

impl PartialOrd for IpPrefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for IpPrefix {
    type Err = WifError;

    /// Accepts `addr/len` or a bare address.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((address, length)) => {
                let length: u8 = length.trim().parse().map_err(|_| {
                    WifError::InvalidArgument(format!("invalid prefix length: {}", length))
                })?;
                Self::new(address.trim().parse()?, length)
            }
            None => Ok(Self::host(s.trim().parse()?)),
        }
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.length)
    }
}

impl Serialize for IpPrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpPrefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
