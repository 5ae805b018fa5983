//! # Subnet Model
//!
//! A [`Subnet`] is an IPv4 block in CIDR form whose network address always has
//! its host bits zeroed.
//!
//! [`derive_subnet`] guesses the block a host lives in from its address alone.
//! The guess is a **heuristic** based on the well-known private ranges: it does
//! not consult the interface's real netmask, and every address outside those
//! ranges (public ones included) is assumed to sit in a /24.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use tracing::warn;

use crate::error::SubnetError;
use crate::network::range::Ipv4Range;

const DEFAULT_PREFIX: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    /// Builds the block of `prefix` bits containing `addr`, masking off host bits.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, SubnetError> {
        if prefix > 32 {
            return Err(SubnetError::InvalidPrefix(prefix.to_string()));
        }

        let network = Ipv4Addr::from(u32::from(addr) & netmask(prefix));
        Ok(Self { network, prefix })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> Ipv4Addr {
        Ipv4Addr::from(netmask(self.prefix))
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network) | !netmask(self.prefix))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & netmask(self.prefix) == u32::from(self.network)
    }

    /// The addresses worth probing.
    ///
    /// The network and broadcast addresses of the block are left out. /31 and
    /// /32 blocks have neither, so every address in them is returned.
    pub fn hosts(&self) -> Ipv4Range {
        let network: u32 = self.network.into();
        let broadcast: u32 = self.broadcast().into();

        if self.prefix >= 31 {
            return Ipv4Range::new(network.into(), broadcast.into());
        }

        Ipv4Range::new((network + 1).into(), (broadcast - 1).into())
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    /// Parses CIDR notation like "192.168.1.0/24".
    ///
    /// Host bits in the address part are accepted and masked off, so
    /// "192.168.1.77/24" yields 192.168.1.0/24.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((ip_str, prefix_str)) = s.split_once('/') else {
            return Err(SubnetError::MissingPrefix(s.to_string()));
        };

        let addr = ip_str
            .parse::<Ipv4Addr>()
            .map_err(|source| SubnetError::InvalidAddress {
                input: ip_str.to_string(),
                source,
            })?;

        let prefix = prefix_str
            .parse::<u8>()
            .map_err(|_| SubnetError::InvalidPrefix(prefix_str.to_string()))?;

        Subnet::new(addr, prefix)
    }
}

/// Derives the subnet of `address` in CIDR form.
///
/// Returns `None` when the input is not an IP address or cannot be expressed
/// in 4 bytes. IPv4-mapped IPv6 text such as `::ffff:10.0.0.1` is treated as
/// the IPv4 address it carries.
pub fn derive_subnet(address: &str) -> Option<Subnet> {
    let ipv4: Ipv4Addr = match address.parse::<IpAddr>() {
        Ok(IpAddr::V4(ipv4)) => ipv4,
        Ok(IpAddr::V6(ipv6)) => match ipv6.to_ipv4_mapped() {
            Some(ipv4) => ipv4,
            None => {
                warn!("Unsupported IP version for: {address}");
                return None;
            }
        },
        Err(_) => {
            warn!("Invalid IP address: {address}");
            return None;
        }
    };

    Subnet::new(ipv4, heuristic_prefix(ipv4)).ok()
}

/// Picks a prefix length from the first two octets.
pub fn heuristic_prefix(addr: Ipv4Addr) -> u8 {
    match addr.octets() {
        [10, ..] => 8,
        [172, 16..=31, ..] => 16,
        [192, 168, ..] => 24,
        _ => DEFAULT_PREFIX,
    }
}

fn netmask(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
