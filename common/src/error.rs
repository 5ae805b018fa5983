//! Error types shared by the engine and the command line.
//!
//! Only configuration problems and a malformed subnet are ever surfaced as
//! errors. Everything below the host-scan boundary degrades to "not found".

use std::net::AddrParseError;

use thiserror::Error;

/// Problems with operator-supplied settings, detected before any probing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port. Start port {0} is not in the range 1-65535")]
    StartPortOutOfRange(u32),

    #[error("Invalid port. Start port {start} is greater than end port {end}")]
    StartAfterEnd { start: u32, end: u32 },

    #[error("Invalid port. End port {0} is not in the range 1-65535")]
    EndPortOutOfRange(u32),

    #[error("Concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("Concurrency limit {value} is above the maximum of {max}")]
    ConcurrencyTooLarge { value: usize, max: usize },

    #[error("Connection timeout must be greater than zero")]
    ZeroDialTimeout,

    #[error("Scan deadline must be greater than zero")]
    ZeroDeadline,

    #[error("Failed to detect a non-loopback IPv4 address on this host")]
    NoLocalAddress,

    #[error("Failed to detect subnet from '{0}'")]
    UnderivableSubnet(String),
}

/// Reasons a CIDR string could not be turned into a [`Subnet`](crate::Subnet).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubnetError {
    #[error("missing '/prefix' in '{0}'")]
    MissingPrefix(String),

    #[error("invalid IPv4 address '{input}': {source}")]
    InvalidAddress {
        input: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid prefix length '{0}', expected 0-32")]
    InvalidPrefix(String),
}

/// The only failures a subnet scan reports to its caller.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid subnet format '{subnet}': {source}")]
    InvalidSubnet {
        subnet: String,
        #[source]
        source: SubnetError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
