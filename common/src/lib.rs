//! Shared data model for netscan: subnets, port ranges, scan configuration,
//! scan results and the error types that cross crate boundaries.

pub mod config;
pub mod error;
pub mod network;
pub mod result;
pub mod utils;

pub use config::{PortRange, ScanConfig};
pub use error::{ConfigError, ScanError, SubnetError};
pub use network::subnet::{Subnet, derive_subnet};
pub use result::ScanResult;
