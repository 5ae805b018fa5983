//! The central **abstraction** for scanning.
//!
//! [`PortProber`] is the seam between the scanning logic and the network: the
//! [`host`] scanner walks a port range through it and the [`subnet`] scanner
//! fans host scans out across a CIDR block. Production code plugs in
//! [`TcpProber`]; tests plug in probers that never touch a socket.

use std::net::SocketAddrV4;
use std::time::Duration;

use async_trait::async_trait;
use netscan_common::{ScanConfig, ScanError, ScanResult};
use tokio_util::sync::CancellationToken;

use crate::network::tcp::TcpProber;

mod host;
mod subnet;

pub use host::{HostOutcome, scan_host};
pub use subnet::SubnetScanner;

/// Decides whether a single `(host, port)` pair is open.
#[async_trait]
pub trait PortProber: Send + Sync {
    /// Makes one attempt, bounded by `dial_timeout` and by `cancel`.
    ///
    /// Any failure (refused, unreachable, timed out, cancelled) is `false`.
    async fn probe(
        &self,
        target: SocketAddrV4,
        dial_timeout: Duration,
        cancel: &CancellationToken,
    ) -> bool;
}

/// Scans `config.subnet` with real TCP connections.
pub async fn scan_subnet(config: &ScanConfig) -> Result<ScanResult, ScanError> {
    SubnetScanner::with_prober(TcpProber).scan(config).await
}
