use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use netscan_common::PortRange;
use tokio_util::sync::CancellationToken;

use super::PortProber;

/// What a single host scan concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostOutcome {
    pub addr: Ipv4Addr,
    /// The first port that accepted a connection.
    pub open_port: Option<u16>,
}

impl HostOutcome {
    pub fn not_found(addr: Ipv4Addr) -> Self {
        Self {
            addr,
            open_port: None,
        }
    }

    pub fn found(&self) -> bool {
        self.open_port.is_some()
    }
}

/// Answers "is this host alive" by walking `ports` upward and stopping at the
/// first open one.
///
/// The token is checked before every probe. Once it is cancelled the host is
/// reported as not found, even if a later port would have answered.
pub async fn scan_host<P>(
    prober: &P,
    addr: Ipv4Addr,
    ports: PortRange,
    dial_timeout: Duration,
    cancel: &CancellationToken,
) -> HostOutcome
where
    P: PortProber + ?Sized,
{
    for port in ports.iter() {
        if cancel.is_cancelled() {
            return HostOutcome::not_found(addr);
        }

        if prober.probe(SocketAddrV4::new(addr, port), dial_timeout, cancel).await {
            return HostOutcome {
                addr,
                open_port: Some(port),
            };
        }
    }

    HostOutcome::not_found(addr)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
