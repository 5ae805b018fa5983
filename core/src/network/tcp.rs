use std::net::SocketAddrV4;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::scanner::PortProber;

/// Full TCP handshake prober.
///
/// A port counts as open only once the connection is established. The stream
/// is closed straight away without sending anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProber;

#[async_trait]
impl PortProber for TcpProber {
    async fn probe(
        &self,
        target: SocketAddrV4,
        dial_timeout: Duration,
        cancel: &CancellationToken,
    ) -> bool {
        let connect = timeout(dial_timeout, TcpStream::connect(target));

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                trace!(%target, "Probe cancelled");
                false
            }

            attempt = connect => match attempt {
                Ok(Ok(stream)) => {
                    debug!(%target, "Port open");
                    drop(stream);
                    true
                }
                Ok(Err(e)) => {
                    trace!(%target, error = %e, "Connection failed");
                    false
                }
                Err(_elapsed) => {
                    trace!(%target, "Connection timed out");
                    false
                }
            },
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::time::Instant;
    use tokio::net::TcpListener;

    const DIAL: Duration = Duration::from_millis(500);

    async fn listener() -> (TcpListener, SocketAddrV4) {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let SocketAddr::V4(addr) = listener.local_addr().unwrap() else {
            unreachable!("bound to an IPv4 address");
        };
        (listener, addr)
    }

    #[tokio::test]
    async fn probe_should_find_listening_port() {
        let (_listener, addr) = listener().await;
        let cancel = CancellationToken::new();
        assert!(TcpProber.probe(addr, DIAL, &cancel).await);
    }

    #[tokio::test]
    async fn probe_should_report_closed_port() {
        let (listener, addr) = listener().await;
        drop(listener);
        let cancel = CancellationToken::new();
        assert!(!TcpProber.probe(addr, DIAL, &cancel).await);
    }

    #[tokio::test]
    async fn probe_should_not_connect_once_cancelled() {
        let (_listener, addr) = listener().await;
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!TcpProber.probe(addr, DIAL, &cancel).await);
    }

    #[tokio::test]
    #[ignore]
    async fn probe_should_timeout_on_unreachable_ip() {
        let target = SocketAddrV4::new(Ipv4Addr::new(203, 0, 113, 1), 80);
        let cancel = CancellationToken::new();
        let started = Instant::now();
        assert!(!TcpProber.probe(target, Duration::from_millis(200), &cancel).await);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
