#![cfg(test)]
use async_trait::async_trait;
use netscan_common::network::interface::{FixedAddressProvider, LocalAddressProvider};
use netscan_common::{derive_subnet, PortRange, ScanConfig, ScanError};
use netscan_core::{scan_subnet, PortProber, SubnetScanner};
use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Answers "open" for a fixed set of addresses and counts every attempt.
struct FakeNetwork {
    open: HashSet<SocketAddrV4>,
    probes: AtomicUsize,
}

impl FakeNetwork {
    fn with_open(open: &[SocketAddrV4]) -> Self {
        Self {
            open: open.iter().copied().collect(),
            probes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PortProber for FakeNetwork {
    async fn probe(
        &self,
        target: SocketAddrV4,
        _dial_timeout: Duration,
        _cancel: &CancellationToken,
    ) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.open.contains(&target)
    }
}

struct Shared(Arc<FakeNetwork>);

#[async_trait]
impl PortProber for Shared {
    async fn probe(
        &self,
        target: SocketAddrV4,
        dial_timeout: Duration,
        cancel: &CancellationToken,
    ) -> bool {
        self.0.probe(target, dial_timeout, cancel).await
    }
}

/// A whole /24 with two listening hosts comes back with exactly those two.
#[tokio::test]
async fn finds_listening_hosts_in_a_class_c() {
    let first = Ipv4Addr::new(192, 168, 1, 5);
    let second = Ipv4Addr::new(192, 168, 1, 10);
    let network = Arc::new(FakeNetwork::with_open(&[
        SocketAddrV4::new(first, 80),
        SocketAddrV4::new(second, 80),
    ]));

    let config = ScanConfig::new("192.168.1.0/24", PortRange::single(80).unwrap())
        .with_concurrency(16)
        .with_dial_timeout(Duration::from_millis(50));
    let result = SubnetScanner::with_prober(Shared(network.clone()))
        .scan(&config)
        .await
        .expect("scan of a valid subnet must succeed");

    assert_eq!(result.sorted(), vec![first, second]);
    assert_eq!(
        result.addresses().len(),
        2,
        "duplicates in result: {:?}",
        result.hosts
    );
    assert!(!result.cancelled);
    assert_eq!(network.probes.load(Ordering::SeqCst), 254);
}

/// A host is reported once no matter how many of its ports are open.
#[tokio::test]
async fn multiple_open_ports_report_the_host_once() {
    let host = Ipv4Addr::new(10, 1, 2, 3);
    let network = FakeNetwork::with_open(&[
        SocketAddrV4::new(host, 22),
        SocketAddrV4::new(host, 80),
        SocketAddrV4::new(host, 443),
    ]);

    let config = ScanConfig::new("10.1.2.0/29", PortRange::new(1, 1024).unwrap());
    let result = SubnetScanner::with_prober(network)
        .scan(&config)
        .await
        .unwrap();

    assert_eq!(result.hosts, vec![host]);
}

#[tokio::test]
async fn rejects_a_malformed_subnet() {
    let config = ScanConfig::new("192.168.1.0", PortRange::default());
    let result = SubnetScanner::with_prober(FakeNetwork::with_open(&[]))
        .scan(&config)
        .await;

    assert!(
        matches!(result, Err(ScanError::InvalidSubnet { .. })),
        "unexpected result: {result:?}"
    );
}

/// The address detected on the machine turns into a subnet the scanner accepts.
#[tokio::test]
async fn detected_address_feeds_the_scanner() {
    let provider = FixedAddressProvider(Ipv4Addr::new(192, 168, 50, 77));
    let seed = provider.detect().unwrap();
    let subnet = derive_subnet(&seed.to_string()).unwrap();
    assert_eq!(subnet.to_string(), "192.168.50.0/24");

    let target = SocketAddrV4::new(seed, 8080);
    let config = ScanConfig::new(subnet.to_string(), PortRange::new(8000, 8100).unwrap());
    let result = SubnetScanner::with_prober(FakeNetwork::with_open(&[target]))
        .scan(&config)
        .await
        .unwrap();

    assert_eq!(result.addresses(), vec!["192.168.50.77".to_string()]);
}

/// Real sockets: a listener on loopback is picked up through the default prober.
#[tokio::test]
async fn scan_single_loopback() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let accept = tokio::spawn(async move {
        loop {
            if listener.accept().await.is_err() {
                break;
            }
        }
    });

    let config = ScanConfig::new("127.0.0.1/32", PortRange::single(port).unwrap())
        .with_dial_timeout(Duration::from_millis(500));
    let result = scan_subnet(&config).await;
    accept.abort();

    let result = result.expect("loopback scan failed");
    assert_eq!(result.hosts, vec![Ipv4Addr::LOCALHOST]);
}

#[tokio::test]
async fn scan_loopback_range() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let accept = tokio::spawn(async move {
        loop {
            if listener.accept().await.is_err() {
                break;
            }
        }
    });

    let config = ScanConfig::new("127.0.0.0/30", PortRange::single(port).unwrap())
        .with_dial_timeout(Duration::from_millis(300));
    let result = scan_subnet(&config).await;
    accept.abort();

    let result = result.expect("loopback scan failed");
    assert_eq!(
        result.hosts,
        vec![Ipv4Addr::LOCALHOST],
        "only the bound address should answer"
    );
}

#[tokio::test]
async fn closed_loopback_port_finds_nothing() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ScanConfig::new("127.0.0.1/32", PortRange::single(port).unwrap())
        .with_dial_timeout(Duration::from_millis(300));
    let result = scan_subnet(&config).await.unwrap();

    assert!(result.is_empty());
    assert!(!result.cancelled);
}
