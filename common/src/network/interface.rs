//! Local address detection.
//!
//! Only used when the operator does not name a target: the first IPv4 address
//! of the first usable interface becomes the seed for subnet derivation.

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use tracing::{debug, info, warn};

use crate::utils::interface::NetworkInterfaceExtension;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is administratively down.
    IsDown,
    /// The interface is the loopback device.
    IsLoopback,
}

/// Source of the address a scan is centred on when none is given.
pub trait LocalAddressProvider {
    fn detect(&self) -> Option<Ipv4Addr>;
}

/// Reads the interface list from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct InterfaceAddressProvider;

impl LocalAddressProvider for InterfaceAddressProvider {
    fn detect(&self) -> Option<Ipv4Addr> {
        let interfaces: Vec<NetworkInterface> = datalink::interfaces();
        debug!("Identified {} network interface(s)", interfaces.len());

        let detected = first_local_ipv4(&interfaces);
        match detected {
            Some(addr) => info!("Detected local IP: {addr}"),
            None => warn!("No up, non-loopback interface has an IPv4 address"),
        }
        detected
    }
}

/// Always answers with the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAddressProvider(pub Ipv4Addr);

impl LocalAddressProvider for FixedAddressProvider {
    fn detect(&self) -> Option<Ipv4Addr> {
        Some(self.0)
    }
}

/// Shorthand for [`InterfaceAddressProvider::detect`].
pub fn detect_local_ip() -> Option<Ipv4Addr> {
    InterfaceAddressProvider.detect()
}

/// First IPv4 address of the first viable interface, in the order given.
pub fn first_local_ipv4(interfaces: &[NetworkInterface]) -> Option<Ipv4Addr> {
    interfaces
        .iter()
        .filter(|interface| is_viable_interface(interface).is_ok())
        .find_map(|interface| interface.first_ipv4())
}

fn is_viable_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    Ok(())
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
    use crate::network::subnet::{Subnet, derive_subnet};
    use pnet::ipnetwork::IpNetwork;
    use pnet::util::MacAddr;

    const IFF_UP: u32 = 1;
    const IFF_BROADCAST: u32 = 1 << 1;
    const IFF_LOOPBACK: u32 = 1 << 3;

    fn create_mock_interface(name: &str, ips: Vec<IpNetwork>, flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: "An interface".to_string(),
            index: 0,
            mac: Some(MacAddr(0x1, 0x2, 0x3, 0x4, 0x5, 0x6)),
            ips,
            flags,
        }
    }

    fn net(s: &str) -> IpNetwork {
        s.parse().unwrap()
    }

    #[test]
    fn is_viable_interface_should_succeed() {
        let interface = create_mock_interface("eth0", vec![net("192.168.1.100/24")], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_interface(&interface), Ok(()));
    }

    #[test]
    fn is_viable_interface_should_fail_when_down() {
        let interface = create_mock_interface("eth0", vec![net("192.168.1.100/24")], IFF_BROADCAST);
        assert_eq!(is_viable_interface(&interface), Err(ViabilityError::IsDown));
    }

    #[test]
    fn is_viable_interface_should_fail_loop_back() {
        let interface = create_mock_interface("lo", vec![net("127.0.0.1/8")], IFF_UP | IFF_LOOPBACK);
        assert_eq!(is_viable_interface(&interface), Err(ViabilityError::IsLoopback));
    }

    #[test]
    fn first_local_ipv4_skips_loopback_and_down_interfaces() {
        let interfaces = vec![
            create_mock_interface("lo", vec![net("127.0.0.1/8")], IFF_UP | IFF_LOOPBACK),
            create_mock_interface("eth0", vec![net("10.1.1.1/8")], IFF_BROADCAST),
            create_mock_interface("wlan0", vec![net("192.168.1.42/24")], IFF_UP | IFF_BROADCAST),
        ];
        assert_eq!(first_local_ipv4(&interfaces), Some(Ipv4Addr::new(192, 168, 1, 42)));
    }

    #[test]
    fn first_local_ipv4_ignores_ipv6_addresses() {
        let interfaces = vec![create_mock_interface(
            "eth0",
            vec![net("fe80::1234:5678:abcd:ef01/64"), net("172.20.0.9/16")],
            IFF_UP | IFF_BROADCAST,
        )];
        assert_eq!(first_local_ipv4(&interfaces), Some(Ipv4Addr::new(172, 20, 0, 9)));
    }

    #[test]
    fn first_local_ipv4_keeps_interface_then_address_order() {
        let interfaces = vec![
            create_mock_interface("eth0", vec![net("fe80::1/64")], IFF_UP | IFF_BROADCAST),
            create_mock_interface(
                "eth1",
                vec![net("10.0.0.5/8"), net("10.0.0.6/8")],
                IFF_UP | IFF_BROADCAST,
            ),
            create_mock_interface("eth2", vec![net("192.168.0.2/24")], IFF_UP | IFF_BROADCAST),
        ];
        assert_eq!(first_local_ipv4(&interfaces), Some(Ipv4Addr::new(10, 0, 0, 5)));
    }

    #[test]
    fn first_local_ipv4_returns_none_without_candidates() {
        let interfaces = vec![
            create_mock_interface("lo", vec![net("127.0.0.1/8")], IFF_UP | IFF_LOOPBACK),
            create_mock_interface("eth0", vec![net("fe80::1/64")], IFF_UP | IFF_BROADCAST),
        ];
        assert_eq!(first_local_ipv4(&interfaces), None);
        assert_eq!(first_local_ipv4(&[]), None);
    }

    #[test]
    fn fixed_provider_feeds_subnet_derivation() {
        let provider = FixedAddressProvider(Ipv4Addr::new(192, 168, 4, 20));
        let subnet = derive_subnet(&provider.detect().unwrap().to_string()).unwrap();
        assert_eq!(subnet.to_string(), "192.168.4.0/24");
    }

    #[test]
    #[ignore]
    fn detected_address_derives_a_parseable_subnet() {
        let Some(addr) = detect_local_ip() else {
            eprintln!("WARNING: no non-loopback IPv4 address on this machine");
            return;
        };
        let subnet = derive_subnet(&addr.to_string()).expect("detected address should derive");
        let reparsed: Subnet = subnet.to_string().parse().expect("derived CIDR should parse");
        assert_eq!(reparsed, subnet);
        assert!(reparsed.contains(addr));
    }
}
