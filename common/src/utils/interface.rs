use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;

pub trait NetworkInterfaceExtension {
    /// First assigned IPv4 address, in the order the OS reported them.
    fn first_ipv4(&self) -> Option<Ipv4Addr>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn first_ipv4(&self) -> Option<Ipv4Addr> {
        self.ips.iter().find_map(|ip| match ip {
            IpNetwork::V4(ipv4) => Some(ipv4.ip()),
            IpNetwork::V6(_) => None,
        })
    }
}
