use std::net::Ipv4Addr;
use std::time::Duration;

/// Hosts that answered on at least one port, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub hosts: Vec<Ipv4Addr>,
    pub elapsed: Duration,
    /// Set when the deadline or the caller stopped the scan early. A host that
    /// was never probed looks exactly like a closed one, so a cancelled result
    /// may be missing live hosts.
    pub cancelled: bool,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.hosts.contains(&addr)
    }

    /// Dotted-quad form of every live host.
    pub fn addresses(&self) -> Vec<String> {
        self.hosts.iter().map(Ipv4Addr::to_string).collect()
    }

    /// Hosts in ascending address order, for display.
    pub fn sorted(&self) -> Vec<Ipv4Addr> {
        let mut hosts = self.hosts.clone();
        hosts.sort_unstable();
        hosts
    }
}
