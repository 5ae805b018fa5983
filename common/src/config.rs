use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_START_PORT: u16 = 1;
pub const DEFAULT_END_PORT: u16 = 1024;
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_SCAN_DEADLINE: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CONCURRENCY: usize = 100;
/// Upper bound on simultaneous host scans. A /16 has fewer usable hosts.
pub const MAX_CONCURRENCY: usize = 65_535;

/// An inclusive, validated TCP port range. Always satisfies `1 <= start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Validates raw operator input.
    ///
    /// The bounds are taken as `u32` so that out-of-range input (0, 70000, ...)
    /// reaches this check instead of being truncated on the way in.
    pub fn new(start: u32, end: u32) -> Result<Self, ConfigError> {
        if !(1..=u16::MAX as u32).contains(&start) {
            return Err(ConfigError::StartPortOutOfRange(start));
        }
        if start > end {
            return Err(ConfigError::StartAfterEnd { start, end });
        }
        if end > u16::MAX as u32 {
            return Err(ConfigError::EndPortOutOfRange(end));
        }

        Ok(Self {
            start: start as u16,
            end: end as u16,
        })
    }

    pub fn single(port: u16) -> Result<Self, ConfigError> {
        Self::new(port.into(), port.into())
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Ports in strictly ascending order.
    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, port: u16) -> bool {
        self.iter().contains(&port)
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_PORT,
            end: DEFAULT_END_PORT,
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Everything one subnet scan needs. Immutable once the scan starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Target block in CIDR notation. Parsed by the scanner, so a malformed
    /// value is reported as a scan error rather than a configuration error.
    pub subnet: String,
    pub ports: PortRange,
    /// Upper bound on establishing a single TCP connection.
    pub dial_timeout: Duration,
    /// Upper bound on the whole scan. Once it elapses every in-flight host
    /// scan is cancelled and the hosts found so far are returned.
    pub deadline: Duration,
    /// Maximum number of hosts being probed at the same time.
    pub concurrency: usize,
}

impl ScanConfig {
    pub fn new(subnet: impl Into<String>, ports: PortRange) -> Self {
        Self {
            subnet: subnet.into(),
            ports,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            deadline: DEFAULT_SCAN_DEADLINE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Checks the settings the engine cannot work with. A zero timeout or
    /// deadline would report every host as closed instead of failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::ConcurrencyTooLarge {
                value: self.concurrency,
                max: MAX_CONCURRENCY,
            });
        }
        if self.dial_timeout.is_zero() {
            return Err(ConfigError::ZeroDialTimeout);
        }
        if self.deadline.is_zero() {
            return Err(ConfigError::ZeroDeadline);
        }
        Ok(())
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
