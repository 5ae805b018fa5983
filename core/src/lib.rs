//! The netscan engine: TCP port probing, per-host scanning and the bounded,
//! deadline-limited subnet sweep built on top of them.

pub mod network;
pub mod scanner;

pub use scanner::{HostOutcome, PortProber, SubnetScanner, scan_subnet};
