pub mod scan;

use clap::Parser;
use netscan_common::config::{
    DEFAULT_CONCURRENCY, DEFAULT_DIAL_TIMEOUT, DEFAULT_END_PORT, DEFAULT_SCAN_DEADLINE,
    DEFAULT_START_PORT,
};

#[derive(Parser, Debug)]
#[command(name = "netscan", version)]
#[command(about = "Find live hosts on the local subnet by connecting to their TCP ports.")]
pub struct CommandLine {
    /// IP address to scan around (defaults to this machine's first IPv4 address)
    #[arg(long, value_name = "ADDR")]
    pub ip: Option<String>,

    /// Start port for scanning
    #[arg(long, value_name = "PORT", default_value_t = u32::from(DEFAULT_START_PORT))]
    pub start_port: u32,

    /// End port for scanning
    #[arg(long, value_name = "PORT", default_value_t = u32::from(DEFAULT_END_PORT))]
    pub end_port: u32,

    /// Timeout for each connection attempt, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DIAL_TIMEOUT.as_millis() as u64)]
    pub timeout: u64,

    /// Give up on the whole scan after this many seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_SCAN_DEADLINE.as_secs())]
    pub deadline: u64,

    /// Number of hosts probed at the same time
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Only print the hosts that were found
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
