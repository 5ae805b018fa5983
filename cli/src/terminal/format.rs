use std::net::Ipv4Addr;
use std::time::Duration;

/// Hosts are shown as URLs so they can be opened straight from the terminal.
/// Nothing beyond TCP reachability was checked.
pub fn host_url(addr: Ipv4Addr) -> String {
    format!("http://{addr}")
}

pub fn host_count(count: usize) -> String {
    match count {
        1 => "1 live host".to_string(),
        n => format!("{n} live hosts"),
    }
}

pub fn elapsed(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
