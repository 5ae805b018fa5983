use std::time::Duration;

use netscan_common::network::interface::{InterfaceAddressProvider, LocalAddressProvider};
use netscan_common::{ConfigError, PortRange, ScanConfig, ScanResult, derive_subnet};
use netscan_core::SubnetScanner;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::commands::CommandLine;
use crate::terminal::{print, spinner};

pub async fn scan(args: &CommandLine) -> anyhow::Result<()> {
    let config = build_config(args, &InterfaceAddressProvider)?;
    let quiet = args.quiet;

    print::header("scanning the subnet for open ports", quiet);
    print::aligned_line("Subnet", config.subnet.as_str(), quiet);
    print::aligned_line("Ports", config.ports.to_string(), quiet);
    print::aligned_line("Timeout", format!("{}ms", config.dial_timeout.as_millis()), quiet);
    print::aligned_line("Deadline", format!("{}s", config.deadline.as_secs()), quiet);
    print::aligned_line("Concurrency", config.concurrency.to_string(), quiet);

    let cancel = CancellationToken::new();
    let interrupt = spawn_interrupt_handler(cancel.clone());

    let span = info_span!("scan", indicatif.pb_show = true);
    span.pb_set_style(&spinner::scan_style());
    span.pb_set_message("Scanning the subnet for open ports...");

    let scanner = SubnetScanner::new().on_host_found(spinner::report_discovery_progress);
    let result = scanner
        .scan_with_cancel(&config, &cancel)
        .instrument(span)
        .await;
    interrupt.abort();

    scan_ends(&result?, quiet);
    Ok(())
}

/// Turns raw flags into a validated configuration. Nothing is probed if this
/// fails.
fn build_config(
    args: &CommandLine,
    provider: &impl LocalAddressProvider,
) -> Result<ScanConfig, ConfigError> {
    let ports = PortRange::new(args.start_port, args.end_port)?;
    let seed = resolve_seed(args.ip.as_deref(), provider)?;
    let subnet = derive_subnet(&seed).ok_or(ConfigError::UnderivableSubnet(seed))?;

    let config = ScanConfig::new(subnet.to_string(), ports)
        .with_dial_timeout(Duration::from_millis(args.timeout))
        .with_deadline(Duration::from_secs(args.deadline))
        .with_concurrency(args.concurrency);
    config.validate()?;

    Ok(config)
}

fn resolve_seed(
    ip: Option<&str>,
    provider: &impl LocalAddressProvider,
) -> Result<String, ConfigError> {
    match ip {
        Some(ip) if !ip.is_empty() => Ok(ip.to_string()),
        _ => provider
            .detect()
            .map(|addr| addr.to_string())
            .ok_or(ConfigError::NoLocalAddress),
    }
}

fn spawn_interrupt_handler(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with the hosts found so far");
            cancel.cancel();
        }
    })
}

fn scan_ends(result: &ScanResult, quiet: bool) {
    if result.is_empty() {
        print::no_results(quiet);
    } else {
        print::hosts_title(quiet);
        for addr in result.sorted() {
            print::host_line(addr);
        }
    }

    if result.cancelled {
        warn!("Scan stopped early; hosts that were never probed are not listed");
    }

    print::summary(result.len(), result.elapsed, quiet);
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
