//! Bounded, deadline-limited sweep over every host of a CIDR block.
//!
//! One task is spawned per address, but only after it wins a slot from a
//! counting semaphore, so at most `concurrency` hosts are being probed at once.
//! Finished tasks hand their outcome back through the [`JoinSet`]; the
//! collector loop is the only place the result list is touched.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use netscan_common::{ScanConfig, ScanError, ScanResult, Subnet};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::host::{self, HostOutcome};
use super::PortProber;
use crate::network::tcp::TcpProber;

type HostFoundCallback = Box<dyn Fn(usize) + Send + Sync>;

pub struct SubnetScanner {
    prober: Arc<dyn PortProber>,
    on_host_found: Option<HostFoundCallback>,
}

impl Default for SubnetScanner {
    fn default() -> Self {
        Self::with_prober(TcpProber)
    }
}

impl SubnetScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prober(prober: impl PortProber + 'static) -> Self {
        Self {
            prober: Arc::new(prober),
            on_host_found: None,
        }
    }

    /// Called with the running number of live hosts each time one is found.
    pub fn on_host_found(mut self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_host_found = Some(Box::new(callback));
        self
    }

    pub async fn scan(&self, config: &ScanConfig) -> Result<ScanResult, ScanError> {
        self.scan_with_cancel(config, &CancellationToken::new()).await
    }

    /// Runs the scan until every host is done, `config.deadline` elapses or
    /// `parent` is cancelled, whichever comes first.
    ///
    /// Individual probe failures never surface here. The only errors are an
    /// unparseable subnet and an unusable configuration, both reported before
    /// anything is probed.
    pub async fn scan_with_cancel(
        &self,
        config: &ScanConfig,
        parent: &CancellationToken,
    ) -> Result<ScanResult, ScanError> {
        config.validate()?;
        let subnet: Subnet = config
            .subnet
            .parse()
            .map_err(|source| ScanError::InvalidSubnet {
                subnet: config.subnet.clone(),
                source,
            })?;

        let targets = subnet.hosts();
        info!(
            "Scanning {} hosts in {subnet} on ports {}",
            targets.len(),
            config.ports
        );

        let started = Instant::now();
        let cancel = parent.child_token();
        let deadline = spawn_deadline(cancel.clone(), config.deadline);
        let slots = Arc::new(Semaphore::new(config.concurrency));
        let mut tasks: JoinSet<HostOutcome> = JoinSet::new();
        let mut live: Vec<Ipv4Addr> = Vec::new();

        for addr in targets.to_iter() {
            let permit = tokio::select! {
                biased;

                _ = cancel.cancelled() => None,
                permit = Arc::clone(&slots).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                debug!("Scan cancelled, no further hosts dispatched");
                break;
            };

            trace!(%addr, "Dispatching host scan");
            let prober = Arc::clone(&self.prober);
            let cancel = cancel.clone();
            let ports = config.ports;
            let dial_timeout = config.dial_timeout;

            tasks.spawn(async move {
                let outcome =
                    host::scan_host(prober.as_ref(), addr, ports, dial_timeout, &cancel).await;
                drop(permit);
                outcome
            });

            while let Some(joined) = tasks.try_join_next() {
                self.record(joined, &mut live);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            self.record(joined, &mut live);
        }

        let cancelled = cancel.is_cancelled();
        deadline.abort();

        let elapsed = started.elapsed();
        info!(
            "Scan of {subnet} finished in {:.2}s with {} live host(s)",
            elapsed.as_secs_f64(),
            live.len()
        );

        Ok(ScanResult {
            hosts: live,
            elapsed,
            cancelled,
        })
    }

    fn record(&self, joined: Result<HostOutcome, JoinError>, live: &mut Vec<Ipv4Addr>) {
        match joined {
            Ok(outcome) => {
                let Some(port) = outcome.open_port else {
                    return;
                };
                debug!(addr = %outcome.addr, port, "Live host");
                live.push(outcome.addr);
                if let Some(callback) = &self.on_host_found {
                    callback(live.len());
                }
            }
            Err(e) => error!("Host scan task failed: {e}"),
        }
    }
}

/// Cancels `token` once `deadline` has passed.
fn spawn_deadline(token: CancellationToken, deadline: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(deadline) => {
                warn!(
                    "Scan deadline of {:.0}s reached, cancelling remaining probes",
                    deadline.as_secs_f64()
                );
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
