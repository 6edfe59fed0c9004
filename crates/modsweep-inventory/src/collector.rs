//! Bounded-concurrency collection sweep
//!
//! Spawns one task per host, limits how many run at once, and assembles the
//! per-host results as tasks finish. One host's failure or slowness never
//! blocks or cancels another host's task.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

use modsweep_exec::executor::{ExecOptions, run_device_command};
use modsweep_exec::traits::{Credentials, SessionFactory};

use crate::parser::parse_inventory;
use crate::types::{CollectionReport, HostResult};

/// Settings for one collection run
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Diagnostic command sent verbatim to every host
    pub command: String,
    /// Upper bound on simultaneously in-flight hosts
    pub max_concurrency: usize,
    /// Per-host session timing
    pub exec: ExecOptions,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            command: "show module".to_string(),
            max_concurrency: 20,
            exec: ExecOptions::default(),
        }
    }
}

/// Fleet-wide inventory collector
pub struct Collector {
    factory: Arc<dyn SessionFactory>,
    options: CollectOptions,
}

impl Collector {
    /// Create a collector over the given session factory
    pub fn new(factory: Arc<dyn SessionFactory>, options: CollectOptions) -> Self {
        Self { factory, options }
    }

    /// Sweep every host and return a total report
    ///
    /// The report has exactly one entry per input host: `Success` with the
    /// parsed items (possibly empty) or `Failure` with the captured error
    /// text. Results are consumed in completion order; duplicate roster
    /// entries collapse onto the same key.
    #[instrument(skip(self, hosts, credentials), fields(hosts = hosts.len()))]
    pub async fn collect(&self, hosts: &[String], credentials: &Credentials) -> CollectionReport {
        let mut report = CollectionReport::new();
        if hosts.is_empty() {
            return report;
        }

        let limit = self.options.max_concurrency.min(hosts.len()).max(1);
        let semaphore = Arc::new(Semaphore::new(limit));

        info!(
            limit = limit,
            command = %self.options.command,
            "starting collection sweep"
        );

        let mut tasks = JoinSet::new();
        for host in hosts {
            let host = host.clone();
            let factory = Arc::clone(&self.factory);
            let credentials = credentials.clone();
            let command = self.options.command.clone();
            let exec = self.options.exec.clone();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    // The semaphore outlives the sweep, so this only fires
                    // if the collector is torn down mid-run
                    Err(_) => return (host, HostResult::failure("collector shut down")),
                };

                let result = collect_one(factory.as_ref(), &host, &credentials, &command, &exec).await;
                (host, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((host, result)) => {
                    report.insert(host, result);
                }
                Err(e) => error!(error = %e, "collection task panicked"),
            }
        }

        // Totality: a panicked task must not leave its host out of the report
        for host in hosts {
            if !report.contains(host) {
                report.insert(host.clone(), HostResult::failure("collection task aborted"));
            }
        }

        let failures = report.iter().filter(|(_, r)| !r.is_success()).count();
        info!(
            hosts = report.len(),
            failures = failures,
            "collection sweep finished"
        );

        report
    }
}

/// Run the command on one host and fold every error into the result
async fn collect_one(
    factory: &dyn SessionFactory,
    host: &str,
    credentials: &Credentials,
    command: &str,
    exec: &ExecOptions,
) -> HostResult {
    match run_device_command(factory, host, credentials, command, exec).await {
        Ok(raw) => HostResult::Success(parse_inventory(&raw)),
        Err(e) => {
            warn!(host = %host, error = %e, "host collection failed");
            HostResult::failure(e.to_string())
        }
    }
}
