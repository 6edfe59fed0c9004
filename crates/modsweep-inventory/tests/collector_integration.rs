use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use modsweep_exec::error::ExecError;
use modsweep_exec::executor::ExecOptions;
use modsweep_exec::traits::{Credentials, DeviceSession, SessionFactory};
use modsweep_inventory::collector::{CollectOptions, Collector};
use modsweep_inventory::types::HostResult;

const MODULE_TABLE: &str = "\
Mod Ports Model Serial
--------------------------------------
1    48    C9300-48UXM   FOC666Y4WY
";

/// How a simulated device behaves for one host
#[derive(Clone)]
enum Behavior {
    /// Shell answers the command with this output
    Respond(String),
    /// Shell stays silent forever; the read ceiling fires
    Silent,
    /// Connection refused before a session exists
    ConnectRefused,
    /// Credentials rejected
    AuthRejected,
}

/// Simulated device shell
///
/// Emits nothing until a command other than the paging toggle arrives,
/// then queues the echo and the scripted response. Once quiet, reads block
/// long enough for any idle window or ceiling to fire first.
struct MockSession {
    behavior: Behavior,
    pending: VecDeque<String>,
    open_count: Arc<AtomicUsize>,
}

#[async_trait]
impl DeviceSession for MockSession {
    async fn send_line(&mut self, line: &str) -> Result<(), ExecError> {
        if line == "terminal length 0" {
            return Ok(());
        }
        if let Behavior::Respond(output) = &self.behavior {
            self.pending.push_back(format!("{line}\r\n"));
            self.pending.push_back(output.clone());
        }
        Ok(())
    }

    async fn read_chunk(&mut self) -> Result<Option<String>, ExecError> {
        if let Some(chunk) = self.pending.pop_front() {
            return Ok(Some(chunk));
        }
        tokio::time::sleep(Duration::from_secs(86_400)).await;
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), ExecError> {
        self.open_count.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Factory mapping each host to a scripted behavior
struct MockFleet {
    behaviors: HashMap<String, Behavior>,
    open_count: Arc<AtomicUsize>,
    max_open: Arc<AtomicUsize>,
    total_opens: Arc<AtomicUsize>,
}

impl MockFleet {
    fn new(behaviors: Vec<(&str, Behavior)>) -> Self {
        Self {
            behaviors: behaviors
                .into_iter()
                .map(|(host, behavior)| (host.to_string(), behavior))
                .collect(),
            open_count: Arc::new(AtomicUsize::new(0)),
            max_open: Arc::new(AtomicUsize::new(0)),
            total_opens: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SessionFactory for MockFleet {
    async fn open(
        &self,
        host: &str,
        _credentials: &Credentials,
        _connect_timeout: Duration,
    ) -> Result<Box<dyn DeviceSession>, ExecError> {
        let behavior = self
            .behaviors
            .get(host)
            .cloned()
            .unwrap_or(Behavior::ConnectRefused);

        match behavior {
            Behavior::ConnectRefused => {
                Err(ExecError::ConnectionFailed("connection refused".to_string()))
            }
            Behavior::AuthRejected => Err(ExecError::AuthenticationFailed(
                "password rejected by device".to_string(),
            )),
            behavior => {
                self.total_opens.fetch_add(1, Ordering::SeqCst);
                let now_open = self.open_count.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_open.fetch_max(now_open, Ordering::SeqCst);
                Ok(Box::new(MockSession {
                    behavior,
                    pending: VecDeque::new(),
                    open_count: Arc::clone(&self.open_count),
                }))
            }
        }
    }
}

fn fast_options() -> CollectOptions {
    CollectOptions {
        command: "show module".to_string(),
        max_concurrency: 20,
        exec: ExecOptions {
            connect_timeout: Duration::from_secs(5),
            idle_window: Duration::from_secs(2),
            read_ceiling: Duration::from_secs(30),
        },
    }
}

fn hosts(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[tokio::test(start_paused = true)]
async fn test_report_is_total_across_mixed_outcomes() {
    let fleet = MockFleet::new(vec![
        ("good", Behavior::Respond(MODULE_TABLE.to_string())),
        ("quiet", Behavior::Respond("switch>\r\n".to_string())),
        ("dead", Behavior::ConnectRefused),
        ("locked", Behavior::AuthRejected),
        ("stuck", Behavior::Silent),
    ]);
    let collector = Collector::new(Arc::new(fleet), fast_options());
    let roster = hosts(&["good", "quiet", "dead", "locked", "stuck"]);

    let report = collector
        .collect(&roster, &Credentials::new("admin", "secret"))
        .await;

    assert_eq!(report.len(), 5);

    match report.get("good").unwrap() {
        HostResult::Success(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].serial, "FOC666Y4WY");
            assert_eq!(items[0].member, Some(1));
        }
        other => panic!("expected success, got {other:?}"),
    }

    // Reachable but no recognizable inventory: empty success, not failure
    assert_eq!(report.get("quiet").unwrap(), &HostResult::Success(vec![]));

    match report.get("dead").unwrap() {
        HostResult::Failure { error } => assert!(error.contains("connection failed")),
        other => panic!("expected failure, got {other:?}"),
    }
    match report.get("locked").unwrap() {
        HostResult::Failure { error } => assert!(error.contains("authentication failed")),
        other => panic!("expected failure, got {other:?}"),
    }
    match report.get("stuck").unwrap() {
        HostResult::Failure { error } => assert!(error.contains("no output received")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_host_does_not_affect_others() {
    let fleet = MockFleet::new(vec![
        ("stuck", Behavior::Silent),
        ("fast-1", Behavior::Respond(MODULE_TABLE.to_string())),
        ("fast-2", Behavior::Respond(MODULE_TABLE.to_string())),
    ]);
    let collector = Collector::new(Arc::new(fleet), fast_options());
    let roster = hosts(&["stuck", "fast-1", "fast-2"]);

    let report = collector
        .collect(&roster, &Credentials::new("admin", "secret"))
        .await;

    assert_eq!(report.len(), 3);
    assert!(report.get("fast-1").unwrap().is_success());
    assert!(report.get("fast-2").unwrap().is_success());
    assert!(!report.get("stuck").unwrap().is_success());
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_stays_within_bound() {
    let names: Vec<String> = (0..6).map(|i| format!("sw-{i}")).collect();
    let behaviors: Vec<(&str, Behavior)> = names
        .iter()
        .map(|name| (name.as_str(), Behavior::Respond(MODULE_TABLE.to_string())))
        .collect();
    let fleet = MockFleet::new(behaviors);
    let max_open = Arc::clone(&fleet.max_open);
    let total_opens = Arc::clone(&fleet.total_opens);

    let options = CollectOptions {
        max_concurrency: 2,
        ..fast_options()
    };
    let collector = Collector::new(Arc::new(fleet), options);

    let report = collector
        .collect(&names, &Credentials::new("admin", "secret"))
        .await;

    assert_eq!(report.len(), 6);
    assert_eq!(total_opens.load(Ordering::SeqCst), 6);
    assert!(max_open.load(Ordering::SeqCst) <= 2);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_roster_entries_collapse() {
    let fleet = MockFleet::new(vec![("sw-1", Behavior::Respond(MODULE_TABLE.to_string()))]);
    let collector = Collector::new(Arc::new(fleet), fast_options());
    let roster = hosts(&["sw-1", "sw-1"]);

    let report = collector
        .collect(&roster, &Credentials::new("admin", "secret"))
        .await;

    assert_eq!(report.len(), 1);
    assert!(report.get("sw-1").unwrap().is_success());
}

#[tokio::test]
async fn test_empty_host_list_yields_empty_report() {
    let fleet = MockFleet::new(vec![]);
    let collector = Collector::new(Arc::new(fleet), fast_options());

    let report = collector
        .collect(&[], &Credentials::new("admin", "secret"))
        .await;

    assert!(report.is_empty());
}
