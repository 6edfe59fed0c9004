//! modsweep: concurrent serial-number inventory sweep for network devices
//!
//! Connects to every host in a roster over SSH, runs one diagnostic command
//! per device, parses the output, and prints a JSON report followed by a
//! CSV table.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use modsweep_exec::executor::ExecOptions;
use modsweep_exec::ssh::SshSessionFactory;
use modsweep_exec::traits::Credentials;
use modsweep_inventory::collector::{CollectOptions, Collector};
use modsweep_inventory::report::render;

mod roster;

#[derive(Parser)]
#[command(name = "modsweep")]
#[command(about = "Collect module inventory from a fleet of network devices over SSH")]
struct Cli {
    /// Roster file: one host per line, `#` comments allowed
    #[arg(short, long, default_value = "devices.txt")]
    roster: PathBuf,

    /// Diagnostic command sent verbatim to every device
    #[arg(short, long, default_value = "show module")]
    command: String,

    /// Maximum number of hosts processed in parallel
    #[arg(long, default_value_t = 20)]
    max_concurrency: usize,

    /// SSH username (prompted when omitted)
    #[arg(short, long)]
    username: Option<String>,

    /// SSH port
    #[arg(long, default_value_t = 22)]
    port: u16,

    /// Seconds allowed for connect and authentication
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,

    /// Seconds of output silence that end a read
    #[arg(long, default_value_t = 2)]
    idle_window: u64,

    /// Hard per-host ceiling in seconds for reading output
    #[arg(long, default_value_t = 30)]
    read_ceiling: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modsweep=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Roster problems abort before any connection attempt
    let hosts = roster::load_roster(&cli.roster)?;

    let username = match cli.username {
        Some(username) => username,
        None => inquire::Text::new("SSH username:").prompt()?,
    };
    let secret = inquire::Password::new("SSH password:")
        .without_confirmation()
        .prompt()?;
    let credentials = Credentials::new(username, secret);

    let options = CollectOptions {
        command: cli.command,
        max_concurrency: cli.max_concurrency,
        exec: ExecOptions {
            connect_timeout: Duration::from_secs(cli.connect_timeout),
            idle_window: Duration::from_secs(cli.idle_window),
            read_ceiling: Duration::from_secs(cli.read_ceiling),
        },
    };

    let factory = Arc::new(SshSessionFactory::new(cli.port));
    let collector = Collector::new(factory, options);

    let report = collector.collect(&hosts, &credentials).await;
    let rendered = render(&report)?;

    println!("{}", rendered.json);
    println!();
    println!("{}", rendered.csv);

    Ok(())
}
