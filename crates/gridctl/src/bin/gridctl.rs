use std::process;

use anyhow::Result;
use clap::Parser;
use gridctl::cli::Cli;
use gridctl::{HttpRegistryClient, ReconcileReport, Reconciler};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let pretty = cli.pretty;

    match run(cli, pretty).await {
        Ok(report) => {
            // failed=true means per-server faults; distinguish from fatal
            // errors so callers can tell partial failure from no result.
            process::exit(if report.failed { 2 } else { 0 });
        }
        Err(err) => {
            eprintln!("gridctl: {err:#}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli, pretty: bool) -> Result<ReconcileReport> {
    let request = cli.into_request()?;

    let client = HttpRegistryClient::new(request.locator());
    let reconciler = Reconciler::new(client);
    let report = reconciler.reconcile(&request).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(report)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).compact().init();
}
