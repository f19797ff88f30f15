use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use gridctl_config::{ConfigError, ReconcileRequest, RunTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Started,
    Stopped,
}

impl From<StateArg> for RunTarget {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Started => RunTarget::Started,
            StateArg::Stopped => RunTarget::Stopped,
        }
    }
}

/// Start, stop, enable, and disable servers managed by a grid registry.
#[derive(Debug, Parser)]
#[command(name = "gridctl", version, about)]
pub struct Cli {
    /// Registry admin gateway URL. Required unless --config supplies
    /// registry.locator.
    #[arg(long)]
    pub locator: Option<String>,

    /// Client configuration file (key = value) supplying the locator and,
    /// optionally, credentials.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server to act on; repeatable. All servers known to the registry are
    /// targeted when none are given.
    #[arg(long = "server", value_name = "NAME")]
    pub servers: Vec<String>,

    /// Desired run state.
    #[arg(long, value_enum)]
    pub state: Option<StateArg>,

    /// Desired enabled flag.
    #[arg(long, value_name = "BOOL")]
    pub enabled: Option<bool>,

    /// Treat named servers missing from the registry as no-ops instead of
    /// failures.
    #[arg(long)]
    pub skip: bool,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Per-call timeout against the registry, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub call_timeout: u64,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn into_request(self) -> Result<ReconcileRequest, ConfigError> {
        let mut builder = ReconcileRequest::builder()
            .servers(self.servers)
            .skip_missing(self.skip)
            .call_timeout(Duration::from_secs(self.call_timeout));

        if let Some(state) = self.state {
            builder = builder.state(state.into());
        }
        if let Some(enabled) = self.enabled {
            builder = builder.enabled(enabled);
        }
        if let Some(locator) = self.locator {
            builder = builder.locator(locator);
        }
        if let Some(config) = self.config {
            builder = builder.config(config);
        }
        if let Some(username) = self.username {
            builder = builder.username(username);
        }
        if let Some(password) = self.password {
            builder = builder.password(password);
        }

        builder.build()
    }
}
