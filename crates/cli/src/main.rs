//! rulesync command-line interface
//!
//! Converges identity-provider mapping rules onto a declared enabled order
//! and disabled set, and offers read-only inspection and per-rule commands.
//!
//! Results are written to stdout as JSON; logs go to stderr.

#![allow(clippy::print_stdout)]

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod logging;

/// Keep mapping rules and their evaluation order in sync
#[derive(Parser, Debug)]
#[command(name = "rulesync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (JSON or TOML); defaults to RULESYNC_* variables, then
    /// the standard config locations
    #[arg(long, global = true, env = "RULESYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Converge the remote onto a desired-state file and record the result
    Reconcile {
        /// Desired state file with `enabled` and `disabled` id lists
        #[arg(long)]
        desired: PathBuf,
    },

    /// Read the remote order without changing anything and report anomalies
    Refresh,

    /// Single mapping rule operations
    #[command(subcommand)]
    Rule(RuleCommand),
}

#[derive(Subcommand, Debug)]
enum RuleCommand {
    /// Print a mapping rule
    Get { id: i64 },

    /// Delete a mapping rule; succeeds if it is already gone
    Delete { id: i64 },
}

/// Run `load_env` and then parse `args`, so `.env` can supply
/// `RULESYNC_CONFIG` and the other `env`-backed flags.
fn parse_args<I, T>(
    load_env: impl FnOnce() -> dotenvy::Result<PathBuf>,
    args: I,
) -> (Cli, dotenvy::Result<PathBuf>)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let dotenv = load_env();
    (Cli::parse_from(args), dotenv)
}

#[tokio::main]
async fn main() -> ExitCode {
    let (cli, dotenv) = parse_args(dotenvy::dotenv, std::env::args_os());

    logging::init(cli.json_logs);
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env loaded"),
    }

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "rulesync failed");
            ExitCode::FAILURE
        }
    }
}
