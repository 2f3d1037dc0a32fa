//! # rmt CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rmt_cli::capacity::{run_capacity, CapacityArgs};
use rmt_cli::commit::{run_commit, CommitArgs};
use rmt_cli::init::{run_init, InitArgs};
use rmt_cli::prove::{run_prove, ProveArgs};
use rmt_cli::receipt::{run_receipt, ReceiptArgs};
use rmt_cli::tree::{run_tree, TreeArgs};
use rmt_cli::verify::{run_verify, VerifyArgs};
use rmt_cli::StateDir;

/// Receipt Merkle tree operator tool.
///
/// Commits ledger receipts into capacity-bounded Merkle snapshots and
/// produces inclusion proofs against ad-hoc ranges or committed snapshots.
#[derive(Parser, Debug)]
#[command(name = "rmt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Directory holding config.yaml, ledger.json and snapshots.json.
    #[arg(long, global = true, default_value = ".rmt")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the state directory.
    Init(InitArgs),

    /// Add or show ledger receipts.
    Receipt(ReceiptArgs),

    /// Commit pending receipts into snapshots.
    Commit(CommitArgs),

    /// Show or change the batch capacity.
    Capacity(CapacityArgs),

    /// Range trees, committed snapshots, and batch-by-total lookups.
    Tree(TreeArgs),

    /// Inclusion proofs.
    Prove(ProveArgs),

    /// Verify a proof offline.
    Verify(VerifyArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let state = StateDir::new(&cli.state_dir);
    tracing::debug!(state_dir = %state.root().display(), "rmt starting");

    let result = match &cli.command {
        Commands::Init(args) => run_init(args, &state),
        Commands::Receipt(args) => run_receipt(args, &state),
        Commands::Commit(args) => run_commit(args, &state),
        Commands::Capacity(args) => run_capacity(args, &state),
        Commands::Tree(args) => run_tree(args, &state),
        Commands::Prove(args) => run_prove(args, &state),
        Commands::Verify(args) => run_verify(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
