//! # mintgate CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mintgate_cli::allowlist::{run_allowlist, AllowlistArgs};
use mintgate_cli::collection::{run_admin, run_init, run_status, AdminArgs, InitArgs};
use mintgate_cli::mint::{run_item, run_mint, run_royalty, ItemArgs, MintArgs, RoyaltyArgs};

/// mintgate: capped issuance with an allowlisted presale.
///
/// Builds allowlist commitments and operates a collection stored in a local
/// snapshot file.
#[derive(Parser, Debug)]
#[command(name = "mintgate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Snapshot file holding the collection.
    #[arg(long, global = true, default_value = mintgate_cli::DEFAULT_STATE_PATH)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build, verify and extract allowlist proofs.
    Allowlist(AllowlistArgs),

    /// Create a collection from a YAML config.
    Init(InitArgs),

    /// Show the collection summary.
    Status,

    /// Owner operations: phase switches, reveal, airdrop, withdraw.
    Admin(AdminArgs),

    /// Issue items to an account.
    Mint(MintArgs),

    /// Query issued items.
    Item(ItemArgs),

    /// Quote the royalty owed on a sale.
    Royalty(RoyaltyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(state = %cli.state.display(), "mintgate CLI starting");

    let result = match &cli.command {
        Commands::Allowlist(args) => run_allowlist(args),
        Commands::Init(args) => run_init(args, &cli.state),
        Commands::Status => run_status(&cli.state),
        Commands::Admin(args) => run_admin(args, &cli.state),
        Commands::Mint(args) => run_mint(args, &cli.state),
        Commands::Item(args) => run_item(args, &cli.state),
        Commands::Royalty(args) => run_royalty(args, &cli.state),
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
