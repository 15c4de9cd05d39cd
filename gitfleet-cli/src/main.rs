//! gitfleet: keep a directory of git clones in step with a GitHub account.
//!
//! # Usage
//!
//! ```text
//! gitfleet github <org|user> <dir> [--include RE] [--exclude RE] [--archive-dir PATH] [-s QUERY]
//! gitfleet local <dir>
//! gitfleet version
//!
//! global: [-n|--dry-run] [-v|--verbose] [--parallelism N] [--sync-command CMD] [--json]
//! ```

mod commands;
mod logging;
mod observer;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{github::GithubArgs, local::LocalArgs, GlobalArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gitfleet",
    version,
    about = "Sync, clone and archive every repository of a GitHub user or organisation",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile a directory with the repositories of a GitHub user or organisation.
    Github(GithubArgs),

    /// Sync every git repository found in a directory.
    Local(LocalArgs),

    /// Print the gitfleet version.
    Version,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.global.verbose);
    match cli.command {
        Commands::Github(args) => args.run(&cli.global),
        Commands::Local(args) => args.run(&cli.global),
        Commands::Version => {
            println!("gitfleet {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
