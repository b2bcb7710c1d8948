//! PhotoJobs — roster-driven photo job tooling.
//!
//! # Usage
//!
//! ```text
//! photojobs csvgen   --csv <roster> --jobname <job> [--team-field Team] [--outdir <dir>] [--batch-suffixes JS10:_a,...]
//! photojobs rename   --root <dir> --plan <plan> [--mode copy|move]
//! photojobs teams    --csv <table> --root <dir> [--group-by person|person-team] [--default-team <team>] [--batches all|JS10,...]
//! photojobs keywords --csv <table> --root <dir> [--manual <keyword>]
//! photojobs verify   --root <dir> [--out <dir>]
//! photojobs scale    --root <dir> --size <px>
//! ```
//!
//! Global flags: `--config <yaml>`, `--non-interactive`, `--json`, `--verbose`.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    csvgen::CsvgenArgs, keywords::KeywordsArgs, rename::RenameArgs, scale::ScaleArgs,
    teams::TeamsArgs, verify::VerifyArgs, RunContext,
};
use photojobs_core::config;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "photojobs",
    version,
    about = "Match rosters to photo files: generate tables, rename, tag, sort and scale",
    long_about = None,
)]
struct Cli {
    /// YAML job config (default: <config dir>/photojobs/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never prompt; unanswered questions become errors.
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Print the run report as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Log resolution details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag resolved photos with each person's name into <root>_keywords.
    Keywords(KeywordsArgs),

    /// Check every photo has a tagged copy in the keyword output.
    Verify(VerifyArgs),

    /// Expand a roster into JPG/PNG/ALL tables and a rename plan.
    Csvgen(CsvgenArgs),

    /// Copy or move photos to the names in a rename plan.
    Rename(RenameArgs),

    /// Copy each person's first photo into a folder per team.
    Teams(TeamsArgs),

    /// Resize images so the long side matches a target size.
    Scale(ScaleArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let job = match &cli.config {
        Some(path) => config::load_at(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => config::load().context("failed to load user config")?,
    };
    let ctx = RunContext {
        non_interactive: cli.non_interactive || job.non_interactive,
        json: cli.json,
        job,
    };

    match cli.command {
        Commands::Keywords(args) => args.run(&ctx),
        Commands::Verify(args) => args.run(&ctx),
        Commands::Csvgen(args) => args.run(&ctx),
        Commands::Rename(args) => args.run(&ctx),
        Commands::Teams(args) => args.run(&ctx),
        Commands::Scale(args) => args.run(&ctx),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
