pub mod csvgen;
pub mod keywords;
pub mod prompt;
pub mod rename;
pub mod scale;
pub mod teams;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use photojobs_core::JobConfig;
use photojobs_ops::{ItemOutcome, RunSummary};

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct RunContext {
    pub job: JobConfig,
    pub non_interactive: bool,
    pub json: bool,
}

/// Absolute form of a user-supplied path. `~` is not expanded.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("could not determine current directory")?
            .join(path)
    };
    Ok(std::fs::canonicalize(&absolute).unwrap_or(absolute))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// JSON shape shared by every subcommand.
#[derive(Serialize)]
pub struct RunJson<'a, T: Serialize> {
    pub command: &'static str,
    pub output: &'a Path,
    pub summary: &'a RunSummary,
    pub details: T,
    pub items: &'a [ItemOutcome],
}

pub fn print_json<T: Serialize>(payload: &RunJson<'_, T>) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).context("failed to serialize run report")?
    );
    Ok(())
}

/// One line per item, colored by outcome.
pub fn print_items(items: &[ItemOutcome]) {
    for item in items {
        let line = item.to_string();
        match item {
            ItemOutcome::Written { .. } | ItemOutcome::Verified { .. } => {
                println!("{} {line}", "✓".green())
            }
            ItemOutcome::Skipped { .. } => println!("{} {}", "–".bright_black(), line.bright_black()),
            ItemOutcome::Missing { .. } => println!("{} {}", "?".yellow(), line.yellow()),
            ItemOutcome::Failed { .. } => println!("{} {}", "✗".red(), line.red()),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "")]
    label: String,
    #[tabled(rename = "count")]
    value: String,
}

/// Summary table: the standard counters, then any command-specific rows.
pub fn print_summary(title: &str, output: &Path, summary: &RunSummary, extra: &[(&str, String)]) {
    println!();
    println!("{}", title.bold());
    let mut rows: Vec<SummaryRow> = extra
        .iter()
        .map(|(label, value)| SummaryRow {
            label: label.to_string(),
            value: value.clone(),
        })
        .collect();
    for (label, value) in [
        ("attempted", summary.attempted),
        ("succeeded", summary.succeeded),
        ("missing", summary.missing),
        ("errored", summary.errored),
        ("skipped", summary.skipped),
    ] {
        rows.push(SummaryRow {
            label: label.to_string(),
            value: value.to_string(),
        });
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("Output: {}", output.display());

    if summary.is_clean() {
        println!("{}", "No failures.".green());
    } else {
        println!(
            "{}",
            format!("{} failure(s):", summary.failures.len()).yellow()
        );
        for line in &summary.failures {
            println!("  - {line}");
        }
    }
}
