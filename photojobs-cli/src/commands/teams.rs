//! `photojobs teams` — one photo per person, sorted into team folders.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use photojobs_core::{BatchId, GroupBy};
use photojobs_ops::workflow::teams::{self, TeamsOptions};
use photojobs_ops::{AmbiguityResolver, Preconfigured};

use super::prompt::StdinPrompt;
use super::{print_items, print_json, print_summary, resolve_path, RunContext, RunJson};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupByArg {
    Person,
    PersonTeam,
}

impl From<GroupByArg> for GroupBy {
    fn from(g: GroupByArg) -> Self {
        match g {
            GroupByArg::Person => GroupBy::Person,
            GroupByArg::PersonTeam => GroupBy::PersonTeam,
        }
    }
}

/// Arguments for `photojobs teams`.
#[derive(Args, Debug)]
pub struct TeamsArgs {
    /// Derived table (JPG, PNG or ALL) from `csvgen`.
    #[arg(long)]
    pub csv: PathBuf,

    /// Folder holding the photos (searched recursively).
    #[arg(long)]
    pub root: PathBuf,

    /// Column holding the team name.
    #[arg(long, default_value = "TEAMNAME")]
    pub team_field: String,

    /// Output directory (default: `<root>_TeamIndSorted`).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Group per person, or per person and team [default: from config, else person].
    #[arg(long, value_enum)]
    pub group_by: Option<GroupByArg>,

    /// Team for everyone whose team is blank.
    #[arg(long)]
    pub default_team: Option<String>,

    /// Batches to keep when the table spans several, e.g. `JS10,JS20` or `all`.
    #[arg(long, value_delimiter = ',')]
    pub batches: Option<Vec<String>>,
}

#[derive(Serialize)]
struct Details<'a> {
    group_by: GroupBy,
    batches_kept: &'a Option<Vec<BatchId>>,
    default_team: &'a Option<String>,
    defaulted: &'a [String],
    without_photos: &'a [String],
    team_counts: &'a std::collections::BTreeMap<String, usize>,
    warnings: &'a [String],
}

impl TeamsArgs {
    pub fn run(self, ctx: &RunContext) -> Result<()> {
        let configured = Preconfigured {
            batches: self
                .batches
                .map(|list| {
                    list.into_iter()
                        .map(|b| b.trim().to_string())
                        .filter(|b| !b.is_empty())
                        .map(BatchId::from)
                        .collect()
                })
                .or_else(|| ctx.job.batches.clone()),
            default_team: self.default_team.or_else(|| ctx.job.default_team.clone()),
        };
        let mut answers: Box<dyn AmbiguityResolver> = if ctx.non_interactive {
            Box::new(configured)
        } else {
            Box::new(StdinPrompt { configured })
        };

        let opts = TeamsOptions {
            csv: resolve_path(&self.csv)?,
            root: resolve_path(&self.root)?,
            team_field: self.team_field,
            out_dir: self.out.as_deref().map(resolve_path).transpose()?,
            group_by: self.group_by.map(GroupBy::from).unwrap_or(ctx.job.group_by),
        };
        let report = teams::run(&opts, answers.as_mut())
            .with_context(|| format!("teams failed for {}", opts.csv.display()))?;

        if ctx.json {
            return print_json(&RunJson {
                command: "teams",
                output: &report.out_dir,
                summary: &report.summary,
                details: Details {
                    group_by: opts.group_by,
                    batches_kept: &report.batches_kept,
                    default_team: &report.default_team,
                    defaulted: &report.defaulted,
                    without_photos: &report.without_photos,
                    team_counts: &report.team_counts,
                    warnings: &report.warnings,
                },
                items: &report.items,
            });
        }

        for warning in &report.warnings {
            tracing::warn!("{warning}");
        }
        print_items(&report.items);

        let mut extra = vec![("grouped by", opts.group_by.to_string())];
        if let Some(kept) = &report.batches_kept {
            let names: Vec<&str> = kept.iter().map(BatchId::as_str).collect();
            extra.push(("batches kept", names.join(", ")));
        }
        if let Some(team) = &report.default_team {
            extra.push(("default team", format!("{team} ({} people)", report.defaulted.len())));
        }
        extra.push(("without photos", report.without_photos.len().to_string()));
        for (team, count) in &report.team_counts {
            extra.push(("team", format!("{team}: {count}")));
        }
        print_summary("teams", &report.out_dir, &report.summary, &extra);

        if !report.without_photos.is_empty() {
            println!("No photo found for:");
            for person in &report.without_photos {
                println!("  - {person}");
            }
        }
        Ok(())
    }
}
