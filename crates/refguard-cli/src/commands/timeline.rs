//! Timeline commands

use crate::output::print_json;
use anyhow::{Context, Result};
use clap::Subcommand;
use refguard_governor::{AppliedStep, Governor};
use refguard_types::Domain;
use serde_json::Value;

#[derive(Subcommand)]
pub enum TimelineCommands {
    /// List events and summary rows
    List {
        /// Project path
        #[arg(short, long)]
        project: String,

        /// Print only the summary rows
        #[arg(long)]
        summary: bool,
    },

    /// Recompute the hash chain
    Verify {
        #[arg(short, long)]
        project: String,
    },

    /// Record an applied suggestion
    Record {
        #[arg(short, long)]
        project: String,

        #[arg(short, long)]
        file: String,

        #[arg(short, long, default_value = "")]
        domain: String,

        /// What was applied
        #[arg(short, long)]
        message: String,

        /// Gate cues as JSON
        #[arg(long)]
        cues: Option<String>,

        /// Outcome as JSON
        #[arg(long)]
        result: Option<String>,
    },

    /// Flag a step for review
    Flag {
        #[arg(short, long)]
        project: String,

        #[arg(short, long)]
        file: String,

        #[arg(short, long)]
        reason: String,
    },

    /// Record that a file was restored from a backup
    Revert {
        #[arg(short, long)]
        project: String,

        #[arg(short, long)]
        file: String,

        #[arg(short, long)]
        backup: String,
    },
}

pub async fn execute(command: TimelineCommands, governor: &Governor) -> Result<()> {
    match command {
        TimelineCommands::List { project, summary } => {
            let listing = governor.list_timeline(&project).await?;
            if summary {
                print_json(&listing.summary)
            } else {
                print_json(&listing)
            }
        }

        TimelineCommands::Verify { project } => {
            let verification = governor.verify_timeline(&project).await?;
            print_json(&verification)?;
            if !verification.valid {
                anyhow::bail!("timeline chain is broken");
            }
            Ok(())
        }

        TimelineCommands::Record {
            project,
            file,
            domain,
            message,
            cues,
            result,
        } => {
            let step = AppliedStep {
                file,
                domain: Domain::parse(&domain),
                patch_note: message,
                cues: parse_json("cues", cues)?,
                result: parse_json("result", result)?,
            };
            print_json(&governor.record_applied(&project, step).await?)
        }

        TimelineCommands::Flag {
            project,
            file,
            reason,
        } => print_json(&governor.flag_step(&project, &file, &reason).await?),

        TimelineCommands::Revert {
            project,
            file,
            backup,
        } => print_json(&governor.record_revert(&project, &file, &backup).await?),
    }
}

fn parse_json(field: &str, raw: Option<String>) -> Result<Value> {
    match raw {
        Some(raw) => serde_json::from_str(&raw).with_context(|| format!("--{field} is not valid JSON")),
        None => Ok(Value::Null),
    }
}
