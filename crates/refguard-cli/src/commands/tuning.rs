//! Tuning commands

use crate::output::print_json;
use anyhow::Result;
use clap::{Args, Subcommand};
use refguard_governor::Governor;
use refguard_tuning::{compare_benchmarks, BenchmarkResult, Feedback};

#[derive(Subcommand)]
pub enum TuningCommands {
    /// Show the current weights
    Get {
        #[arg(short, long)]
        project: String,
    },

    /// Turn adaptive ranking on
    Enable {
        #[arg(short, long)]
        project: String,
    },

    /// Turn adaptive ranking off (generator order is kept)
    Disable {
        #[arg(short, long)]
        project: String,
    },

    /// Restore default weights
    Reset {
        #[arg(short, long)]
        project: String,
    },

    /// Submit reviewer feedback
    Feedback(FeedbackArgs),
}

#[derive(Args)]
pub struct FeedbackArgs {
    #[arg(short, long)]
    project: String,

    /// The suggestion was rejected
    #[arg(long)]
    rejected: bool,

    /// Signed benchmark improvement (positive is better)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "metric")]
    delta: Option<f64>,

    /// Benchmark metric measured before and after
    #[arg(long, requires_all = ["before", "after"])]
    metric: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    before: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    after: Option<f64>,

    /// Compliance warnings on the applied suggestion
    #[arg(long, default_value_t = 0)]
    warn: u32,
}

impl FeedbackArgs {
    fn feedback(&self) -> Result<Feedback> {
        let accepted = !self.rejected;
        if let (Some(metric), Some(before), Some(after)) = (&self.metric, self.before, self.after) {
            let comparison = compare_benchmarks(
                &BenchmarkResult::new(metric.as_str(), before),
                &BenchmarkResult::new(metric.as_str(), after),
            )?;
            return Ok(comparison.feedback(accepted, self.warn));
        }
        Ok(Feedback {
            accepted,
            benchmark_delta: self.delta,
            compliance_warn_count: self.warn,
        })
    }
}

pub async fn execute(command: TuningCommands, governor: &Governor) -> Result<()> {
    let state = match command {
        TuningCommands::Get { project } => governor.get_tuning_state(&project).await?,
        TuningCommands::Enable { project } => governor.set_tuning_enabled(&project, true).await?,
        TuningCommands::Disable { project } => governor.set_tuning_enabled(&project, false).await?,
        TuningCommands::Reset { project } => governor.reset_tuning(&project).await?,
        TuningCommands::Feedback(args) => {
            let feedback = args.feedback()?;
            governor.submit_feedback(&args.project, feedback).await?
        }
    };
    print_json(&state)
}
