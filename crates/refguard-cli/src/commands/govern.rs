//! Suggestion governance commands

use crate::output::print_json;
use anyhow::{Context, Result};
use clap::Args;
use refguard_governor::{detect_domain, GovernError, GovernRequest, Governor};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;

#[derive(Args)]
pub struct GovernArgs {
    /// Request JSON file (`-` for stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Override the request's domain
    #[arg(short, long)]
    domain: Option<String>,

    /// Override the request's project path
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Add a compliance target (repeatable)
    #[arg(short, long = "target")]
    targets: Vec<String>,
}

pub async fn execute(args: GovernArgs, governor: &Governor) -> Result<()> {
    let raw = read_input(&args.input)?;
    let mut request: GovernRequest = serde_json::from_str(&raw)
        .map_err(|e| GovernError::InvalidInput(format!("request body: {e}")))?;

    if let Some(domain) = args.domain {
        request.domain = Some(domain.into());
    }
    if let Some(project) = args.project {
        request.project_path = Some(project);
    }
    request.compliance_targets.extend(args.targets);

    let governed = governor.govern_suggestions(request).await?;
    print_json(&governed)
}

pub fn detect(path: PathBuf) -> Result<()> {
    let domain = detect_domain(&path);
    print_json(&json!({ "path": path, "domain": domain }))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("reading request from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(input).with_context(|| format!("reading request from {input}"))
}
