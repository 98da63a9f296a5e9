//! `compare`: full reference-vs-failed comparison with the configured model.

use anyhow::{Context, Result};

use crate::adapters::models::build_model_client;
use crate::adapters::storage::{read_trajectory, write_report};
use crate::cli::commands::resolve_threshold;
use crate::cli::output::{output, ReportOutput};
use crate::cli::types::CompareArgs;
use crate::domain::models::Config;
use crate::services::ComparisonService;

pub async fn execute(args: CompareArgs, config: &Config, json_mode: bool) -> Result<()> {
    let threshold = resolve_threshold(args.risk_threshold, config)?;

    let reference = read_trajectory(&args.reference)
        .await
        .with_context(|| format!("Failed to read reference trajectory {}", args.reference.display()))?;
    let failed = read_trajectory(&args.failed)
        .await
        .with_context(|| format!("Failed to read failed trajectory {}", args.failed.display()))?;

    let client = build_model_client(config).context("Failed to build model client")?;
    let service = ComparisonService::new(client, config.comparison.max_concurrent_scoring);
    let report = service.compare(&reference, &failed, threshold).await;

    if let Some(path) = &args.output {
        write_report(path, &report)
            .await
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    output(
        &ReportOutput {
            report,
            saved_to: args.output,
        },
        json_mode,
    );
    Ok(())
}
