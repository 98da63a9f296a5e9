//! `locate`: PCI localization over a saved report, without re-scoring.

use anyhow::{Context, Result};

use crate::adapters::storage::{read_report, write_report};
use crate::cli::output::{output, ReportOutput};
use crate::cli::types::LocateArgs;
use crate::domain::models::RiskThreshold;
use crate::services::relocate;

pub async fn execute(args: LocateArgs, json_mode: bool) -> Result<()> {
    let threshold = RiskThreshold::new(args.risk_threshold).context("Invalid risk threshold")?;

    let mut report = read_report(&args.report)
        .await
        .with_context(|| format!("Failed to read report {}", args.report.display()))?;
    relocate(&mut report, threshold);

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
