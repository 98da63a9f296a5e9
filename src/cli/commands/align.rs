//! `align`: key-based pairing of two trajectory files.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::adapters::storage::read_trajectory;
use crate::cli::output::{base_table, header, output, CommandOutput};
use crate::cli::types::AlignArgs;
use crate::domain::models::{AlignmentStats, BeliefKey};
use crate::services::align;

#[derive(Debug, Serialize)]
pub struct AlignOutput {
    pub reference: String,
    pub failed: String,
    pub pairs: Vec<BeliefKey>,
    pub alignment: AlignmentStats,
    pub gap_count: usize,
}

impl CommandOutput for AlignOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.pairs.is_empty() {
            lines.push(format!(
                "No common (step, agent) keys between '{}' and '{}'.",
                self.reference, self.failed
            ));
        } else {
            let mut table = base_table();
            table.set_header(header(&["Step", "Agent"]));
            for key in &self.pairs {
                table.add_row(vec![key.step.to_string(), key.agent_id.clone()]);
            }
            lines.push(table.to_string());
        }
        lines.push(format!(
            "Aligned pairs: {}  (reference only: {}, failed only: {}, gaps: {})",
            self.alignment.aligned_pairs,
            self.alignment.reference_only,
            self.alignment.failed_only,
            self.gap_count
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AlignArgs, json_mode: bool) -> Result<()> {
    let reference = read_trajectory(&args.reference)
        .await
        .with_context(|| format!("Failed to read reference trajectory {}", args.reference.display()))?;
    let failed = read_trajectory(&args.failed)
        .await
        .with_context(|| format!("Failed to read failed trajectory {}", args.failed.display()))?;

    let alignment = align(&reference, &failed);
    let result = AlignOutput {
        reference: reference.trajectory_id().to_string(),
        failed: failed.trajectory_id().to_string(),
        pairs: alignment.keys(),
        alignment: alignment.stats,
        gap_count: alignment.stats.gap_count(),
    };

    output(&result, json_mode);
    Ok(())
}
