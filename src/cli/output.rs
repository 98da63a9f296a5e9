//! Output formatting utilities for the CLI.

use std::env;
use std::path::PathBuf;

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::domain::models::{ComparisonReport, DivergenceScore};

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to at most `max_chars` characters, appending "..." if
/// truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

pub fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn divergence_cell(value: f64, threshold: Option<f64>, colors: bool) -> Cell {
    let cell = Cell::new(format!("{value:.2}"));
    if !colors {
        return cell;
    }
    match threshold {
        Some(t) if value >= t => cell.fg(Color::Red),
        _ if value >= 0.5 => cell.fg(Color::Yellow),
        _ => cell,
    }
}

/// Render divergence scores, marking the PCI row.
pub fn score_table(scores: &[DivergenceScore], pci: Option<&DivergenceScore>, threshold: Option<f64>) -> Table {
    let colors = supports_color();
    let pci_key = pci.map(DivergenceScore::key);

    let mut table = base_table();
    table.set_header(header(&[
        "", "Step", "Agent", "Global", "Goal", "Teammate", "Risk", "Overall", "Explanation",
    ]));

    for score in scores {
        let is_pci = pci_key.as_ref() == Some(&score.key());
        table.add_row(vec![
            Cell::new(if is_pci { "PCI" } else { "" }).add_attribute(Attribute::Bold),
            Cell::new(score.step),
            Cell::new(&score.agent_id),
            divergence_cell(score.global_divergence, None, colors),
            divergence_cell(score.goal_divergence, None, colors),
            divergence_cell(score.teammate_divergence, None, colors),
            divergence_cell(score.risk_divergence, threshold, colors),
            divergence_cell(score.overall_divergence, None, colors),
            Cell::new(truncate(&score.explanation, 60)),
        ]);
    }

    table
}

/// A comparison report as printed by `compare` and `locate`.
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    #[serde(flatten)]
    pub report: ComparisonReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::new();

        if report.divergence_scores.is_empty() {
            lines.push("No divergence scores.".to_string());
        } else {
            lines.push(
                score_table(&report.divergence_scores, report.pci.as_ref(), report.risk_threshold)
                    .to_string(),
            );
        }

        lines.push(format!(
            "Aligned pairs: {}  (reference only: {}, failed only: {}, gaps: {})",
            report.alignment.aligned_pairs,
            report.alignment.reference_only,
            report.alignment.failed_only,
            report.alignment.gap_count()
        ));
        if report.scoring_misses > 0 {
            lines.push(format!("Pairs without a score: {}", report.scoring_misses));
        }

        let threshold = report
            .risk_threshold
            .map_or_else(|| "unset".to_string(), |t| format!("{t:.2}"));
        match &report.pci {
            Some(pci) => lines.push(format!(
                "PCI: step {} agent {} (risk divergence {:.2} >= {threshold})",
                pci.step, pci.agent_id, pci.risk_divergence
            )),
            None => lines.push(format!("No PCI found at risk threshold {threshold}.")),
        }

        if let Some(path) = &self.saved_to {
            lines.push(format!("Report written to {}", path.display()));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
