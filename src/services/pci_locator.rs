//! Point of Causal Inevitability localization.
//!
//! The PCI is the FIRST score, in chronological order, whose risk
//! divergence reaches the threshold. A later and larger spike never
//! replaces an earlier crossing.

use tracing::info;

use crate::domain::models::{ComparisonReport, DivergenceScore, RiskThreshold};

/// First score with `risk_divergence >= threshold`, or `None`.
///
/// `scores` must already be in ascending `(step, agent_id)` order, as
/// produced by alignment and scoring.
pub fn locate(scores: &[DivergenceScore], threshold: RiskThreshold) -> Option<&DivergenceScore> {
    let found = scores.iter().find(|s| s.is_risk_spike(threshold.value()));

    match found {
        Some(score) => info!(
            step = score.step,
            agent = %score.agent_id,
            risk = score.risk_divergence,
            threshold = threshold.value(),
            "PCI located"
        ),
        None => info!(
            scored = scores.len(),
            threshold = threshold.value(),
            "no PCI found"
        ),
    }

    found
}

/// Recompute a saved report's PCI under a different threshold without
/// scoring again.
///
/// Scores are put back into `(step, agent_id)` order first, so a report
/// assembled out of order still yields the chronologically first crossing.
pub fn relocate(report: &mut ComparisonReport, threshold: RiskThreshold) {
    report.divergence_scores.sort_by_key(DivergenceScore::key);
    report.pci = locate(&report.divergence_scores, threshold).cloned();
    report.risk_threshold = Some(threshold.value());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AlignmentStats, BeliefKey, DivergenceDimensions};

    fn scores(risks: &[f64]) -> Vec<DivergenceScore> {
        risks
            .iter()
            .enumerate()
            .map(|(step, &risk)| {
                DivergenceScore::new(
                    BeliefKey::new(u32::try_from(step).unwrap(), "Alice"),
                    DivergenceDimensions {
                        risk,
                        ..DivergenceDimensions::default()
                    },
                    "",
                )
                .unwrap()
            })
            .collect()
    }

    fn threshold(value: f64) -> RiskThreshold {
        RiskThreshold::new(value).unwrap()
    }

    #[test]
    fn test_first_crossing_not_maximum() {
        let scores = scores(&[0.3, 0.7, 0.9]);
        let pci = locate(&scores, threshold(0.6)).unwrap();
        assert!((pci.risk_divergence - 0.7).abs() < f64::EPSILON);
        assert_eq!(pci.step, 1);
    }

    #[test]
    fn test_all_below_threshold_is_not_found() {
        let scores = scores(&[0.1, 0.59, 0.2]);
        assert!(locate(&scores, threshold(0.6)).is_none());
        assert!(locate(&[], threshold(0.0)).is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let scores = scores(&[0.2, 0.5]);
        assert_eq!(locate(&scores, threshold(0.5)).map(|s| s.step), Some(1));
    }

    #[test]
    fn test_relocate_updates_pci_and_threshold() {
        let mut report = ComparisonReport {
            divergence_scores: scores(&[0.3, 0.55, 0.9]),
            pci: None,
            risk_threshold: Some(0.95),
            alignment: AlignmentStats::default(),
            scoring_misses: 0,
        };

        relocate(&mut report, threshold(0.5));
        assert_eq!(report.pci.as_ref().map(|s| s.step), Some(1));
        assert_eq!(report.risk_threshold, Some(0.5));

        relocate(&mut report, threshold(0.95));
        assert!(report.pci.is_none());
    }

    #[test]
    fn test_relocate_scans_in_chronological_order() {
        let mut unordered = scores(&[0.3, 0.7, 0.9]);
        unordered.swap(1, 2);
        let mut report = ComparisonReport {
            divergence_scores: unordered,
            pci: None,
            risk_threshold: None,
            alignment: AlignmentStats::default(),
            scoring_misses: 0,
        };

        relocate(&mut report, threshold(0.6));
        assert_eq!(report.pci.as_ref().map(|s| s.step), Some(1));
        let steps: Vec<u32> = report.divergence_scores.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 1, 2]);
        assert!(report.validate().is_ok());
    }
}
