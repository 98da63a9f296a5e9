//! Divergence domain models.
//!
//! A [`DivergenceScore`] is the comparison result for one aligned pair of
//! belief records. A [`ComparisonReport`] is the durable outcome of one
//! comparison run: the ordered scores, the located PCI (if any) and the
//! diagnostic counters for everything that was dropped along the way.

use serde::{Deserialize, Serialize};

use super::belief::BeliefKey;
use crate::domain::errors::{DomainError, DomainResult};

/// Multi-dimensional divergence between two belief records at the same
/// logical point.
///
/// All numeric fields lie in `[0, 1]`. Out-of-range values are rejected by
/// [`DivergenceScore::new`], never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceScore {
    pub step: u32,
    #[serde(alias = "role_name")]
    pub agent_id: String,
    pub global_divergence: f64,
    pub goal_divergence: f64,
    pub teammate_divergence: f64,
    /// The dimension PCI localization keys on.
    pub risk_divergence: f64,
    /// Authoritative aggregate as judged by the comparison itself; not
    /// recomputed from the four sub-scores.
    pub overall_divergence: f64,
    #[serde(default)]
    pub explanation: String,
}

/// The five numeric dimensions of a score, in wire order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DivergenceDimensions {
    pub global: f64,
    pub goal: f64,
    pub teammate: f64,
    pub risk: f64,
    pub overall: f64,
}

fn check_unit_interval(field: &'static str, value: f64) -> DomainResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DomainError::ScoreOutOfRange { field, value })
    }
}

impl DivergenceScore {
    /// Build a validated score for the pair at `key`.
    pub fn new(
        key: BeliefKey,
        dims: DivergenceDimensions,
        explanation: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            step: key.step,
            agent_id: key.agent_id,
            global_divergence: check_unit_interval("global_divergence", dims.global)?,
            goal_divergence: check_unit_interval("goal_divergence", dims.goal)?,
            teammate_divergence: check_unit_interval("teammate_divergence", dims.teammate)?,
            risk_divergence: check_unit_interval("risk_divergence", dims.risk)?,
            overall_divergence: check_unit_interval("overall_divergence", dims.overall)?,
            explanation: explanation.into(),
        })
    }

    /// Back-reference to the aligned pair this score was computed from.
    pub fn key(&self) -> BeliefKey {
        BeliefKey::new(self.step, self.agent_id.clone())
    }

    /// Re-check the `[0, 1]` invariant, e.g. after loading from disk.
    pub fn validate(&self) -> DomainResult<()> {
        check_unit_interval("global_divergence", self.global_divergence)?;
        check_unit_interval("goal_divergence", self.goal_divergence)?;
        check_unit_interval("teammate_divergence", self.teammate_divergence)?;
        check_unit_interval("risk_divergence", self.risk_divergence)?;
        check_unit_interval("overall_divergence", self.overall_divergence)?;
        Ok(())
    }

    /// Overall divergence at or above `threshold`.
    pub fn is_high_divergence(&self, threshold: f64) -> bool {
        self.overall_divergence >= threshold
    }

    /// Risk divergence at or above `threshold`; the PCI candidate signal.
    pub fn is_risk_spike(&self, threshold: f64) -> bool {
        self.risk_divergence >= threshold
    }
}

/// Risk-divergence threshold for PCI localization.
///
/// There is deliberately no `Default`: callers must choose a value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RiskThreshold(f64);

impl RiskThreshold {
    pub fn new(value: f64) -> DomainResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidThreshold(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for RiskThreshold {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Alignment diagnostics: how many keys matched and how many were dropped
/// because only one trajectory had them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub aligned_pairs: usize,
    pub reference_only: usize,
    pub failed_only: usize,
}

impl AlignmentStats {
    /// Total unmatched keys on both sides.
    pub fn gap_count(&self) -> usize {
        self.reference_only + self.failed_only
    }
}

/// Outcome of one reference-vs-failed comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Scores in ascending `(step, agent_id)` order.
    pub divergence_scores: Vec<DivergenceScore>,

    /// First score whose risk divergence crossed the threshold.
    #[serde(default)]
    pub pci: Option<DivergenceScore>,

    /// Threshold the PCI was located with.
    #[serde(default)]
    pub risk_threshold: Option<f64>,

    #[serde(default)]
    pub alignment: AlignmentStats,

    /// Aligned pairs that produced no score (parse miss or model failure).
    #[serde(default)]
    pub scoring_misses: usize,
}

impl ComparisonReport {
    /// Check every stored score against the `[0, 1]` invariant and the
    /// scores against strictly ascending `(step, agent_id)` order.
    pub fn validate(&self) -> DomainResult<()> {
        for score in self.divergence_scores.iter().chain(self.pci.iter()) {
            score.validate()?;
        }
        for pair in self.divergence_scores.windows(2) {
            let (prev, next) = (pair[0].key(), pair[1].key());
            if prev >= next {
                return Err(DomainError::ValidationFailed(format!(
                    "divergence scores out of chronological order: {prev} is followed by {next}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(risk: f64) -> DivergenceDimensions {
        DivergenceDimensions {
            global: 0.1,
            goal: 0.2,
            teammate: 0.3,
            risk,
            overall: 0.4,
        }
    }

    #[test]
    fn test_new_accepts_bounds() {
        let score = DivergenceScore::new(BeliefKey::new(1, "Alice"), dims(1.0), "").unwrap();
        assert!((score.risk_divergence - 1.0).abs() < f64::EPSILON);

        let score = DivergenceScore::new(BeliefKey::new(1, "Alice"), dims(0.0), "").unwrap();
        assert!(score.risk_divergence.abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_rejects_out_of_range_without_clamping() {
        let err = DivergenceScore::new(BeliefKey::new(1, "Alice"), dims(1.2), "").unwrap_err();
        assert!(matches!(
            err,
            DomainError::ScoreOutOfRange { field: "risk_divergence", .. }
        ));

        let err = DivergenceScore::new(BeliefKey::new(1, "Alice"), dims(f64::NAN), "").unwrap_err();
        assert!(matches!(err, DomainError::ScoreOutOfRange { .. }));
    }

    #[test]
    fn test_spike_predicates() {
        let score = DivergenceScore::new(BeliefKey::new(2, "Bob"), dims(0.6), "").unwrap();
        assert!(score.is_risk_spike(0.6));
        assert!(!score.is_risk_spike(0.61));
        assert!(score.is_high_divergence(0.4));
        assert!(!score.is_high_divergence(0.5));
        assert_eq!(score.key(), BeliefKey::new(2, "Bob"));
    }

    #[test]
    fn test_threshold_has_no_default_and_is_bounded() {
        assert!(RiskThreshold::new(0.5).is_ok());
        assert!(matches!(
            RiskThreshold::new(1.5),
            Err(DomainError::InvalidThreshold(_))
        ));
        assert!(RiskThreshold::try_from(-0.1).is_err());
    }

    #[test]
    fn test_gap_count_sums_both_sides() {
        let stats = AlignmentStats {
            aligned_pairs: 1,
            reference_only: 1,
            failed_only: 1,
        };
        assert_eq!(stats.gap_count(), 2);
    }

    #[test]
    fn test_report_round_trip_with_pci() {
        let score = DivergenceScore::new(BeliefKey::new(1, "Alice"), dims(0.7), "missed risk").unwrap();
        let report = ComparisonReport {
            divergence_scores: vec![score.clone()],
            pci: Some(score),
            risk_threshold: Some(0.6),
            alignment: AlignmentStats {
                aligned_pairs: 1,
                reference_only: 0,
                failed_only: 2,
            },
            scoring_misses: 0,
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ComparisonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_validate_rejects_unordered_or_repeated_keys() {
        let score = |step, agent: &str| DivergenceScore::new(BeliefKey::new(step, agent), dims(0.5), "").unwrap();
        let report = |scores| ComparisonReport {
            divergence_scores: scores,
            pci: None,
            risk_threshold: None,
            alignment: AlignmentStats::default(),
            scoring_misses: 0,
        };

        assert!(report(vec![score(0, "Bob"), score(1, "Alice"), score(1, "Bob")]).validate().is_ok());
        assert!(matches!(
            report(vec![score(2, "Alice"), score(1, "Alice")]).validate(),
            Err(DomainError::ValidationFailed(_))
        ));
        assert!(report(vec![score(1, "Bob"), score(1, "Alice")]).validate().is_err());
        assert!(report(vec![score(1, "Alice"), score(1, "Alice")]).validate().is_err());
    }

    #[test]
    fn test_report_loads_minimal_legacy_shape() {
        let json = r#"{
            "divergence_scores": [{
                "step": 0, "role_name": "Alice",
                "global_divergence": 0.1, "goal_divergence": 0.1,
                "teammate_divergence": 0.1, "risk_divergence": 0.8,
                "overall_divergence": 0.5, "explanation": "x"
            }],
            "pci": null
        }"#;
        let report: ComparisonReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.divergence_scores[0].agent_id, "Alice");
        assert!(report.pci.is_none());
        assert_eq!(report.alignment, AlignmentStats::default());
        assert!(report.validate().is_ok());
    }
}
