//! Comparison run: align, score, locate.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BeliefTrajectory, ComparisonReport, RiskThreshold};
use crate::domain::ports::{ModelClient, TrajectoryRepository};
use crate::services::divergence_scorer::DivergenceScorer;
use crate::services::pci_locator::locate;
use crate::services::trajectory_aligner::align;

/// Compares a reference run against a failed run.
pub struct ComparisonService {
    scorer: DivergenceScorer,
}

impl ComparisonService {
    pub fn new(client: Arc<dyn ModelClient>, max_concurrent_scoring: usize) -> Self {
        Self {
            scorer: DivergenceScorer::new(client).with_max_concurrent(max_concurrent_scoring),
        }
    }

    /// Run one comparison.
    ///
    /// Alignment gaps and scoring misses are reported in the result, not
    /// raised. A missing PCI is a normal outcome.
    #[instrument(skip_all, fields(reference = reference.trajectory_id(), failed = failed.trajectory_id(), threshold = threshold.value()))]
    pub async fn compare(
        &self,
        reference: &BeliefTrajectory,
        failed: &BeliefTrajectory,
        threshold: RiskThreshold,
    ) -> ComparisonReport {
        let alignment = align(reference, failed);
        let outcome = self.scorer.score_all(&alignment.pairs).await;
        let pci = locate(&outcome.scores, threshold).cloned();

        info!(
            aligned = alignment.stats.aligned_pairs,
            gaps = alignment.stats.gap_count(),
            scored = outcome.scores.len(),
            misses = outcome.misses,
            pci_found = pci.is_some(),
            "comparison finished"
        );

        ComparisonReport {
            divergence_scores: outcome.scores,
            pci,
            risk_threshold: Some(threshold.value()),
            alignment: alignment.stats,
            scoring_misses: outcome.misses,
        }
    }

    /// Load both trajectories from `repository`, compare them and save the
    /// report under `report_name`.
    pub async fn compare_stored(
        &self,
        repository: &dyn TrajectoryRepository,
        reference_id: &str,
        failed_id: &str,
        report_name: &str,
        threshold: RiskThreshold,
    ) -> DomainResult<ComparisonReport> {
        let reference = repository
            .load_trajectory(reference_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("trajectory {reference_id}")))?;
        let failed = repository
            .load_trajectory(failed_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("trajectory {failed_id}")))?;

        let report = self.compare(&reference, &failed, threshold).await;
        repository.save_report(report_name, &report).await?;
        Ok(report)
    }
}
