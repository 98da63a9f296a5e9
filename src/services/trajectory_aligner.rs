//! Trajectory alignment.
//!
//! Pairs records of two trajectories by `(step, agent_id)` rather than by
//! position. Keys present on only one side are dropped from the pairing
//! and counted in [`AlignmentStats`].

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::models::{AlignmentStats, BeliefKey, BeliefRecord, BeliefTrajectory};

/// Aligned pairs borrowed from the two trajectories, plus gap counters.
#[derive(Debug, Clone)]
pub struct Alignment<'a> {
    /// `(left, right)` pairs in ascending key order.
    pub pairs: Vec<(&'a BeliefRecord, &'a BeliefRecord)>,
    pub stats: AlignmentStats,
}

impl Alignment<'_> {
    /// Keys of the aligned pairs, in order.
    pub fn keys(&self) -> Vec<BeliefKey> {
        self.pairs.iter().map(|(left, _)| left.key()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn index(trajectory: &BeliefTrajectory) -> BTreeMap<BeliefKey, &BeliefRecord> {
    trajectory.records().iter().map(|r| (r.key(), r)).collect()
}

/// Align `left` against `right`.
///
/// An empty intersection yields an empty alignment. Trajectories reject
/// duplicate keys at construction, so each key maps to one record.
pub fn align<'a>(left: &'a BeliefTrajectory, right: &'a BeliefTrajectory) -> Alignment<'a> {
    let left_index = index(left);
    let right_index = index(right);

    let pairs: Vec<_> = left_index
        .iter()
        .filter_map(|(key, l)| right_index.get(key).map(|r| (*l, *r)))
        .collect();

    let stats = AlignmentStats {
        aligned_pairs: pairs.len(),
        reference_only: left_index.len() - pairs.len(),
        failed_only: right_index.len() - pairs.len(),
    };

    if stats.gap_count() > 0 {
        warn!(
            left = left.trajectory_id(),
            right = right.trajectory_id(),
            aligned = stats.aligned_pairs,
            left_only = stats.reference_only,
            right_only = stats.failed_only,
            "alignment dropped unmatched keys"
        );
    } else {
        debug!(aligned = stats.aligned_pairs, "trajectories aligned without gaps");
    }

    Alignment { pairs, stats }
}
