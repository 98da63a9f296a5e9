//! Trajectory repository port for persisting completed runs and
//! comparison results.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{BeliefTrajectory, ComparisonReport};

/// Repository interface for trajectory and report persistence.
///
/// Trajectories are stored as immutable end-of-run snapshots keyed by
/// their `trajectory_id`; reports are keyed by a caller-chosen name. Both
/// must round-trip losslessly.
#[async_trait]
pub trait TrajectoryRepository: Send + Sync {
    /// Persist a trajectory, replacing any snapshot with the same id.
    async fn save_trajectory(&self, trajectory: &BeliefTrajectory) -> DomainResult<()>;

    /// Load a trajectory by id. `Ok(None)` if it was never saved.
    async fn load_trajectory(&self, trajectory_id: &str) -> DomainResult<Option<BeliefTrajectory>>;

    /// Persist a comparison report under `name`.
    async fn save_report(&self, name: &str, report: &ComparisonReport) -> DomainResult<()>;

    /// Load a comparison report by name. `Ok(None)` if absent.
    async fn load_report(&self, name: &str) -> DomainResult<Option<ComparisonReport>>;
}
