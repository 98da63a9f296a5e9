//! JSON file storage for trajectories and comparison reports.
//!
//! Files are pretty-printed UTF-8 JSON. Within a store directory a
//! trajectory lives at `<trajectory_id>.json` and a report at
//! `<name>.report.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BeliefTrajectory, ComparisonReport};
use crate::domain::ports::TrajectoryRepository;

async fn read_json<T: DeserializeOwned>(path: &Path) -> DomainResult<T> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            DomainError::NotFound(path.display().to_string())
        } else {
            DomainError::StorageError(format!("{}: {e}", path.display()))
        }
    })?;
    serde_json::from_str(&text)
        .map_err(|e| DomainError::SerializationError(format!("{}: {e}", path.display())))
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> DomainResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    tokio::fs::write(path, text)
        .await
        .map_err(|e| DomainError::StorageError(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

/// Read a trajectory file. Duplicate keys in the file are rejected.
pub async fn read_trajectory(path: impl AsRef<Path>) -> DomainResult<BeliefTrajectory> {
    read_json(path.as_ref()).await
}

pub async fn write_trajectory(path: impl AsRef<Path>, trajectory: &BeliefTrajectory) -> DomainResult<()> {
    write_json(path.as_ref(), trajectory).await
}

/// Read a comparison report and re-check its score ranges and order.
pub async fn read_report(path: impl AsRef<Path>) -> DomainResult<ComparisonReport> {
    let report: ComparisonReport = read_json(path.as_ref()).await?;
    report.validate()?;
    Ok(report)
}

pub async fn write_report(path: impl AsRef<Path>, report: &ComparisonReport) -> DomainResult<()> {
    write_json(path.as_ref(), report).await
}

/// Directory-backed [`TrajectoryRepository`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, name: &str, suffix: &str) -> DomainResult<PathBuf> {
        if name.trim().is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(DomainError::ValidationFailed(format!(
                "'{name}' is not usable as a file name"
            )));
        }
        Ok(self.root.join(format!("{name}{suffix}")))
    }

    pub fn trajectory_path(&self, trajectory_id: &str) -> DomainResult<PathBuf> {
        self.file_for(trajectory_id, ".json")
    }

    pub fn report_path(&self, name: &str) -> DomainResult<PathBuf> {
        self.file_for(name, ".report.json")
    }
}

fn none_if_missing<T>(result: DomainResult<T>) -> DomainResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DomainError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl TrajectoryRepository for JsonFileStore {
    async fn save_trajectory(&self, trajectory: &BeliefTrajectory) -> DomainResult<()> {
        let path = self.trajectory_path(trajectory.trajectory_id())?;
        write_trajectory(&path, trajectory).await?;
        info!(
            trajectory = trajectory.trajectory_id(),
            records = trajectory.len(),
            path = %path.display(),
            "trajectory saved"
        );
        Ok(())
    }

    async fn load_trajectory(&self, trajectory_id: &str) -> DomainResult<Option<BeliefTrajectory>> {
        let path = self.trajectory_path(trajectory_id)?;
        none_if_missing(read_trajectory(&path).await)
    }

    async fn save_report(&self, name: &str, report: &ComparisonReport) -> DomainResult<()> {
        let path = self.report_path(name)?;
        write_report(&path, report).await?;
        info!(report = name, path = %path.display(), "comparison report saved");
        Ok(())
    }

    async fn load_report(&self, name: &str) -> DomainResult<Option<ComparisonReport>> {
        let path = self.report_path(name)?;
        none_if_missing(read_report(&path).await)
    }
}
