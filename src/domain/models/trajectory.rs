//! Belief trajectory: the ordered history of belief records for one run.
//!
//! Insertion order is chronological order. Every `(step, agent_id)` key
//! appears at most once; appending a duplicate is a caller error and is
//! rejected immediately rather than silently overwriting, because the
//! aligner relies on keys being unique.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::belief::{BeliefKey, BeliefRecord};
use crate::domain::errors::{DomainError, DomainResult};

/// Ordered sequence of belief records for one named run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryDocument")]
pub struct BeliefTrajectory {
    trajectory_id: String,
    description: String,
    records: Vec<BeliefRecord>,
    #[serde(skip)]
    keys: HashSet<BeliefKey>,
}

/// Wire shape of a trajectory, validated into [`BeliefTrajectory`].
#[derive(Deserialize)]
struct TrajectoryDocument {
    trajectory_id: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "belief_states")]
    records: Vec<BeliefRecord>,
}

impl TryFrom<TrajectoryDocument> for BeliefTrajectory {
    type Error = DomainError;

    fn try_from(doc: TrajectoryDocument) -> Result<Self, Self::Error> {
        let mut trajectory = Self::new(doc.trajectory_id, doc.description);
        trajectory.extend(doc.records)?;
        Ok(trajectory)
    }
}

impl BeliefTrajectory {
    /// Create an empty trajectory.
    pub fn new(trajectory_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            trajectory_id: trajectory_id.into(),
            description: description.into(),
            records: Vec::new(),
            keys: HashSet::new(),
        }
    }

    pub fn trajectory_id(&self) -> &str {
        &self.trajectory_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All records in chronological (insertion) order.
    pub fn records(&self) -> &[BeliefRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record.
    ///
    /// Fails with [`DomainError::DuplicateBeliefKey`] if the trajectory
    /// already holds a record for the same `(step, agent_id)`, and with
    /// [`DomainError::InvalidAgentId`] for a blank agent id. The trajectory
    /// is left unchanged on failure.
    pub fn append(&mut self, record: BeliefRecord) -> DomainResult<()> {
        if record.agent_id.trim().is_empty() {
            return Err(DomainError::InvalidAgentId);
        }

        let key = record.key();
        if self.keys.contains(&key) {
            return Err(DomainError::DuplicateBeliefKey {
                trajectory_id: self.trajectory_id.clone(),
                step: key.step,
                agent_id: key.agent_id,
            });
        }

        self.keys.insert(key);
        self.records.push(record);
        Ok(())
    }

    /// Append many records, e.g. when merging per-agent histories into one
    /// run trajectory.
    ///
    /// All records are checked before any is appended, so a duplicate
    /// anywhere in `records` leaves the trajectory unchanged.
    pub fn extend(&mut self, records: impl IntoIterator<Item = BeliefRecord>) -> DomainResult<()> {
        let records: Vec<BeliefRecord> = records.into_iter().collect();

        let mut incoming = HashSet::with_capacity(records.len());
        for record in &records {
            if record.agent_id.trim().is_empty() {
                return Err(DomainError::InvalidAgentId);
            }
            let key = record.key();
            if self.keys.contains(&key) || !incoming.insert(key.clone()) {
                return Err(DomainError::DuplicateBeliefKey {
                    trajectory_id: self.trajectory_id.clone(),
                    step: key.step,
                    agent_id: key.agent_id,
                });
            }
        }

        self.keys.extend(incoming);
        self.records.extend(records);
        Ok(())
    }

    /// Look up the record for a key.
    pub fn get(&self, key: &BeliefKey) -> Option<&BeliefRecord> {
        if !self.keys.contains(key) {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.step == key.step && r.agent_id == key.agent_id)
    }

    pub fn contains_key(&self, key: &BeliefKey) -> bool {
        self.keys.contains(key)
    }

    /// All keys in ascending `(step, agent_id)` order.
    pub fn keys(&self) -> BTreeSet<BeliefKey> {
        self.keys.iter().cloned().collect()
    }

    /// Records produced by one agent, in chronological order.
    pub fn by_agent<'a>(&'a self, agent_id: &'a str) -> impl Iterator<Item = &'a BeliefRecord> + 'a {
        self.records.iter().filter(move |r| r.agent_id == agent_id)
    }

    /// Records produced at one step, in insertion order.
    pub fn by_step(&self, step: u32) -> impl Iterator<Item = &BeliefRecord> + '_ {
        self.records.iter().filter(move |r| r.step == step)
    }

    /// Distinct agent ids, sorted.
    pub fn agents(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.agent_id.as_str()).collect()
    }

    /// Most recently appended record of an agent.
    pub fn latest_for(&self, agent_id: &str) -> Option<&BeliefRecord> {
        self.records.iter().rev().find(|r| r.agent_id == agent_id)
    }
}
