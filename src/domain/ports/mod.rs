//! Port trait definitions (Hexagonal Architecture)
//!
//! - ModelClient: the language-model collaborator
//! - StepObserver: the host-runtime per-step hook
//! - TrajectoryRepository: durable trajectories and comparison reports

pub mod model_client;
pub mod step_observer;
pub mod trajectory_repository;

pub use model_client::{ModelClient, ModelError};
pub use step_observer::{StepContext, StepObserver};
pub use trajectory_repository::TrajectoryRepository;
