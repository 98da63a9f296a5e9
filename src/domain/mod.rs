//! Domain layer: belief records, trajectories, divergence scores and the
//! ports the core talks to the outside world through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
