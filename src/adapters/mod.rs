//! Infrastructure adapters for external systems.

pub mod models;
pub mod storage;
