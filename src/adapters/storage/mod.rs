//! Durable storage adapters.

pub mod json_file;

pub use json_file::{read_report, read_trajectory, write_report, write_trajectory, JsonFileStore};
