//! CLI command implementations.

pub mod align;
pub mod compare;
pub mod locate;

use anyhow::{Context, Result};

use crate::domain::models::{Config, RiskThreshold};

/// Threshold from the flag, else from config. There is no built-in
/// fallback.
pub fn resolve_threshold(flag: Option<f64>, config: &Config) -> Result<RiskThreshold> {
    let value = flag.or(config.comparison.risk_threshold).context(
        "No risk threshold given: pass --risk-threshold or set comparison.risk_threshold",
    )?;
    RiskThreshold::new(value).context("Invalid risk threshold")
}
