//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "beliefscope")]
#[command(about = "Beliefscope - belief-state divergence and PCI localization", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Extra YAML config file, layered above .beliefscope/
    #[arg(short, long, global = true, env = "BELIEFSCOPE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align two trajectories and report unmatched keys (no model calls)
    Align(AlignArgs),

    /// Score aligned beliefs with the model and locate the PCI
    Compare(CompareArgs),

    /// Re-run PCI localization over a saved comparison report
    Locate(LocateArgs),
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// Trajectory of the run that succeeded
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Trajectory of the run that failed
    #[arg(short, long)]
    pub failed: PathBuf,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Trajectory of the run that succeeded
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Trajectory of the run that failed
    #[arg(short, long)]
    pub failed: PathBuf,

    /// Risk-divergence threshold in [0, 1]; falls back to comparison.risk_threshold
    #[arg(short = 't', long)]
    pub risk_threshold: Option<f64>,

    /// Write the comparison report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Saved comparison report
    #[arg(short = 'i', long)]
    pub report: PathBuf,

    /// Risk-divergence threshold in [0, 1]
    #[arg(short = 't', long)]
    pub risk_threshold: f64,

    /// Write the updated report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
