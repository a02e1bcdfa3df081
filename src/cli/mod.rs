//! Command-line parsing for the race pace predictor.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{FeatureSet, RegressorKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "race-pace",
    version,
    about = "Predict average race lap times from lap charts and qualifying data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline and print the modeling table, diagnostics, podium, and winner.
    Fit(FitArgs),
    /// Print the predicted ranking only (useful for scripting).
    Rank(FitArgs),
}

/// Common options for fitting and ranking.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Lap chart CSV: a `DRIVER` column plus one column per lap.
    #[arg(long)]
    pub laps: PathBuf,

    /// Qualifying CSV: `Driver` and `Time` columns.
    #[arg(long)]
    pub qualifying: PathBuf,

    /// Race results CSV: `Driver` and `Pos` columns. Enables the extended feature set.
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Which feature set to build (`auto` picks extended when results are supplied).
    #[arg(long, value_enum, default_value_t = FeatureSet::Auto)]
    pub features: FeatureSet,

    /// Which regressor to fit.
    #[arg(long, value_enum, default_value_t = RegressorKind::Boost)]
    pub model: RegressorKind,

    /// Random seed for the train/test split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of drivers held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Podium size in the full report.
    #[arg(long, default_value_t = 3)]
    pub top: usize,

    /// Optional CSV export of the ranked predictions.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
