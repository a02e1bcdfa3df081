//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the source tables
//! - runs the normalization + feature + predict pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, FitArgs};
use crate::domain::PredictConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `race-pace` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args, OutputMode::Full),
        Command::Rank(args) => handle_fit(args, OutputMode::RankOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_fit(args: FitArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = predict_config_from_args(&args);
    let run = pipeline::run_predict(&config)?;

    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_run_summary(
                    &run.rows,
                    run.feature_kind,
                    &run.outcome,
                    &config,
                    &run.row_errors,
                    run.non_positive_times,
                )
            );
            println!("{}", crate::report::format_rankings(&run.ranking, config.top_n));
        }
        OutputMode::RankOnly => {
            // The whole field, not just the podium.
            let field = run.ranking.entries.len();
            println!("{}", crate::report::format_rankings(&run.ranking, field));
        }
    }

    if let Some(path) = &config.export_results {
        crate::io::export::write_rankings_csv(path, &run.ranking)?;
    }

    Ok(())
}

pub fn predict_config_from_args(args: &FitArgs) -> PredictConfig {
    PredictConfig {
        laps_path: args.laps.clone(),
        qualifying_path: args.qualifying.clone(),
        results_path: args.results.clone(),
        feature_set: args.features,
        regressor: args.model,
        seed: args.seed,
        test_fraction: args.test_fraction,
        top_n: args.top,
        export_results: args.export.clone(),
    }
}
