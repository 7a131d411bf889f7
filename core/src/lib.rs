// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Library for a road-network congestion model: traffic-flow state, congestion prediction,
//! system-wide impact and route recommendations.
#![doc(html_no_source)]

pub mod analysis;
pub mod congestion;
pub mod demand;
pub mod error;
pub mod flow;
pub mod impact;
pub mod io;
pub mod logging;
pub mod model;
pub mod network;
pub mod optimizer;
pub mod parameters;
pub mod prediction;
pub mod progress_bar;
pub mod units;

use std::env;
use std::path::Path;

use anyhow::{Context, Result};

// Re-exports.
pub use analysis::AnalysisResults;
pub use congestion::{classify, CongestionLevel};
pub use demand::{ContextualDemandAdjuster, TrafficPattern, Weather};
pub use error::CongestionError;
pub use flow::{FlowState, TrafficFlowEngine};
pub use impact::SystemImpactSummary;
pub use model::CongestionModel;
pub use optimizer::{Recommendation, RouteOptimization};
pub use prediction::{CongestionPrediction, ContributingFactor};

// Dependencies only used in the bins.
use clap as _;

/// Reads an analysis, runs it and stores the results in the output directory.
///
/// This function takes as argument the path to the `parameters.json` file.
pub fn run_analysis(path: &Path) -> Result<()> {
    run_analysis_imp(path, None::<std::io::Empty>)
}

/// Reads an analysis, runs it and stores the results in the output directory.
///
/// This function takes as argument the path to the `parameters.json` file and a writer for the
/// logs.
pub fn run_analysis_with_writer<W: std::io::Write + Send + 'static>(
    path: &Path,
    writer: W,
) -> Result<()> {
    run_analysis_imp(path, Some(writer))
}

fn run_analysis_imp<W: std::io::Write + Send + 'static>(
    path: &Path,
    writer: Option<W>,
) -> Result<()> {
    // Read parameters.
    let parameters = io::json::get_parameters_from_json(path)?;

    // Set the working directory to the directory of the `parameters.json` file so that the input
    // paths can be interpreted as being relative to this file.
    if let Some(parent_dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        env::set_current_dir(parent_dir)
            .with_context(|| format!("Failed to set working directory to `{parent_dir:?}`"))?;
    }

    // Create output directory if it does not exists yet.
    std::fs::create_dir_all(&parameters.output_directory).with_context(|| {
        format!(
            "Failed to create output directory `{:?}`",
            parameters.output_directory
        )
    })?;

    logging::initialize_logging(&parameters.output_directory, writer)?;

    let registry = io::read_network(&parameters.input_files)?;
    let model = CongestionModel::new(registry, parameters.model)
        .context("Failed to initialize the congestion model")?;

    let results = AnalysisResults::compute(&model, &parameters.analysis)?;
    results.write(&parameters.output_directory, parameters.saving_format)
}
