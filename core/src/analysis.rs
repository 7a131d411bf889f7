// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Run of all the queries of an analysis and storage of their results.
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::impact::SystemImpactSummary;
use crate::io;
use crate::model::CongestionModel;
use crate::optimizer::RouteOptimization;
use crate::parameters::{AnalysisParameters, SavingFormat};
use crate::prediction::CongestionPrediction;

/// Name of the output file with the segment predictions.
pub const PREDICTIONS_FILENAME: &str = "predictions";
/// Name of the output file with the system-impact summary.
pub const SYSTEM_IMPACT_FILENAME: &str = "system_impact";
/// Name of the output file with the route recommendations.
pub const ROUTE_OPTIMIZATION_FILENAME: &str = "route_optimization";

/// Results of an analysis.
#[derive(Clone, Debug)]
pub struct AnalysisResults {
    pub predictions: Vec<CongestionPrediction>,
    pub system_impact: SystemImpactSummary,
    pub route_optimization: RouteOptimization,
}

impl AnalysisResults {
    /// Runs the queries of the analysis on the model.
    pub fn compute(model: &CongestionModel, analysis: &AnalysisParameters) -> Result<Self> {
        let pattern = analysis.pattern();
        info!(
            "Analysis for {} (weather: {}, holiday: {}, special event: {})",
            analysis.time, analysis.weather, analysis.holiday, analysis.special_event
        );
        let predictions = match &analysis.segments {
            Some(segments) => segments
                .iter()
                .map(|id| model.predict(id, analysis.time, &pattern))
                .collect::<Result<Vec<_>, _>>(),
            None => model.predict_all(analysis.time, &pattern),
        }
        .context("Failed to predict segment congestion")?;
        info!("Predicted congestion of {} segments", predictions.len());
        let system_impact = model
            .compute_system_impact(analysis.time, &pattern)
            .context("Failed to compute system impact")?;
        let route_optimization = model
            .optimize_for_congestion(&analysis.routes, analysis.time, &pattern)
            .context("Failed to optimize routes")?;
        info!(
            "{} recommendations for {} routes, reduction potential: {:.2}",
            route_optimization.recommendations.len(),
            analysis.routes.len(),
            route_optimization.congestion_reduction
        );
        Ok(AnalysisResults {
            predictions,
            system_impact,
            route_optimization,
        })
    }

    /// Writes the results in the output directory.
    pub fn write(&self, output_dir: &Path, format: SavingFormat) -> Result<()> {
        io::write_output(&self.predictions, output_dir, PREDICTIONS_FILENAME, format)?;
        io::write_output(
            &self.system_impact,
            output_dir,
            SYSTEM_IMPACT_FILENAME,
            format,
        )?;
        io::write_output(
            &self.route_optimization,
            output_dir,
            ROUTE_OPTIMIZATION_FILENAME,
            format,
        )?;
        Ok(())
    }
}
