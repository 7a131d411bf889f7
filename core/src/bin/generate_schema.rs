// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Binary to generate the JSON Schemas of the input and output files.
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use congestion_core::impact::SystemImpactSummary;
use congestion_core::network::NetworkDescription;
use congestion_core::optimizer::RouteOptimization;
use congestion_core::parameters::Parameters;
use congestion_core::prediction::CongestionPrediction;
use log::{info, LevelFilter};
use schemars::gen::{SchemaGenerator, SchemaSettings};
use schemars::JsonSchema;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Generate the JSON Schemas for the input and output files of the congestion model
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The directory where the JSON Schemas should be stored
    path: PathBuf,
}

/// Writes the schema of `T` to the file `schema-{name}.json` in the given directory.
fn write_schema<T: JsonSchema>(gen: &SchemaGenerator, dir: &Path, name: &str) -> Result<()> {
    let schema = gen.clone().into_root_schema_for::<T>();
    let filename = dir.join(format!("schema-{name}.json"));
    let mut file = File::create(&filename)
        .with_context(|| format!("Unable to create file `{filename:?}`"))?;
    write!(file, "{}", serde_json::to_string_pretty(&schema)?)?;
    info!("Schema written to `{filename:?}`");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logging")?;

    std::fs::create_dir_all(&args.path)
        .with_context(|| format!("Failed to create directory `{:?}`", args.path))?;

    info!("Generating JSON Schemas");
    let settings = SchemaSettings::draft07().with(|s| {
        s.option_nullable = true;
        s.option_add_null_type = false;
    });
    let gen = settings.into_generator();

    write_schema::<Parameters>(&gen, &args.path, "parameters")?;
    write_schema::<NetworkDescription>(&gen, &args.path, "network")?;
    write_schema::<Vec<CongestionPrediction>>(&gen, &args.path, "predictions")?;
    write_schema::<SystemImpactSummary>(&gen, &args.path, "system-impact")?;
    write_schema::<RouteOptimization>(&gen, &args.path, "route-optimization")?;

    info!("Done");

    Ok(())
}
