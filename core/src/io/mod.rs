// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Everything related to import / export of network and result files.
pub mod json;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::network::{NetworkDescription, RoadNetworkRegistry};
use crate::parameters::{InputFiles, SavingFormat};
use crate::progress_bar::Spinner;

/// Reads the network description and builds the [RoadNetworkRegistry].
pub fn read_network(input_files: &InputFiles) -> Result<RoadNetworkRegistry> {
    let mut spinner = Spinner::new("Reading network");
    let description: NetworkDescription =
        json::read_json(&input_files.network).context("Failed to read road network")?;
    spinner.finish();
    let registry = RoadNetworkRegistry::from_description(description)
        .context("Failed to initialize road network")?;
    info!("Road network has {} segments", registry.nb_segments());
    Ok(registry)
}

/// Writes some serializable data in the output directory, in the given format.
///
/// Returns the path of the file.
pub fn write_output<D: Serialize>(
    data: &D,
    output_dir: &Path,
    name: &str,
    format: SavingFormat,
) -> Result<PathBuf> {
    let path = match format {
        SavingFormat::JSON => json::write_json(data, output_dir, name),
        SavingFormat::CompressedJSON => json::write_compressed_json(data, output_dir, name),
    }
    .with_context(|| format!("Failed to write {name}"))?;
    info!("Results written to `{path:?}`");
    Ok(path)
}
