// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Parameters of the congestion model and of an analysis run.
use std::path::PathBuf;

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::demand::{TrafficPattern, Weather};
use crate::error::{CongestionError, Result};
use crate::flow::SPEED_FLOOR;
use crate::network::profile::MAX_BASE_VOLUME;
use crate::network::{RouteId, SegmentId};
use crate::units::*;

fn default_jam_density_per_lane() -> VehiclesPerKilometer {
    VehiclesPerKilometer::new_unchecked(150.0)
}

fn default_min_speed() -> KilometersPerHour {
    KilometersPerHour::new_unchecked(SPEED_FLOOR)
}

fn default_base_volume() -> VehiclesPerHour {
    VehiclesPerHour::new_unchecked(1000.0)
}

const fn default_value_of_time() -> f64 {
    25.0
}

const fn default_emission_rate() -> f64 {
    0.25
}

const fn default_fuel_rate() -> f64 {
    0.08
}

/// How routes that are not part of the route mapping are handled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", content = "value")]
pub enum UnmappedRoutePolicy {
    /// An unmapped route is an error.
    #[default]
    Reject,
    /// An unmapped route is evaluated on the given segments.
    DefaultSegments(Vec<SegmentId>),
}

/// Calibration parameters of the congestion model.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ModelParameters {
    /// Density of a jammed lane, in vehicles per kilometer and per lane.
    #[serde(default = "default_jam_density_per_lane")]
    pub jam_density_per_lane: VehiclesPerKilometer,
    /// Lower bound for the speed computed by the flow model (at least 5 km/h).
    #[serde(default = "default_min_speed")]
    pub min_speed: KilometersPerHour,
    /// Base volume used for the segments without historical volume profile.
    #[serde(default = "default_base_volume")]
    pub default_base_volume: VehiclesPerHour,
    /// Value of time, in currency units per vehicle-hour of delay.
    #[serde(default = "default_value_of_time")]
    pub value_of_time: f64,
    /// Additional emissions per vehicle-kilometer and per unit of emission multiplier above 1.
    #[serde(default = "default_emission_rate")]
    pub emission_rate: f64,
    /// Additional fuel consumption per vehicle-kilometer and per unit of fuel multiplier above 1.
    #[serde(default = "default_fuel_rate")]
    pub fuel_rate: f64,
    /// How routes without segment mapping are handled.
    #[serde(default)]
    pub unmapped_routes: UnmappedRoutePolicy,
    /// Number of threads used for the network scans (`0` lets rayon decide).
    #[serde(default)]
    pub nb_threads: usize,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters {
            jam_density_per_lane: default_jam_density_per_lane(),
            min_speed: default_min_speed(),
            default_base_volume: default_base_volume(),
            value_of_time: default_value_of_time(),
            emission_rate: default_emission_rate(),
            fuel_rate: default_fuel_rate(),
            unmapped_routes: UnmappedRoutePolicy::default(),
            nb_threads: 0,
        }
    }
}

impl ModelParameters {
    /// Checks that the parameters satisfy their constraints.
    pub fn validate(&self) -> Result<()> {
        if !(self.jam_density_per_lane.value() > 0.0) {
            return Err(CongestionError::InvalidParameter(
                "`jam_density_per_lane` must be positive".to_owned(),
            ));
        }
        if self.min_speed.value() < SPEED_FLOOR {
            return Err(CongestionError::InvalidParameter(format!(
                "`min_speed` must be at least {SPEED_FLOOR} km/h, got {}",
                self.min_speed.value()
            )));
        }
        if self.default_base_volume.value() > MAX_BASE_VOLUME {
            return Err(CongestionError::InvalidParameter(format!(
                "`default_base_volume` cannot exceed {MAX_BASE_VOLUME} veh/h, got {}",
                self.default_base_volume.value()
            )));
        }
        for (name, value) in [
            ("value_of_time", self.value_of_time),
            ("emission_rate", self.emission_rate),
            ("fuel_rate", self.fuel_rate),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CongestionError::InvalidParameter(format!(
                    "`{name}` must be a non-negative number, got {value}"
                )));
            }
        }
        if let UnmappedRoutePolicy::DefaultSegments(segments) = &self.unmapped_routes {
            if segments.is_empty() {
                return Err(CongestionError::InvalidParameter(
                    "the default segments of unmapped routes cannot be empty".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// Input files of an analysis.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct InputFiles {
    /// Path to the JSON file with the [NetworkDescription](crate::network::NetworkDescription).
    pub network: PathBuf,
}

/// Format used to store the results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum SavingFormat {
    /// Uncompressed JSON files.
    #[default]
    JSON,
    /// Zstd-compressed JSON files.
    CompressedJSON,
}

/// Time and context of an analysis, with the queries to run.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct AnalysisParameters {
    /// Date and time for which the predictions are computed.
    #[schemars(with = "String")]
    pub time: NaiveDateTime,
    /// Weather condition.
    #[serde(default)]
    pub weather: Weather,
    /// Whether the day is a public holiday.
    #[serde(default)]
    pub holiday: bool,
    /// Whether a special event takes place.
    #[serde(default)]
    pub special_event: bool,
    /// Segments for which a prediction is stored (all the segments when omitted).
    #[serde(default)]
    pub segments: Option<Vec<SegmentId>>,
    /// Routes for which congestion-mitigation recommendations are computed.
    #[serde(default)]
    pub routes: Vec<RouteId>,
}

impl AnalysisParameters {
    /// Returns the [TrafficPattern] of the analysis.
    pub fn pattern(&self) -> TrafficPattern {
        TrafficPattern::from_datetime(self.time, self.weather, self.holiday, self.special_event)
    }
}

/// Set of parameters of an analysis run.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct Parameters {
    /// Paths to the input files.
    pub input_files: InputFiles,
    /// Directory where the results are stored.
    pub output_directory: PathBuf,
    /// Time, context and queries of the analysis.
    pub analysis: AnalysisParameters,
    /// Calibration parameters of the model.
    #[serde(default)]
    pub model: ModelParameters,
    /// Format of the output files.
    #[serde(default)]
    pub saving_format: SavingFormat,
}
