// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Macroscopic traffic-flow model mapping a volume on a segment to speed, density and congestion
//! level.
use serde_derive::Serialize;

use crate::congestion::{classify, CongestionLevel};
use crate::network::RoadSegment;
use crate::parameters::ModelParameters;
use crate::units::*;

/// Smallest speed floor accepted by the model, in kilometers per hour.
pub const SPEED_FLOOR: f64 = 5.0;

/// Smallest share of the speed limit that can be reached in the congested regime, before applying
/// the absolute speed floor.
const MIN_CONGESTED_SPEED_RATIO: f64 = 0.1;

/// Share of the jam density reached when the volume equals the capacity.
const CRITICAL_DENSITY_RATIO: f64 = 0.5;

/// Increase of the density ratio per unit of volume / capacity above 1.
const OVERSATURATION_DENSITY_SLOPE: f64 = 0.4;

/// Observable flow state of a segment for a given volume.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FlowState {
    /// Volume for which the state was computed.
    pub volume: VehiclesPerHour,
    /// Volume / capacity ratio.
    pub vc_ratio: f64,
    /// Average speed on the segment.
    pub speed: KilometersPerHour,
    /// Density on the segment (all lanes).
    pub density: VehiclesPerKilometer,
    /// Congestion level of the segment.
    pub level: CongestionLevel,
    /// Multiplier of the free-flow travel time associated to the congestion level.
    pub delay_factor: f64,
}

impl FlowState {
    /// Returns the time needed to travel through the given segment at the speed of this state.
    pub fn travel_time(&self, segment: &RoadSegment) -> Hours {
        segment.length() / self.speed
    }
}

/// Piecewise-linear speed-density model (Greenshields family).
///
/// The model has two regimes, separated by the volume / capacity ratio `vc`:
///
/// 1. **Stable regime** (`vc <= 1`). The density grows linearly with the volume, up to half the
///    jam density at capacity: `k = vc * kj / 2`. The speed decreases linearly with the density:
///    `v = v0 * (1 - k / kj)`.
///
/// 2. **Congested regime** (`vc > 1`). The density keeps increasing with the oversaturation:
///    `k = kj * (0.5 + (vc - 1) * 0.4)`, and the speed is `v = v0 * max(0.1, 1 - k / kj)`.
///
/// `v0` is the speed limit of the segment and `kj` its jam density (jam density per lane times
/// number of lanes). In both regimes, the speed cannot be lower than a floor of at least
/// [SPEED_FLOOR].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrafficFlowEngine {
    jam_density_per_lane: VehiclesPerKilometer,
    min_speed: KilometersPerHour,
}

impl Default for TrafficFlowEngine {
    fn default() -> Self {
        Self::new(&ModelParameters::default())
    }
}

impl TrafficFlowEngine {
    /// Creates a TrafficFlowEngine from the model parameters.
    pub fn new(parameters: &ModelParameters) -> Self {
        TrafficFlowEngine {
            jam_density_per_lane: parameters.jam_density_per_lane,
            min_speed: parameters.min_speed,
        }
    }

    /// Returns the jam density of a segment, for all its lanes.
    pub fn jam_density(&self, segment: &RoadSegment) -> VehiclesPerKilometer {
        self.jam_density_per_lane * f64::from(segment.lanes())
    }

    /// Computes the [FlowState] of a segment for the given hourly volume.
    pub fn compute_flow(&self, segment: &RoadSegment, volume: VehiclesPerHour) -> FlowState {
        let vc_ratio = volume / segment.capacity();
        let jam_density = self.jam_density(segment);
        let speed_limit = segment.speed_limit();
        let (density, speed_ratio) = if vc_ratio <= 1.0 {
            let density = jam_density * (vc_ratio * CRITICAL_DENSITY_RATIO);
            (density, 1.0 - density / jam_density)
        } else {
            let density = jam_density
                * (CRITICAL_DENSITY_RATIO + (vc_ratio - 1.0) * OVERSATURATION_DENSITY_SLOPE);
            (
                density,
                (1.0 - density / jam_density).max(MIN_CONGESTED_SPEED_RATIO),
            )
        };
        let speed = (speed_limit * speed_ratio).max(self.min_speed);
        let level = classify(vc_ratio, speed / speed_limit);
        FlowState {
            volume,
            vc_ratio,
            speed,
            density,
            level,
            delay_factor: level.delay_multiplier(),
        }
    }
}
