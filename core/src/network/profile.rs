// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Historical hourly volume profiles of road segments.
use serde_derive::Serialize;

use crate::units::VehiclesPerHour;

/// Number of hours covered by a [HistoricalVolumeProfile].
pub const HOURS_PER_DAY: usize = 24;

/// Largest accepted base volume, in vehicles per hour.
///
/// The adjusted volume of any base volume below this bound stays finite.
pub const MAX_BASE_VOLUME: f64 = 1e9;

/// Historical base volume of a road segment for each hour of the day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoricalVolumeProfile([VehiclesPerHour; HOURS_PER_DAY]);

impl HistoricalVolumeProfile {
    /// Returns the base volume for the given hour of the day (0 to 23).
    ///
    /// **Panics** if `hour` is larger than 23.
    pub fn volume_at(&self, hour: u8) -> VehiclesPerHour {
        self.0[hour as usize]
    }
}

impl TryFrom<Vec<f64>> for HistoricalVolumeProfile {
    type Error = String;
    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        if values.len() != HOURS_PER_DAY {
            return Err(format!(
                "expected {HOURS_PER_DAY} hourly volumes, got {}",
                values.len()
            ));
        }
        let mut volumes = [VehiclesPerHour::default(); HOURS_PER_DAY];
        for (hour, (slot, value)) in volumes.iter_mut().zip(values).enumerate() {
            if value > MAX_BASE_VOLUME {
                return Err(format!(
                    "volume {value} at hour {hour} exceeds {MAX_BASE_VOLUME} veh/h"
                ));
            }
            *slot = VehiclesPerHour::try_from(value)
                .map_err(|_| format!("invalid volume {value} at hour {hour}"))?;
        }
        Ok(HistoricalVolumeProfile(volumes))
    }
}
