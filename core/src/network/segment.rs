// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Description of the road segments of a road network.
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use super::SegmentId;
use crate::error::{CongestionError, Result};
use crate::units::*;

/// Functional class of a road segment.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Highway,
    #[default]
    Arterial,
    Collector,
    Local,
}

impl RoadType {
    /// Returns the hourly capacity of one lane of a road of this type.
    pub const fn lane_capacity(self) -> f64 {
        match self {
            Self::Highway => 2000.0,
            Self::Arterial => 1600.0,
            Self::Collector => 1200.0,
            Self::Local => 800.0,
        }
    }
}

/// Geographic coordinates in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Coordinates {
    /// Latitude, between -90 and 90.
    pub lat: f64,
    /// Longitude, between -180 and 180.
    pub lon: f64,
}

impl Coordinates {
    /// Creates new coordinates.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Coordinates { lat, lon }
    }

    fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Raw description of a road segment, as supplied by the network loader.
///
/// A descriptor is turned into a [RoadSegment] with [RoadSegment::from_descriptor], which checks
/// all the constraints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SegmentDescriptor {
    /// Unique identifier of the segment.
    pub id: SegmentId,
    /// Human-readable name of the segment.
    #[serde(default)]
    pub name: String,
    /// Coordinates of the start of the segment.
    #[serde(default)]
    pub start: Coordinates,
    /// Coordinates of the end of the segment.
    #[serde(default)]
    pub end: Coordinates,
    /// Length of the segment, in kilometers.
    pub length: f64,
    /// Number of lanes.
    pub lanes: u32,
    /// Hourly capacity of the segment (all lanes), in vehicles per hour.
    ///
    /// When omitted, the capacity is derived from the number of lanes and the road type.
    #[serde(default)]
    pub capacity: Option<f64>,
    /// Functional class of the segment.
    #[serde(default)]
    pub road_type: RoadType,
    /// Legal speed limit, in kilometers per hour.
    pub speed_limit: f64,
}

/// A directed road segment.
///
/// The attributes of a RoadSegment are static: they are set once when the network is initialized.
/// The dynamic state of the segment (current speed, volume and density) is held separately, in a
/// [NetworkState](super::NetworkState).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoadSegment {
    id: SegmentId,
    name: String,
    start: Coordinates,
    end: Coordinates,
    length: Kilometers,
    lanes: Lanes,
    capacity: VehiclesPerHour,
    road_type: RoadType,
    speed_limit: KilometersPerHour,
}

impl RoadSegment {
    /// Creates a RoadSegment from a [SegmentDescriptor].
    ///
    /// Returns an error if the length, the number of lanes, the capacity or the speed limit are not
    /// positive, or if the coordinates are out of range.
    pub fn from_descriptor(descriptor: SegmentDescriptor) -> Result<Self> {
        let invalid = |reason: String| CongestionError::InvalidSegment {
            id: descriptor.id.clone(),
            reason,
        };
        if descriptor.id.is_empty() {
            return Err(invalid("the id cannot be empty".to_owned()));
        }
        let length = Kilometers::try_from(descriptor.length).map_err(|_| {
            invalid(format!(
                "length must be positive, got {}",
                descriptor.length
            ))
        })?;
        let lanes = Lanes::try_from(descriptor.lanes).map_err(|e| invalid(e.to_string()))?;
        let speed_limit = KilometersPerHour::try_from(descriptor.speed_limit).map_err(|_| {
            invalid(format!(
                "speed limit must be positive, got {}",
                descriptor.speed_limit
            ))
        })?;
        let capacity = descriptor
            .capacity
            .unwrap_or_else(|| descriptor.road_type.lane_capacity() * f64::from(lanes));
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(invalid(format!("capacity must be positive, got {capacity}")));
        }
        if !descriptor.start.is_valid() || !descriptor.end.is_valid() {
            return Err(invalid("coordinates are out of range".to_owned()));
        }
        Ok(RoadSegment {
            capacity: VehiclesPerHour::new_unchecked(capacity),
            id: descriptor.id,
            name: descriptor.name,
            start: descriptor.start,
            end: descriptor.end,
            length,
            lanes,
            road_type: descriptor.road_type,
            speed_limit,
        })
    }

    /// Returns the id of the segment.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the name of the segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the coordinates of the start and end of the segment.
    pub const fn coordinates(&self) -> (Coordinates, Coordinates) {
        (self.start, self.end)
    }

    /// Returns the length of the segment.
    pub const fn length(&self) -> Kilometers {
        self.length
    }

    /// Returns the number of lanes of the segment.
    pub const fn lanes(&self) -> Lanes {
        self.lanes
    }

    /// Returns the hourly capacity of the segment (all lanes).
    pub const fn capacity(&self) -> VehiclesPerHour {
        self.capacity
    }

    /// Returns the functional class of the segment.
    pub const fn road_type(&self) -> RoadType {
        self.road_type
    }

    /// Returns the speed limit of the segment.
    pub const fn speed_limit(&self) -> KilometersPerHour {
        self.speed_limit
    }

    /// Returns the time needed to travel through the segment at the speed limit.
    pub fn free_flow_travel_time(&self) -> Hours {
        self.length / self.speed_limit
    }
}
