// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Everything related to the road network: segments, historical volumes and routes.
pub mod profile;
pub mod segment;
pub mod state;

use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::debug;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

pub use self::profile::HistoricalVolumeProfile;
pub use self::segment::{Coordinates, RoadSegment, RoadType, SegmentDescriptor};
pub use self::state::{NetworkState, SegmentState};
use crate::error::{CongestionError, Result};

/// Identifier of a road segment.
pub type SegmentId = String;
/// Identifier of a route.
pub type RouteId = String;

/// Description of a road network, as read from the input files.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct NetworkDescription {
    /// Road segments of the network.
    pub segments: Vec<SegmentDescriptor>,
    /// Historical base volumes (24 hourly values) for some of the segments, keyed by segment id.
    #[serde(default)]
    pub volume_profiles: BTreeMap<SegmentId, Vec<f64>>,
    /// Ordered list of segment ids of each route, keyed by route id.
    #[serde(default)]
    pub routes: BTreeMap<RouteId, Vec<SegmentId>>,
}

/// Catalog of the road segments of a network, with their historical volume profiles and the
/// mapping from routes to segments.
///
/// The registry is populated once, when the network is initialized, and is only read afterwards.
/// Other components refer to segments through their [SegmentId].
#[derive(Clone, Debug, Default)]
pub struct RoadNetworkRegistry {
    /// Segments, in insertion order.
    segments: Vec<RoadSegment>,
    /// Mapping from segment id to index in `segments`.
    segment_map: HashMap<SegmentId, usize>,
    /// Historical volume profile of the segments which have one.
    profiles: HashMap<SegmentId, HistoricalVolumeProfile>,
    /// Ordered segments of each route.
    routes: HashMap<RouteId, Vec<SegmentId>>,
}

impl RoadNetworkRegistry {
    /// Creates a RoadNetworkRegistry with the given segments, without volume profiles or routes.
    ///
    /// Returns an error if a descriptor is invalid or if two segments share the same id.
    pub fn from_segments(descriptors: Vec<SegmentDescriptor>) -> Result<Self> {
        let mut registry = RoadNetworkRegistry {
            segments: Vec::with_capacity(descriptors.len()),
            segment_map: HashMap::with_capacity(descriptors.len()),
            ..Default::default()
        };
        for descriptor in descriptors {
            registry.add_segment(descriptor)?;
        }
        Ok(registry)
    }

    /// Creates a RoadNetworkRegistry from a complete [NetworkDescription].
    pub fn from_description(description: NetworkDescription) -> Result<Self> {
        let mut registry = Self::from_segments(description.segments)?;
        for (segment_id, values) in description.volume_profiles {
            registry.add_profile(segment_id, values)?;
        }
        for (route_id, segments) in description.routes {
            registry.add_route(route_id, segments)?;
        }
        debug!(
            "Road network initialized with {} segments, {} volume profiles and {} routes",
            registry.nb_segments(),
            registry.profiles.len(),
            registry.routes.len()
        );
        Ok(registry)
    }

    fn add_segment(&mut self, descriptor: SegmentDescriptor) -> Result<()> {
        let segment = RoadSegment::from_descriptor(descriptor)?;
        if self.segment_map.contains_key(segment.id()) {
            return Err(CongestionError::DuplicateSegment(segment.id().to_owned()));
        }
        self.segment_map.insert(segment.id().to_owned(), self.segments.len());
        self.segments.push(segment);
        Ok(())
    }

    /// Sets the historical volume profile of a segment.
    ///
    /// Returns an error if the segment is unknown or if the profile does not have exactly 24
    /// non-negative values.
    pub fn add_profile(&mut self, segment_id: SegmentId, values: Vec<f64>) -> Result<()> {
        if !self.contains(&segment_id) {
            return Err(CongestionError::InvalidProfile {
                id: segment_id,
                reason: "unknown segment".to_owned(),
            });
        }
        let profile = HistoricalVolumeProfile::try_from(values).map_err(|reason| {
            CongestionError::InvalidProfile {
                id: segment_id.clone(),
                reason,
            }
        })?;
        self.profiles.insert(segment_id, profile);
        Ok(())
    }

    /// Sets the ordered list of segments of a route.
    ///
    /// Returns an error if the route is empty or if it references an unknown segment.
    pub fn add_route(&mut self, route_id: RouteId, segments: Vec<SegmentId>) -> Result<()> {
        if segments.is_empty() {
            return Err(CongestionError::InvalidRoute {
                id: route_id,
                reason: "a route must have at least one segment".to_owned(),
            });
        }
        if let Some(unknown) = segments.iter().find(|s| !self.contains(s)) {
            return Err(CongestionError::InvalidRoute {
                reason: format!("unknown segment `{unknown}`"),
                id: route_id,
            });
        }
        self.routes.insert(route_id, segments);
        Ok(())
    }

    /// Returns the number of segments in the network.
    pub fn nb_segments(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the network has a segment with the given id.
    pub fn contains(&self, segment_id: &str) -> bool {
        self.segment_map.contains_key(segment_id)
    }

    /// Returns the segment with the given id.
    pub fn segment(&self, segment_id: &str) -> Result<&RoadSegment> {
        self.segment_map
            .get(segment_id)
            .map(|&idx| &self.segments[idx])
            .ok_or_else(|| CongestionError::SegmentNotFound(segment_id.to_owned()))
    }

    /// Returns the segments of the network, in insertion order.
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    /// Returns the historical volume profile of a segment, if it has one.
    pub fn profile(&self, segment_id: &str) -> Option<&HistoricalVolumeProfile> {
        self.profiles.get(segment_id)
    }

    /// Returns the ordered segments of a route, if the route is mapped.
    pub fn route(&self, route_id: &str) -> Option<&[SegmentId]> {
        self.routes.get(route_id).map(|s| s.as_slice())
    }

    /// Returns `true` if all the given segment ids are known.
    pub(crate) fn contains_all<'a>(
        &self,
        mut segment_ids: impl Iterator<Item = &'a SegmentId>,
    ) -> bool {
        segment_ids.all(|s| self.contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> SegmentDescriptor {
        SegmentDescriptor {
            id: id.to_owned(),
            length: 1.0,
            lanes: 2,
            capacity: Some(3600.0),
            speed_limit: 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn registry_test() {
        let mut description = NetworkDescription {
            segments: vec![descriptor("A"), descriptor("B"), descriptor("C")],
            ..Default::default()
        };
        description
            .volume_profiles
            .insert("B".to_owned(), vec![500.0; 24]);
        description
            .routes
            .insert("R1".to_owned(), vec!["A".to_owned(), "C".to_owned()]);
        let registry = RoadNetworkRegistry::from_description(description).unwrap();
        assert_eq!(registry.nb_segments(), 3);
        let ids: Vec<&str> = registry.segments().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert!(registry.segment("B").is_ok());
        assert!(registry.profile("A").is_none());
        assert_eq!(registry.profile("B").unwrap().volume_at(3).value(), 500.0);
        assert_eq!(
            registry.route("R1").unwrap(),
            &["A".to_owned(), "C".to_owned()]
        );
        assert!(registry.route("R2").is_none());
        assert_eq!(
            registry.segment("Z").unwrap_err(),
            CongestionError::SegmentNotFound("Z".to_owned())
        );
    }

    #[test]
    fn duplicate_segment_test() {
        let err = RoadNetworkRegistry::from_segments(vec![descriptor("A"), descriptor("A")])
            .unwrap_err();
        assert_eq!(err, CongestionError::DuplicateSegment("A".to_owned()));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn invalid_profile_and_route_test() {
        let mut registry = RoadNetworkRegistry::from_segments(vec![descriptor("A")]).unwrap();
        assert!(matches!(
            registry.add_profile("B".to_owned(), vec![1.0; 24]),
            Err(CongestionError::InvalidProfile { .. })
        ));
        assert!(matches!(
            registry.add_profile("A".to_owned(), vec![1.0; 12]),
            Err(CongestionError::InvalidProfile { .. })
        ));
        assert!(matches!(
            registry.add_route("R".to_owned(), vec![]),
            Err(CongestionError::InvalidRoute { .. })
        ));
        assert!(matches!(
            registry.add_route("R".to_owned(), vec!["A".to_owned(), "B".to_owned()]),
            Err(CongestionError::InvalidRoute { .. })
        ));
        assert!(registry.add_route("R".to_owned(), vec!["A".to_owned()]).is_ok());
    }

    #[test]
    fn deserialize_description_test() {
        let json = r#"{
            "segments": [
                {"id": "A", "length": 1.5, "lanes": 2, "speed_limit": 50.0, "road_type": "collector"}
            ],
            "volume_profiles": {"A": [10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10,
                                      10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10]}
        }"#;
        let description: NetworkDescription = serde_json::from_str(json).unwrap();
        let registry = RoadNetworkRegistry::from_description(description).unwrap();
        let segment = registry.segment("A").unwrap();
        assert_eq!(segment.road_type(), RoadType::Collector);
        assert_eq!(segment.capacity().value(), 2400.0);
        assert!(registry.profile("A").is_some());
    }
}
