// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Prediction of the congestion of road segments for a given time and context.
use std::fmt;

use chrono::NaiveDateTime;
use log::{debug, trace};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::Serializer;
use serde_derive::Serialize;

use crate::congestion::CongestionLevel;
use crate::demand::{ContextualDemandAdjuster, TrafficPattern, Weather};
use crate::error::Result;
use crate::flow::TrafficFlowEngine;
use crate::network::{RoadNetworkRegistry, SegmentId};
use crate::units::*;

const BASE_CONFIDENCE: i32 = 75;
const PROFILE_CONFIDENCE_BONUS: i32 = 15;
const DAYTIME_CONFIDENCE_BONUS: i32 = 10;
const WEATHER_CONFIDENCE_PENALTY: i32 = 10;
const MIN_CONFIDENCE: i32 = 30;
const MAX_CONFIDENCE: i32 = 95;

/// Format of the time-slot label of a prediction.
const TIME_SLOT_FORMAT: &str = "%Y-%m-%d %H:00";

/// Reason explaining the predicted congestion of a segment.
///
/// A factor is serialized as its human-readable description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContributingFactor {
    PeakHour,
    RainyWeather,
    SpecialEvent,
    MondayFridayPattern,
    CapacityConstraint,
}

impl fmt::Display for ContributingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeakHour => f.write_str("Peak hour traffic"),
            Self::RainyWeather => f.write_str("Rainy weather conditions"),
            Self::SpecialEvent => f.write_str("Special event in area"),
            Self::MondayFridayPattern => f.write_str("Monday/Friday traffic pattern"),
            Self::CapacityConstraint => f.write_str("Road capacity constraints"),
        }
    }
}

impl serde::Serialize for ContributingFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl JsonSchema for ContributingFactor {
    fn schema_name() -> String {
        "ContributingFactor".to_owned()
    }
    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// Predicted congestion of a road segment for a time slot.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
pub struct CongestionPrediction {
    segment_id: SegmentId,
    /// Hour of the prediction, formatted as `YYYY-MM-DD HH:00`.
    time_slot: String,
    predicted_volume: VehiclesPerHour,
    predicted_speed: KilometersPerHour,
    predicted_density: VehiclesPerKilometer,
    delay_factor: f64,
    level: CongestionLevel,
    /// Confidence of the prediction, in percent (between 30 and 95).
    confidence: u8,
    /// Factors explaining the prediction, in a fixed order.
    factors: Vec<ContributingFactor>,
}

impl CongestionPrediction {
    pub fn segment_id(&self) -> &str {
        &self.segment_id
    }

    pub fn time_slot(&self) -> &str {
        &self.time_slot
    }

    pub const fn predicted_volume(&self) -> VehiclesPerHour {
        self.predicted_volume
    }

    pub const fn predicted_speed(&self) -> KilometersPerHour {
        self.predicted_speed
    }

    pub const fn predicted_density(&self) -> VehiclesPerKilometer {
        self.predicted_density
    }

    pub const fn delay_factor(&self) -> f64 {
        self.delay_factor
    }

    pub const fn level(&self) -> CongestionLevel {
        self.level
    }

    pub const fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn factors(&self) -> &[ContributingFactor] {
        &self.factors
    }
}

/// Returns the confidence of a prediction, in percent.
fn confidence(has_profile: bool, pattern: &TrafficPattern) -> u8 {
    let mut confidence = BASE_CONFIDENCE;
    if has_profile {
        confidence += PROFILE_CONFIDENCE_BONUS;
    }
    if (6..=20).contains(&pattern.hour()) {
        confidence += DAYTIME_CONFIDENCE_BONUS;
    }
    if pattern.weather() != Weather::Clear {
        confidence -= WEATHER_CONFIDENCE_PENALTY;
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8
}

/// Returns the factors explaining a prediction.
fn contributing_factors(
    pattern: &TrafficPattern,
    level: CongestionLevel,
) -> Vec<ContributingFactor> {
    let mut factors = Vec::new();
    if pattern.is_peak_hour() {
        factors.push(ContributingFactor::PeakHour);
    }
    if pattern.weather() == Weather::Rain {
        factors.push(ContributingFactor::RainyWeather);
    }
    if pattern.special_event() {
        factors.push(ContributingFactor::SpecialEvent);
    }
    if pattern.is_monday_or_friday() {
        factors.push(ContributingFactor::MondayFridayPattern);
    }
    if level == CongestionLevel::Severe {
        factors.push(ContributingFactor::CapacityConstraint);
    }
    factors
}

/// Predicts the congestion of the segments of a road network.
///
/// The predictor borrows the registry: it never owns nor mutates segment data.
#[derive(Clone, Copy, Debug)]
pub struct CongestionPredictor<'a> {
    registry: &'a RoadNetworkRegistry,
    adjuster: ContextualDemandAdjuster,
    engine: TrafficFlowEngine,
    default_base_volume: VehiclesPerHour,
}

impl<'a> CongestionPredictor<'a> {
    /// Creates a new CongestionPredictor.
    pub fn new(
        registry: &'a RoadNetworkRegistry,
        engine: TrafficFlowEngine,
        default_base_volume: VehiclesPerHour,
    ) -> Self {
        CongestionPredictor {
            registry,
            adjuster: ContextualDemandAdjuster,
            engine,
            default_base_volume,
        }
    }

    /// Returns the historical base volume of a segment for the hour of the pattern.
    ///
    /// Segments without volume profile use the default base volume.
    fn base_volume(
        &self,
        segment_id: &str,
        pattern: &TrafficPattern,
    ) -> (VehiclesPerHour, bool) {
        match self.registry.profile(segment_id) {
            Some(profile) => (profile.volume_at(pattern.hour()), true),
            None => {
                trace!("No volume profile for segment {segment_id}, using the default volume");
                (self.default_base_volume, false)
            }
        }
    }

    /// Predicts the congestion of a segment at the given time, in the given context.
    ///
    /// Returns an error if the segment does not exist.
    pub fn predict(
        &self,
        segment_id: &str,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<CongestionPrediction> {
        let segment = self.registry.segment(segment_id)?;
        let (base_volume, has_profile) = self.base_volume(segment_id, pattern);
        let volume = self.adjuster.adjust_volume(base_volume, pattern);
        let flow = self.engine.compute_flow(segment, volume);
        debug!(
            "Segment {segment_id}: volume {volume}, speed {}, level {}",
            flow.speed, flow.level
        );
        Ok(CongestionPrediction {
            segment_id: segment_id.to_owned(),
            time_slot: target_time.format(TIME_SLOT_FORMAT).to_string(),
            predicted_volume: flow.volume,
            predicted_speed: flow.speed,
            predicted_density: flow.density,
            delay_factor: flow.delay_factor,
            level: flow.level,
            confidence: confidence(has_profile, pattern),
            factors: contributing_factors(pattern, flow.level),
        })
    }

    /// Predicts the congestion of all the segments of the network, in registry order.
    pub fn predict_all(
        &self,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<Vec<CongestionPrediction>> {
        self.registry
            .segments()
            .iter()
            .map(|segment| self.predict(segment.id(), target_time, pattern))
            .collect()
    }

    /// Returns the registry used by the predictor.
    pub const fn registry(&self) -> &'a RoadNetworkRegistry {
        self.registry
    }

    /// Returns the flow engine used by the predictor.
    pub const fn engine(&self) -> &TrafficFlowEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::CongestionError;
    use crate::network::{NetworkDescription, SegmentDescriptor};

    fn registry() -> RoadNetworkRegistry {
        let segment = |id: &str| SegmentDescriptor {
            id: id.to_owned(),
            length: 1.0,
            lanes: 2,
            capacity: Some(3600.0),
            speed_limit: 60.0,
            ..Default::default()
        };
        let mut description = NetworkDescription {
            segments: vec![segment("A"), segment("B")],
            ..Default::default()
        };
        description
            .volume_profiles
            .insert("A".to_owned(), vec![2000.0; 24]);
        RoadNetworkRegistry::from_description(description).unwrap()
    }

    fn predictor(registry: &RoadNetworkRegistry) -> CongestionPredictor<'_> {
        CongestionPredictor::new(
            registry,
            TrafficFlowEngine::default(),
            VehiclesPerHour::new_unchecked(1000.0),
        )
    }

    fn time(day: u32, hour: u32) -> NaiveDateTime {
        // March 2024: the 4th is a Monday, the 6th a Wednesday, the 9th a Saturday.
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 35, 0)
            .unwrap()
    }

    #[test]
    fn predict_test() {
        let registry = registry();
        let predictor = predictor(&registry);
        let t = time(4, 8);
        let pattern = TrafficPattern::baseline(t);
        let prediction = predictor.predict("B", t, &pattern).unwrap();
        assert_eq!(prediction.time_slot(), "2024-03-04 08:00");
        assert!((prediction.predicted_volume().value() - 1430.0).abs() < 1e-9);
        assert_eq!(prediction.confidence(), 85);
        assert_eq!(
            prediction.factors(),
            &[
                ContributingFactor::PeakHour,
                ContributingFactor::MondayFridayPattern
            ]
        );
        // Segment with a profile: 2000 * 1.3 * 1.1 = 2860.
        let prediction = predictor.predict("A", t, &pattern).unwrap();
        assert!((prediction.predicted_volume().value() - 2860.0).abs() < 1e-9);
        assert_eq!(prediction.confidence(), 95);
    }

    #[test]
    fn unknown_segment_test() {
        let registry = registry();
        let predictor = predictor(&registry);
        let t = time(4, 8);
        let err = predictor
            .predict("Z", t, &TrafficPattern::baseline(t))
            .unwrap_err();
        assert_eq!(err, CongestionError::SegmentNotFound("Z".to_owned()));
        assert!(err.is_not_found());
    }

    #[test]
    fn confidence_test() {
        let night = TrafficPattern::baseline(time(6, 2));
        assert_eq!(confidence(false, &night), 75);
        assert_eq!(confidence(false, &night.with_weather(Weather::Fog)), 65);
        let day = TrafficPattern::baseline(time(6, 20));
        assert_eq!(confidence(true, &day), 95);
        assert_eq!(confidence(true, &day.with_weather(Weather::Rain)), 90);
        assert_eq!(confidence(false, &day.with_weather(Weather::Rain)), 75);
    }

    #[test]
    fn factors_order_test() {
        let pattern = TrafficPattern::baseline(time(4, 18))
            .with_weather(Weather::Rain)
            .with_special_event(true);
        assert_eq!(
            contributing_factors(&pattern, CongestionLevel::Severe),
            vec![
                ContributingFactor::PeakHour,
                ContributingFactor::RainyWeather,
                ContributingFactor::SpecialEvent,
                ContributingFactor::MondayFridayPattern,
                ContributingFactor::CapacityConstraint,
            ]
        );
        // Fog is not reported as a factor.
        let pattern = TrafficPattern::baseline(time(6, 13)).with_weather(Weather::Fog);
        assert!(contributing_factors(&pattern, CongestionLevel::Light).is_empty());
        assert_eq!(
            ContributingFactor::CapacityConstraint.to_string(),
            "Road capacity constraints"
        );
        assert_eq!(
            serde_json::to_value(ContributingFactor::MondayFridayPattern).unwrap(),
            serde_json::json!("Monday/Friday traffic pattern")
        );
    }

    #[test]
    fn predict_all_test() {
        let registry = registry();
        let predictor = predictor(&registry);
        let t = time(9, 12);
        let predictions = predictor
            .predict_all(t, &TrafficPattern::baseline(t))
            .unwrap();
        let ids: Vec<&str> = predictions.iter().map(|p| p.segment_id()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
