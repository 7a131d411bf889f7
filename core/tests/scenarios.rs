// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

use chrono::{NaiveDate, NaiveDateTime};
use congestion_core::network::profile::MAX_BASE_VOLUME;
use congestion_core::network::{NetworkDescription, SegmentDescriptor};
use congestion_core::parameters::{ModelParameters, UnmappedRoutePolicy};
use congestion_core::units::*;
use congestion_core::{
    CongestionError, CongestionLevel, CongestionModel, ContextualDemandAdjuster, Recommendation,
    TrafficPattern, Weather,
};

fn segment(id: &str) -> SegmentDescriptor {
    SegmentDescriptor {
        id: id.to_owned(),
        name: format!("Segment {id}"),
        length: 1.0,
        lanes: 2,
        capacity: Some(3600.0),
        speed_limit: 60.0,
        ..Default::default()
    }
}

/// Wednesday at noon: all the demand factors are equal to 1.
fn neutral_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 6)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Network where segment `X{v}` has a constant base volume `v`.
fn network(volumes: &[(&str, f64)]) -> NetworkDescription {
    let mut description = NetworkDescription::default();
    for &(id, volume) in volumes {
        description.segments.push(segment(id));
        description
            .volume_profiles
            .insert(id.to_owned(), vec![volume; 24]);
    }
    description
}

#[test]
fn stable_regime_scenario() {
    let model = CongestionModel::from_description(
        NetworkDescription {
            segments: vec![segment("S")],
            ..Default::default()
        },
        ModelParameters::default(),
    )
    .unwrap();
    let flow = model
        .compute_flow("S", VehiclesPerHour::try_from(1800.0).unwrap())
        .unwrap();
    assert_eq!(flow.vc_ratio, 0.5);
    assert!(flow.speed.value() >= 40.0 && flow.speed.value() <= 55.0);
    assert!(matches!(
        flow.level,
        CongestionLevel::Light | CongestionLevel::Moderate
    ));
}

#[test]
fn congested_regime_scenario() {
    let model = CongestionModel::from_description(
        NetworkDescription {
            segments: vec![segment("S")],
            ..Default::default()
        },
        ModelParameters::default(),
    )
    .unwrap();
    let flow = model
        .compute_flow("S", VehiclesPerHour::try_from(5400.0).unwrap())
        .unwrap();
    assert_eq!(flow.vc_ratio, 1.5);
    assert!(flow.speed.value() < 20.0);
    assert_eq!(flow.level, CongestionLevel::Severe);
}

#[test]
fn demand_adjustment_scenarios() {
    let adjuster = ContextualDemandAdjuster;
    let base = VehiclesPerHour::try_from(1000.0).unwrap();
    let pattern = TrafficPattern::new(8, 1, 3, false, Weather::Clear, false).unwrap();
    let adjusted = adjuster.adjust_volume(base, &pattern);
    assert!((adjusted.value() - 1430.0).abs() < 1e-9);
    let holiday = pattern.with_holiday(true);
    let adjusted = adjuster.adjust_volume(base, &holiday);
    assert!((adjusted.value() - 858.0).abs() < 1e-9);
}

#[test]
fn unknown_segment_scenario() {
    let model =
        CongestionModel::from_description(network(&[("A", 500.0)]), ModelParameters::default())
            .unwrap();
    let t = neutral_time();
    let err = model
        .predict("missing", t, &TrafficPattern::baseline(t))
        .unwrap_err();
    assert_eq!(err, CongestionError::SegmentNotFound("missing".to_owned()));
    assert!(err.is_not_found());
}

#[test]
fn route_thresholds_scenario() {
    // Five moderate segments (vc = 0.75): score 5 * 6 = 30.
    let ids = ["M1", "M2", "M3", "M4", "M5"];
    let volumes: Vec<(&str, f64)> = ids.iter().map(|&id| (id, 2700.0)).collect();
    let mut description = network(&volumes);
    description.routes.insert(
        "R30".to_owned(),
        ids.iter().map(|&id| id.to_owned()).collect(),
    );
    let model = CongestionModel::from_description(description, ModelParameters::default()).unwrap();
    let t = neutral_time();
    let pattern = TrafficPattern::baseline(t);
    assert_eq!(
        model.predict("M1", t, &pattern).unwrap().level(),
        CongestionLevel::Moderate
    );
    let optimization = model
        .optimize_for_congestion(&["R30".to_owned()], t, &pattern)
        .unwrap();
    assert_eq!(optimization.optimized_routes, vec!["R30".to_owned()]);
    assert_eq!(optimization.route_scores[0].score, 30);
    assert!((optimization.route_scores[0].reduction - 0.55).abs() < 1e-12);
    assert!((optimization.congestion_reduction - 0.55).abs() < 1e-12);
    assert_eq!(
        optimization.recommendations,
        vec![
            Recommendation::Reschedule {
                route_id: "R30".to_owned()
            },
            Recommendation::ReduceFrequency {
                route_id: "R30".to_owned()
            },
        ]
    );
}

#[test]
fn congestion_reduction_is_averaged_test() {
    // R1: one severe segment (score 12, no recommendation).
    // R2: two severe segments (score 24, reschedule only).
    let mut description = network(&[("S1", 5400.0), ("S2", 5400.0)]);
    description.routes.insert("R1".to_owned(), vec!["S1".to_owned()]);
    description
        .routes
        .insert("R2".to_owned(), vec!["S1".to_owned(), "S2".to_owned()]);
    let model = CongestionModel::from_description(description, ModelParameters::default()).unwrap();
    let t = neutral_time();
    let optimization = model
        .optimize_for_congestion(
            &["R1".to_owned(), "R2".to_owned()],
            t,
            &TrafficPattern::baseline(t),
        )
        .unwrap();
    let scores: Vec<u32> = optimization.route_scores.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![12, 24]);
    assert_eq!(optimization.recommendations.len(), 1);
    assert!((optimization.congestion_reduction - 0.10).abs() < 1e-12);
    // No routes.
    let optimization = model
        .optimize_for_congestion(&[], t, &TrafficPattern::baseline(t))
        .unwrap();
    assert_eq!(optimization.congestion_reduction, 0.0);
    assert!(optimization.recommendations.is_empty());
}

#[test]
fn unmapped_route_policy_test() {
    let t = neutral_time();
    let pattern = TrafficPattern::baseline(t);
    let model =
        CongestionModel::from_description(network(&[("A", 5400.0)]), ModelParameters::default())
            .unwrap();
    let err = model
        .optimize_for_congestion(&["ghost".to_owned()], t, &pattern)
        .unwrap_err();
    assert_eq!(err, CongestionError::RouteNotFound("ghost".to_owned()));
    let parameters = ModelParameters {
        unmapped_routes: UnmappedRoutePolicy::DefaultSegments(vec!["A".to_owned(); 2]),
        ..Default::default()
    };
    let model = CongestionModel::from_description(network(&[("A", 5400.0)]), parameters).unwrap();
    let optimization = model
        .optimize_for_congestion(&["ghost".to_owned()], t, &pattern)
        .unwrap();
    assert_eq!(optimization.route_scores[0].score, 24);
    assert_eq!(optimization.route_scores[0].nb_segments, 2);
}

#[test]
fn oversized_volume_profile_test() {
    let err = CongestionModel::from_description(
        network(&[("A", 1e308)]),
        ModelParameters::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CongestionError::InvalidProfile { .. }));
    assert!(err.is_invalid_input());

    // The largest accepted volume, with all the increasing factors, gives finite predictions.
    let model = CongestionModel::from_description(
        network(&[("A", MAX_BASE_VOLUME)]),
        ModelParameters::default(),
    )
    .unwrap();
    // Monday at 08:00.
    let t = NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let pattern = TrafficPattern::from_datetime(t, Weather::Rain, false, true);
    let prediction = model.predict("A", t, &pattern).unwrap();
    assert!(prediction.predicted_volume().value().is_finite());
    assert!(prediction.predicted_density().value().is_finite());
    assert_eq!(prediction.level(), CongestionLevel::Severe);
    let summary = model.compute_system_impact(t, &pattern).unwrap();
    assert!(summary.total_delay.is_finite());
    assert!(summary.total_vehicle_km.is_finite());
}

#[test]
fn system_impact_test() {
    // Free flow (900 veh/h) on a 1 km segment and light congestion (1800 veh/h) on a 3 km segment.
    let mut description = network(&[("A", 900.0), ("B", 1800.0)]);
    description.segments[1].length = 3.0;
    let model = CongestionModel::from_description(description, ModelParameters::default()).unwrap();
    let t = neutral_time();
    let summary = model
        .compute_system_impact(t, &TrafficPattern::baseline(t))
        .unwrap();
    assert_eq!(summary.nb_segments, 2);
    let expected_speed = (52.5 * 900.0 + 45.0 * 5400.0) / 6300.0;
    assert!((summary.average_speed - expected_speed).abs() < 1e-9);
    let expected_delay = 900.0 * (1.0 / 52.5 - 1.0 / 60.0) + 1800.0 * (3.0 / 45.0 - 3.0 / 60.0);
    assert!((summary.total_delay - expected_delay).abs() < 1e-9);
    assert!((summary.congestion_cost - 25.0 * expected_delay).abs() < 1e-9);
    // Only the light segment has extra emissions and fuel.
    assert!((summary.emission_increase - 5400.0 * 0.1 * 0.25).abs() < 1e-9);
    assert!((summary.fuel_waste - 5400.0 * 0.05 * 0.08).abs() < 1e-9);
    assert_eq!(summary.level_distribution[&CongestionLevel::FreeFlow], 1);
    assert_eq!(summary.level_distribution[&CongestionLevel::Light], 1);
}

#[test]
fn system_impact_records_state_test() {
    let model = CongestionModel::from_description(
        network(&[("A", 900.0), ("B", 5400.0)]),
        ModelParameters::default(),
    )
    .unwrap();
    let t = neutral_time();
    let pattern = TrafficPattern::baseline(t);
    let mut state = congestion_core::network::NetworkState::new();
    model
        .compute_system_impact_with_state(t, &pattern, &mut state)
        .unwrap();
    assert_eq!(state.len(), 2);
    assert_eq!(state.get("B").unwrap().level, CongestionLevel::Severe);
    // A second evaluation in another context overwrites the states.
    let night = NaiveDate::from_ymd_opt(2024, 3, 6)
        .unwrap()
        .and_hms_opt(3, 0, 0)
        .unwrap();
    model
        .compute_system_impact_with_state(night, &TrafficPattern::baseline(night), &mut state)
        .unwrap();
    assert_eq!(state.len(), 2);
    assert!((state.get("B").unwrap().volume.value() - 3240.0).abs() < 1e-9);
}
