// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Network-wide aggregation of the economic and environmental impact of congestion.
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rayon::prelude::*;
use schemars::JsonSchema;
use serde_derive::Serialize;

use crate::congestion::CongestionLevel;
use crate::demand::TrafficPattern;
use crate::error::Result;
use crate::flow::FlowState;
use crate::network::{NetworkState, RoadSegment, SegmentId};
use crate::prediction::CongestionPredictor;
use crate::progress_bar::ScanProgressBar;
use crate::units::*;

/// Monetary and environmental rates used to value the impact of congestion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactRates {
    /// Cost of one vehicle-hour of delay.
    pub value_of_time: f64,
    /// Additional emissions per vehicle-kilometer and per unit of emission multiplier above 1.
    pub emission_rate: f64,
    /// Additional fuel per vehicle-kilometer and per unit of fuel multiplier above 1.
    pub fuel_rate: f64,
}

/// Impact of the traffic on a single road segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentImpact {
    pub segment_id: SegmentId,
    pub flow: FlowState,
    /// Vehicle-kilometers traveled on the segment during one hour.
    pub vehicle_km: f64,
    /// Vehicle-hours lost compared to traveling at the speed limit.
    pub delay: Hours,
    pub emission_increase: f64,
    pub fuel_waste: f64,
}

impl SegmentImpact {
    /// Computes the impact of the given flow state on a segment.
    pub fn new(segment: &RoadSegment, flow: FlowState, rates: &ImpactRates) -> Self {
        let vehicle_km = flow.volume.value() * segment.length().value();
        // Travel time difference, saturating at zero when the speed floor exceeds the limit.
        let extra_time = flow.travel_time(segment) - segment.free_flow_travel_time();
        SegmentImpact {
            segment_id: segment.id().to_owned(),
            vehicle_km,
            delay: extra_time * flow.volume.value(),
            emission_increase: vehicle_km
                * (flow.level.emission_multiplier() - 1.0)
                * rates.emission_rate,
            fuel_waste: vehicle_km * (flow.level.fuel_multiplier() - 1.0) * rates.fuel_rate,
            flow,
        }
    }
}

/// Network-wide impact of the congestion for a time slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, JsonSchema)]
pub struct SystemImpactSummary {
    /// Average speed on the network, weighted by the vehicle-kilometers of each segment (km/h).
    pub average_speed: f64,
    /// Total delay, in vehicle-hours.
    pub total_delay: f64,
    /// Total delay valued at the value of time.
    pub congestion_cost: f64,
    pub emission_increase: f64,
    pub fuel_waste: f64,
    /// Total vehicle-kilometers traveled on the network.
    pub total_vehicle_km: f64,
    /// Number of segments evaluated.
    pub nb_segments: usize,
    /// Number of segments at each congestion level.
    pub level_distribution: BTreeMap<CongestionLevel, usize>,
}

impl SystemImpactSummary {
    /// Aggregates the impacts of the segments, in the given order.
    pub fn from_segments(impacts: &[SegmentImpact], rates: &ImpactRates) -> Self {
        let mut summary = SystemImpactSummary {
            nb_segments: impacts.len(),
            level_distribution: CongestionLevel::ALL.into_iter().map(|l| (l, 0)).collect(),
            ..Default::default()
        };
        let mut weighted_speed = 0.0;
        for impact in impacts {
            summary.total_vehicle_km += impact.vehicle_km;
            weighted_speed += impact.flow.speed.value() * impact.vehicle_km;
            summary.total_delay += impact.delay.value();
            summary.emission_increase += impact.emission_increase;
            summary.fuel_waste += impact.fuel_waste;
            *summary
                .level_distribution
                .entry(impact.flow.level)
                .or_default() += 1;
        }
        if summary.total_vehicle_km > 0.0 {
            summary.average_speed = weighted_speed / summary.total_vehicle_km;
        } else {
            warn!("No vehicle-kilometer traveled on the network, the average speed is set to 0");
        }
        summary.congestion_cost = summary.total_delay * rates.value_of_time;
        summary
    }
}

/// Computes the system-wide impact of congestion for a given time and context.
#[derive(Clone, Copy, Debug)]
pub struct SystemImpactCalculator<'a> {
    predictor: CongestionPredictor<'a>,
    rates: ImpactRates,
}

impl<'a> SystemImpactCalculator<'a> {
    /// Creates a new SystemImpactCalculator.
    pub const fn new(predictor: CongestionPredictor<'a>, rates: ImpactRates) -> Self {
        SystemImpactCalculator { predictor, rates }
    }

    /// Evaluates the impact of every segment of the network, in registry order.
    ///
    /// The segments are evaluated in parallel.
    pub fn evaluate_segments(
        &self,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<Vec<SegmentImpact>> {
        let segments = self.predictor.registry().segments();
        let bp = ScanProgressBar::new(segments.len(), "Evaluating segments");
        let impacts = segments
            .par_iter()
            .panic_fuse()
            .map(|segment| {
                bp.inc();
                let prediction = self.predictor.predict(segment.id(), target_time, pattern)?;
                let flow = self
                    .predictor
                    .engine()
                    .compute_flow(segment, prediction.predicted_volume());
                Ok(SegmentImpact::new(segment, flow, &self.rates))
            })
            .collect::<Result<Vec<_>>>()?;
        bp.finish();
        Ok(impacts)
    }

    /// Computes the [SystemImpactSummary] of the network and records the flow state of each segment
    /// into the given [NetworkState].
    pub fn compute_system_impact(
        &self,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
        state: &mut NetworkState,
    ) -> Result<SystemImpactSummary> {
        let impacts = self.evaluate_segments(target_time, pattern)?;
        for impact in impacts.iter() {
            state.record(&impact.segment_id, &impact.flow);
        }
        let summary = SystemImpactSummary::from_segments(&impacts, &self.rates);
        debug!("Level distribution: {:?}", summary.level_distribution);
        info!(
            "System impact: average speed {:.1} km/h, total delay {:.1} veh-h, cost {:.2}",
            summary.average_speed, summary.total_delay, summary.congestion_cost
        );
        Ok(summary)
    }
}
