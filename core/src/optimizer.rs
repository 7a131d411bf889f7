// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Congestion scores of routes and the mitigation recommendations derived from them.
use std::fmt;

use chrono::NaiveDateTime;
use log::{debug, warn};
use schemars::JsonSchema;
use serde_derive::Serialize;

use crate::demand::TrafficPattern;
use crate::error::{CongestionError, Result};
use crate::network::{RouteId, SegmentId};
use crate::parameters::UnmappedRoutePolicy;
use crate::prediction::CongestionPredictor;

/// Routes with a score above this threshold should be rescheduled or rerouted.
const RESCHEDULE_THRESHOLD: u32 = 15;
/// Routes with a score above this threshold should see their peak-hour frequency reduced.
const FREQUENCY_THRESHOLD: u32 = 25;
/// Congestion-reduction potential of rescheduling or rerouting a route.
const RESCHEDULE_REDUCTION: f64 = 0.20;
/// Additional congestion-reduction potential of reducing the peak-hour frequency of a route.
const FREQUENCY_REDUCTION: f64 = 0.35;

/// Mitigation action proposed for a congested route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Recommendation {
    /// Shift the departures of the route or use an alternative route.
    Reschedule { route_id: RouteId },
    /// Reduce the frequency of the route during peak hours.
    ReduceFrequency { route_id: RouteId },
}

impl Recommendation {
    /// Returns the route the recommendation applies to.
    pub fn route_id(&self) -> &str {
        match self {
            Self::Reschedule { route_id } | Self::ReduceFrequency { route_id } => route_id,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reschedule { route_id } => write!(
                f,
                "Consider rescheduling route {route_id} or using an alternative route"
            ),
            Self::ReduceFrequency { route_id } => {
                write!(f, "Reduce the frequency of route {route_id} during peak hours")
            }
        }
    }
}

/// Congestion score of a route and its reduction potential.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
pub struct RouteScore {
    pub route_id: RouteId,
    /// Sum of the severity scores of the segments of the route.
    pub score: u32,
    pub nb_segments: usize,
    /// Congestion-reduction potential of the recommendations for the route.
    pub reduction: f64,
}

/// Result of [RouteCongestionOptimizer::optimize_for_congestion].
#[derive(Clone, Debug, Default, PartialEq, Serialize, JsonSchema)]
pub struct RouteOptimization {
    /// The input routes, unchanged.
    pub optimized_routes: Vec<RouteId>,
    /// Average congestion-reduction potential over the routes.
    pub congestion_reduction: f64,
    /// Recommendations for all the routes, in input order.
    pub recommendations: Vec<Recommendation>,
    pub route_scores: Vec<RouteScore>,
}

/// Returns the recommendations and the reduction potential of a route with the given score.
pub fn recommend(route_id: &str, score: u32) -> (Vec<Recommendation>, f64) {
    let mut recommendations = Vec::new();
    let mut reduction = 0.0;
    if score > RESCHEDULE_THRESHOLD {
        recommendations.push(Recommendation::Reschedule {
            route_id: route_id.to_owned(),
        });
        reduction += RESCHEDULE_REDUCTION;
    }
    if score > FREQUENCY_THRESHOLD {
        recommendations.push(Recommendation::ReduceFrequency {
            route_id: route_id.to_owned(),
        });
        reduction += FREQUENCY_REDUCTION;
    }
    (recommendations, reduction)
}

/// Scores routes from the predicted congestion of their segments.
#[derive(Clone, Copy, Debug)]
pub struct RouteCongestionOptimizer<'a> {
    predictor: CongestionPredictor<'a>,
    unmapped_routes: &'a UnmappedRoutePolicy,
}

impl<'a> RouteCongestionOptimizer<'a> {
    /// Creates a new RouteCongestionOptimizer.
    pub const fn new(
        predictor: CongestionPredictor<'a>,
        unmapped_routes: &'a UnmappedRoutePolicy,
    ) -> Self {
        RouteCongestionOptimizer {
            predictor,
            unmapped_routes,
        }
    }

    /// Returns the segments of a route.
    ///
    /// Routes that are not mapped are handled according to the [UnmappedRoutePolicy].
    pub fn route_segments(&self, route_id: &str) -> Result<&'a [SegmentId]> {
        if let Some(segments) = self.predictor.registry().route(route_id) {
            return Ok(segments);
        }
        match self.unmapped_routes {
            UnmappedRoutePolicy::Reject => {
                Err(CongestionError::RouteNotFound(route_id.to_owned()))
            }
            UnmappedRoutePolicy::DefaultSegments(segments) => {
                warn!("Route {route_id} is not mapped, using the default segments");
                Ok(segments.as_slice())
            }
        }
    }

    /// Returns the [RouteScore] of a route, at the given time and in the given context.
    pub fn score_route(
        &self,
        route_id: &str,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<RouteScore> {
        let segments = self.route_segments(route_id)?;
        let mut score = 0;
        for segment_id in segments {
            let prediction = self.predictor.predict(segment_id, target_time, pattern)?;
            score += prediction.level().severity_score();
        }
        let (_, reduction) = recommend(route_id, score);
        debug!("Route {route_id}: score {score}, reduction potential {reduction:.2}");
        Ok(RouteScore {
            route_id: route_id.to_owned(),
            score,
            nb_segments: segments.len(),
            reduction,
        })
    }

    /// Scores the given routes and returns the recommendations to mitigate their congestion.
    ///
    /// Returns an error if a route is unknown and unmapped routes are rejected.
    pub fn optimize_for_congestion(
        &self,
        routes: &[RouteId],
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<RouteOptimization> {
        let mut optimization = RouteOptimization {
            optimized_routes: routes.to_vec(),
            ..Default::default()
        };
        for route_id in routes {
            let route_score = self.score_route(route_id, target_time, pattern)?;
            let (recommendations, _) = recommend(route_id, route_score.score);
            optimization.recommendations.extend(recommendations);
            optimization.route_scores.push(route_score);
        }
        if !routes.is_empty() {
            optimization.congestion_reduction = optimization
                .route_scores
                .iter()
                .map(|s| s.reduction)
                .sum::<f64>()
                / routes.len() as f64;
        }
        Ok(optimization)
    }
}
