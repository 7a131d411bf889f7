// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! The [CongestionModel] service, entry point of all the queries.
use chrono::NaiveDateTime;
use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::demand::TrafficPattern;
use crate::error::{CongestionError, Result};
use crate::flow::{FlowState, TrafficFlowEngine};
use crate::impact::{ImpactRates, SystemImpactCalculator, SystemImpactSummary};
use crate::network::{NetworkDescription, NetworkState, RoadNetworkRegistry, RouteId};
use crate::optimizer::{RouteCongestionOptimizer, RouteOptimization};
use crate::parameters::{ModelParameters, UnmappedRoutePolicy};
use crate::prediction::{CongestionPrediction, CongestionPredictor};
use crate::units::VehiclesPerHour;

/// Congestion model of a road network.
///
/// The model owns the [RoadNetworkRegistry] and the [ModelParameters]. Both are immutable once the
/// model is built, so a model can be shared by reference between threads.
#[derive(Debug)]
pub struct CongestionModel {
    registry: RoadNetworkRegistry,
    parameters: ModelParameters,
    engine: TrafficFlowEngine,
    /// Thread pool used for the network scans (the global rayon pool when `None`).
    thread_pool: Option<ThreadPool>,
}

impl CongestionModel {
    /// Creates a new CongestionModel.
    ///
    /// Returns an error if the parameters are invalid or if the default segments of unmapped
    /// routes are not in the registry.
    pub fn new(registry: RoadNetworkRegistry, parameters: ModelParameters) -> Result<Self> {
        parameters.validate()?;
        if let UnmappedRoutePolicy::DefaultSegments(segments) = &parameters.unmapped_routes {
            if !registry.contains_all(segments.iter()) {
                return Err(CongestionError::InvalidParameter(
                    "the default segments of unmapped routes must all be in the network"
                        .to_owned(),
                ));
            }
        }
        let thread_pool = if parameters.nb_threads > 0 {
            debug!("Using a thread pool with {} threads", parameters.nb_threads);
            let pool = ThreadPoolBuilder::new()
                .num_threads(parameters.nb_threads)
                .build()
                .map_err(|e| {
                    CongestionError::InvalidParameter(format!("cannot build thread pool: {e}"))
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(CongestionModel {
            engine: TrafficFlowEngine::new(&parameters),
            registry,
            parameters,
            thread_pool,
        })
    }

    /// Creates a new CongestionModel from a [NetworkDescription].
    pub fn from_description(
        description: NetworkDescription,
        parameters: ModelParameters,
    ) -> Result<Self> {
        Self::new(RoadNetworkRegistry::from_description(description)?, parameters)
    }

    pub const fn registry(&self) -> &RoadNetworkRegistry {
        &self.registry
    }

    pub const fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    pub const fn engine(&self) -> &TrafficFlowEngine {
        &self.engine
    }

    /// Returns a [CongestionPredictor] borrowing the registry of the model.
    pub fn predictor(&self) -> CongestionPredictor<'_> {
        CongestionPredictor::new(
            &self.registry,
            self.engine,
            self.parameters.default_base_volume,
        )
    }

    fn impact_calculator(&self) -> SystemImpactCalculator<'_> {
        SystemImpactCalculator::new(
            self.predictor(),
            ImpactRates {
                value_of_time: self.parameters.value_of_time,
                emission_rate: self.parameters.emission_rate,
                fuel_rate: self.parameters.fuel_rate,
            },
        )
    }

    fn route_optimizer(&self) -> RouteCongestionOptimizer<'_> {
        RouteCongestionOptimizer::new(self.predictor(), &self.parameters.unmapped_routes)
    }

    /// Runs `f` in the thread pool of the model.
    fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.thread_pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Computes the [FlowState] of a segment for the given volume.
    pub fn compute_flow(&self, segment_id: &str, volume: VehiclesPerHour) -> Result<FlowState> {
        let segment = self.registry.segment(segment_id)?;
        Ok(self.engine.compute_flow(segment, volume))
    }

    /// Predicts the congestion of a segment at the given time, in the given context.
    pub fn predict(
        &self,
        segment_id: &str,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<CongestionPrediction> {
        self.predictor().predict(segment_id, target_time, pattern)
    }

    /// Predicts the congestion of all the segments, in registry order.
    pub fn predict_all(
        &self,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<Vec<CongestionPrediction>> {
        self.predictor().predict_all(target_time, pattern)
    }

    /// Computes the network-wide impact of congestion at the given time, in the given context.
    pub fn compute_system_impact(
        &self,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<SystemImpactSummary> {
        let mut state = NetworkState::with_capacity(self.registry.nb_segments());
        self.compute_system_impact_with_state(target_time, pattern, &mut state)
    }

    /// Computes the network-wide impact of congestion and records the flow state of each segment
    /// into `state`.
    pub fn compute_system_impact_with_state(
        &self,
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
        state: &mut NetworkState,
    ) -> Result<SystemImpactSummary> {
        let calculator = self.impact_calculator();
        self.install(|| calculator.compute_system_impact(target_time, pattern, state))
    }

    /// Scores the given routes and returns the recommendations to mitigate their congestion.
    pub fn optimize_for_congestion(
        &self,
        routes: &[RouteId],
        target_time: NaiveDateTime,
        pattern: &TrafficPattern,
    ) -> Result<RouteOptimization> {
        self.route_optimizer()
            .optimize_for_congestion(routes, target_time, pattern)
    }
}
