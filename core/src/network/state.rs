// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Description of [NetworkState].
use hashbrown::HashMap;
use serde_derive::Serialize;

use super::SegmentId;
use crate::congestion::CongestionLevel;
use crate::flow::FlowState;
use crate::units::*;

/// Dynamic state of a road segment, as given by the last flow evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SegmentState {
    /// Current volume on the segment.
    pub volume: VehiclesPerHour,
    /// Current speed on the segment.
    pub speed: KilometersPerHour,
    /// Current density on the segment.
    pub density: VehiclesPerKilometer,
    /// Current congestion level of the segment.
    pub level: CongestionLevel,
}

impl From<&FlowState> for SegmentState {
    fn from(flow: &FlowState) -> Self {
        SegmentState {
            volume: flow.volume,
            speed: flow.speed,
            density: flow.density,
            level: flow.level,
        }
    }
}

/// Snapshot of the dynamic state of the segments of a road network.
///
/// Recording the state of a segment overwrites its previous state.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NetworkState {
    states: HashMap<SegmentId, SegmentState>,
}

impl NetworkState {
    /// Creates an empty NetworkState.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty NetworkState that can hold `capacity` segments without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        NetworkState {
            states: HashMap::with_capacity(capacity),
        }
    }

    /// Records the state of a segment from a flow evaluation, replacing any previous state.
    pub fn record(&mut self, segment_id: &str, flow: &FlowState) {
        if let Some(state) = self.states.get_mut(segment_id) {
            *state = flow.into();
        } else {
            self.states.insert(segment_id.to_owned(), flow.into());
        }
    }

    /// Returns the current state of a segment, if it has been evaluated.
    pub fn get(&self, segment_id: &str) -> Option<&SegmentState> {
        self.states.get(segment_id)
    }

    /// Returns the number of segments with a recorded state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no segment state has been recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
