// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Errors returned by the congestion model.
use thiserror::Error;

use crate::network::{RouteId, SegmentId};

/// Error raised by the congestion model.
///
/// The variants are split in two families: the *not found* errors, raised when a query references
/// an unknown identifier, and the *invalid input* errors, raised when the network, the parameters
/// or a traffic pattern do not satisfy their constraints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CongestionError {
    /// A query references a road segment that is not in the registry.
    #[error("No road segment with id `{0}`")]
    SegmentNotFound(SegmentId),
    /// A route is not part of the route mapping and unmapped routes are rejected.
    #[error("No route with id `{0}`")]
    RouteNotFound(RouteId),
    /// A road-segment descriptor does not satisfy the constraints.
    #[error("Invalid road segment `{id}`: {reason}")]
    InvalidSegment { id: SegmentId, reason: String },
    /// Two road segments share the same id.
    #[error("Road segment id `{0}` is used more than once")]
    DuplicateSegment(SegmentId),
    /// A historical volume profile is malformed or references an unknown segment.
    #[error("Invalid volume profile for segment `{id}`: {reason}")]
    InvalidProfile { id: SegmentId, reason: String },
    /// A route of the route mapping is malformed.
    #[error("Invalid route `{id}`: {reason}")]
    InvalidRoute { id: RouteId, reason: String },
    /// A traffic pattern has an out-of-range field.
    #[error("Invalid traffic pattern: {0}")]
    InvalidPattern(String),
    /// A model parameter does not satisfy its constraints.
    #[error("Invalid model parameter: {0}")]
    InvalidParameter(String),
}

impl CongestionError {
    /// Returns `true` if the error comes from an unknown segment or route identifier.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SegmentNotFound(_) | Self::RouteNotFound(_))
    }

    /// Returns `true` if the error comes from an input that does not satisfy its constraints.
    pub const fn is_invalid_input(&self) -> bool {
        !self.is_not_found()
    }
}

/// Result type of the congestion model.
pub type Result<T> = std::result::Result<T, CongestionError>;
