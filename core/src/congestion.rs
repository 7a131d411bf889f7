// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Congestion levels and the classifier mapping flow ratios to a level.
use std::fmt;

use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

/// Severity class of the traffic on a road segment, from best to worst.
///
/// The ordering of the variants is meaningful: `FreeFlow < Light < Moderate < Heavy < Severe`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CongestionLevel {
    FreeFlow,
    Light,
    Moderate,
    Heavy,
    Severe,
}

/// Calibration constants attached to a [CongestionLevel].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelCalibration {
    /// Largest volume / capacity ratio compatible with the level.
    pub max_vc_ratio: f64,
    /// Smallest speed / speed-limit ratio compatible with the level.
    pub min_speed_ratio: f64,
    /// Typical speed reduction compared to the speed limit, in percent.
    pub speed_reduction: f64,
    /// Multiplier applied to the free-flow travel time.
    pub delay_multiplier: f64,
    /// Multiplier applied to the free-flow emissions.
    pub emission_multiplier: f64,
    /// Multiplier applied to the free-flow fuel consumption.
    pub fuel_multiplier: f64,
    /// Score used to rank routes by congestion severity.
    pub severity_score: u32,
}

const FREE_FLOW: LevelCalibration = LevelCalibration {
    max_vc_ratio: 0.3,
    min_speed_ratio: 0.85,
    speed_reduction: 0.0,
    delay_multiplier: 1.0,
    emission_multiplier: 1.0,
    fuel_multiplier: 1.0,
    severity_score: 1,
};

const LIGHT: LevelCalibration = LevelCalibration {
    max_vc_ratio: 0.6,
    min_speed_ratio: 0.70,
    speed_reduction: 15.0,
    delay_multiplier: 1.2,
    emission_multiplier: 1.1,
    fuel_multiplier: 1.05,
    severity_score: 3,
};

const MODERATE: LevelCalibration = LevelCalibration {
    max_vc_ratio: 0.85,
    min_speed_ratio: 0.50,
    speed_reduction: 30.0,
    delay_multiplier: 1.5,
    emission_multiplier: 1.25,
    fuel_multiplier: 1.15,
    severity_score: 6,
};

const HEAVY: LevelCalibration = LevelCalibration {
    max_vc_ratio: 1.10,
    min_speed_ratio: 0.30,
    speed_reduction: 50.0,
    delay_multiplier: 2.0,
    emission_multiplier: 1.5,
    fuel_multiplier: 1.3,
    severity_score: 9,
};

const SEVERE: LevelCalibration = LevelCalibration {
    max_vc_ratio: f64::INFINITY,
    min_speed_ratio: 0.0,
    speed_reduction: 70.0,
    delay_multiplier: 3.0,
    emission_multiplier: 2.0,
    fuel_multiplier: 1.5,
    severity_score: 12,
};

impl CongestionLevel {
    /// All the levels, from best to worst.
    pub const ALL: [CongestionLevel; 5] = [
        CongestionLevel::FreeFlow,
        CongestionLevel::Light,
        CongestionLevel::Moderate,
        CongestionLevel::Heavy,
        CongestionLevel::Severe,
    ];

    /// Returns the calibration constants of the level.
    pub const fn calibration(self) -> &'static LevelCalibration {
        match self {
            Self::FreeFlow => &FREE_FLOW,
            Self::Light => &LIGHT,
            Self::Moderate => &MODERATE,
            Self::Heavy => &HEAVY,
            Self::Severe => &SEVERE,
        }
    }

    /// Returns the multiplier applied to the free-flow travel time.
    pub const fn delay_multiplier(self) -> f64 {
        self.calibration().delay_multiplier
    }

    /// Returns the multiplier applied to the free-flow emissions.
    pub const fn emission_multiplier(self) -> f64 {
        self.calibration().emission_multiplier
    }

    /// Returns the multiplier applied to the free-flow fuel consumption.
    pub const fn fuel_multiplier(self) -> f64 {
        self.calibration().fuel_multiplier
    }

    /// Returns the score of the level, used to rank routes.
    pub const fn severity_score(self) -> u32 {
        self.calibration().severity_score
    }

    /// Returns the index of the level, from 0 (free flow) to 4 (severe).
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FreeFlow => "free_flow",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
            Self::Severe => "severe",
        };
        f.write_str(s)
    }
}

/// Returns the [CongestionLevel] given the volume / capacity ratio and the speed / speed-limit
/// ratio.
///
/// The levels are tested from best to worst and the first level whose two thresholds are both
/// satisfied is returned. A low volume ratio alone is therefore not enough to get a good level: the
/// speed ratio must agree.
pub fn classify(vc_ratio: f64, speed_ratio: f64) -> CongestionLevel {
    CongestionLevel::ALL
        .into_iter()
        .find(|level| {
            let calibration = level.calibration();
            vc_ratio <= calibration.max_vc_ratio && speed_ratio >= calibration.min_speed_ratio
        })
        .unwrap_or(CongestionLevel::Severe)
}
