// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Definition of types representing values expressed in a given unit.
//!
//! The types assume the following units:
//!
//! - [Kilometers]: length in kilometers
//! - [KilometersPerHour]: speed in kilometers per hour
//! - [VehiclesPerHour]: traffic volume or capacity, in vehicles per hour
//! - [VehiclesPerKilometer]: traffic density, in vehicles per kilometer (all lanes)
//! - [Hours]: duration in hours
//! - [Lanes]: number of lanes of a road segment
use std::fmt;
use std::iter;
use std::ops::*;

use anyhow::{bail, Result};
use num_traits::{ConstZero, Zero};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

/// Implements some useful traits and functions for unit types backed by a `f64`.
macro_rules! impl_traits_on_unit(
    ( $( $t:ident, $unit:literal );* $(;)? ) => {
        $(
            impl $t {
                /// Creates a new value without checking the bounds (checked in debug mode).
                pub fn new_unchecked(value: f64) -> Self {
                    debug_assert!(value.is_finite());
                    debug_assert!(value >= $t::lower_bound().0 && value <= $t::upper_bound().0);
                    Self(value)
                }

                /// Returns the underlying value.
                pub const fn value(self) -> f64 {
                    self.0
                }
            }

            impl Add for $t {
                type Output = Self;
                fn add(self, rhs: Self) -> Self::Output {
                    Self(self.0 + rhs.0)
                }
            }

            impl AddAssign for $t {
                fn add_assign(&mut self, rhs: Self) {
                    self.0 += rhs.0;
                }
            }

            impl Mul<f64> for $t {
                type Output = Self;
                fn mul(self, rhs: f64) -> Self::Output {
                    Self(self.0 * rhs)
                }
            }

            impl Div<f64> for $t {
                type Output = Self;
                fn div(self, rhs: f64) -> Self::Output {
                    Self(self.0 / rhs)
                }
            }

            impl Div for $t {
                type Output = f64;
                fn div(self, rhs: Self) -> Self::Output {
                    self.0 / rhs.0
                }
            }

            impl iter::Sum for $t {
                fn sum<I>(iter: I) -> Self
                    where I: Iterator<Item = $t>
                {
                    iter.fold(Self(0.0), |a, b| a + b)
                }
            }

            impl TryFrom<f64> for $t {
                type Error = anyhow::Error;
                fn try_from(value: f64) -> Result<Self> {
                    if !value.is_finite()
                        || value < $t::lower_bound().0
                        || value > $t::upper_bound().0
                    {
                        bail!("Invalid value for {}: {value}", stringify!($t))
                    }
                    Ok(Self(value))
                }
            }

            impl From<$t> for f64 {
                fn from(value: $t) -> f64 {
                    value.0
                }
            }

            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{:.2} {}", self.0, $unit)
                }
            }

            impl JsonSchema for $t {
                fn schema_name() -> String {
                    stringify!($t).to_owned()
                }
                fn json_schema(gen: &mut SchemaGenerator) -> Schema {
                    f64::json_schema(gen)
                }
            }
        )*
    };
);

/// Implements `Zero` on units that can take the value zero.
macro_rules! impl_traits_on_non_negative_unit(
    ( $( $t:ident ),* ) => {
        $(
            impl Zero for $t {
                fn zero() -> Self {
                    Self(0.0)
                }
                fn is_zero(&self) -> bool {
                    self.0 == 0.0
                }
            }

            impl ConstZero for $t {
                const ZERO: Self = Self(0.0);
            }

            impl Sub for $t {
                type Output = Self;
                /// Subtraction saturating at zero.
                fn sub(self, rhs: Self) -> Self::Output {
                    Self((self.0 - rhs.0).max(0.0))
                }
            }
        )*
    };
);

/// Representation of a positive length, expressed in kilometers.
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "f64")]
pub struct Kilometers(f64);

impl Kilometers {
    const fn lower_bound() -> Self {
        Self(f64::MIN_POSITIVE)
    }

    const fn upper_bound() -> Self {
        Self(f64::MAX)
    }
}

/// Representation of a positive speed, expressed in kilometers per hour.
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "f64")]
pub struct KilometersPerHour(f64);

impl KilometersPerHour {
    const fn lower_bound() -> Self {
        Self(f64::MIN_POSITIVE)
    }

    const fn upper_bound() -> Self {
        Self(f64::MAX)
    }

    /// Returns the smallest of the two speeds.
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns the largest of the two speeds.
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

/// Representation of a non-negative traffic volume (or capacity), expressed in vehicles per hour.
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "f64")]
pub struct VehiclesPerHour(f64);

impl VehiclesPerHour {
    const fn lower_bound() -> Self {
        Self(0.0)
    }

    const fn upper_bound() -> Self {
        Self(f64::MAX)
    }

    /// Returns `true` if the value is strictly positive.
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

/// Representation of a non-negative traffic density, expressed in vehicles per kilometer.
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "f64")]
pub struct VehiclesPerKilometer(f64);

impl VehiclesPerKilometer {
    const fn lower_bound() -> Self {
        Self(0.0)
    }

    const fn upper_bound() -> Self {
        Self(f64::MAX)
    }
}

/// Representation of a non-negative duration, expressed in hours.
#[derive(Default, Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "f64")]
pub struct Hours(f64);

impl Hours {
    const fn lower_bound() -> Self {
        Self(0.0)
    }

    const fn upper_bound() -> Self {
        Self(f64::MAX)
    }
}

impl_traits_on_unit!(
    Kilometers, "km";
    KilometersPerHour, "km/h";
    VehiclesPerHour, "veh/h";
    VehiclesPerKilometer, "veh/km";
    Hours, "h";
);

impl_traits_on_non_negative_unit!(VehiclesPerHour, VehiclesPerKilometer, Hours);

macro_rules! impl_ops(
    ( $l_type:ident * $r_type:ident = $o_type:ident ) => {
        impl Mul<$r_type> for $l_type {
            type Output = $o_type;
            fn mul(self, other: $r_type) -> Self::Output {
                $o_type(self.0 * other.0)
            }
        }
        impl Mul<$l_type> for $r_type {
            type Output = $o_type;
            fn mul(self, other: $l_type) -> Self::Output {
                $o_type(self.0 * other.0)
            }
        }
    };
    ( $l_type:ident / $r_type:ident = $o_type:ident ) => {
        impl Div<$r_type> for $l_type {
            type Output = $o_type;
            fn div(self, other: $r_type) -> Self::Output {
                $o_type(self.0 / other.0)
            }
        }
    };
);

impl_ops!(Kilometers / KilometersPerHour = Hours);
impl_ops!(KilometersPerHour * Hours = Kilometers);

/// Representation of the number of lanes of a road segment (at least one).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u32")]
pub struct Lanes(u32);

impl Lanes {
    /// A single lane.
    pub const ONE: Self = Self(1);

    /// Returns the number of lanes.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Lanes {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Lanes {
    type Error = anyhow::Error;
    fn try_from(value: u32) -> Result<Self> {
        if value < 1 {
            bail!("A road segment must have at least one lane, got {value}");
        }
        Ok(Self(value))
    }
}

impl From<Lanes> for f64 {
    fn from(value: Lanes) -> f64 {
        value.0 as f64
    }
}

impl fmt::Display for Lanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lanes", self.0)
    }
}

impl JsonSchema for Lanes {
    fn schema_name() -> String {
        "Lanes".to_owned()
    }
    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        u32::json_schema(gen)
    }
}
