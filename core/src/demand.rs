// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Contextual adjustment of historical traffic demand.
//!
//! A [TrafficPattern] describes the time and context (weather, holiday, special event) of a
//! prediction. The [ContextualDemandAdjuster] turns a historical base volume into an adjusted
//! volume by multiplying it by one factor per contextual dimension.
use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use log::trace;
use schemars::JsonSchema;
use serde_derive::{Deserialize, Serialize};

use crate::error::{CongestionError, Result};
use crate::units::VehiclesPerHour;

/// Weather condition.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => f.write_str("clear"),
            Self::Rain => f.write_str("rain"),
            Self::Fog => f.write_str("fog"),
        }
    }
}

/// Period of the day, as used for demand adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeOfDay {
    /// Morning and evening rush hours: 7–9 and 17–19.
    Peak,
    /// Hours surrounding the rush hours: 6–10 and 16–20.
    Shoulder,
    /// From 22 to 5.
    Night,
    /// Any other hour.
    OffPeak,
}

impl TimeOfDay {
    /// Returns the period of the given hour of the day.
    pub const fn of_hour(hour: u8) -> Self {
        match hour {
            7..=9 | 17..=19 => Self::Peak,
            6 | 10 | 16 | 20 => Self::Shoulder,
            22..=23 | 0..=5 => Self::Night,
            _ => Self::OffPeak,
        }
    }

    const fn factor(self) -> f64 {
        match self {
            Self::Peak => 1.3,
            Self::Shoulder => 1.1,
            Self::Night => 0.6,
            Self::OffPeak => 1.0,
        }
    }
}

/// Time and context of a traffic prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TrafficPattern {
    /// Hour of the day (0 to 23).
    hour: u8,
    /// Day of the week (0 = Sunday to 6 = Saturday).
    day_of_week: u8,
    /// Month (1 to 12).
    month: u8,
    holiday: bool,
    weather: Weather,
    special_event: bool,
}

impl TrafficPattern {
    /// Creates a new TrafficPattern.
    ///
    /// Returns an error if the hour, the day of week or the month are out of range.
    pub fn new(
        hour: u8,
        day_of_week: u8,
        month: u8,
        holiday: bool,
        weather: Weather,
        special_event: bool,
    ) -> Result<Self> {
        if hour > 23 {
            return Err(CongestionError::InvalidPattern(format!(
                "hour must be between 0 and 23, got {hour}"
            )));
        }
        if day_of_week > 6 {
            return Err(CongestionError::InvalidPattern(format!(
                "day of week must be between 0 (Sunday) and 6 (Saturday), got {day_of_week}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(CongestionError::InvalidPattern(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(TrafficPattern {
            hour,
            day_of_week,
            month,
            holiday,
            weather,
            special_event,
        })
    }

    /// Creates a TrafficPattern for the given date and time, with the given context.
    pub fn from_datetime(
        time: NaiveDateTime,
        weather: Weather,
        holiday: bool,
        special_event: bool,
    ) -> Self {
        // chrono guarantees that all the values are in range.
        TrafficPattern {
            hour: time.hour() as u8,
            day_of_week: time.weekday().num_days_from_sunday() as u8,
            month: time.month() as u8,
            holiday,
            weather,
            special_event,
        }
    }

    /// Creates a TrafficPattern for the given date and time, with clear weather, no holiday and
    /// no special event.
    pub fn baseline(time: NaiveDateTime) -> Self {
        Self::from_datetime(time, Weather::Clear, false, false)
    }

    /// Returns the same pattern with the given weather.
    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    /// Returns the same pattern with the given holiday flag.
    pub fn with_holiday(mut self, holiday: bool) -> Self {
        self.holiday = holiday;
        self
    }

    /// Returns the same pattern with the given special-event flag.
    pub fn with_special_event(mut self, special_event: bool) -> Self {
        self.special_event = special_event;
        self
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn holiday(&self) -> bool {
        self.holiday
    }

    pub const fn weather(&self) -> Weather {
        self.weather
    }

    pub const fn special_event(&self) -> bool {
        self.special_event
    }

    /// Returns the period of the day of the pattern.
    pub const fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::of_hour(self.hour)
    }

    /// Returns `true` if the pattern is during a rush hour.
    pub fn is_peak_hour(&self) -> bool {
        self.time_of_day() == TimeOfDay::Peak
    }

    /// Returns `true` if the pattern is on a Saturday or a Sunday.
    pub const fn is_weekend(&self) -> bool {
        self.day_of_week == 0 || self.day_of_week == 6
    }

    /// Returns `true` if the pattern is on a Monday or a Friday.
    pub const fn is_monday_or_friday(&self) -> bool {
        self.day_of_week == 1 || self.day_of_week == 5
    }
}

/// Multipliers applied to a base volume, one per contextual dimension.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DemandFactors {
    pub time_of_day: f64,
    pub day_of_week: f64,
    pub weather: f64,
    pub holiday: f64,
    pub special_event: f64,
}

impl DemandFactors {
    /// Returns the product of all the factors.
    pub fn total(&self) -> f64 {
        self.time_of_day * self.day_of_week * self.weather * self.holiday * self.special_event
    }
}

/// Adjusts historical base volumes to a [TrafficPattern].
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextualDemandAdjuster;

impl ContextualDemandAdjuster {
    /// Returns the [DemandFactors] of the given pattern.
    pub fn factors(&self, pattern: &TrafficPattern) -> DemandFactors {
        let day_of_week = if pattern.is_weekend() {
            0.7
        } else if pattern.is_monday_or_friday() {
            1.1
        } else {
            1.0
        };
        let weather = match pattern.weather {
            Weather::Clear => 1.0,
            Weather::Rain => 1.4,
            Weather::Fog => 1.2,
        };
        DemandFactors {
            time_of_day: pattern.time_of_day().factor(),
            day_of_week,
            // The holiday factor is applied on top of the day-of-week factor: a holiday on a
            // weekday is still discounted.
            holiday: if pattern.holiday { 0.6 } else { 1.0 },
            weather,
            special_event: if pattern.special_event { 1.5 } else { 1.0 },
        }
    }

    /// Returns the adjusted volume, given a base volume and a [TrafficPattern].
    ///
    /// The factors are applied in this order: time of day, day of week, weather, holiday, special
    /// event. The result is not bounded by the capacity of any segment.
    pub fn adjust_volume(
        &self,
        base: VehiclesPerHour,
        pattern: &TrafficPattern,
    ) -> VehiclesPerHour {
        let factors = self.factors(pattern);
        let mut volume = base.value();
        for (name, factor) in [
            ("time of day", factors.time_of_day),
            ("day of week", factors.day_of_week),
            ("weather", factors.weather),
            ("holiday", factors.holiday),
            ("special event", factors.special_event),
        ] {
            volume *= factor;
            trace!("Demand factor {name}: x{factor} -> {volume:.1} veh/h");
        }
        VehiclesPerHour::new_unchecked(volume)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn pattern(hour: u8, day_of_week: u8) -> TrafficPattern {
        TrafficPattern::new(hour, day_of_week, 6, false, Weather::Clear, false).unwrap()
    }

    #[test]
    fn time_of_day_test() {
        let periods: Vec<TimeOfDay> = (0..24).map(TimeOfDay::of_hour).collect();
        for h in [7, 8, 9, 17, 18, 19] {
            assert_eq!(periods[h], TimeOfDay::Peak, "hour {h}");
        }
        for h in [6, 10, 16, 20] {
            assert_eq!(periods[h], TimeOfDay::Shoulder, "hour {h}");
        }
        for h in [22, 23, 0, 1, 2, 3, 4, 5] {
            assert_eq!(periods[h], TimeOfDay::Night, "hour {h}");
        }
        for h in [11, 12, 13, 14, 15, 21] {
            assert_eq!(periods[h], TimeOfDay::OffPeak, "hour {h}");
        }
    }

    #[test]
    fn invalid_pattern_test() {
        assert!(TrafficPattern::new(24, 1, 1, false, Weather::Clear, false).is_err());
        assert!(TrafficPattern::new(8, 7, 1, false, Weather::Clear, false).is_err());
        assert!(TrafficPattern::new(8, 1, 0, false, Weather::Clear, false).is_err());
        assert!(TrafficPattern::new(8, 1, 13, false, Weather::Clear, false).is_err());
        let err = TrafficPattern::new(8, 1, 13, false, Weather::Clear, false).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn from_datetime_test() {
        // 2024-06-15 is a Saturday.
        let time = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(17, 45, 0)
            .unwrap();
        let pattern = TrafficPattern::baseline(time);
        assert_eq!(pattern.hour(), 17);
        assert_eq!(pattern.day_of_week(), 6);
        assert_eq!(pattern.month(), 6);
        assert!(pattern.is_weekend());
        assert!(pattern.is_peak_hour());
        assert_eq!(pattern.weather(), Weather::Clear);
        // 2024-06-16 is a Sunday.
        let pattern = TrafficPattern::baseline(time + chrono::Duration::days(1));
        assert_eq!(pattern.day_of_week(), 0);
    }

    #[test]
    fn adjust_volume_test() {
        let adjuster = ContextualDemandAdjuster;
        let base = VehiclesPerHour::new_unchecked(1000.0);
        let check = |pattern: TrafficPattern, expected: f64| {
            let v = adjuster.adjust_volume(base, &pattern).value();
            assert!((v - expected).abs() < 1e-9, "{v} != {expected}");
        };
        // Wednesday at noon: no adjustment.
        check(pattern(12, 3), 1000.0);
        // Monday morning rush hour.
        check(pattern(8, 1), 1430.0);
        // Sunday night.
        check(pattern(2, 0), 1000.0 * 0.6 * 0.7);
        // Friday shoulder hour, rain.
        check(pattern(16, 5).with_weather(Weather::Rain), 1000.0 * 1.1 * 1.1 * 1.4);
        // Tuesday off-peak, fog, special event.
        check(
            pattern(14, 2)
                .with_weather(Weather::Fog)
                .with_special_event(true),
            1000.0 * 1.2 * 1.5,
        );
        // Holiday on a Monday morning rush hour.
        check(pattern(8, 1).with_holiday(true), 858.0);
    }

    #[test]
    fn factors_test() {
        let adjuster = ContextualDemandAdjuster;
        let factors = adjuster.factors(
            &pattern(18, 6)
                .with_weather(Weather::Rain)
                .with_holiday(true)
                .with_special_event(true),
        );
        assert_eq!(
            factors,
            DemandFactors {
                time_of_day: 1.3,
                day_of_week: 0.7,
                weather: 1.4,
                holiday: 0.6,
                special_event: 1.5,
            }
        );
        assert!((factors.total() - 1.3 * 0.7 * 1.4 * 0.6 * 1.5).abs() < 1e-12);
    }
}
