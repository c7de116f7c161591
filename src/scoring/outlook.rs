//! Situational scoring over a series of API readings.
//!
//! Storm and precipitation likelihoods reuse the percentage contributions from
//! [`super::risk`] and fold in visibility and a cold-humid bonus. Sums are kept
//! in whole percentage points so the tier thresholds compare exactly.

use serde::Serialize;
use strum::Display;

use super::alerts::{generate_alerts, Alert};
use super::reading::{ApiReading, WeatherReading};
use super::risk::{
    rain_humidity_points, rain_pressure_points, rain_wind_points, storm_humidity_points,
    storm_pressure_points, storm_wind_points, MAX_SCORE,
};
use crate::errors::ScoringError;

pub const VISIBILITY_POOR_POINTS: u8 = 20;
pub const VISIBILITY_REDUCED_POINTS: u8 = 10;
pub const COLD_HUMID_POINTS: u8 = 20;

pub const PRESSURE_TREND_HPA: f32 = 5.0;
pub const RISING_PRESSURE_ADJUSTMENT: i8 = 2;
pub const FALLING_PRESSURE_ADJUSTMENT: i8 = -1;
pub const DAYTIME_HOURS: std::ops::RangeInclusive<u32> = 6..=18;
/// Hour assumed when a reading carries no timestamp.
pub const FALLBACK_HOUR: u32 = 12;
pub const CONFIDENT_SERIES_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const HIGH_ABOVE: u8 = 70;
    pub const MEDIUM_ABOVE: u8 = 40;

    pub fn from_points(points: u8) -> Self {
        if points > Self::HIGH_ABOVE {
            RiskLevel::High
        } else if points > Self::MEDIUM_ABOVE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum TemperatureChange {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Confidence {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionConfidence {
    pub storm: Confidence,
    pub temperature: Confidence,
    pub precipitation: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlook {
    pub storm_probability: f32,
    pub storm_risk: RiskLevel,
    pub temperature_forecast: f32,
    pub temperature_change: TemperatureChange,
    pub precipitation_probability: f32,
    pub precipitation_likelihood: RiskLevel,
    pub alerts: Vec<Alert>,
    pub confidence: PredictionConfidence,
}

pub fn visibility_points(visibility: f32) -> u8 {
    if visibility < 5.0 {
        VISIBILITY_POOR_POINTS
    } else if visibility < 8.0 {
        VISIBILITY_REDUCED_POINTS
    } else {
        0
    }
}

pub fn cold_humid_points(temperature: f32, humidity: f32) -> u8 {
    if temperature < 10.0 && humidity > 75.0 {
        COLD_HUMID_POINTS
    } else {
        0
    }
}

pub fn storm_points(reading: &WeatherReading) -> u8 {
    let total = storm_pressure_points(reading.pressure())
        + storm_wind_points(reading.wind_speed())
        + storm_humidity_points(reading.humidity())
        + visibility_points(reading.effective_visibility());
    total.min(MAX_SCORE)
}

pub fn precipitation_points(reading: &WeatherReading) -> u8 {
    let total = rain_humidity_points(reading.humidity())
        + rain_pressure_points(reading.pressure())
        + rain_wind_points(reading.wind_speed())
        + cold_humid_points(reading.temperature(), reading.humidity());
    total.min(MAX_SCORE)
}

fn probability(points: u8) -> f32 {
    f32::from(points) / f32::from(MAX_SCORE)
}

/// Pressure change between the first and last reading of the series.
pub fn pressure_adjustment(series: &[ApiReading]) -> i8 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0;
    };
    let trend = last.reading.pressure() - first.reading.pressure();
    if trend > PRESSURE_TREND_HPA {
        RISING_PRESSURE_ADJUSTMENT
    } else if trend < -PRESSURE_TREND_HPA {
        FALLING_PRESSURE_ADJUSTMENT
    } else {
        0
    }
}

pub fn diurnal_adjustment(hour: u32) -> i8 {
    if DAYTIME_HOURS.contains(&hour) {
        1
    } else {
        -1
    }
}

/// Scores the last reading of `series` (oldest first) in the context of the rest.
pub fn situational_outlook(series: &[ApiReading]) -> Result<Outlook, ScoringError> {
    let current = series.last().ok_or(ScoringError::EmptySeries)?;
    let reading = &current.reading;

    let storm = storm_points(reading);
    let precipitation = precipitation_points(reading);

    let hour = current.local_hour().unwrap_or(FALLBACK_HOUR);
    let adjustment = pressure_adjustment(series) + diurnal_adjustment(hour);
    let temperature_change = match adjustment {
        a if a > 0 => TemperatureChange::Rising,
        a if a < 0 => TemperatureChange::Falling,
        _ => TemperatureChange::Stable,
    };

    let confidence = PredictionConfidence {
        storm: if series.len() > CONFIDENT_SERIES_LEN {
            Confidence::High
        } else {
            Confidence::Medium
        },
        temperature: Confidence::High,
        precipitation: if reading.humidity() > 0.0 {
            Confidence::High
        } else {
            Confidence::Medium
        },
    };

    Ok(Outlook {
        storm_probability: probability(storm),
        storm_risk: RiskLevel::from_points(storm),
        temperature_forecast: reading.temperature() + f32::from(adjustment),
        temperature_change,
        precipitation_probability: probability(precipitation),
        precipitation_likelihood: RiskLevel::from_points(precipitation),
        alerts: generate_alerts(storm, precipitation, reading),
        confidence,
    })
}
