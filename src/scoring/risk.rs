use serde::Serialize;
use strum::Display;

use super::reading::WeatherReading;

pub const MAX_SCORE: u8 = 100;

pub const STORM_PRESSURE_SEVERE: u8 = 40;
pub const STORM_PRESSURE_LOW: u8 = 20;
pub const STORM_WIND_SEVERE: u8 = 30;
pub const STORM_WIND_STRONG: u8 = 15;
pub const STORM_HUMIDITY_SEVERE: u8 = 20;
pub const STORM_HUMIDITY_HIGH: u8 = 10;

pub const RAIN_HUMIDITY_SEVERE: u8 = 40;
pub const RAIN_HUMIDITY_HIGH: u8 = 20;
pub const RAIN_PRESSURE_SEVERE: u8 = 30;
pub const RAIN_PRESSURE_LOW: u8 = 15;
pub const RAIN_WIND_SEVERE: u8 = 20;
pub const RAIN_WIND_STRONG: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
pub enum StormTier {
    #[strum(serialize = "No Risk")]
    #[serde(rename = "No Risk")]
    None,
    #[strum(serialize = "Low Risk")]
    #[serde(rename = "Low Risk")]
    Low,
    #[strum(serialize = "Medium Risk")]
    #[serde(rename = "Medium Risk")]
    Medium,
    #[strum(serialize = "High Risk")]
    #[serde(rename = "High Risk")]
    High,
}

impl StormTier {
    pub const HIGH_ABOVE: u8 = 70;
    pub const MEDIUM_ABOVE: u8 = 40;
    pub const LOW_ABOVE: u8 = 15;

    pub fn from_score(score: u8) -> Self {
        if score > Self::HIGH_ABOVE {
            StormTier::High
        } else if score > Self::MEDIUM_ABOVE {
            StormTier::Medium
        } else if score > Self::LOW_ABOVE {
            StormTier::Low
        } else {
            StormTier::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
pub enum RainTier {
    #[strum(serialize = "Unlikely")]
    Unlikely,
    #[strum(serialize = "Possible")]
    Possible,
    #[strum(serialize = "Likely")]
    Likely,
    #[strum(serialize = "Very Likely")]
    #[serde(rename = "Very Likely")]
    VeryLikely,
}

impl RainTier {
    pub const VERY_LIKELY_ABOVE: u8 = 70;
    pub const LIKELY_ABOVE: u8 = 50;
    pub const POSSIBLE_ABOVE: u8 = 30;

    pub fn from_score(score: u8) -> Self {
        if score > Self::VERY_LIKELY_ABOVE {
            RainTier::VeryLikely
        } else if score > Self::LIKELY_ABOVE {
            RainTier::Likely
        } else if score > Self::POSSIBLE_ABOVE {
            RainTier::Possible
        } else {
            RainTier::Unlikely
        }
    }
}

/// A clamped percentage score and the contributions that made it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown<T> {
    pub score: u8,
    pub tier: T,
    pub reasons: Vec<String>,
}

#[derive(Default)]
struct Tally {
    total: u32,
    reasons: Vec<String>,
}

impl Tally {
    fn add(&mut self, points: u8, reason: &str) {
        if points > 0 {
            self.total += u32::from(points);
            self.reasons.push(format!("{reason} (+{points})"));
        }
    }

    fn clamped(&self) -> u8 {
        self.total.min(u32::from(MAX_SCORE)) as u8
    }
}

pub fn storm_pressure_points(pressure: f32) -> u8 {
    if pressure < 1000.0 {
        STORM_PRESSURE_SEVERE
    } else if pressure < 1010.0 {
        STORM_PRESSURE_LOW
    } else {
        0
    }
}

pub fn storm_wind_points(wind_speed: f32) -> u8 {
    if wind_speed > 15.0 {
        STORM_WIND_SEVERE
    } else if wind_speed > 10.0 {
        STORM_WIND_STRONG
    } else {
        0
    }
}

pub fn storm_humidity_points(humidity: f32) -> u8 {
    if humidity > 85.0 {
        STORM_HUMIDITY_SEVERE
    } else if humidity > 70.0 {
        STORM_HUMIDITY_HIGH
    } else {
        0
    }
}

pub fn rain_humidity_points(humidity: f32) -> u8 {
    if humidity > 80.0 {
        RAIN_HUMIDITY_SEVERE
    } else if humidity > 65.0 {
        RAIN_HUMIDITY_HIGH
    } else {
        0
    }
}

pub fn rain_pressure_points(pressure: f32) -> u8 {
    if pressure < 1005.0 {
        RAIN_PRESSURE_SEVERE
    } else if pressure < 1013.0 {
        RAIN_PRESSURE_LOW
    } else {
        0
    }
}

pub fn rain_wind_points(wind_speed: f32) -> u8 {
    if wind_speed > 12.0 {
        RAIN_WIND_SEVERE
    } else if wind_speed > 8.0 {
        RAIN_WIND_STRONG
    } else {
        0
    }
}

pub fn calculate_storm_risk(reading: &WeatherReading) -> RiskBreakdown<StormTier> {
    let mut tally = Tally::default();
    tally.add(storm_pressure_points(reading.pressure()), "low pressure");
    tally.add(storm_wind_points(reading.wind_speed()), "strong wind");
    tally.add(storm_humidity_points(reading.humidity()), "high humidity");

    let score = tally.clamped();
    RiskBreakdown {
        score,
        tier: StormTier::from_score(score),
        reasons: tally.reasons,
    }
}

pub fn calculate_rain_chance(reading: &WeatherReading) -> RiskBreakdown<RainTier> {
    let mut tally = Tally::default();
    tally.add(rain_humidity_points(reading.humidity()), "high humidity");
    tally.add(rain_pressure_points(reading.pressure()), "low pressure");
    tally.add(rain_wind_points(reading.wind_speed()), "incoming wind");

    let score = tally.clamped();
    RiskBreakdown {
        score,
        tier: RainTier::from_score(score),
        reasons: tally.reasons,
    }
}
