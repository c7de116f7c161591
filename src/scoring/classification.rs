use serde::Serialize;
use strum::Display;

use super::reading::WeatherReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
pub enum TemperatureClass {
    #[strum(serialize = "Freezing")]
    Freezing,
    #[strum(serialize = "Cold")]
    Cold,
    #[strum(serialize = "Cool")]
    Cool,
    #[strum(serialize = "Moderate")]
    Moderate,
    #[strum(serialize = "Hot")]
    Hot,
    #[strum(serialize = "Extreme Heat")]
    #[serde(rename = "Extreme Heat")]
    ExtremeHeat,
}

impl TemperatureClass {
    pub const COLD_FROM: f32 = 0.0;
    pub const COOL_FROM: f32 = 10.0;
    pub const MODERATE_FROM: f32 = 20.0;
    pub const HOT_FROM: f32 = 30.0;
    pub const EXTREME_FROM: f32 = 40.0;

    /// Each class includes its lower bound.
    pub fn from_celsius(temperature: f32) -> Self {
        if temperature < Self::COLD_FROM {
            TemperatureClass::Freezing
        } else if temperature < Self::COOL_FROM {
            TemperatureClass::Cold
        } else if temperature < Self::MODERATE_FROM {
            TemperatureClass::Cool
        } else if temperature < Self::HOT_FROM {
            TemperatureClass::Moderate
        } else if temperature < Self::EXTREME_FROM {
            TemperatureClass::Hot
        } else {
            TemperatureClass::ExtremeHeat
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ComfortLevel {
    #[strum(serialize = "Perfect")]
    Perfect,
    #[strum(serialize = "Comfortable")]
    Comfortable,
    #[strum(serialize = "Fair")]
    Fair,
    #[strum(serialize = "Uncomfortable")]
    Uncomfortable,
}

impl ComfortLevel {
    pub fn assess(reading: &WeatherReading) -> Self {
        let t = reading.temperature();
        let h = reading.humidity();
        let p = reading.pressure();
        let w = reading.wind_speed();

        if (18.0..=24.0).contains(&t)
            && (40.0..=60.0).contains(&h)
            && (1010.0..=1020.0).contains(&p)
            && w <= 10.0
        {
            ComfortLevel::Perfect
        } else if (15.0..=28.0).contains(&t) && (30.0..=70.0).contains(&h) {
            ComfortLevel::Comfortable
        } else if t > 35.0 || h > 80.0 {
            ComfortLevel::Uncomfortable
        } else {
            ComfortLevel::Fair
        }
    }
}
