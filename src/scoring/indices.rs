use serde::Serialize;
use strum::Display;

use super::reading::WeatherReading;

pub const HEAT_INDEX_FROM: f32 = 27.0;
pub const WIND_CHILL_MAX_TEMP: f32 = 10.0;
/// 4.8 km/h
pub const WIND_CHILL_MIN_WIND: f32 = 1.3;

/// Coarser comfort reading used by the details panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ComfortIndex {
    Comfortable,
    Uncomfortable,
    Humid,
    Dry,
    Moderate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherIndices {
    pub heat_index: f32,
    pub wind_chill: f32,
    pub comfort: ComfortIndex,
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

pub fn heat_index(temperature: f32, humidity: f32) -> f32 {
    if temperature >= HEAT_INDEX_FROM {
        round1(temperature + 0.5 * (humidity - 50.0) * 0.1)
    } else {
        temperature
    }
}

pub fn wind_chill(temperature: f32, wind_speed: f32) -> f32 {
    if temperature <= WIND_CHILL_MAX_TEMP && wind_speed > WIND_CHILL_MIN_WIND {
        let v = (wind_speed * 3.6).powf(0.16);
        round1(13.12 + 0.6215 * temperature - 11.37 * v + 0.3965 * temperature * v)
    } else {
        temperature
    }
}

pub fn comfort_index(temperature: f32, humidity: f32) -> ComfortIndex {
    if (18.0..=24.0).contains(&temperature) && (40.0..=60.0).contains(&humidity) {
        ComfortIndex::Comfortable
    } else if !(18.0..=30.0).contains(&temperature) {
        ComfortIndex::Uncomfortable
    } else if humidity > 70.0 {
        ComfortIndex::Humid
    } else if humidity < 30.0 {
        ComfortIndex::Dry
    } else {
        ComfortIndex::Moderate
    }
}

pub fn calculate_indices(reading: &WeatherReading) -> WeatherIndices {
    let t = reading.temperature();
    WeatherIndices {
        heat_index: heat_index(t, reading.humidity()),
        wind_chill: wind_chill(t, reading.wind_speed()),
        comfort: comfort_index(t, reading.humidity()),
    }
}
