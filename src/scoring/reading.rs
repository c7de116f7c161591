use std::ops::RangeInclusive;

use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;

use crate::errors::ReadingError;
use crate::settings::{settings, ReadingDefaults, ReadingLimits};

pub const MANUAL_LOCATION: &str = "Manual Input";

/// One validated set of atmospheric measurements.
///
/// Units: temperature °C, humidity %, pressure hPa, wind speed m/s,
/// visibility km. An absent visibility means the sky is assumed clear.
///
/// Values are stored as `f32`, about seven significant digits. Input closer
/// to a scoring threshold than that (`1012.99999` hPa) is stored as the
/// threshold itself and scored as such.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherReading {
    temperature: f32,
    humidity: f32,
    pressure: f32,
    wind_speed: f32,
    visibility: Option<f32>,
}

impl WeatherReading {
    /// Validates against the configured [`ReadingLimits`].
    pub fn new(
        temperature: f32,
        humidity: f32,
        pressure: f32,
        wind_speed: f32,
        visibility: Option<f32>,
    ) -> Result<Self, ReadingError> {
        Self::with_limits(
            temperature,
            humidity,
            pressure,
            wind_speed,
            visibility,
            &settings().limits,
        )
    }

    pub fn with_limits(
        temperature: f32,
        humidity: f32,
        pressure: f32,
        wind_speed: f32,
        visibility: Option<f32>,
        limits: &ReadingLimits,
    ) -> Result<Self, ReadingError> {
        check("temperature", temperature, &limits.temperature_range())?;
        check("humidity", humidity, &limits.humidity_range())?;
        check("pressure", pressure, &limits.pressure_range())?;
        check("wind_speed", wind_speed, &limits.wind_speed_range())?;
        if let Some(v) = visibility {
            check("visibility", v, &limits.visibility_range())?;
        }

        Ok(Self {
            temperature,
            humidity,
            pressure,
            wind_speed,
            visibility,
        })
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn humidity(&self) -> f32 {
        self.humidity
    }

    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn wind_speed(&self) -> f32 {
        self.wind_speed
    }

    pub fn visibility(&self) -> Option<f32> {
        self.visibility
    }

    /// Visibility with the "clear" default applied.
    pub fn effective_visibility(&self) -> f32 {
        self.visibility.unwrap_or(settings().defaults.visibility)
    }
}

fn check(
    field: &'static str,
    value: f32,
    range: &RangeInclusive<f32>,
) -> Result<(), ReadingError> {
    if !value.is_finite() {
        return Err(ReadingError::NotFinite { field, value });
    }
    if !range.contains(&value) {
        return Err(ReadingError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(())
}

/// Parses one textual measurement. The result is rounded to the nearest `f32`,
/// see [`WeatherReading`].
pub fn parse_measurement(field: &'static str, raw: &str) -> Result<f32, ReadingError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| ReadingError::NotNumeric {
            field,
            raw: raw.to_string(),
        })
}

/// A reading whose fields may be missing, as delivered by a data source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialReading {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub pressure: Option<f32>,
    pub wind_speed: Option<f32>,
    pub visibility: Option<f32>,
}

impl PartialReading {
    /// Fills missing fields from `defaults`, then validates.
    ///
    /// Visibility stays absent when missing; [`WeatherReading::effective_visibility`]
    /// supplies the clear-sky value.
    pub fn complete(self, defaults: &ReadingDefaults) -> Result<WeatherReading, ReadingError> {
        WeatherReading::new(
            self.temperature.unwrap_or(defaults.temperature),
            self.humidity.unwrap_or(defaults.humidity),
            self.pressure.unwrap_or(defaults.pressure),
            self.wind_speed.unwrap_or(defaults.wind_speed),
            self.visibility,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub lat: f32,
    pub lon: f32,
}

/// Descriptive metadata that rides along with an API reading. Not scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conditions {
    pub feels_like: f32,
    pub temp_min: f32,
    pub temp_max: f32,
    pub wind_direction: f32,
    pub wind_gust: f32,
    pub cloudiness: f32,
    pub main: String,
    pub description: String,
    pub icon: String,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
    pub rain_1h: f32,
    pub rain_3h: f32,
    pub snow_1h: f32,
    pub snow_3h: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiReading {
    pub reading: WeatherReading,
    /// Observation time in the location's own UTC offset.
    pub observed_at: Option<DateTime<FixedOffset>>,
    pub location: Location,
    pub conditions: Conditions,
}

impl ApiReading {
    pub fn new(reading: WeatherReading) -> Self {
        Self {
            reading,
            observed_at: None,
            location: Location::default(),
            conditions: Conditions::default(),
        }
    }

    pub fn observed_at(mut self, at: DateTime<FixedOffset>) -> Self {
        self.observed_at = Some(at);
        self
    }

    pub fn local_hour(&self) -> Option<u32> {
        self.observed_at.map(|at| at.hour())
    }
}

/// Where a reading came from. Scoring treats both the same way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReadingSource {
    Manual(WeatherReading),
    Api(ApiReading),
}

impl ReadingSource {
    pub fn reading(&self) -> &WeatherReading {
        match self {
            Self::Manual(reading) => reading,
            Self::Api(api) => &api.reading,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Manual(_) => MANUAL_LOCATION,
            Self::Api(api) if api.location.name.is_empty() => "Unknown",
            Self::Api(api) => &api.location.name,
        }
    }
}
