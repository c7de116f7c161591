//! Error types for reading validation, scoring and the weather data source.

use thiserror::Error;

/// A reading that cannot be scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadingError {
    /// A field held NaN or an infinity.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    /// A field fell outside its physical range.
    #[error("{field} {value} is outside the accepted range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// A textual field could not be parsed as a number.
    #[error("{field} is not a number: {raw:?}")]
    NotNumeric { field: &'static str, raw: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("situational scoring needs at least one reading")]
    EmptySeries,
    #[error("pattern detection needs at least one forecast point")]
    EmptyForecast,
}

/// Failures of the weather data source. These never turn into a reading.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("OPENWEATHER_API_KEY is not set")]
    MissingApiKey,
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("could not decode {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned an unusable reading")]
    InvalidReading {
        endpoint: &'static str,
        #[source]
        source: ReadingError,
    },
}
