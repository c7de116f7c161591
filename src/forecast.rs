//! Forecast series processing: daily summaries and trend patterns.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use strum::Display;

use crate::errors::ScoringError;

pub const TREND_SLOPE: f32 = 0.5;
pub const WET_POINT_ABOVE: f32 = 50.0;

/// One three-hourly forecast step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub at: DateTime<FixedOffset>,
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
    pub wind_speed: f32,
    pub visibility: f32,
    pub cloudiness: f32,
    pub weather_main: String,
    /// Percent, 0-100.
    pub precipitation_probability: f32,
    pub rain_3h: f32,
    pub snow_3h: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temperature_min: f32,
    pub temperature_max: f32,
    pub temperature_mean: f32,
    pub humidity_mean: f32,
    pub pressure_mean: f32,
    pub wind_speed_max: f32,
    pub cloudiness_mean: f32,
    pub precipitation_probability_max: f32,
    pub rain_sum: f32,
    pub snow_sum: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub fn from_slope(slope: f32) -> Self {
        if slope > TREND_SLOPE {
            Trend::Rising
        } else if slope < -TREND_SLOPE {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Stability {
    Stable,
    Variable,
    #[strum(serialize = "Highly Variable")]
    #[serde(rename = "Highly Variable")]
    HighlyVariable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum PrecipitationPattern {
    #[strum(serialize = "Frequent Rain")]
    #[serde(rename = "Frequent Rain")]
    FrequentRain,
    #[strum(serialize = "Occasional Rain")]
    #[serde(rename = "Occasional Rain")]
    OccasionalRain,
    #[strum(serialize = "Mostly Dry")]
    #[serde(rename = "Mostly Dry")]
    MostlyDry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherPatterns {
    pub temperature_trend: Trend,
    pub pressure_trend: Trend,
    pub stability: Stability,
    pub precipitation: PrecipitationPattern,
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Least-squares slope of `values` against their index.
pub fn linear_slope(values: &[f32]) -> f32 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f32 / 2.0;
    let y_mean = mean(values);
    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f32 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });
    num / den
}

/// Groups points by their local calendar date. Output is sorted by date.
pub fn aggregate_daily(points: &[ForecastPoint]) -> Vec<DailySummary> {
    let mut days: BTreeMap<NaiveDate, Vec<&ForecastPoint>> = BTreeMap::new();
    for point in points {
        days.entry(point.at.date_naive()).or_default().push(point);
    }

    days.into_iter()
        .map(|(date, day)| {
            let column =
                |f: fn(&ForecastPoint) -> f32| day.iter().map(|p| f(p)).collect::<Vec<_>>();
            let temps = column(|p| p.temperature);
            let max = |values: Vec<f32>| values.into_iter().fold(f32::MIN, f32::max);

            DailySummary {
                date,
                temperature_min: round1(temps.iter().copied().fold(f32::MAX, f32::min)),
                temperature_max: round1(max(temps.clone())),
                temperature_mean: round1(mean(&temps)),
                humidity_mean: round1(mean(&column(|p| p.humidity))),
                pressure_mean: round1(mean(&column(|p| p.pressure))),
                wind_speed_max: round1(max(column(|p| p.wind_speed))),
                cloudiness_mean: round1(mean(&column(|p| p.cloudiness))),
                precipitation_probability_max: round1(max(column(|p| p.precipitation_probability))),
                rain_sum: round1(column(|p| p.rain_3h).iter().sum()),
                snow_sum: round1(column(|p| p.snow_3h).iter().sum()),
            }
        })
        .collect()
}

pub fn detect_patterns(points: &[ForecastPoint]) -> Result<WeatherPatterns, ScoringError> {
    if points.is_empty() {
        return Err(ScoringError::EmptyForecast);
    }

    let temperatures: Vec<f32> = points.iter().map(|p| p.temperature).collect();
    let pressures: Vec<f32> = points.iter().map(|p| p.pressure).collect();

    let distinct = points
        .iter()
        .map(|p| p.weather_main.as_str())
        .collect::<HashSet<_>>()
        .len();
    let stability = match distinct {
        0..=2 => Stability::Stable,
        3..=4 => Stability::Variable,
        _ => Stability::HighlyVariable,
    };

    let wet = points
        .iter()
        .filter(|p| p.precipitation_probability > WET_POINT_ABOVE)
        .count();
    let ratio = wet as f32 / points.len() as f32;
    let precipitation = if ratio > 0.7 {
        PrecipitationPattern::FrequentRain
    } else if ratio > 0.3 {
        PrecipitationPattern::OccasionalRain
    } else {
        PrecipitationPattern::MostlyDry
    };

    Ok(WeatherPatterns {
        temperature_trend: Trend::from_slope(linear_slope(&temperatures)),
        pressure_trend: Trend::from_slope(linear_slope(&pressures)),
        stability,
        precipitation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn point(hours: i64, temperature: f32, pressure: f32, main: &str, pop: f32) -> ForecastPoint {
        let start = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 0, 0, 0)
            .unwrap();
        ForecastPoint {
            at: start + Duration::hours(hours),
            temperature,
            humidity: 60.0,
            pressure,
            wind_speed: hours as f32,
            visibility: 10.0,
            cloudiness: 40.0,
            weather_main: main.to_string(),
            precipitation_probability: pop,
            rain_3h: 0.5,
            snow_3h: 0.0,
        }
    }

    #[test]
    fn test_linear_slope() {
        assert_eq!(linear_slope(&[]), 0.0);
        assert_eq!(linear_slope(&[3.0]), 0.0);
        assert!((linear_slope(&[1.0, 2.0, 3.0, 4.0]) - 1.0).abs() < 1e-6);
        assert!((linear_slope(&[4.0, 4.0, 4.0]) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_aggregate_daily() {
        let points = vec![
            point(0, 10.0, 1010.0, "Clear", 10.0),
            point(12, 20.0, 1012.0, "Clouds", 60.0),
            point(24, 5.0, 1000.0, "Rain", 90.0),
        ];
        let days = aggregate_daily(&points);
        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.temperature_min, 10.0);
        assert_eq!(first.temperature_max, 20.0);
        assert_eq!(first.temperature_mean, 15.0);
        assert_eq!(first.pressure_mean, 1011.0);
        assert_eq!(first.wind_speed_max, 12.0);
        assert_eq!(first.precipitation_probability_max, 60.0);
        assert_eq!(first.rain_sum, 1.0);

        assert_eq!(days[1].temperature_min, 5.0);
        assert!(days[0].date < days[1].date);
    }

    #[test]
    fn test_detect_rising_dry_pattern() {
        let points: Vec<ForecastPoint> = (0..8)
            .map(|i| point(i * 3, 10.0 + i as f32, 1010.0, "Clear", 0.0))
            .collect();
        let patterns = detect_patterns(&points).unwrap();
        assert_eq!(patterns.temperature_trend, Trend::Rising);
        assert_eq!(patterns.pressure_trend, Trend::Stable);
        assert_eq!(patterns.stability, Stability::Stable);
        assert_eq!(patterns.precipitation, PrecipitationPattern::MostlyDry);
    }

    #[test]
    fn test_detect_wet_variable_pattern() {
        let mains = ["Rain", "Clouds", "Drizzle", "Thunderstorm", "Snow"];
        let points: Vec<ForecastPoint> = mains
            .iter()
            .enumerate()
            .map(|(i, m)| point(i as i64 * 3, 10.0, 1015.0 - i as f32 * 2.0, m, 80.0))
            .collect();
        let patterns = detect_patterns(&points).unwrap();
        assert_eq!(patterns.pressure_trend, Trend::Falling);
        assert_eq!(patterns.stability, Stability::HighlyVariable);
        assert_eq!(patterns.precipitation, PrecipitationPattern::FrequentRain);
    }

    #[test]
    fn test_empty_forecast() {
        assert_eq!(detect_patterns(&[]), Err(ScoringError::EmptyForecast));
        assert!(aggregate_daily(&[]).is_empty());
    }
}
