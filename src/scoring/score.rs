use serde::Serialize;

use super::alerts::{generate_alerts, Alert};
use super::classification::{ComfortLevel, TemperatureClass};
use super::reading::WeatherReading;
use super::risk::{calculate_rain_chance, calculate_storm_risk, RainTier, StormTier};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub temperature_class: TemperatureClass,
    pub comfort: ComfortLevel,
    pub storm_score: u8,
    pub storm_tier: StormTier,
    pub rain_score: u8,
    pub rain_tier: RainTier,
    pub alerts: Vec<Alert>,
    pub storm_reasons: Vec<String>,
    pub rain_reasons: Vec<String>,
}

/// Instant assessment of a single reading. Pure and infallible.
pub fn score_reading(reading: &WeatherReading) -> ScoreResult {
    let storm = calculate_storm_risk(reading);
    let rain = calculate_rain_chance(reading);
    let alerts = generate_alerts(storm.score, rain.score, reading);

    ScoreResult {
        temperature_class: TemperatureClass::from_celsius(reading.temperature()),
        comfort: ComfortLevel::assess(reading),
        storm_score: storm.score,
        storm_tier: storm.tier,
        rain_score: rain.score,
        rain_tier: rain.tier,
        alerts,
        storm_reasons: storm.reasons,
        rain_reasons: rain.reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mild_day() {
        let reading = WeatherReading::new(20.0, 50.0, 1013.0, 5.0, None).unwrap();
        let result = score_reading(&reading);

        assert_eq!(result.temperature_class, TemperatureClass::Moderate);
        // Every perfect bound holds, so the perfect rule wins over comfortable.
        assert_eq!(result.comfort, ComfortLevel::Perfect);
        assert_eq!(result.storm_score, 0);
        assert_eq!(result.storm_tier, StormTier::None);
        assert_eq!(result.rain_score, 0);
        assert_eq!(result.rain_tier, RainTier::Unlikely);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_freezing_gale() {
        let reading = WeatherReading::new(-5.0, 90.0, 995.0, 20.0, Some(2.0)).unwrap();
        let result = score_reading(&reading);

        assert_eq!(result.temperature_class, TemperatureClass::Freezing);
        assert_eq!(result.storm_score, 90);
        assert_eq!(result.storm_tier, StormTier::High);
        assert_eq!(result.rain_score, 90);
        assert_eq!(result.rain_tier, RainTier::VeryLikely);

        // 20 m/s is not above the strong-wind limit, 995 hPa not below the pressure one.
        assert_eq!(
            result.alerts,
            vec![
                Alert::StormRisk,
                Alert::HeavyPrecipitation,
                Alert::PoorVisibility,
                Alert::Freezing,
            ]
        );
    }

    #[test]
    fn test_perfect_day() {
        let reading = WeatherReading::new(22.0, 50.0, 1015.0, 8.0, None).unwrap();
        assert_eq!(score_reading(&reading).comfort, ComfortLevel::Perfect);
    }

    #[test]
    fn test_idempotent() {
        let reading = WeatherReading::new(31.0, 77.0, 1004.0, 11.0, Some(6.0)).unwrap();
        assert_eq!(score_reading(&reading), score_reading(&reading));
    }
}
