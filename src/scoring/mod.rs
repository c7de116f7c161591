pub mod alerts;
pub mod classification;
pub mod indices;
pub mod outlook;
pub mod reading;
pub mod risk;
mod score;

use serde::Serialize;

use crate::errors::ScoringError;

pub use alerts::{generate_alerts, Alert};
pub use classification::{ComfortLevel, TemperatureClass};
pub use indices::{calculate_indices, ComfortIndex, WeatherIndices};
pub use outlook::{situational_outlook, Confidence, Outlook, RiskLevel, TemperatureChange};
pub use reading::{
    parse_measurement, ApiReading, Conditions, Location, PartialReading, ReadingSource,
    WeatherReading,
};
pub use risk::{calculate_rain_chance, calculate_storm_risk, RainTier, RiskBreakdown, StormTier};
pub use score::{score_reading, ScoreResult};

/// The canonical assessment for a reading's provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Assessment {
    Instant(ScoreResult),
    Situational(Outlook),
}

impl Assessment {
    pub fn alerts(&self) -> &[Alert] {
        match self {
            Self::Instant(score) => &score.alerts,
            Self::Situational(outlook) => &outlook.alerts,
        }
    }
}

/// Manual readings get the instant percentage scores. API readings get the
/// situational outlook, with `history` (oldest first) supplying the trend.
/// The current API reading is appended to `history` if it is not already last.
pub fn assess(source: &ReadingSource, history: &[ApiReading]) -> Result<Assessment, ScoringError> {
    match source {
        ReadingSource::Manual(reading) => Ok(Assessment::Instant(score_reading(reading))),
        ReadingSource::Api(current) => {
            if history.last() == Some(current) {
                return situational_outlook(history).map(Assessment::Situational);
            }
            let mut series = history.to_vec();
            series.push(current.clone());
            situational_outlook(&series).map(Assessment::Situational)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(t: f32, h: f32, p: f32, w: f32) -> WeatherReading {
        WeatherReading::new(t, h, p, w, None).unwrap()
    }

    #[test]
    fn test_manual_source_scores_instantly() {
        let source = ReadingSource::Manual(reading(20.0, 50.0, 1013.0, 5.0));
        let assessment = assess(&source, &[]).unwrap();
        assert!(matches!(assessment, Assessment::Instant(ref s) if s.storm_score == 0));
        assert!(assessment.alerts().is_empty());
    }

    #[test]
    fn test_api_source_uses_outlook() {
        let current = ApiReading::new(reading(20.0, 50.0, 1013.0, 5.0));
        let source = ReadingSource::Api(current);
        let assessment = assess(&source, &[]).unwrap();
        assert!(matches!(assessment, Assessment::Situational(_)));
    }

    #[test]
    fn test_api_history_feeds_trend() {
        let earlier = ApiReading::new(reading(10.0, 50.0, 1000.0, 5.0));
        let current = ApiReading::new(reading(10.0, 50.0, 1010.0, 5.0));
        let source = ReadingSource::Api(current.clone());

        let Assessment::Situational(outlook) = assess(&source, &[earlier.clone()]).unwrap() else {
            panic!("expected a situational outlook");
        };
        // +2 rising pressure, +1 midday fallback
        assert_eq!(outlook.temperature_forecast, 13.0);

        // Current reading already recorded as the latest history entry.
        let Assessment::Situational(again) = assess(&source, &[earlier, current]).unwrap() else {
            panic!("expected a situational outlook");
        };
        assert_eq!(again, outlook);
    }

    #[test]
    fn test_assessment_serializes_with_kind() {
        let source = ReadingSource::Manual(reading(22.0, 50.0, 1015.0, 8.0));
        let json = serde_json::to_value(assess(&source, &[]).unwrap()).unwrap();
        assert_eq!(json["kind"], "instant");
        assert_eq!(json["result"]["comfort"], "Perfect");
        assert_eq!(json["result"]["storm_tier"], "No Risk");
    }
}
