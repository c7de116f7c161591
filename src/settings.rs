use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub dashboard: Dashboard,
    pub defaults: ReadingDefaults,
    pub limits: ReadingLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub units: String,
    pub lang: String,
    pub timeout_secs: u64,
    pub forecast_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub default_location: String,
    pub refresh_secs: u64,
    pub history_limit: usize,
    /// How long a cached forecast is reused. 0 fetches it on every refresh.
    #[serde(default)]
    pub forecast_ttl_secs: u64,
}

/// Values substituted for fields a reading arrives without.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingDefaults {
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
    pub wind_speed: f32,
    pub visibility: f32,
}

/// Physical ranges a reading must fall within to be scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingLimits {
    pub temperature: (f32, f32),
    pub humidity: (f32, f32),
    pub pressure: (f32, f32),
    pub max_wind_speed: f32,
    pub max_visibility: f32,
}

impl ReadingLimits {
    pub fn temperature_range(&self) -> RangeInclusive<f32> {
        self.temperature.0..=self.temperature.1
    }

    pub fn humidity_range(&self) -> RangeInclusive<f32> {
        self.humidity.0..=self.humidity.1
    }

    pub fn pressure_range(&self) -> RangeInclusive<f32> {
        self.pressure.0..=self.pressure.1
    }

    pub fn wind_speed_range(&self) -> RangeInclusive<f32> {
        0.0..=self.max_wind_speed
    }

    pub fn visibility_range(&self) -> RangeInclusive<f32> {
        0.0..=self.max_visibility
    }
}

impl Default for ReadingDefaults {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            humidity: 50.0,
            pressure: 1013.0,
            wind_speed: 5.0,
            visibility: 10.0,
        }
    }
}

impl Default for ReadingLimits {
    fn default() -> Self {
        Self {
            temperature: (-100.0, 70.0),
            humidity: (0.0, 100.0),
            pressure: (800.0, 1100.0),
            max_wind_speed: 150.0,
            max_visibility: 1000.0,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: Api {
                base_url: "https://api.openweathermap.org/data/2.5".to_string(),
                units: "metric".to_string(),
                lang: "en".to_string(),
                timeout_secs: 10,
                forecast_days: 5,
            },
            dashboard: Dashboard {
                default_location: "London".to_string(),
                refresh_secs: 30,
                history_limit: 24,
                forecast_ttl_secs: 0,
            },
            defaults: ReadingDefaults::default(),
            limits: ReadingLimits::default(),
        }
    }
}

impl Settings {
    pub fn load() -> &'static Settings {
        SETTINGS.get_or_init(Self::load_from_files)
    }

    fn load_from_files() -> Settings {
        let default_path = Path::new("settings.default.ron");
        let override_path = Path::new("settings.ron");

        let mut settings = if default_path.exists() {
            Self::read_file(default_path).unwrap_or_default()
        } else {
            Settings::default()
        };

        if override_path.exists() {
            if let Some(overrides) = Self::read_file(override_path) {
                settings = overrides;
            }
        }

        settings
    }

    fn read_file(path: &Path) -> Option<Settings> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("could not read {}: {e}", path.display());
                return None;
            }
        };
        match ron::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!("ignoring malformed {}: {e}", path.display());
                None
            }
        }
    }
}

pub fn settings() -> &'static Settings {
    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let limits = ReadingLimits::default();
        assert!(limits.humidity_range().contains(&0.0));
        assert!(limits.humidity_range().contains(&100.0));
        assert!(!limits.humidity_range().contains(&100.5));
        assert!(limits.pressure_range().contains(&1013.0));
        assert!(limits.temperature_range().contains(&-100.0));
        assert!(!limits.temperature_range().contains(&70.5));
        assert!(limits.wind_speed_range().contains(&0.0));
        assert!(!limits.wind_speed_range().contains(&-0.1));
        assert!(limits.visibility_range().contains(&1000.0));
    }

    #[test]
    fn test_settings_roundtrip_through_ron() {
        let original = Settings::default();
        let text = ron::to_string(&original).expect("serialize settings");
        let parsed: Settings = ron::from_str(&text).expect("parse settings");
        assert_eq!(parsed.api.base_url, original.api.base_url);
        assert_eq!(parsed.defaults.humidity, 50.0);
        assert_eq!(parsed.dashboard.history_limit, 24);
    }

    #[test]
    fn test_bundled_default_file_parses() {
        let text = include_str!("../settings.default.ron");
        let parsed: Settings = ron::from_str(text).expect("parse settings.default.ron");
        assert_eq!(parsed.defaults.wind_speed, 5.0);
        assert_eq!(parsed.api.forecast_days, 5);
        assert_eq!(parsed.dashboard.forecast_ttl_secs, 0);
    }

    #[test]
    fn test_forecast_ttl_is_optional() {
        let text = r#"(default_location: "Oslo", refresh_secs: 60, history_limit: 5)"#;
        let parsed: Dashboard = ron::from_str(text).expect("parse dashboard");
        assert_eq!(parsed.forecast_ttl_secs, 0);
    }
}
