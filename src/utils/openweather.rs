use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{FetchError, ReadingError};
use crate::forecast::ForecastPoint;
use crate::scoring::{ApiReading, Conditions, Location, PartialReading};
use crate::settings::{Api, ReadingDefaults};

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
/// Forecast steps are three hours apart.
pub const STEPS_PER_DAY: u32 = 8;

static COORDINATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d{1,3}(?:\.\d+)?)\s*,\s*(-?\d{1,3}(?:\.\d+)?)\s*$").unwrap()
});

#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f32, lon: f32 },
}

impl LocationQuery {
    /// Accepts a city name or `lat,lon`.
    pub fn parse(input: &str) -> Self {
        if let Some(caps) = COORDINATES.captures(input) {
            let lat = caps.get(1).and_then(|m| m.as_str().parse::<f32>().ok());
            let lon = caps.get(2).and_then(|m| m.as_str().parse::<f32>().ok());
            if let (Some(lat), Some(lon)) = (lat, lon) {
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
                    return LocationQuery::Coordinates { lat, lon };
                }
            }
        }
        LocationQuery::City(input.trim().to_string())
    }

    fn to_query(&self) -> String {
        match self {
            Self::City(name) => format!("q={}", urlencoding::encode(name)),
            Self::Coordinates { lat, lon } => format!("lat={lat}&lon={lon}"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MainBlock {
    temp: Option<f32>,
    feels_like: Option<f32>,
    temp_min: Option<f32>,
    temp_max: Option<f32>,
    pressure: Option<f32>,
    humidity: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherDescription {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    speed: Option<f32>,
    deg: Option<f32>,
    gust: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct Clouds {
    all: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct Volume {
    #[serde(rename = "1h")]
    one_hour: Option<f32>,
    #[serde(rename = "3h")]
    three_hours: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct Coord {
    lat: f32,
    lon: f32,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    name: Option<String>,
    #[serde(default)]
    coord: Coord,
    #[serde(default)]
    weather: Vec<WeatherDescription>,
    #[serde(default)]
    main: MainBlock,
    /// Meters.
    visibility: Option<f32>,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    clouds: Clouds,
    rain: Option<Volume>,
    snow: Option<Volume>,
    dt: Option<i64>,
    #[serde(default)]
    sys: Sys,
    /// Offset from UTC in seconds.
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    #[serde(default)]
    main: MainBlock,
    #[serde(default)]
    weather: Vec<WeatherDescription>,
    #[serde(default)]
    clouds: Clouds,
    #[serde(default)]
    wind: Wind,
    visibility: Option<f32>,
    pop: Option<f32>,
    rain: Option<Volume>,
    snow: Option<Volume>,
}

#[derive(Debug, Default, Deserialize)]
struct City {
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastItem>,
    #[serde(default)]
    city: City,
}

fn offset(seconds: Option<i32>) -> FixedOffset {
    seconds
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

fn local_time(timestamp: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset))
}

fn primary(weather: &[WeatherDescription]) -> (String, String, String) {
    match weather.first() {
        Some(w) => (w.main.clone(), w.description.clone(), w.icon.clone()),
        None => ("Unknown".into(), "Unknown".into(), "01d".into()),
    }
}

fn partial_reading(main: &MainBlock, wind: &Wind, visibility_m: Option<f32>) -> PartialReading {
    PartialReading {
        temperature: main.temp,
        humidity: main.humidity,
        pressure: main.pressure,
        wind_speed: wind.speed,
        visibility: visibility_m.map(|m| m / 1000.0),
    }
}

impl CurrentResponse {
    pub fn into_reading(self, defaults: &ReadingDefaults) -> Result<ApiReading, ReadingError> {
        let reading =
            partial_reading(&self.main, &self.wind, self.visibility).complete(defaults)?;
        let tz = offset(self.timezone);
        let (main, description, icon) = primary(&self.weather);
        let rain = self.rain.unwrap_or_default();
        let snow = self.snow.unwrap_or_default();
        let temperature = reading.temperature();

        Ok(ApiReading {
            reading,
            observed_at: self.dt.and_then(|dt| local_time(dt, tz)),
            location: Location {
                name: self.name.unwrap_or_else(|| "Unknown".into()),
                country: self.sys.country.unwrap_or_else(|| "Unknown".into()),
                lat: self.coord.lat,
                lon: self.coord.lon,
            },
            conditions: Conditions {
                feels_like: self.main.feels_like.unwrap_or(temperature),
                temp_min: self.main.temp_min.unwrap_or(temperature),
                temp_max: self.main.temp_max.unwrap_or(temperature),
                wind_direction: self.wind.deg.unwrap_or(0.0),
                wind_gust: self.wind.gust.unwrap_or(0.0),
                cloudiness: self.clouds.all.unwrap_or(0.0),
                main,
                description,
                icon,
                sunrise: self.sys.sunrise.and_then(|t| local_time(t, tz)),
                sunset: self.sys.sunset.and_then(|t| local_time(t, tz)),
                rain_1h: rain.one_hour.unwrap_or(0.0),
                rain_3h: rain.three_hours.unwrap_or(0.0),
                snow_1h: snow.one_hour.unwrap_or(0.0),
                snow_3h: snow.three_hours.unwrap_or(0.0),
            },
        })
    }
}

impl ForecastResponse {
    /// Points come back sorted by time. Items without a usable timestamp are skipped.
    pub fn into_points(self, defaults: &ReadingDefaults) -> Vec<ForecastPoint> {
        let tz = offset(self.city.timezone);
        let mut points: Vec<ForecastPoint> = self
            .list
            .into_iter()
            .filter_map(|item| {
                let at = local_time(item.dt, tz)?;
                let (weather_main, _, _) = primary(&item.weather);
                Some(ForecastPoint {
                    at,
                    temperature: item.main.temp.unwrap_or(defaults.temperature),
                    humidity: item.main.humidity.unwrap_or(defaults.humidity),
                    pressure: item.main.pressure.unwrap_or(defaults.pressure),
                    wind_speed: item.wind.speed.unwrap_or(defaults.wind_speed),
                    visibility: item
                        .visibility
                        .map_or(defaults.visibility, |m| m / 1000.0),
                    cloudiness: item.clouds.all.unwrap_or(0.0),
                    weather_main,
                    precipitation_probability: item.pop.unwrap_or(0.0) * 100.0,
                    rain_3h: item.rain.and_then(|r| r.three_hours).unwrap_or(0.0),
                    snow_3h: item.snow.and_then(|s| s.three_hours).unwrap_or(0.0),
                })
            })
            .collect();
        points.sort_by_key(|p| p.at);
        points
    }
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    config: Api,
    defaults: ReadingDefaults,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: String,
        config: Api,
        defaults: ReadingDefaults,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| FetchError::Request {
                endpoint: "client",
                source,
            })?;
        Ok(Self {
            client,
            api_key,
            config,
            defaults,
        })
    }

    pub fn from_env(config: Api, defaults: ReadingDefaults) -> Result<Self, FetchError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(FetchError::MissingApiKey)?;
        Self::new(api_key, config, defaults)
    }

    fn url(&self, endpoint: &str, location: &LocationQuery, extra: &str) -> String {
        format!(
            "{}/{}?{}&appid={}&units={}&lang={}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint,
            location.to_query(),
            urlencoding::encode(&self.api_key),
            self.config.units,
            self.config.lang,
            extra
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
    ) -> Result<T, FetchError> {
        debug!(endpoint, "requesting OpenWeatherMap");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { endpoint, status });
        }

        response
            .json()
            .await
            .map_err(|source| FetchError::Decode { endpoint, source })
    }

    pub async fn current(&self, location: &LocationQuery) -> Result<ApiReading, FetchError> {
        let endpoint = "weather";
        let body: CurrentResponse = self
            .get_json(endpoint, &self.url(endpoint, location, ""))
            .await?;
        body.into_reading(&self.defaults)
            .map_err(|source| FetchError::InvalidReading { endpoint, source })
    }

    pub async fn forecast(
        &self,
        location: &LocationQuery,
        days: u32,
    ) -> Result<Vec<ForecastPoint>, FetchError> {
        let endpoint = "forecast";
        let extra = format!("&cnt={}", days.saturating_mul(STEPS_PER_DAY));
        let body: ForecastResponse = self
            .get_json(endpoint, &self.url(endpoint, location, &extra))
            .await?;
        Ok(body.into_points(&self.defaults))
    }
}
