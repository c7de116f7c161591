use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::errors::ScoringError;
use crate::forecast::ForecastPoint;
use crate::scoring::{assess, ApiReading, Assessment, ReadingSource};

/// Everything the dashboard remembers between refreshes. Owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    location: Option<String>,
    current: Option<ReadingSource>,
    assessment: Option<Assessment>,
    history: VecDeque<ApiReading>,
    forecast: Vec<ForecastPoint>,
    forecast_fetched_at: Option<DateTime<Utc>>,
    forecast_ttl: Duration,
    history_limit: usize,
}

impl DashboardState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            history_limit: history_limit.max(1),
            ..Default::default()
        }
    }

    /// How long a stored forecast stays fresh. Zero means every refresh refetches.
    pub fn forecast_ttl(mut self, ttl: Duration) -> Self {
        self.forecast_ttl = ttl;
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn current(&self) -> Option<&ReadingSource> {
        self.current.as_ref()
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        self.assessment.as_ref()
    }

    pub fn history(&self) -> &VecDeque<ApiReading> {
        &self.history
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    /// Switching location drops history and cached forecast for the old one.
    pub fn set_location(&mut self, location: &str) {
        if self.location.as_deref() != Some(location) {
            self.location = Some(location.to_string());
            self.history.clear();
            self.forecast.clear();
            self.forecast_fetched_at = None;
        }
    }

    /// True when the location changed or the stored forecast has outlived its ttl.
    pub fn needs_forecast(&self, location: &str, now: DateTime<Utc>) -> bool {
        if self.location.as_deref() != Some(location) {
            return true;
        }
        let Some(fetched_at) = self.forecast_fetched_at else {
            return true;
        };
        match (now - fetched_at).to_std() {
            Ok(age) => age >= self.forecast_ttl,
            Err(_) => true,
        }
    }

    pub fn store_forecast(&mut self, forecast: Vec<ForecastPoint>, fetched_at: DateTime<Utc>) {
        self.forecast = forecast;
        self.forecast_fetched_at = Some(fetched_at);
    }

    /// Assesses `source` against the recorded history, then records it.
    pub fn record(&mut self, source: ReadingSource) -> Result<&Assessment, ScoringError> {
        if let ReadingSource::Api(ref api) = source {
            if self.history.back() != Some(api) {
                while self.history.len() >= self.history_limit.max(1) {
                    self.history.pop_front();
                }
                self.history.push_back(api.clone());
            }
        }

        let history = self.history.make_contiguous();
        let assessment = assess(&source, history)?;
        self.current = Some(source);
        Ok(self.assessment.insert(assessment))
    }
}
