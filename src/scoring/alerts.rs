use serde::{Serialize, Serializer};
use strum::Display;

use super::reading::WeatherReading;

pub const STORM_ALERT_ABOVE: u8 = 70;
pub const PRECIPITATION_ALERT_ABOVE: u8 = 80;
pub const STRONG_WIND_ABOVE: f32 = 20.0;
pub const POOR_VISIBILITY_BELOW: f32 = 3.0;
pub const FREEZING_BELOW: f32 = 0.0;
pub const EXTREME_HEAT_ABOVE: f32 = 35.0;
pub const VERY_LOW_PRESSURE_BELOW: f32 = 995.0;

/// Alerts in the order they are raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Alert {
    #[strum(serialize = "High storm risk detected - Low pressure and strong winds")]
    StormRisk,
    #[strum(serialize = "Heavy precipitation expected - High humidity and low pressure")]
    HeavyPrecipitation,
    #[strum(serialize = "Strong wind conditions - Exercise caution outdoors")]
    StrongWind,
    #[strum(serialize = "Poor visibility conditions - Fog or precipitation present")]
    PoorVisibility,
    #[strum(serialize = "Freezing temperatures - Risk of ice formation")]
    Freezing,
    #[strum(serialize = "Extreme heat conditions - Stay hydrated")]
    ExtremeHeat,
    #[strum(serialize = "Very low atmospheric pressure - Severe weather possible")]
    VeryLowPressure,
}

impl Serialize for Alert {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `storm` and `precipitation` are likelihoods in percentage points.
pub fn generate_alerts(storm: u8, precipitation: u8, reading: &WeatherReading) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if storm > STORM_ALERT_ABOVE {
        alerts.push(Alert::StormRisk);
    }

    if precipitation > PRECIPITATION_ALERT_ABOVE {
        alerts.push(Alert::HeavyPrecipitation);
    }

    if reading.wind_speed() > STRONG_WIND_ABOVE {
        alerts.push(Alert::StrongWind);
    }

    if reading.effective_visibility() < POOR_VISIBILITY_BELOW {
        alerts.push(Alert::PoorVisibility);
    }

    let t = reading.temperature();
    if t < FREEZING_BELOW {
        alerts.push(Alert::Freezing);
    } else if t > EXTREME_HEAT_ABOVE {
        alerts.push(Alert::ExtremeHeat);
    }

    if reading.pressure() < VERY_LOW_PRESSURE_BELOW {
        alerts.push(Alert::VeryLowPressure);
    }

    alerts
}
