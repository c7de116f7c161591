use proptest::prelude::*;
use rstest::rstest;
use weather_dash::scoring::{
    assess, score_reading, Alert, Assessment, ComfortLevel, RainTier, ReadingSource, StormTier,
    TemperatureClass, WeatherReading,
};
use weather_dash::session::DashboardState;
use weather_dash::utils::openweather::CurrentResponse;

fn reading(t: f32, h: f32, p: f32, w: f32, v: Option<f32>) -> WeatherReading {
    WeatherReading::new(t, h, p, w, v).unwrap()
}

#[test]
fn mild_day_scores_clean() {
    let result = score_reading(&reading(20.0, 50.0, 1013.0, 5.0, None));
    assert_eq!(result.temperature_class, TemperatureClass::Moderate);
    assert_eq!(result.comfort, ComfortLevel::Perfect);
    assert_eq!((result.storm_score, result.storm_tier), (0, StormTier::None));
    assert_eq!((result.rain_score, result.rain_tier), (0, RainTier::Unlikely));
}

#[test]
fn freezing_gale_raises_alerts() {
    let result = score_reading(&reading(-5.0, 90.0, 995.0, 20.0, Some(2.0)));
    assert_eq!(result.temperature_class, TemperatureClass::Freezing);
    assert_eq!((result.storm_score, result.storm_tier), (90, StormTier::High));
    assert_eq!((result.rain_score, result.rain_tier), (90, RainTier::VeryLikely));
    assert!(result.alerts.contains(&Alert::PoorVisibility));
    assert!(result.alerts.contains(&Alert::Freezing));
    assert!(!result.alerts.contains(&Alert::VeryLowPressure));
}

#[test]
fn perfect_day() {
    let result = score_reading(&reading(22.0, 50.0, 1015.0, 8.0, None));
    assert_eq!(result.comfort, ComfortLevel::Perfect);
}

#[rstest]
#[case(1000.0, 20)]
#[case(999.0, 40)]
#[case(1010.0, 0)]
fn storm_pressure_term(#[case] pressure: f32, #[case] expected: u8) {
    let result = score_reading(&reading(15.0, 50.0, pressure, 5.0, None));
    assert_eq!(result.storm_score, expected);
}

#[test]
fn api_payload_flows_through_dashboard_state() {
    let body = r#"{
        "coord": {"lon": -0.13, "lat": 51.51},
        "weather": [{"main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 8.0, "feels_like": 5.0, "temp_min": 7.0, "temp_max": 9.0,
                 "pressure": 998, "humidity": 88},
        "visibility": 4000,
        "wind": {"speed": 11.0, "deg": 200},
        "clouds": {"all": 90},
        "dt": 1717243200,
        "sys": {"country": "GB", "sunrise": 1717214000, "sunset": 1717273000},
        "timezone": 3600,
        "name": "London"
    }"#;
    let response: CurrentResponse = serde_json::from_str(body).unwrap();
    let current = response
        .into_reading(&weather_dash::settings::ReadingDefaults::default())
        .unwrap();

    let mut state = DashboardState::new(5);
    state.set_location("London");
    let assessment = state.record(ReadingSource::Api(current)).unwrap();
    let Assessment::Situational(outlook) = assessment else {
        panic!("API readings get a situational outlook");
    };
    // pressure 40 + wind 15 + humidity 20 + visibility 20
    assert_eq!(outlook.storm_probability, 0.95);
    // humidity 40 + pressure 30 + wind 10 + cold-humid 20
    assert_eq!(outlook.precipitation_probability, 1.0);
    assert!(outlook.alerts.contains(&Alert::StormRisk));
    assert!(outlook.alerts.contains(&Alert::HeavyPrecipitation));
    assert_eq!(state.history().len(), 1);
}

#[test]
fn invalid_readings_never_reach_scoring() {
    assert!(WeatherReading::new(f32::NAN, 50.0, 1013.0, 5.0, None).is_err());
    assert!(WeatherReading::new(20.0, 120.0, 1013.0, 5.0, None).is_err());
    assert!(WeatherReading::new(20.0, 50.0, 1013.0, -1.0, None).is_err());
}

fn valid_reading() -> impl Strategy<Value = WeatherReading> {
    (
        -60.0f32..60.0,
        0.0f32..=100.0,
        850.0f32..1080.0,
        0.0f32..60.0,
        prop::option::of(0.0f32..50.0),
    )
        .prop_map(|(t, h, p, w, v)| reading(t, h, p, w, v))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn scores_stay_in_percentage_range(r in valid_reading()) {
        let result = score_reading(&r);
        prop_assert!(result.storm_score <= 100);
        prop_assert!(result.rain_score <= 100);
        prop_assert_eq!(result.storm_tier, StormTier::from_score(result.storm_score));
        prop_assert_eq!(result.rain_tier, RainTier::from_score(result.rain_score));
    }

    #[test]
    fn falling_pressure_never_lowers_storm_score(
        r in valid_reading(),
        drop in 0.0f32..50.0,
    ) {
        let lower = (r.pressure() - drop).max(800.0);
        let dropped = reading(r.temperature(), r.humidity(), lower, r.wind_speed(), r.visibility());
        prop_assert!(score_reading(&dropped).storm_score >= score_reading(&r).storm_score);
    }

    #[test]
    fn stronger_wind_never_lowers_storm_score(
        r in valid_reading(),
        gain in 0.0f32..100.0,
    ) {
        let windier = (r.wind_speed() + gain).min(150.0);
        let raised = reading(r.temperature(), r.humidity(), r.pressure(), windier, r.visibility());
        prop_assert!(score_reading(&raised).storm_score >= score_reading(&r).storm_score);
    }

    #[test]
    fn higher_humidity_never_lowers_storm_score(
        r in valid_reading(),
        gain in 0.0f32..100.0,
    ) {
        let wetter = (r.humidity() + gain).min(100.0);
        let raised = reading(r.temperature(), wetter, r.pressure(), r.wind_speed(), r.visibility());
        prop_assert!(score_reading(&raised).storm_score >= score_reading(&r).storm_score);
    }

    #[test]
    fn scoring_is_repeatable(r in valid_reading()) {
        prop_assert_eq!(score_reading(&r), score_reading(&r));
        let source = ReadingSource::Manual(r);
        prop_assert_eq!(assess(&source, &[]).unwrap(), assess(&source, &[]).unwrap());
    }

    #[test]
    fn outlook_probabilities_are_bounded(r in valid_reading()) {
        let source = ReadingSource::Api(weather_dash::scoring::ApiReading::new(r));
        let Assessment::Situational(outlook) = assess(&source, &[]).unwrap() else {
            panic!("API readings get a situational outlook");
        };
        prop_assert!((0.0..=1.0).contains(&outlook.storm_probability));
        prop_assert!((0.0..=1.0).contains(&outlook.precipitation_probability));
    }
}
