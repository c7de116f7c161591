use serde_json::json;
use std::env;
use std::process;
use weather_dash::errors::ReadingError;
use weather_dash::scoring::{
    assess, calculate_indices, parse_measurement, PartialReading, ReadingSource,
};
use weather_dash::settings::settings;
use weather_dash::utils::{log_invalid_input, DashboardReport};

/// Placeholder argument that keeps the configured default for a field.
const KEEP_DEFAULT: &str = "_";

fn print_usage() {
    eprintln!(
        "Usage: score-reading <temperature> <humidity> <pressure> <wind_speed> [visibility] [--json]"
    );
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <temperature>  Air temperature in °C");
    eprintln!("  <humidity>     Relative humidity in %");
    eprintln!("  <pressure>     Sea-level pressure in hPa");
    eprintln!("  <wind_speed>   Wind speed in m/s");
    eprintln!("  [visibility]   Visibility in km (omit for clear conditions)");
    eprintln!("  --json         Print JSON instead of the report");
    eprintln!();
    eprintln!("Pass {KEEP_DEFAULT} for any measurement to use its configured default.");
}

fn field(name: &'static str, raw: Option<&&String>) -> Result<Option<f32>, ReadingError> {
    match raw {
        None => Ok(None),
        Some(raw) if raw.as_str() == KEEP_DEFAULT => Ok(None),
        Some(raw) => parse_measurement(name, raw).map(Some),
    }
}

fn parse_partial(values: &[&String]) -> Result<PartialReading, ReadingError> {
    Ok(PartialReading {
        temperature: field("temperature", values.first())?,
        humidity: field("humidity", values.get(1))?,
        pressure: field("pressure", values.get(2))?,
        wind_speed: field("wind_speed", values.get(3))?,
        visibility: field("visibility", values.get(4))?,
    })
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let json_output = args.iter().any(|a| a == "--json");

    let values: Vec<&String> = args.iter().skip(1).filter(|a| *a != "--json").collect();
    if values.len() < 4 || values.len() > 5 {
        print_usage();
        process::exit(1);
    }

    let reading = match parse_partial(&values).and_then(|p| p.complete(&settings().defaults)) {
        Ok(reading) => reading,
        Err(e) => {
            log_invalid_input(&e.to_string());
            process::exit(1);
        }
    };

    let source = ReadingSource::Manual(reading);
    let assessment = match assess(&source, &[]) {
        Ok(assessment) => assessment,
        Err(e) => {
            log_invalid_input(&e.to_string());
            process::exit(1);
        }
    };
    let indices = calculate_indices(&reading);

    if json_output {
        let body = json!({
            "reading": source,
            "assessment": assessment,
            "indices": indices,
        });
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        return;
    }

    DashboardReport {
        source: &source,
        assessment: &assessment,
        indices: Some(indices),
        daily: &[],
        patterns: None,
    }
    .print();
}
