use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::subscriber::set_global_default;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weather_dash::forecast::{aggregate_daily, detect_patterns};
use weather_dash::scoring::{calculate_indices, ReadingSource};
use weather_dash::session::DashboardState;
use weather_dash::settings::settings;
use weather_dash::utils::openweather::{LocationQuery, OpenWeatherClient};
use weather_dash::utils::{
    log_fetch_error, log_fetch_start, log_fetch_success, log_forecast_unavailable, log_init,
    DashboardReport,
};

#[derive(Debug, Clone, PartialEq)]
struct Args {
    location: String,
    refresh_secs: Option<u64>,
    days: u32,
    json: bool,
}

fn print_usage() {
    eprintln!("Usage: weather-dash [location] [--refresh [seconds]] [--days <n>] [--json]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [location]   City name or \"lat,lon\" (defaults to the configured location)");
    eprintln!("  --refresh    Poll again every N seconds (defaults to the configured interval)");
    eprintln!("  --days       Forecast days to fetch, 1-5");
    eprintln!("  --json       Print JSON instead of the dashboard");
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let config = settings();
    let mut args = Args {
        location: config.dashboard.default_location.clone(),
        refresh_secs: None,
        days: config.api.forecast_days,
        json: false,
    };
    let mut location_parts: Vec<&str> = Vec::new();

    let mut iter = raw.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--refresh" => {
                let secs = match iter.peek().and_then(|next| next.parse::<u64>().ok()) {
                    Some(secs) => {
                        iter.next();
                        secs
                    }
                    None => config.dashboard.refresh_secs,
                };
                if secs == 0 {
                    bail!("--refresh needs a positive number of seconds");
                }
                args.refresh_secs = Some(secs);
            }
            "--days" => {
                let value = iter.next().ok_or_else(|| anyhow!("--days needs a value"))?;
                let days: u32 = value
                    .parse()
                    .with_context(|| format!("--days is not a number: {value:?}"))?;
                if !(1..=5).contains(&days) {
                    bail!("--days must be between 1 and 5, got {days}");
                }
                args.days = days;
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            part => location_parts.push(part),
        }
    }

    if !location_parts.is_empty() {
        args.location = location_parts.join(" ");
    }
    Ok(args)
}

async fn refresh(client: &OpenWeatherClient, state: &mut DashboardState, args: &Args) -> Result<()> {
    let query = LocationQuery::parse(&args.location);
    if !args.json {
        log_fetch_start(&args.location);
    }

    let current = client.current(&query).await?;
    state.set_location(&args.location);

    if state.needs_forecast(&args.location, Utc::now()) {
        match client.forecast(&query, args.days).await {
            Ok(points) => state.store_forecast(points, Utc::now()),
            Err(e) => {
                warn!("forecast request failed: {e}");
                if !args.json {
                    log_forecast_unavailable(&e.to_string());
                }
            }
        }
    }
    if !args.json {
        log_fetch_success(state.forecast().len());
    }

    state.record(ReadingSource::Api(current))?;
    render(state, args)
}

fn render(state: &DashboardState, args: &Args) -> Result<()> {
    let (Some(source), Some(assessment)) = (state.current(), state.assessment()) else {
        return Ok(());
    };
    let indices = calculate_indices(source.reading());
    let daily = aggregate_daily(state.forecast());
    let patterns = detect_patterns(state.forecast()).ok();

    if args.json {
        let body = json!({
            "location": state.location(),
            "reading": source,
            "assessment": assessment,
            "indices": indices,
            "daily": daily,
            "patterns": patterns,
        });
        let text = if args.refresh_secs.is_some() {
            serde_json::to_string(&body)?
        } else {
            serde_json::to_string_pretty(&body)?
        };
        println!("{text}");
        return Ok(());
    }

    DashboardReport {
        source,
        assessment,
        indices: Some(indices),
        daily: &daily,
        patterns,
    }
    .print();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("weather_dash=info".parse()?))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        );
    set_global_default(subscriber).context("failed to set tracing subscriber")?;

    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            std::process::exit(1);
        }
    };

    let config = settings();
    let client = OpenWeatherClient::from_env(config.api.clone(), config.defaults.clone())?;
    let mut state = DashboardState::new(config.dashboard.history_limit)
        .forecast_ttl(Duration::from_secs(config.dashboard.forecast_ttl_secs));

    if !args.json {
        log_init(&args.location, args.refresh_secs);
    }

    let Some(secs) = args.refresh_secs else {
        return refresh(&client, &mut state, &args).await;
    };

    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = refresh(&client, &mut state, &args).await {
                    if args.json {
                        warn!("refresh failed: {e:#}");
                    } else {
                        log_fetch_error(&format!("{e:#}"));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down after {} readings", state.history().len());
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Result<Args> {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        parse_args(&raw)
    }

    #[test]
    fn test_defaults_from_settings() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.location, settings().dashboard.default_location);
        assert_eq!(parsed.refresh_secs, None);
        assert!(!parsed.json);
    }

    #[test]
    fn test_multi_word_location_and_flags() {
        let parsed = args(&["New", "York", "--days", "3", "--json"]).unwrap();
        assert_eq!(parsed.location, "New York");
        assert_eq!(parsed.days, 3);
        assert!(parsed.json);
    }

    #[test]
    fn test_refresh_with_and_without_value() {
        assert_eq!(args(&["--refresh", "60"]).unwrap().refresh_secs, Some(60));
        let bare = args(&["--refresh", "Paris"]).unwrap();
        assert_eq!(bare.refresh_secs, Some(settings().dashboard.refresh_secs));
        assert_eq!(bare.location, "Paris");
    }

    #[test]
    fn test_rejects_bad_options() {
        assert!(args(&["--days", "9"]).is_err());
        assert!(args(&["--days"]).is_err());
        assert!(args(&["--refresh", "0"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }
}
