use std::fmt;

use console::{pad_str, Alignment, Style};

use crate::forecast::{DailySummary, WeatherPatterns};
use crate::scoring::{
    Alert, Assessment, Outlook, RainTier, ReadingSource, RiskLevel, ScoreResult, StormTier,
    WeatherIndices,
};

/// Label column width at the top level of a report.
const LABEL_COLUMN: usize = 25;
const NEST_WIDTH: usize = 4;

/// Connectors drawn in front of report rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Branch,
    End,
    Rail,
    Blank,
}

impl Glyph {
    fn closing(is_last: bool) -> Self {
        if is_last {
            Glyph::End
        } else {
            Glyph::Branch
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Glyph::Branch => "\u{251C}\u{2500}\u{2500} ",
            Glyph::End => "\u{2514}\u{2500}\u{2500} ",
            Glyph::Rail => "\u{2502}   ",
            Glyph::Blank => "    ",
        };
        write!(f, "{}", dim().apply_to(text))
    }
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn init_prefix() -> String {
    blue().apply_to("[INIT]").to_string()
}

fn api_prefix() -> String {
    magenta().apply_to("[API]").to_string()
}

/// Pads `label` so values line up at the same column at every nesting `depth`.
pub fn pad_label(label: &str, depth: usize) -> String {
    let width = LABEL_COLUMN.saturating_sub(depth * NEST_WIDTH);
    format!("{} ", pad_str(label, width.saturating_sub(1), Alignment::Left, None))
}

fn storm_style(tier: StormTier) -> Style {
    match tier {
        StormTier::High => red().bold(),
        StormTier::Medium => yellow(),
        StormTier::Low => yellow().dim(),
        StormTier::None => green(),
    }
}

fn rain_style(tier: RainTier) -> Style {
    match tier {
        RainTier::VeryLikely => blue().bold(),
        RainTier::Likely => blue(),
        RainTier::Possible => dim(),
        RainTier::Unlikely => green(),
    }
}

fn risk_style(level: RiskLevel) -> Style {
    match level {
        RiskLevel::High => red().bold(),
        RiskLevel::Medium => yellow(),
        RiskLevel::Low => green(),
    }
}

pub fn log_init(location: &str, refresh_secs: Option<u64>) {
    println!(
        "{} starting weather-dash for {}...",
        init_prefix(),
        cyan().apply_to(location),
    );
    match refresh_secs {
        Some(secs) => println!(
            "{} refreshing every {}.",
            init_prefix(),
            green().apply_to(format!("{secs}s"))
        ),
        None => println!("{} auto-refresh is {}.", init_prefix(), yellow().apply_to("disabled")),
    }
}

pub fn log_fetch_start(location: &str) {
    println!(
        "{} fetching weather for {}...",
        api_prefix(),
        cyan().apply_to(location)
    );
}

pub fn log_fetch_success(points: usize) {
    println!(
        "{}current conditions and {} forecast points",
        Glyph::End,
        bold().apply_to(points)
    );
}

pub fn log_fetch_error(error: &str) {
    println!(
        "{} {} {}",
        api_prefix(),
        red().apply_to("failed:"),
        dim().apply_to(error)
    );
}

pub fn log_forecast_unavailable(error: &str) {
    println!(
        "{}{} {}",
        Glyph::End,
        yellow().apply_to("forecast unavailable:"),
        dim().apply_to(error)
    );
}

pub fn log_invalid_input(error: &str) {
    eprintln!("{} {}", red().apply_to("[INPUT]"), error);
}

/// Everything the terminal dashboard shows for one refresh.
pub struct DashboardReport<'a> {
    pub source: &'a ReadingSource,
    pub assessment: &'a Assessment,
    pub indices: Option<WeatherIndices>,
    pub daily: &'a [DailySummary],
    pub patterns: Option<WeatherPatterns>,
}

impl DashboardReport<'_> {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let reading = self.source.reading();

        let title = match self.source {
            ReadingSource::Api(api)
                if !api.location.country.is_empty() && api.location.country != "Unknown" =>
            {
                format!("{}, {}", self.source.label(), api.location.country)
            }
            _ => self.source.label().to_string(),
        };
        lines.push(format!(
            "{} {}",
            magenta().apply_to(bold().apply_to("[WEATHER]")),
            dim().apply_to(title)
        ));

        if let ReadingSource::Api(api) = self.source {
            if !api.conditions.description.is_empty() {
                lines.push(format!("{}", dim().apply_to(&api.conditions.description)));
            }
        }

        lines.push(String::new());
        lines.push(format!("{}", bold().apply_to("MEASUREMENTS")));
        let visibility = match reading.visibility() {
            Some(v) => format!("{v:.1} km"),
            None => format!("{}", dim().apply_to("clear")),
        };
        let rows = [
            ("temperature", format!("{:.1} °C", reading.temperature())),
            ("humidity", format!("{:.0} %", reading.humidity())),
            ("pressure", format!("{:.0} hPa", reading.pressure())),
            ("wind", format!("{:.1} m/s", reading.wind_speed())),
            ("visibility", visibility),
        ];
        push_rows(&mut lines, &rows);

        match self.assessment {
            Assessment::Instant(score) => push_instant(&mut lines, score),
            Assessment::Situational(outlook) => push_outlook(&mut lines, outlook),
        }

        if let Some(indices) = self.indices {
            lines.push(String::new());
            lines.push(format!("{}", bold().apply_to("INDICES")));
            push_rows(
                &mut lines,
                &[
                    ("heat index", format!("{:.1} °C", indices.heat_index)),
                    ("wind chill", format!("{:.1} °C", indices.wind_chill)),
                    ("comfort", indices.comfort.to_string()),
                ],
            );
        }

        push_alerts(&mut lines, self.assessment.alerts());

        if let Some(patterns) = self.patterns {
            lines.push(String::new());
            lines.push(format!("{}", bold().apply_to("PATTERNS")));
            push_rows(
                &mut lines,
                &[
                    ("temperature", patterns.temperature_trend.to_string()),
                    ("pressure", patterns.pressure_trend.to_string()),
                    ("stability", patterns.stability.to_string()),
                    ("precipitation", patterns.precipitation.to_string()),
                ],
            );
        }

        if !self.daily.is_empty() {
            lines.push(String::new());
            lines.push(format!("{}", bold().apply_to("FORECAST")));
            let count = self.daily.len();
            for (i, day) in self.daily.iter().enumerate() {
                lines.push(format!(
                    "{}{} {:>5.1} / {:<5.1} °C  {}",
                    Glyph::closing(i == count - 1),
                    pad_label(&day.date.format("%a %d %b").to_string(), 1),
                    day.temperature_min,
                    day.temperature_max,
                    dim().apply_to(format!(
                        "rain {:.0}%  wind {:.1} m/s",
                        day.precipitation_probability_max, day.wind_speed_max
                    ))
                ));
            }
        }

        lines
    }

    pub fn print(&self) {
        println!("{}\n", self.lines().join("\n"));
    }
}

fn push_rows(lines: &mut Vec<String>, rows: &[(&str, String)]) {
    let count = rows.len();
    for (i, (label, value)) in rows.iter().enumerate() {
        lines.push(format!(
            "{}{} {}",
            Glyph::closing(i == count - 1),
            pad_label(label, 1),
            value
        ));
    }
}

fn push_reasons(lines: &mut Vec<String>, reasons: &[String]) {
    if reasons.is_empty() {
        lines.push(format!(
            "{}{}{}",
            Glyph::Rail,
            Glyph::End,
            dim().apply_to("none")
        ));
        return;
    }
    let count = reasons.len();
    for (i, reason) in reasons.iter().enumerate() {
        lines.push(format!(
            "{}{}{}",
            Glyph::Rail,
            Glyph::closing(i == count - 1),
            reason
        ));
    }
}

fn push_instant(lines: &mut Vec<String>, score: &ScoreResult) {
    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("PREDICTIONS")));
    lines.push(format!(
        "{}{} {}",
        Glyph::Branch,
        pad_label("temperature", 1),
        cyan().apply_to(score.temperature_class)
    ));
    lines.push(format!(
        "{}{} {}",
        Glyph::Branch,
        pad_label("comfort", 1),
        cyan().apply_to(score.comfort)
    ));

    lines.push(format!(
        "{}{} {} {}",
        Glyph::Branch,
        pad_label("storm risk", 1),
        storm_style(score.storm_tier).apply_to(score.storm_tier),
        dim().apply_to(format!("({}%)", score.storm_score))
    ));
    push_reasons(lines, &score.storm_reasons);

    lines.push(format!(
        "{}{} {} {}",
        Glyph::End,
        pad_label("rain chance", 1),
        rain_style(score.rain_tier).apply_to(score.rain_tier),
        dim().apply_to(format!("({}%)", score.rain_score))
    ));
    push_reasons(lines, &score.rain_reasons);
}

fn push_outlook(lines: &mut Vec<String>, outlook: &Outlook) {
    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("OUTLOOK")));
    lines.push(format!(
        "{}{} {} {}",
        Glyph::Branch,
        pad_label("storm", 1),
        risk_style(outlook.storm_risk).apply_to(outlook.storm_risk),
        dim().apply_to(format!("({:.0}%)", outlook.storm_probability * 100.0))
    ));
    lines.push(format!(
        "{}{} {:.1} °C {}",
        Glyph::Branch,
        pad_label("next temperature", 1),
        outlook.temperature_forecast,
        dim().apply_to(format!("({})", outlook.temperature_change))
    ));
    lines.push(format!(
        "{}{} {} {}",
        Glyph::Branch,
        pad_label("precipitation", 1),
        risk_style(outlook.precipitation_likelihood).apply_to(outlook.precipitation_likelihood),
        dim().apply_to(format!(
            "({:.0}%)",
            outlook.precipitation_probability * 100.0
        ))
    ));
    lines.push(format!("{}{}", Glyph::End, pad_label("confidence", 1)));
    let confidence = [
        ("storm", outlook.confidence.storm),
        ("temperature", outlook.confidence.temperature),
        ("precipitation", outlook.confidence.precipitation),
    ];
    for (i, (label, level)) in confidence.iter().enumerate() {
        lines.push(format!(
            "{}{}{} {}",
            Glyph::Blank,
            Glyph::closing(i == confidence.len() - 1),
            pad_label(label, 2),
            dim().apply_to(level)
        ));
    }
}

fn push_alerts(lines: &mut Vec<String>, alerts: &[Alert]) {
    lines.push(String::new());
    lines.push(format!("{}", bold().apply_to("ALERTS")));
    if alerts.is_empty() {
        lines.push(format!("{}{}", Glyph::End, green().apply_to("none")));
        return;
    }
    let count = alerts.len();
    for (i, alert) in alerts.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            Glyph::closing(i == count - 1),
            red().apply_to(alert)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{assess, calculate_indices, ApiReading, WeatherReading};
    use console::{measure_text_width, strip_ansi_codes};

    fn plain(lines: &[String]) -> String {
        strip_ansi_codes(&lines.join("\n")).to_string()
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(Glyph::closing(true), Glyph::End);
        assert_eq!(Glyph::closing(false), Glyph::Branch);
        assert_eq!(strip_ansi_codes(&Glyph::End.to_string()), "\u{2514}\u{2500}\u{2500} ");
        assert_eq!(measure_text_width(&Glyph::Rail.to_string()), 4);
    }

    #[test]
    fn test_pad_label() {
        assert_eq!(measure_text_width(&pad_label("status", 1)), 21);
        assert_eq!(pad_label("a-very-long-label-that-overflows", 1).len(), 33);
    }

    #[test]
    fn test_manual_report() {
        let reading = WeatherReading::new(-5.0, 90.0, 995.0, 20.0, Some(2.0)).unwrap();
        let source = ReadingSource::Manual(reading);
        let assessment = assess(&source, &[]).unwrap();
        let report = DashboardReport {
            source: &source,
            assessment: &assessment,
            indices: Some(calculate_indices(&reading)),
            daily: &[],
            patterns: None,
        };
        let text = plain(&report.lines());

        assert!(text.contains("[WEATHER] Manual Input"));
        assert!(text.contains("Freezing"));
        assert!(text.contains("High Risk (90%)"));
        assert!(text.contains("low pressure (+40)"));
        assert!(text.contains("Very Likely (90%)"));
        assert!(text.contains("Freezing temperatures - Risk of ice formation"));
        assert!(text.contains("INDICES"));
        assert!(!text.contains("FORECAST"));
    }

    #[test]
    fn test_api_report() {
        let reading = WeatherReading::new(20.0, 50.0, 1013.0, 5.0, None).unwrap();
        let mut api = ApiReading::new(reading);
        api.location.name = "Lisbon".into();
        api.location.country = "PT".into();
        let source = ReadingSource::Api(api);
        let assessment = assess(&source, &[]).unwrap();
        let report = DashboardReport {
            source: &source,
            assessment: &assessment,
            indices: None,
            daily: &[],
            patterns: None,
        };
        let text = plain(&report.lines());

        assert!(text.contains("[WEATHER] Lisbon, PT"));
        assert!(text.contains("OUTLOOK"));
        assert!(text.contains("21.0 °C (Rising)"));
        assert!(text.contains("visibility"));
        assert!(text.contains("clear"));
        assert!(text.contains("ALERTS"));
    }
}
