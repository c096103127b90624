use std::fmt;

use anyhow::Context;
use serde::Serialize;
use weatherflow_core::{ForecastSummary, PlaceCandidate, StoreState, WeatherSnapshot};

#[derive(Serialize)]
struct Report<'a> {
    place: &'a str,
    location: Option<&'a str>,
    current: Option<&'a WeatherSnapshot>,
    upcoming: &'a [WeatherSnapshot],
    summary: Option<ForecastSummary>,
}

fn report_of(state: &StoreState, days: usize) -> Report<'_> {
    Report {
        place: &state.place,
        location: state.location.as_deref(),
        current: state.weather.as_ref(),
        upcoming: state.series.as_ref().map(|s| s.upcoming(days)).unwrap_or_default(),
        summary: state.series.as_ref().map(|s| s.summary()),
    }
}

pub fn json(state: &StoreState, days: usize) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&report_of(state, days)).context("Failed to serialize report")
}

/// Round like the dashboard did, `--` when the provider omitted the value.
fn num(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v.round() as i64),
        None => "--".to_string(),
    }
}

pub fn report(state: &StoreState, days: usize) -> String {
    report_of(state, days).to_string()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.location.unwrap_or(self.place))?;

        match self.current {
            Some(w) => {
                writeln!(f, "  {} ({})", label(w), w.condition)?;
                writeln!(
                    f,
                    "  Temperature  {}°C (feels like {}°C)",
                    num(w.temperature_c),
                    num(w.feels_like_c)
                )?;
                writeln!(f, "  Wind         {} km/h", num(w.wind_speed_kph))?;
                writeln!(f, "  Humidity     {}%", num(w.humidity_pct))?;
                writeln!(f, "  Visibility   {} km", num(w.visibility_km))?;
            }
            None => writeln!(f, "  No weather data yet.")?,
        }

        if !self.upcoming.is_empty() {
            let n = self.upcoming.len();
            writeln!(f, "\nNext {n} day{}", if n == 1 { "" } else { "s" })?;
            for day in self.upcoming {
                let date = day
                    .time
                    .map(|t| t.format("%a %d %b").to_string())
                    .unwrap_or_else(|| "--".to_string());
                writeln!(f, "  {date:<10}  {:>3}°C  {}", num(day.temperature_c), label(day))?;
            }
        }

        if let Some(s) = &self.summary {
            writeln!(
                f,
                "\n{} periods: min {}°C, max {}°C, mean {}°C, {:.1} mm precipitation, mostly {}",
                s.periods,
                num(s.min_temperature_c),
                num(s.max_temperature_c),
                num(s.mean_temperature_c),
                s.total_precipitation_mm,
                s.dominant_condition
            )?;
        }

        Ok(())
    }
}

fn label(w: &WeatherSnapshot) -> &str {
    if w.condition_label.is_empty() { w.condition.description() } else { &w.condition_label }
}

pub fn candidates(query: &str, candidates: &[PlaceCandidate]) -> String {
    if candidates.is_empty() {
        return format!("No places match '{query}'.\n");
    }

    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{:>2}. {:<45} ({:.4}, {:.4})\n",
                i + 1,
                c.display_address,
                c.latitude,
                c.longitude
            )
        })
        .collect()
}
