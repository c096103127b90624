use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One autocomplete suggestion for a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub region: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical identifier, committed as the place when selected.
    pub display_address: String,
}

impl PlaceCandidate {
    /// Build a candidate from a free-form, comma separated address.
    ///
    /// First segment is the name, second (if any) the region, last the country.
    /// Returns `None` for a blank address.
    pub fn from_address(address: &str, latitude: f64, longitude: f64) -> Option<Self> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let parts: Vec<&str> = address.split(',').map(str::trim).collect();
        let name = parts.first().copied().unwrap_or(address).to_string();
        let region = parts.get(1).filter(|s| !s.is_empty()).map(|s| s.to_string());
        let country = parts.last().copied().unwrap_or(address).to_string();

        Some(Self {
            name,
            region,
            country,
            latitude,
            longitude,
            display_address: address.to_string(),
        })
    }

    /// Case-insensitive substring match against every text field.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            Some(self.name.as_str()),
            self.region.as_deref(),
            Some(self.country.as_str()),
            Some(self.display_address.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl fmt::Display for PlaceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_address)
    }
}

/// What the user committed: a resolved candidate or whatever they typed.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceSelection {
    Candidate(PlaceCandidate),
    Text(String),
}

impl PlaceSelection {
    /// The string that becomes the selected place.
    pub fn place(&self) -> &str {
        match self {
            PlaceSelection::Candidate(c) => &c.display_address,
            PlaceSelection::Text(t) => t,
        }
    }
}

impl From<PlaceCandidate> for PlaceSelection {
    fn from(candidate: PlaceCandidate) -> Self {
        PlaceSelection::Candidate(candidate)
    }
}

impl From<&str> for PlaceSelection {
    fn from(text: &str) -> Self {
        PlaceSelection::Text(text.to_string())
    }
}

impl From<String> for PlaceSelection {
    fn from(text: String) -> Self {
        PlaceSelection::Text(text)
    }
}

/// Weather condition categories derived from provider labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Thunderstorm,
    Windy,
    #[default]
    Unknown,
}

impl Condition {
    /// Map a free-text label such as "Rain, Partially cloudy" onto the taxonomy.
    ///
    /// Labels often combine several conditions; the most severe one wins.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| label.contains(w));

        if has(&["thunder", "storm"]) {
            Self::Thunderstorm
        } else if has(&["snow", "sleet", "ice"]) {
            Self::Snow
        } else if has(&["rain", "shower", "drizzle"]) {
            Self::Rain
        } else if has(&["fog", "mist", "haze"]) {
            Self::Fog
        } else if has(&["cloud", "overcast"]) {
            Self::Cloudy
        } else if has(&["wind"]) {
            Self::Windy
        } else if has(&["clear", "sun"]) {
            Self::Clear
        } else {
            Self::Unknown
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
            Self::Thunderstorm => "Thunderstorm",
            Self::Windy => "Windy",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One time bucket's weather reading. Units are metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub time: Option<DateTime<Utc>>,
    pub temperature_c: Option<f64>,
    pub min_temperature_c: Option<f64>,
    pub max_temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub wind_speed_kph: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub visibility_km: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub condition_label: String,
    pub condition: Condition,
}

/// Chronological, non-empty sequence of snapshots; the first is current weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeatherSnapshot>")]
pub struct ForecastSeries(Vec<WeatherSnapshot>);

impl TryFrom<Vec<WeatherSnapshot>> for ForecastSeries {
    type Error = &'static str;

    fn try_from(values: Vec<WeatherSnapshot>) -> Result<Self, Self::Error> {
        Self::new(values).ok_or("forecast series must not be empty")
    }
}

impl ForecastSeries {
    /// Returns `None` when `values` is empty.
    pub fn new(values: Vec<WeatherSnapshot>) -> Option<Self> {
        if values.is_empty() { None } else { Some(Self(values)) }
    }

    pub fn current(&self) -> &WeatherSnapshot {
        &self.0[0]
    }

    /// Up to `n` periods following the current one.
    pub fn upcoming(&self, n: usize) -> &[WeatherSnapshot] {
        let end = (n + 1).min(self.0.len());
        &self.0[1..end]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherSnapshot> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[WeatherSnapshot] {
        &self.0
    }

    pub fn summary(&self) -> ForecastSummary {
        let temps: Vec<f64> = self.0.iter().filter_map(|s| s.temperature_c).collect();

        let min_temperature_c = temps.iter().copied().reduce(f64::min);
        let max_temperature_c = temps.iter().copied().reduce(f64::max);
        let mean_temperature_c = if temps.is_empty() {
            None
        } else {
            Some(temps.iter().sum::<f64>() / temps.len() as f64)
        };

        let total_precipitation_mm = self.0.iter().filter_map(|s| s.precipitation_mm).sum();

        // Ties go to the condition seen first.
        let mut counts: Vec<(Condition, usize)> = Vec::new();
        for s in &self.0 {
            match counts.iter_mut().find(|(c, _)| *c == s.condition) {
                Some((_, n)) => *n += 1,
                None => counts.push((s.condition, 1)),
            }
        }
        let dominant_condition = counts
            .iter()
            .fold(None::<(Condition, usize)>, |best, &(c, n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((c, n)),
            })
            .map(|(c, _)| c)
            .unwrap_or_default();

        ForecastSummary {
            periods: self.0.len(),
            min_temperature_c,
            max_temperature_c,
            mean_temperature_c,
            total_precipitation_mm,
            dominant_condition,
        }
    }
}

impl<'a> IntoIterator for &'a ForecastSeries {
    type Item = &'a WeatherSnapshot;
    type IntoIter = std::slice::Iter<'a, WeatherSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Derived statistics over a forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub periods: usize,
    pub min_temperature_c: Option<f64>,
    pub max_temperature_c: Option<f64>,
    pub mean_temperature_c: Option<f64>,
    pub total_precipitation_mm: f64,
    pub dominant_condition: Condition,
}

#[cfg(test)]
pub(crate) fn snapshot(temp: f64, label: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        time: None,
        temperature_c: Some(temp),
        min_temperature_c: None,
        max_temperature_c: None,
        feels_like_c: Some(temp),
        wind_speed_kph: None,
        humidity_pct: None,
        visibility_km: None,
        precipitation_mm: None,
        condition_label: label.to_string(),
        condition: Condition::classify(label),
    }
}
