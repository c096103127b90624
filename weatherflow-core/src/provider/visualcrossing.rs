use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::{DEFAULT_API_HOST, DEFAULT_TIMEOUT_SECS},
    error::ProviderError,
    model::{Condition, WeatherSnapshot},
};

use super::{ProviderLocation, WeatherProvider};

const AGGREGATE_HOURS: &str = "24";
const UNIT_GROUP: &str = "metric";

/// Visual Crossing forecast endpoint, reached through RapidAPI.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    host: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct VisualCrossingBuilder {
    api_key: String,
    host: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl VisualCrossingBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Endpoint root, e.g. a mock server address in tests.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<VisualCrossingProvider, ProviderError> {
        let http = Client::builder().timeout(self.timeout).build()?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| format!("https://{}", self.host))
            .trim_end_matches('/')
            .to_string();

        Ok(VisualCrossingProvider { api_key: self.api_key, host: self.host, base_url, http })
    }
}

impl VisualCrossingProvider {
    pub fn builder(api_key: impl Into<String>) -> VisualCrossingBuilder {
        VisualCrossingBuilder {
            api_key: api_key.into(),
            host: DEFAULT_API_HOST.to_string(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    async fn fetch(&self, location: &str) -> Result<VcResponse, ProviderError> {
        let url = format!("{}/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(&[
                ("aggregateHours", AGGREGATE_HOURS),
                ("location", location),
                ("contentType", "json"),
                ("unitGroup", UNIT_GROUP),
                ("shortColumnNames", "0"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: VcResponse = serde_json::from_str(&body)?;

        if let Some(code) = parsed.error_code {
            let message = parsed.message.clone().unwrap_or_else(|| format!("error code {code}"));
            return Err(ProviderError::Api(message));
        }

        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct VcResponse {
    #[serde(rename = "errorCode")]
    error_code: Option<i64>,
    message: Option<String>,
    /// Kept as a raw map so the provider's key order survives.
    #[serde(default)]
    locations: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct VcLocation {
    #[serde(default)]
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    values: Vec<VcValue>,
}

#[derive(Debug, Deserialize)]
struct VcValue {
    /// Epoch milliseconds.
    datetime: Option<i64>,
    temp: Option<f64>,
    mint: Option<f64>,
    maxt: Option<f64>,
    heatindex: Option<f64>,
    wspd: Option<f64>,
    humidity: Option<f64>,
    visibility: Option<f64>,
    precip: Option<f64>,
    conditions: Option<String>,
}

impl From<VcValue> for WeatherSnapshot {
    fn from(v: VcValue) -> Self {
        let condition_label = v.conditions.unwrap_or_default();
        let condition = Condition::classify(&condition_label);

        WeatherSnapshot {
            time: v.datetime.and_then(DateTime::<Utc>::from_timestamp_millis),
            temperature_c: v.temp,
            min_temperature_c: v.mint,
            max_temperature_c: v.maxt,
            // Heat index is only reported in hot weather.
            feels_like_c: v.heatindex.or(v.temp),
            wind_speed_kph: v.wspd,
            humidity_pct: v.humidity,
            visibility_km: v.visibility,
            precipitation_mm: v.precip,
            condition_label,
            condition,
        }
    }
}

fn into_locations(
    raw: serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<ProviderLocation>, ProviderError> {
    raw.into_iter()
        .map(|(key, value)| -> Result<ProviderLocation, ProviderError> {
            let loc: VcLocation = serde_json::from_value(value)?;
            Ok(ProviderLocation {
                key,
                address: loc.address.unwrap_or_default(),
                latitude: loc.latitude,
                longitude: loc.longitude,
                values: loc.values.into_iter().map(WeatherSnapshot::from).collect(),
            })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    #[instrument(skip(self), level = "debug")]
    async fn forecast(&self, location: &str) -> Result<Vec<ProviderLocation>, ProviderError> {
        let parsed = self.fetch(location).await?;
        let locations = match parsed.locations {
            Some(raw) => into_locations(raw)?,
            None => Vec::new(),
        };

        debug!(count = locations.len(), "Visual Crossing returned locations");
        Ok(locations)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_maps_to_snapshot() {
        let v: VcValue = serde_json::from_value(json!({
            "datetime": 1_700_000_000_000_i64,
            "temp": 29.4,
            "mint": 25.1,
            "maxt": 31.0,
            "heatindex": 35.2,
            "wspd": 18.0,
            "humidity": 78.5,
            "visibility": 9.8,
            "precip": 0.4,
            "conditions": "Rain, Partially cloudy"
        }))
        .expect("valid value");

        let s = WeatherSnapshot::from(v);
        assert_eq!(s.temperature_c, Some(29.4));
        assert_eq!(s.feels_like_c, Some(35.2));
        assert_eq!(s.condition, Condition::Rain);
        assert_eq!(s.condition_label, "Rain, Partially cloudy");
        assert_eq!(s.time.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn missing_heat_index_falls_back_to_temperature() {
        let v: VcValue = serde_json::from_value(json!({
            "temp": 12.0,
            "heatindex": null,
            "conditions": "Overcast"
        }))
        .expect("valid value");

        let s = WeatherSnapshot::from(v);
        assert_eq!(s.feels_like_c, Some(12.0));
        assert_eq!(s.wind_speed_kph, None);
        assert_eq!(s.condition, Condition::Cloudy);
    }

    #[test]
    fn locations_keep_response_order() {
        let parsed: VcResponse = serde_json::from_str(
            r#"{"locations": {
                "zeta": {"address": "Zeta, Z", "latitude": 1.0, "longitude": 2.0, "values": []},
                "alpha": {"address": "Alpha, A", "latitude": 3.0, "longitude": 4.0, "values": []}
            }}"#,
        )
        .expect("valid response");

        let locs = into_locations(parsed.locations.expect("locations")).expect("valid locations");
        let keys: Vec<&str> = locs.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let t = truncate_body(&long);
        assert!(t.ends_with("..."));
        assert_eq!(t.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
