use crate::{
    Config, error::ProviderError, model::WeatherSnapshot,
    provider::visualcrossing::VisualCrossingProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod visualcrossing;

/// One location entry of a provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderLocation {
    /// Key the provider filed the entry under, usually the query echoed back.
    pub key: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Per-period readings, oldest first.
    pub values: Vec<WeatherSnapshot>,
}

/// Remote source for both place search and forecasts.
///
/// The same call serves both: search reads the locations, forecast reads the
/// values of the first one.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn forecast(&self, location: &str) -> Result<Vec<ProviderLocation>, ProviderError>;
}

/// Construct the Visual Crossing provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    let provider = VisualCrossingProvider::builder(api_key)
        .host(&config.api_host)
        .base_url(config.base_url())
        .timeout(config.timeout())
        .build()?;

    Ok(Arc::new(provider))
}
