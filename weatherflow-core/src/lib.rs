//! Core library for the `weatherflow` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The Visual Crossing provider behind a `WeatherProvider` trait
//! - Place autocomplete with an offline gazetteer fallback
//! - A `WeatherStore` holding the selected place and its latest forecast
//!
//! It is used by `weatherflow-cli`, but can also be embedded in other front ends.

pub mod config;
pub mod error;
pub mod gazetteer;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod store;

pub use config::Config;
pub use error::{ProviderError, ResolutionFailure, WeatherFetchError};
pub use model::{
    Condition, ForecastSeries, ForecastSummary, PlaceCandidate, PlaceSelection, WeatherSnapshot,
};
pub use provider::{ProviderLocation, WeatherProvider, provider_from_config};
pub use resolver::LocationResolver;
pub use store::{Outcome, StoreState, WeatherStore};
