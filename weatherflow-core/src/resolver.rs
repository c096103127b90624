//! Place autocomplete: remote search with a local gazetteer fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    error::ResolutionFailure, gazetteer, model::PlaceCandidate, provider::WeatherProvider,
};

/// Queries shorter than this (in characters) never hit the network.
pub const MIN_QUERY_CHARS: usize = 2;

/// Upper bound on returned candidates.
pub const MAX_CANDIDATES: usize = 8;

#[derive(Debug, Clone)]
pub struct LocationResolver {
    provider: Arc<dyn WeatherProvider>,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Ranked candidates for `query`, at most [`MAX_CANDIDATES`].
    ///
    /// Never fails: remote errors and empty results fall back to the gazetteer.
    pub async fn resolve(&self, query: &str) -> Vec<PlaceCandidate> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.remote(query).await {
            Ok(candidates) => candidates,
            Err(failure) => {
                warn!(%query, error = %failure, "place search unavailable, using gazetteer");
                gazetteer::search(query, MAX_CANDIDATES)
            }
        }
    }

    async fn remote(&self, query: &str) -> Result<Vec<PlaceCandidate>, ResolutionFailure> {
        let locations = self.provider.forecast(query).await?;

        let candidates: Vec<PlaceCandidate> = locations
            .into_iter()
            .filter_map(|loc| {
                let address = if loc.address.trim().is_empty() { loc.key } else { loc.address };
                PlaceCandidate::from_address(
                    &address,
                    loc.latitude.unwrap_or_default(),
                    loc.longitude.unwrap_or_default(),
                )
            })
            .take(MAX_CANDIDATES)
            .collect();

        if candidates.is_empty() {
            return Err(ResolutionFailure::NoResults(query.to_string()));
        }

        debug!(%query, count = candidates.len(), "remote place search");
        Ok(candidates)
    }
}
