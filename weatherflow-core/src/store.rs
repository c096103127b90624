//! Session state: selected place, latest forecast and current suggestions.
//!
//! State lives in a `watch` channel so front ends can observe every change.
//! Each commit and each suggestion request is numbered; a response is only
//! applied if nothing newer was issued while it was in flight.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::WeatherFetchError,
    model::{ForecastSeries, PlaceCandidate, PlaceSelection, WeatherSnapshot},
    provider::WeatherProvider,
    resolver::LocationResolver,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreState {
    /// Last committed place.
    pub place: String,
    /// Display address the provider resolved `place` to.
    pub location: Option<String>,
    /// Current weather, always `series[0]`.
    pub weather: Option<WeatherSnapshot>,
    pub series: Option<ForecastSeries>,
    pub suggestions: Vec<PlaceCandidate>,
}

/// What happened to a refresh or suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer request was issued meanwhile; the response was dropped.
    Superseded,
    /// Blank input, nothing committed.
    Ignored,
}

#[derive(Debug)]
pub struct WeatherStore {
    provider: Arc<dyn WeatherProvider>,
    resolver: LocationResolver,
    state: watch::Sender<StoreState>,
    place_seq: AtomicU64,
    query_seq: AtomicU64,
}

impl WeatherStore {
    pub fn new(provider: Arc<dyn WeatherProvider>, default_place: impl Into<String>) -> Self {
        let state = StoreState { place: default_place.into(), ..StoreState::default() };
        let (state, _) = watch::channel(state);

        Self {
            resolver: LocationResolver::new(provider.clone()),
            provider,
            state,
            place_seq: AtomicU64::new(0),
            query_seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the whole state.
    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn place(&self) -> String {
        self.state.borrow().place.clone()
    }

    pub fn weather(&self) -> Option<WeatherSnapshot> {
        self.state.borrow().weather.clone()
    }

    pub fn suggestions(&self) -> Vec<PlaceCandidate> {
        self.state.borrow().suggestions.clone()
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Fetch weather for the currently selected place.
    pub async fn refresh(&self) -> Result<Outcome, WeatherFetchError> {
        // Counter and place only change together under the channel lock.
        let (seq, place) = {
            let state = self.state.borrow();
            (self.place_seq.load(Ordering::SeqCst), state.place.clone())
        };
        self.refresh_as(seq, &place).await
    }

    /// Commit a place and fetch weather for it.
    ///
    /// The place stays committed even if the fetch fails.
    #[instrument(skip_all)]
    pub async fn select(
        &self,
        selection: impl Into<PlaceSelection>,
    ) -> Result<Outcome, WeatherFetchError> {
        let selection = selection.into();
        let place = selection.place().to_string();
        if place.trim().is_empty() {
            return Ok(Outcome::Ignored);
        }

        let mut seq = 0;
        self.state.send_modify(|s| {
            // Pending suggestion lookups are stale once a place is picked.
            self.query_seq.fetch_add(1, Ordering::SeqCst);
            seq = self.place_seq.fetch_add(1, Ordering::SeqCst) + 1;
            s.place = place.clone();
            s.suggestions.clear();
        });

        self.refresh_as(seq, &place).await
    }

    /// Resolve `query` and replace the suggestion list with the result.
    #[instrument(skip(self))]
    pub async fn suggest(&self, query: &str) -> Outcome {
        let seq = self.query_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let candidates = self.resolver.resolve(query).await;

        let applied = self.state.send_if_modified(|s| {
            if self.query_seq.load(Ordering::SeqCst) != seq {
                return false;
            }
            s.suggestions = candidates;
            true
        });

        if applied {
            Outcome::Applied
        } else {
            debug!("dropping suggestions for superseded query");
            Outcome::Superseded
        }
    }

    pub fn clear_suggestions(&self) {
        self.state.send_if_modified(|s| {
            self.query_seq.fetch_add(1, Ordering::SeqCst);
            let changed = !s.suggestions.is_empty();
            s.suggestions.clear();
            changed
        });
    }

    async fn refresh_as(&self, seq: u64, place: &str) -> Result<Outcome, WeatherFetchError> {
        let result = self.fetch(place).await;
        let is_current = || self.place_seq.load(Ordering::SeqCst) == seq;

        let (location, series) = match result {
            Ok(ok) => ok,
            Err(_) if !is_current() => return Ok(superseded(place)),
            Err(e) => {
                warn!(%place, error = %e, "weather refresh failed, keeping previous data");
                return Err(e);
            }
        };

        let periods = series.len();
        // Commits happen under the same lock.
        let applied = self.state.send_if_modified(|s| {
            if !is_current() {
                return false;
            }
            s.location = Some(location.clone());
            s.weather = Some(series.current().clone());
            s.series = Some(series);
            true
        });

        if !applied {
            return Ok(superseded(place));
        }
        info!(%place, %location, periods, "weather refreshed");
        Ok(Outcome::Applied)
    }

    async fn fetch(&self, place: &str) -> Result<(String, ForecastSeries), WeatherFetchError> {
        let locations = self.provider.forecast(place).await?;

        let first = locations
            .into_iter()
            .next()
            .ok_or_else(|| WeatherFetchError::NotFound(place.to_string()))?;

        let location = if first.address.trim().is_empty() { first.key } else { first.address };
        let series = ForecastSeries::new(first.values)
            .ok_or_else(|| WeatherFetchError::EmptySeries(place.to_string()))?;

        Ok((location, series))
    }
}

fn superseded(place: &str) -> Outcome {
    debug!(%place, "dropping weather for superseded place");
    Outcome::Superseded
}
