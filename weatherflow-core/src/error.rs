//! Error types shared by the provider, resolver and store.

use thiserror::Error;

/// Failure talking to the remote weather provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to send request to weather provider: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Weather provider request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse weather provider JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Weather provider returned an error: {0}")]
    Api(String),
}

/// Why a remote place search could not be used.
///
/// The resolver recovers from every variant by falling back to the local
/// gazetteer, so this never reaches callers; it exists for logging.
#[derive(Debug, Error)]
pub enum ResolutionFailure {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no places matched '{0}'")]
    NoResults(String),
}

/// Failure refreshing weather for the selected place.
#[derive(Debug, Error)]
pub enum WeatherFetchError {
    #[error("'{0}' does not exist or weather data is not available")]
    NotFound(String),

    #[error("weather provider returned no forecast values for '{0}'")]
    EmptySeries(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_place() {
        let err = WeatherFetchError::NotFound("Atlantis".into());
        assert_eq!(
            err.to_string(),
            "'Atlantis' does not exist or weather data is not available"
        );
    }

    #[test]
    fn provider_status_is_transparent_through_fetch_error() {
        let err: WeatherFetchError =
            ProviderError::Status { status: 429, body: "slow down".into() }.into();
        assert!(err.to_string().contains("status 429"));
        assert!(err.to_string().contains("slow down"));
    }
}
