use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{LocationQuery, WeatherSnapshot};

pub mod openweather;

/// Errors a weather fetch can surface.
///
/// Every variant is terminal for that attempt only; the orchestrator converts
/// it into a user notice and the app stays re-enterable.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No API key in config or environment. Fatal to this fetch, not the app.
    #[error("OpenWeather API key not found. Run `skycast configure` to set one.")]
    MissingApiKey,

    /// The provider rejected the query; carries the provider's own message
    /// with its first character upper-cased.
    #[error("{0}")]
    Provider(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of current-weather snapshots.
///
/// The app talks to this trait so tests can substitute a scripted provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_message_points_at_configure() {
        let msg = FetchError::MissingApiKey.to_string();
        assert!(msg.contains("API key not found"));
        assert!(msg.contains("skycast configure"));
    }

    #[test]
    fn provider_error_displays_the_message_verbatim() {
        let err = FetchError::Provider("City not found".to_string());
        assert_eq!(err.to_string(), "City not found");
    }
}
