//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (IP geolocation with default-city fallbacks)
//! - The OpenWeather client and payload-to-snapshot mapping
//! - The app state machine (fetch sequencing, summary keying, notices)
//! - The AI summarizer client with its absorbed failure mode
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or
//! services.

pub mod app;
pub mod config;
pub mod location;
pub mod model;
pub mod notice;
pub mod provider;
pub mod summary;
pub mod theme;

pub use app::{App, FetchCompletion, SharedApp, UiState, fetch_flow, new_shared, summary_flow};
pub use config::Config;
pub use location::{GeoLocator, IpApiLocator, Resolution, resolve_initial_location, search_query};
pub use model::{LocationQuery, SummaryRequest, WeatherSnapshot};
pub use notice::{Notice, NoticeLevel};
pub use provider::{FetchError, WeatherProvider, openweather::OpenWeatherProvider};
pub use summary::{OllamaSummarizer, SUMMARY_FALLBACK, Summarizer, request_summary};
pub use theme::Theme;
