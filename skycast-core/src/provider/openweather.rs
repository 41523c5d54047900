use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{LocationQuery, WeatherSnapshot};

use super::{FetchError, WeatherProvider};

/// Production endpoint; tests point `with_base_url` at a mock server.
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Client for the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        let mut params: Vec<(&str, String)> = vec![
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ];
        match query {
            LocationQuery::City(city) => params.push(("q", city.clone())),
            LocationQuery::Coordinates { latitude, longitude } => {
                params.push(("lat", latitude.to_string()));
                params.push(("lon", longitude.to_string()));
            }
            LocationQuery::None => {
                return Err(FetchError::Provider("No location specified".to_string()));
            }
        }

        let url = format!("{}/weather", self.base_url);
        debug!(url = %url, "fetching current weather");

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = %status, message = %message, "weather request rejected");
            return Err(FetchError::Provider(message));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        Ok(map_snapshot(parsed))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current(query).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    #[serde(default)]
    sys: OwSys,
}

/// Body of a non-2xx response, e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

/// Convert the raw provider payload into the internal snapshot shape.
///
/// Temperatures round to the nearest integer; wind converts m/s to km/h and
/// rounds; humidity, pressure, visibility and sun times pass through.
fn map_snapshot(raw: OwCurrentResponse) -> WeatherSnapshot {
    let condition = raw.weather.first();

    WeatherSnapshot {
        city: raw.name,
        country: raw.sys.country,
        temperature: raw.main.temp.round() as i32,
        feels_like: raw.main.feels_like.round() as i32,
        temp_min: raw.main.temp_min.round() as i32,
        temp_max: raw.main.temp_max.round() as i32,
        humidity: raw.main.humidity,
        wind_speed: (raw.wind.speed * 3.6).round() as i32,
        pressure: raw.main.pressure,
        visibility: raw.visibility,
        sunrise: raw.sys.sunrise,
        sunset: raw.sys.sunset,
        conditions: condition
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        icon: condition.and_then(|w| w.icon.clone()),
    }
}

/// Extract the human-readable reason from an error payload.
fn error_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .map(|m| capitalize_first(&m))
        .unwrap_or_else(|| "City not found".to_string())
}

/// Upper-case the first character, leaving the rest unchanged.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
