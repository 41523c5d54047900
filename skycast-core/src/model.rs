use serde::{Deserialize, Serialize};

/// A resolved location to fetch weather for.
///
/// Exactly one variant is active at a time; a query is produced by location
/// resolution, handed to the fetch orchestrator once, and then discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
    None,
}

impl LocationQuery {
    pub fn is_none(&self) -> bool {
        matches!(self, LocationQuery::None)
    }
}

/// Normalized current-weather state for one location.
///
/// Constructed atomically from a single successful provider response and
/// replaced wholesale on every new fetch, never mutated field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: Option<String>,
    /// Temperature in °C, rounded to the nearest integer.
    pub temperature: i32,
    pub feels_like: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Wind speed in km/h, converted from the provider's m/s.
    pub wind_speed: i32,
    /// Atmospheric pressure in hPa.
    pub pressure: u32,
    /// Visibility in meters, absent when the provider omits it.
    pub visibility: Option<u32>,
    /// Unix seconds.
    pub sunrise: i64,
    pub sunset: i64,
    /// Condition label, e.g. "Clouds"; "N/A" when the provider sends none.
    pub conditions: String,
    pub icon: Option<String>,
}

impl WeatherSnapshot {
    /// URL of the provider's icon for the current conditions, if any.
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_ref()
            .map(|icon| format!("https://openweathermap.org/img/wn/{icon}@2x.png"))
    }
}

/// Input to the AI summarizer, derived from a snapshot.
///
/// Its identity is the tuple of the four fields; two snapshots with equal
/// tuples produce interchangeable requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRequest {
    pub temperature: i32,
    pub humidity: u8,
    pub wind_speed: i32,
    pub conditions: String,
}

impl From<&WeatherSnapshot> for SummaryRequest {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        Self {
            temperature: snapshot.temperature,
            humidity: snapshot.humidity,
            wind_speed: snapshot.wind_speed,
            conditions: snapshot.conditions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Berlin".to_string(),
            country: Some("DE".to_string()),
            temperature: 18,
            feels_like: 17,
            temp_min: 14,
            temp_max: 21,
            humidity: 55,
            wind_speed: 12,
            pressure: 1015,
            visibility: Some(10000),
            sunrise: 1_722_830_000,
            sunset: 1_722_884_000,
            conditions: "Clouds".to_string(),
            icon: Some("04d".to_string()),
        }
    }

    #[test]
    fn summary_request_takes_the_four_summary_fields() {
        let snapshot = sample_snapshot();
        let request = SummaryRequest::from(&snapshot);

        assert_eq!(request.temperature, 18);
        assert_eq!(request.humidity, 55);
        assert_eq!(request.wind_speed, 12);
        assert_eq!(request.conditions, "Clouds");
    }

    #[test]
    fn icon_url_built_from_icon_code() {
        let snapshot = sample_snapshot();
        assert_eq!(
            snapshot.icon_url().as_deref(),
            Some("https://openweathermap.org/img/wn/04d@2x.png")
        );

        let without_icon = WeatherSnapshot { icon: None, ..snapshot };
        assert!(without_icon.icon_url().is_none());
    }

    #[test]
    fn location_query_none_check() {
        assert!(LocationQuery::None.is_none());
        assert!(!LocationQuery::City("Oslo".into()).is_none());
    }
}
