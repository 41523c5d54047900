//! Presentation theme derived from the current snapshot.

use crate::model::WeatherSnapshot;

/// Background theme classification for the current conditions.
///
/// Computed purely from the snapshot's condition label; the view layer owns
/// the result and applies it however it renders (ANSI accent in the CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    #[default]
    Default,
}

impl Theme {
    /// Classify a snapshot into a theme.
    ///
    /// Case-insensitive substring match on the condition label, in precedence
    /// order: sun/clear, cloud, rain/drizzle, snow. Anything else, and an
    /// absent snapshot, map to `Default`.
    pub fn classify(snapshot: Option<&WeatherSnapshot>) -> Self {
        let Some(snapshot) = snapshot else {
            return Theme::Default;
        };

        let condition = snapshot.conditions.to_lowercase();
        if condition.contains("sun") || condition.contains("clear") {
            Theme::Sunny
        } else if condition.contains("cloud") {
            Theme::Cloudy
        } else if condition.contains("rain") || condition.contains("drizzle") {
            Theme::Rainy
        } else if condition.contains("snow") {
            Theme::Snowy
        } else {
            Theme::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_conditions(conditions: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Testville".to_string(),
            country: None,
            temperature: 10,
            feels_like: 9,
            temp_min: 8,
            temp_max: 12,
            humidity: 60,
            wind_speed: 5,
            pressure: 1010,
            visibility: None,
            sunrise: 0,
            sunset: 0,
            conditions: conditions.to_string(),
            icon: None,
        }
    }

    #[test]
    fn classify_matches_condition_substrings() {
        let cases = [
            ("Clear", Theme::Sunny),
            ("Sunny", Theme::Sunny),
            ("Overcast Clouds", Theme::Cloudy),
            ("Light Rain", Theme::Rainy),
            ("Drizzle", Theme::Rainy),
            ("Heavy Snow", Theme::Snowy),
            ("Thunderstorm", Theme::Default),
            ("Mist", Theme::Default),
        ];

        for (conditions, expected) in cases {
            let snapshot = snapshot_with_conditions(conditions);
            assert_eq!(Theme::classify(Some(&snapshot)), expected, "conditions: {conditions}");
        }
    }

    #[test]
    fn sun_takes_precedence_over_cloud() {
        let snapshot = snapshot_with_conditions("Sunny intervals with clouds");
        assert_eq!(Theme::classify(Some(&snapshot)), Theme::Sunny);
    }

    #[test]
    fn absent_snapshot_is_default() {
        assert_eq!(Theme::classify(None), Theme::Default);
    }
}
