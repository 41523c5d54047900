//! Human-friendly output formatting.

use chrono::{DateTime, Local};

use skycast_core::{Notice, NoticeLevel, Theme, UiState};

const RESET: &str = "\x1b[0m";

/// ANSI accent applied to the card header, derived from the theme.
fn theme_accent(theme: Theme) -> &'static str {
    match theme {
        Theme::Sunny => "\x1b[1;33m",
        Theme::Cloudy => "\x1b[1;37m",
        Theme::Rainy => "\x1b[1;34m",
        Theme::Snowy => "\x1b[1;36m",
        Theme::Default => "\x1b[1m",
    }
}

pub fn print_notice(notice: &Notice) {
    match notice.level() {
        NoticeLevel::Info => println!("• {notice}"),
        NoticeLevel::Error => eprintln!("✗ {notice}"),
    }
}

pub fn print_card(state: &UiState) {
    let Some(snapshot) = &state.snapshot else {
        if state.loading {
            println!("Loading weather…");
        } else {
            println!("No weather data yet. Search for a city.");
        }
        return;
    };

    let accent = theme_accent(state.theme);
    let location = match &snapshot.country {
        Some(country) => format!("{}, {}", snapshot.city, country),
        None => snapshot.city.clone(),
    };

    println!();
    println!("{accent}── {location} ──{RESET}");
    println!("   {}", snapshot.conditions);
    if let Some(icon_url) = snapshot.icon_url() {
        println!("   icon: {icon_url}");
    }
    println!();
    println!("   {}°C  (feels like {}°C)", snapshot.temperature, snapshot.feels_like);
    println!(
        "   Min/Max: {}°C / {}°C    Humidity: {}%",
        snapshot.temp_min, snapshot.temp_max, snapshot.humidity
    );
    println!(
        "   Wind: {} km/h    Pressure: {} hPa    Visibility: {}",
        snapshot.wind_speed,
        snapshot.pressure,
        format_visibility(snapshot.visibility)
    );
    println!(
        "   Sunrise: {}    Sunset: {}",
        format_sun_time(snapshot.sunrise),
        format_sun_time(snapshot.sunset)
    );
    println!();

    if state.loading_ai_summary {
        println!("   AI summary: generating…");
    } else if let Some(summary) = &state.summary {
        println!("   AI summary: {summary}");
    }
    println!();
}

/// Unix seconds to a local wall-clock time.
fn format_sun_time(unix: i64) -> String {
    DateTime::from_timestamp(unix, 0)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Meters to kilometers with one decimal.
fn format_visibility(meters: Option<u32>) -> String {
    match meters {
        Some(meters) => format!("{:.1} km", f64::from(meters) / 1000.0),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_renders_km_with_one_decimal() {
        assert_eq!(format_visibility(Some(10000)), "10.0 km");
        assert_eq!(format_visibility(Some(8500)), "8.5 km");
        assert_eq!(format_visibility(None), "n/a");
    }

    #[test]
    fn out_of_range_sun_time_renders_placeholder() {
        assert_eq!(format_sun_time(i64::MAX), "--:--");
    }
}
