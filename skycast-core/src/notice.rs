//! User-visible advisory messages.
//!
//! Notices are fire-and-forget: components emit them on an unbounded channel
//! and the presentation layer decides how to show them. They are never errors
//! in the control-flow sense; every notice leaves the app in a usable state.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Advisory messages surfaced to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Device position resolved; local weather is being fetched.
    LocationFound,
    /// Position lookup failed or was refused; falling back to Dubai.
    GeolocationDenied,
    /// No geolocation capability at all; falling back to London.
    GeolocationUnsupported,
    /// Search submitted with empty or whitespace-only text.
    EmptySearch,
    /// A weather fetch attempt failed; carries the surfaced reason.
    FetchFailed(String),
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::LocationFound
            | Notice::GeolocationDenied
            | Notice::GeolocationUnsupported => NoticeLevel::Info,
            Notice::EmptySearch | Notice::FetchFailed(_) => NoticeLevel::Error,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notice::LocationFound => "Location found!",
            Notice::GeolocationDenied => "Location Access Denied",
            Notice::GeolocationUnsupported => "Geolocation Not Supported",
            Notice::EmptySearch => "Empty search",
            Notice::FetchFailed(_) => "Error fetching weather",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Notice::LocationFound => "Fetching your local weather.".to_string(),
            Notice::GeolocationDenied => {
                "Showing weather for Dubai. Enable location or search for a city.".to_string()
            }
            Notice::GeolocationUnsupported => {
                "Showing weather for London. Please search for a city.".to_string()
            }
            Notice::EmptySearch => "Please enter a city name.".to_string(),
            Notice::FetchFailed(reason) => reason.clone(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.detail())
    }
}
