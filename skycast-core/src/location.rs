//! Location resolution.
//!
//! Startup location is resolved through a prioritized chain of sources, each
//! returning either a resolution or "try next". Explicit user search always
//! takes precedence over the chain and goes through [`search_query`].

use async_trait::async_trait;
use ipgeolocate::{Locator, Service};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::LocationQuery;
use crate::notice::Notice;

/// Shown when the position lookup fails or is refused.
pub const DENIED_FALLBACK_CITY: &str = "Dubai";
/// Shown when no geolocation capability exists at all.
pub const UNSUPPORTED_FALLBACK_CITY: &str = "London";

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Position lookup failed: {0}")]
    LookupFailed(String),
}

/// Device-position capability.
///
/// Availability and lookup are separate questions: an available capability
/// can still fail or be refused, which drives a different fallback than a
/// capability that is missing entirely.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    fn is_available(&self) -> bool;
    async fn locate(&self) -> Result<(f64, f64), GeoError>;
}

/// IP-based positioning via ip-api.com.
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    enabled: bool,
}

impl IpApiLocator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    fn is_available(&self) -> bool {
        self.enabled
    }

    async fn locate(&self) -> Result<(f64, f64), GeoError> {
        let loc = Locator::get("", Service::IpApi)
            .await
            .map_err(|e| GeoError::LookupFailed(e.to_string()))?;

        match (loc.latitude.parse::<f64>(), loc.longitude.parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => {
                info!(lat = latitude, lon = longitude, city = %loc.city, "resolved device position");
                Ok((latitude, longitude))
            }
            _ => Err(GeoError::LookupFailed(format!(
                "could not parse coordinates '{}', '{}'",
                loc.latitude, loc.longitude
            ))),
        }
    }
}

/// Outcome of one resolution: the query to fetch and the notice to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub query: LocationQuery,
    pub notice: Notice,
}

/// One entry in the prioritized startup chain. `None` means "try next".
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn resolve(&self) -> Option<Resolution>;
}

/// Device position, falling back to [`DENIED_FALLBACK_CITY`] when the lookup
/// fails. Defers to the next source when the capability is missing.
pub struct DeviceLocation<'a> {
    locator: &'a dyn GeoLocator,
}

impl<'a> DeviceLocation<'a> {
    pub fn new(locator: &'a dyn GeoLocator) -> Self {
        Self { locator }
    }
}

#[async_trait]
impl LocationSource for DeviceLocation<'_> {
    async fn resolve(&self) -> Option<Resolution> {
        if !self.locator.is_available() {
            return None;
        }

        match self.locator.locate().await {
            Ok((latitude, longitude)) => Some(Resolution {
                query: LocationQuery::Coordinates { latitude, longitude },
                notice: Notice::LocationFound,
            }),
            Err(e) => {
                warn!(error = %e, "position lookup failed, falling back to default city");
                Some(Resolution {
                    query: LocationQuery::City(DENIED_FALLBACK_CITY.to_string()),
                    notice: Notice::GeolocationDenied,
                })
            }
        }
    }
}

/// Terminal source for when no geolocation capability exists.
pub struct UnsupportedFallback;

#[async_trait]
impl LocationSource for UnsupportedFallback {
    async fn resolve(&self) -> Option<Resolution> {
        Some(Resolution {
            query: LocationQuery::City(UNSUPPORTED_FALLBACK_CITY.to_string()),
            notice: Notice::GeolocationUnsupported,
        })
    }
}

/// Walk the chain in priority order and return the first resolution.
///
/// The chain is expected to end in a terminal source; if every source defers,
/// the unsupported fallback applies.
pub async fn resolve_startup(sources: &[&dyn LocationSource]) -> Resolution {
    for source in sources {
        if let Some(resolution) = source.resolve().await {
            return resolution;
        }
    }

    Resolution {
        query: LocationQuery::City(UNSUPPORTED_FALLBACK_CITY.to_string()),
        notice: Notice::GeolocationUnsupported,
    }
}

/// Resolve the startup location with the standard chain.
pub async fn resolve_initial_location(locator: &dyn GeoLocator) -> Resolution {
    let device = DeviceLocation::new(locator);
    let sources: [&dyn LocationSource; 2] = [&device, &UnsupportedFallback];
    resolve_startup(&sources).await
}

/// Validate explicit search input.
///
/// Returns `None` for empty or whitespace-only text; the caller emits the
/// empty-search notice and must not issue a fetch.
pub fn search_query(text: &str) -> Option<LocationQuery> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(LocationQuery::City(trimmed.to_string()))
    }
}
