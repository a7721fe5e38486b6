use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};

use crate::{
    error::AppError,
    form::PlaceData,
    geocoding::PlaceSuggestion,
    timezone::TimezoneLookup,
};

/// Timezone recorded when the lookup succeeds without naming one.
pub const UNKNOWN_TIMEZONE: &str = "Unknown";

/// Turns a picked suggestion into a [`PlaceData`] with numeric coordinates and a timezone.
#[derive(Clone)]
pub struct PlaceResolver {
    timezone: Arc<dyn TimezoneLookup>,
}

impl PlaceResolver {
    pub fn new(timezone: Arc<dyn TimezoneLookup>) -> Self {
        Self { timezone }
    }

    pub async fn resolve(&self, suggestion: &PlaceSuggestion) -> Result<PlaceData, AppError> {
        let lat = parse_coordinate("lat", &suggestion.lat)?;
        let lon = parse_coordinate("lon", &suggestion.lon)?;

        let span = info_span!("timezone_lookup", lat, lon);
        let response = self.timezone.lookup(lat, lon).instrument(span).await?;

        let timezone = match response.timezone_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                warn!(
                    "No timezone for {} ({}, {}); recording {}",
                    suggestion.display_name, lat, lon, UNKNOWN_TIMEZONE
                );
                UNKNOWN_TIMEZONE.to_string()
            }
        };

        info!("Resolved {} to {}", suggestion.display_name, timezone);
        Ok(PlaceData {
            name: suggestion.display_name.clone(),
            lat,
            lon,
            timezone,
        })
    }
}

fn parse_coordinate(axis: &'static str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| AppError::InvalidCoordinate {
            axis,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timezone::TimezoneResponse;
    use futures::future::BoxFuture;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct FixedTimezone {
        timezone_id: Option<&'static str>,
        calls: Mutex<Vec<(f64, f64)>>,
    }

    impl FixedTimezone {
        fn new(timezone_id: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                timezone_id,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl TimezoneLookup for FixedTimezone {
        fn lookup(&self, lat: f64, lon: f64) -> BoxFuture<'_, Result<TimezoneResponse, AppError>> {
            self.calls.lock().unwrap().push((lat, lon));
            let response = TimezoneResponse {
                timezone_id: self.timezone_id.map(str::to_string),
                status: None,
            };
            Box::pin(async move { Ok(response) })
        }
    }

    fn suggestion(name: &str, lat: &str, lon: &str) -> PlaceSuggestion {
        PlaceSuggestion {
            display_name: name.to_string(),
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    #[tokio::test]
    async fn paris_resolves_exactly() {
        let lookup = FixedTimezone::new(Some("Europe/Paris"));
        let resolver = PlaceResolver::new(lookup.clone());

        let place = resolver
            .resolve(&suggestion("Paris, France", "48.8566", "2.3522"))
            .await
            .unwrap();

        assert_eq!(
            place,
            PlaceData {
                name: "Paris, France".to_string(),
                lat: 48.8566,
                lon: 2.3522,
                timezone: "Europe/Paris".to_string(),
            }
        );
        assert_eq!(*lookup.calls.lock().unwrap(), vec![(48.8566, 2.3522)]);
    }

    #[tokio::test]
    async fn missing_timezone_becomes_unknown() {
        let resolver = PlaceResolver::new(FixedTimezone::new(None));
        let place = resolver
            .resolve(&suggestion("Point Nemo", "-48.8767", "-123.3933"))
            .await
            .unwrap();
        assert_eq!(place.timezone, "Unknown");
    }

    #[tokio::test]
    async fn empty_timezone_becomes_unknown() {
        let resolver = PlaceResolver::new(FixedTimezone::new(Some("")));
        let place = resolver
            .resolve(&suggestion("Somewhere", "10", "20"))
            .await
            .unwrap();
        assert_eq!(place.timezone, UNKNOWN_TIMEZONE);
    }

    #[tokio::test]
    async fn malformed_coordinates_skip_the_lookup() {
        let lookup = FixedTimezone::new(Some("Europe/Paris"));
        let resolver = PlaceResolver::new(lookup.clone());

        let err = resolver
            .resolve(&suggestion("Broken", "48.85.66", "2.3522"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCoordinate { axis: "lat", .. }));
        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        assert!(parse_coordinate("lon", "NaN").is_err());
        assert!(parse_coordinate("lon", "inf").is_err());
        assert_eq!(parse_coordinate("lon", " -0.1278 ").unwrap(), -0.1278);
    }
}
