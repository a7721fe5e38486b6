// Module containing response data structures for timezone lookups
mod response;

use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, error, info};

use crate::error::AppError;

pub use response::{ServiceStatus, TimezoneResponse};

/// Resolves the timezone in effect at a coordinate.
pub trait TimezoneLookup: Send + Sync {
    fn lookup(&self, lat: f64, lon: f64) -> BoxFuture<'_, Result<TimezoneResponse, AppError>>;
}

/// Client for the GeoNames `timezoneJSON` service.
pub struct GeoNamesClient {
    client: reqwest::Client,
    endpoint: String,
    username: String,
}

impl GeoNamesClient {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            username: username.into(),
        })
    }

    fn timezone_request(&self, lat: f64, lon: f64) -> Result<reqwest::Request, AppError> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.to_string()),
                ("lng", lon.to_string()),
                ("username", self.username.clone()),
            ])
            .build()?;
        Ok(request)
    }

    /// Fetches timezone information for a coordinate from GeoNames.
    ///
    /// # Arguments
    /// * `lat` - Latitude in decimal degrees
    /// * `lon` - Longitude in decimal degrees
    ///
    /// # Returns
    /// * `TimezoneResponse` whose `timezone_id` may be absent (e.g. over open sea)
    /// * Error if the request fails, returns an unsuccessful status code, or
    ///   GeoNames reports a failure in the payload
    async fn get_timezone(&self, lat: f64, lon: f64) -> Result<TimezoneResponse, AppError> {
        info!("Fetching timezone for coordinates: {}, {}", lat, lon);

        let request = self.timezone_request(lat, lon)?;
        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            error!("Failed to fetch timezone data: {}", response.status());
            return Err(AppError::ApiRequestFailed(format!(
                "Failed to fetch timezone data: {}",
                response.status()
            )));
        }

        let timezone_response: TimezoneResponse = response.json().await?;
        if let Some(status) = &timezone_response.status {
            error!("GeoNames rejected timezone lookup: {} ({})", status.message, status.value);
            return Err(AppError::ApiRequestFailed(format!(
                "GeoNames error {}: {}",
                status.value, status.message
            )));
        }

        debug!("Timezone data fetched successfully: {:?}", timezone_response);
        Ok(timezone_response)
    }
}

impl TimezoneLookup for GeoNamesClient {
    fn lookup(&self, lat: f64, lon: f64) -> BoxFuture<'_, Result<TimezoneResponse, AppError>> {
        Box::pin(self.get_timezone(lat, lon))
    }
}
