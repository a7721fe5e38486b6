use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, error, info};

use crate::error::AppError;

mod response;

pub use response::PlaceSuggestion;

/// Source of place candidates for free text.
pub trait PlaceSearch: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<PlaceSuggestion>, AppError>>;
}

/// Client for the Nominatim `/search` endpoint.
pub struct NominatimClient {
    client: reqwest::Client,
    endpoint: String,
}

impl NominatimClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        // Nominatim's usage policy rejects requests without an identifying agent
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn search_request(&self, query: &str, limit: usize) -> Result<reqwest::Request, AppError> {
        let limit = limit.to_string();
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
            .build()?;
        Ok(request)
    }

    async fn search_places(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PlaceSuggestion>, AppError> {
        info!("Searching places for: {}", query);

        let request = self.search_request(query, limit)?;
        let response = self.client.execute(request).await?;

        if response.status().is_success() {
            let suggestions: Vec<PlaceSuggestion> = response.json().await?;
            debug!("Place search returned {} candidates: {:?}", suggestions.len(), suggestions);
            Ok(suggestions)
        } else {
            error!("Failed to search places: {}", response.status());
            Err(AppError::ApiRequestFailed(format!(
                "Failed to search places: {}",
                response.status()
            )))
        }
    }
}

impl PlaceSearch for NominatimClient {
    fn search<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<PlaceSuggestion>, AppError>> {
        Box::pin(self.search_places(query, limit))
    }
}
