use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::TripBackend;
use super::wire::{self, ApiNewRoute, ApiRoute, ApiTrip, Envelope};
use crate::cache::PersistentCache;
use crate::config::BackendConfig;
use crate::models::{Destination, Route, RouteDraft, Trip};
use crate::{Result, RouteWiseError};

const DESTINATIONS_CACHE_KEY: &str = "backend:destinations";

/// REST client for the trip backend
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    cache: Option<Arc<PersistentCache>>,
    cache_ttl: Duration,
}

impl RestBackend {
    /// Create a new client
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("RouteWise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RouteWiseError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            cache: None,
            cache_ttl: Duration::ZERO,
        })
    }

    /// Cache the destination catalog for `ttl`
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<PersistentCache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.url(path));
        if let Some(api_key) = &self.api_key {
            request = request
                .header("apikey", api_key)
                .header("Authorization", format!("Bearer {api_key}"));
        }
        request
    }

    /// Fetch `path` and unwrap its `{ data }` envelope
    async fn fetch_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| RouteWiseError::api(format!("Request to {path} failed: {e}")))?;

        let envelope: Envelope<T> = check_status(response, path)
            .await?
            .json()
            .await
            .map_err(|e| RouteWiseError::api(format!("Failed to parse response of {path}: {e}")))?;

        Ok(envelope.data)
    }

    async fn cached_destinations(&self) -> Option<Vec<Destination>> {
        let cache = self.cache.as_ref()?;
        match cache.get::<Vec<Destination>>(DESTINATIONS_CACHE_KEY).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Destination cache lookup failed: {}", e);
                None
            }
        }
    }

    async fn store_destinations(&self, destinations: &[Destination]) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(e) = cache
            .put(DESTINATIONS_CACHE_KEY, destinations.to_vec(), self.cache_ttl)
            .await
        {
            warn!("Failed to cache destination catalog: {}", e);
        }
    }
}

async fn check_status(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => RouteWiseError::not_found(path.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RouteWiseError::api(format!("Backend rejected credentials for {path}"))
        }
        _ => RouteWiseError::api(format!("Backend error {status} for {path}: {error_text}")),
    })
}

#[async_trait]
impl TripBackend for RestBackend {
    #[instrument(skip(self))]
    async fn list_trips(&self) -> Result<Vec<Trip>> {
        let rows: Vec<Value> = self.fetch_data("trips").await?;
        let trips = wire::parse_trips(rows);
        debug!("Fetched {} trips", trips.len());
        Ok(trips)
    }

    #[instrument(skip(self))]
    async fn get_trip(&self, trip_id: &str) -> Result<Trip> {
        let data: Value = self.fetch_data(&format!("trips/{trip_id}")).await?;
        let row = wire::single_row(data)
            .ok_or_else(|| RouteWiseError::not_found(format!("trip {trip_id}")))?;
        let trip: ApiTrip = serde_json::from_value(row)
            .map_err(|e| RouteWiseError::api(format!("Malformed trip {trip_id}: {e}")))?;
        Ok(trip.into_trip())
    }

    #[instrument(skip(self))]
    async fn list_routes(&self, trip_id: &str) -> Result<Vec<Route>> {
        let rows: Vec<Value> = self.fetch_data(&format!("trips/{trip_id}/routes")).await?;
        let total = rows.len();
        let routes = wire::parse_routes(rows, trip_id);
        if routes.len() < total {
            debug!(
                "Dropped {} of {} routes of trip {}",
                total - routes.len(),
                total,
                trip_id
            );
        }
        Ok(routes)
    }

    #[instrument(skip(self))]
    async fn list_destinations(&self) -> Result<Vec<Destination>> {
        if let Some(destinations) = self.cached_destinations().await {
            debug!("Using {} cached destinations", destinations.len());
            return Ok(destinations);
        }

        let rows: Vec<Value> = self.fetch_data("destinations").await?;
        let destinations = wire::parse_destinations(rows);
        info!("Loaded {} destinations from backend", destinations.len());

        self.store_destinations(&destinations).await;
        Ok(destinations)
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn append_route(&self, trip_id: &str, draft: RouteDraft) -> Result<Route> {
        let path = format!("trips/{trip_id}/routes");
        let response = self
            .request(Method::POST, &path)
            .json(&ApiNewRoute::new(trip_id, &draft))
            .send()
            .await
            .map_err(|e| RouteWiseError::api(format!("Request to {path} failed: {e}")))?;

        let envelope: Envelope<Value> = check_status(response, &path)
            .await?
            .json()
            .await
            .map_err(|e| RouteWiseError::api(format!("Failed to parse response of {path}: {e}")))?;

        // Some backends answer 201 without echoing the row
        let Some(row) = wire::single_row(envelope.data) else {
            return Ok(draft.into_route(trip_id, None));
        };

        let stored: ApiRoute = serde_json::from_value(row)
            .map_err(|e| RouteWiseError::api(format!("Malformed route in response: {e}")))?;
        stored
            .into_route(trip_id)
            .ok_or_else(|| RouteWiseError::api("Backend returned a route without coordinates"))
    }
}
