use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use routewise::api::AppState;
use routewise::config::CacheConfig;
use routewise::telemetry::init_tracing;
use routewise::{
    ItineraryGenerator, PersistentCache, RestBackend, RouteRecommender, RouteWiseConfig,
    TripBackend, web,
};

fn open_cache(settings: &CacheConfig) -> Option<Arc<PersistentCache>> {
    if !settings.enabled {
        return None;
    }
    let directory = settings.directory();
    match PersistentCache::open(&directory) {
        Ok(cache) => {
            info!("Using cache at {}", directory.display());
            Some(Arc::new(cache))
        }
        Err(e) => {
            warn!("Cache disabled, could not open {}: {}", directory.display(), e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RouteWiseConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let mut backend = RestBackend::new(&config.backend)?;
    if let Some(cache) = open_cache(&config.cache) {
        let ttl = Duration::from_secs(u64::from(config.cache.ttl_hours) * 60 * 60);
        backend = backend.with_cache(cache, ttl);
    }
    let backend: Arc<dyn TripBackend> = Arc::new(backend);

    let recommender = RouteRecommender::new(Arc::clone(&backend), config.recommender.clone());
    let generator = ItineraryGenerator::new(&config.generator)?;
    if generator.has_remote() {
        info!("Remote itinerary generation enabled");
    }

    let state = AppState::new(backend, recommender, generator);
    web::run(config.server.port, state).await
}
