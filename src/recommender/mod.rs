//! Route recommendation
//!
//! Routes planned in other trips are scored against the trip being planned
//! and the best ones are suggested. When no peer routes can be gathered the
//! recommender degrades to nearby catalog destinations. It never fails once
//! the current trip is known.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::backend::TripBackend;
use crate::config::RecommenderConfig;
use crate::geo::distance_km;
use crate::models::{
    Candidate, CurrentTrip, Destination, RecommendationMode, RecommendedRoute, Recommendations,
    RouteProvenance,
};
use crate::{Result, RouteWiseError};

pub mod fallback;
pub mod pool;
pub mod scoring;

pub use scoring::ScoreBreakdown;

/// Candidates starting closer than this to an existing route are duplicates
pub const DUPLICATE_RADIUS_KM: f64 = 1.0;

/// True when the candidate starts within [`DUPLICATE_RADIUS_KM`] of a route
/// the trip already has
#[must_use]
pub fn duplicates_existing_route(current: &CurrentTrip, candidate: &Candidate) -> bool {
    current
        .routes
        .iter()
        .any(|route| distance_km(route.start, candidate.route.start) < DUPLICATE_RADIUS_KM)
}

/// Score, de-duplicate and rank `pool` for `current`.
///
/// The result is sorted by descending score, equal scores keep their pool
/// order, and holds at most `max_results` entries.
#[must_use]
pub fn recommend(
    current: &CurrentTrip,
    pool: &[Candidate],
    max_results: usize,
) -> Vec<RecommendedRoute> {
    let mut ranked: Vec<RecommendedRoute> = pool
        .iter()
        .filter(|candidate| !duplicates_existing_route(current, candidate))
        .map(|candidate| {
            let breakdown = scoring::score_candidate(current, candidate, pool);
            RecommendedRoute {
                route: candidate.route.to_draft(),
                score: breakdown.total(),
                reasons: breakdown.reasons,
                provenance: Some(RouteProvenance {
                    trip_id: Some(candidate.source.id.clone()),
                    trip_title: Some(candidate.source.title.clone()),
                    destination: candidate.source.destination_name.clone(),
                }),
            }
        })
        .collect();

    // Vec::sort_by is stable
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(max_results);
    ranked
}

/// Recommendation service over a trip backend
pub struct RouteRecommender {
    backend: Arc<dyn TripBackend>,
    settings: RecommenderConfig,
}

impl RouteRecommender {
    #[must_use]
    pub fn new(backend: Arc<dyn TripBackend>, settings: RecommenderConfig) -> Self {
        Self { backend, settings }
    }

    #[must_use]
    pub fn default_limit(&self) -> usize {
        self.settings.max_results
    }

    /// Load a trip with its routes and resolved destination.
    ///
    /// Also returns the destination catalog when it could be fetched.
    #[instrument(skip(self))]
    pub async fn load_current_trip(
        &self,
        trip_id: &str,
    ) -> Result<(CurrentTrip, Option<Vec<Destination>>)> {
        let (trip, routes, catalog) = futures::join!(
            self.backend.get_trip(trip_id),
            self.backend.list_routes(trip_id),
            self.backend.list_destinations()
        );
        let trip = trip?;
        let routes = routes?;
        let catalog = catalog
            .map_err(|e| warn!("Destination catalog unavailable: {}", e))
            .ok();

        let destination = trip
            .resolve_destination(catalog.as_deref().unwrap_or_default())
            .ok_or_else(|| {
                RouteWiseError::validation(format!("Trip {trip_id} has no known destination"))
            })?;

        Ok((
            CurrentTrip {
                id: trip.id,
                destination,
                routes,
            },
            catalog,
        ))
    }

    /// Recommend routes for a stored trip
    #[instrument(skip(self))]
    pub async fn recommend_for_trip(
        &self,
        trip_id: &str,
        limit: Option<usize>,
    ) -> Result<Recommendations> {
        let (current, catalog) = self.load_current_trip(trip_id).await?;
        Ok(self.recommend_with_catalog(&current, catalog, limit).await)
    }

    /// Recommend routes for an already loaded trip
    pub async fn recommend(&self, current: &CurrentTrip, limit: Option<usize>) -> Recommendations {
        self.recommend_with_catalog(current, None, limit).await
    }

    #[instrument(skip_all, fields(trip_id = %current.id))]
    async fn recommend_with_catalog(
        &self,
        current: &CurrentTrip,
        catalog: Option<Vec<Destination>>,
        limit: Option<usize>,
    ) -> Recommendations {
        let max_results = limit.unwrap_or(self.settings.max_results);

        let (trips, catalog) = futures::join!(self.backend.list_trips(), async {
            match catalog {
                Some(catalog) => catalog,
                None => self.backend.list_destinations().await.unwrap_or_else(|e| {
                    warn!("Destination catalog unavailable: {}", e);
                    Vec::new()
                }),
            }
        });

        let pool = match trips {
            Ok(trips) => {
                pool::collect_candidates(self.backend.as_ref(), &current.id, &trips, &catalog)
                    .await
            }
            Err(e) => {
                warn!("Could not list peer trips: {}", e);
                Vec::new()
            }
        };

        if pool.is_empty() {
            info!(
                "No peer routes for trip {}, suggesting destinations near {}",
                current.id, current.destination.name
            );
            return Recommendations {
                mode: RecommendationMode::ProximityFallback,
                routes: fallback::nearby_destinations(
                    &current.destination,
                    &catalog,
                    self.settings.fallback_radius_km,
                    max_results,
                ),
            };
        }

        let routes = recommend(current, &pool, max_results);
        debug!(
            "Ranked {} of {} candidates for trip {}",
            routes.len(),
            pool.len(),
            current.id
        );
        Recommendations {
            mode: RecommendationMode::Scored,
            routes,
        }
    }
}
