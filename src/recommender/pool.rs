//! Candidate pool assembly from peer trips

use futures::future::join_all;
use tracing::{debug, warn};

use crate::backend::TripBackend;
use crate::models::{Candidate, Destination, SourceTrip, Trip};

/// Fetch the routes of every trip except `current_trip_id` concurrently and
/// tag each with its source trip.
///
/// A trip whose routes cannot be fetched contributes nothing. Candidates keep
/// the order of `trips`, then the route order within each trip.
pub async fn collect_candidates(
    backend: &dyn TripBackend,
    current_trip_id: &str,
    trips: &[Trip],
    catalog: &[Destination],
) -> Vec<Candidate> {
    let peers: Vec<&Trip> = trips.iter().filter(|t| t.id != current_trip_id).collect();

    let route_lists = join_all(peers.iter().map(|trip| async move {
        match backend.list_routes(&trip.id).await {
            Ok(routes) => routes,
            Err(e) => {
                warn!("Skipping routes of trip {}: {}", trip.id, e);
                Vec::new()
            }
        }
    }))
    .await;

    let candidates: Vec<Candidate> = peers
        .iter()
        .zip(route_lists)
        .flat_map(|(trip, routes)| {
            let source = SourceTrip::from_trip(trip, catalog);
            routes.into_iter().map(move |route| Candidate {
                route,
                source: source.clone(),
            })
        })
        .collect();

    debug!(
        "Collected {} candidates from {} peer trips",
        candidates.len(),
        peers.len()
    );
    candidates
}
