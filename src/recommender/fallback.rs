//! Proximity-only suggestions used when no peer routes are available

use crate::geo::distance_km;
use crate::itinerary::activities;
use crate::models::{Destination, RecommendedRoute, RouteDraft, RouteProvenance};

use super::scoring::round_to_tenth;

/// Rank catalog destinations near `current` by distance.
///
/// Destinations farther than `radius_km` and the current destination itself
/// are skipped. Each suggestion is a single-point "visit" route scored
/// `max(0, 100 - distance)`.
#[must_use]
pub fn nearby_destinations(
    current: &Destination,
    catalog: &[Destination],
    radius_km: f64,
    max_results: usize,
) -> Vec<RecommendedRoute> {
    let mut nearby: Vec<(&Destination, f64)> = catalog
        .iter()
        .filter(|d| d.id != current.id)
        .map(|d| (d, distance_km(current.coordinate, d.coordinate)))
        .filter(|(_, distance)| *distance <= radius_km)
        .collect();

    nearby.sort_by(|a, b| a.1.total_cmp(&b.1));

    nearby
        .into_iter()
        .take(max_results)
        .map(|(destination, distance)| visit(destination, distance))
        .collect()
}

fn visit(destination: &Destination, distance: f64) -> RecommendedRoute {
    RecommendedRoute {
        route: RouteDraft {
            title: format!("Visit {}", destination.name),
            description: destination
                .description
                .clone()
                .unwrap_or_else(|| format!("Explore {}", destination.name)),
            start: destination.coordinate,
            end: destination.coordinate,
            activities: activities::highlights(destination.category),
        },
        score: round_to_tenth((100.0 - distance).max(0.0)),
        reasons: vec![format!("{distance:.1} km from your destination")],
        provenance: Some(RouteProvenance {
            trip_id: None,
            trip_title: None,
            destination: Some(destination.name.clone()),
        }),
    }
}
