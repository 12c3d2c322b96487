//! Candidate routes and the ranked recommendations derived from them

use serde::{Deserialize, Serialize};

use super::{Destination, Route, RouteDraft, Trip};

/// The peer trip a candidate route was drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTrip {
    pub id: String,
    pub title: String,
    pub destination_id: Option<String>,
    pub destination_name: Option<String>,
    pub country: Option<String>,
}

impl SourceTrip {
    /// Describe `trip`, resolving its destination through the catalog when not embedded
    #[must_use]
    pub fn from_trip(trip: &Trip, catalog: &[Destination]) -> Self {
        let destination = trip.resolve_destination(catalog);
        Self {
            id: trip.id.clone(),
            title: trip.title.clone(),
            destination_id: trip.destination_id().map(str::to_string),
            destination_name: destination.as_ref().map(|d| d.name.clone()),
            country: destination.and_then(|d| d.country),
        }
    }
}

/// A route eligible for recommendation, tagged with its source trip
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub route: Route,
    pub source: SourceTrip,
}

/// Where a recommendation came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProvenance {
    pub trip_id: Option<String>,
    pub trip_title: Option<String>,
    pub destination: Option<String>,
}

/// A scored route suggestion, computed on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedRoute {
    pub route: RouteDraft,
    /// Composite score in `[0, 100]`, one decimal
    pub score: f64,
    pub reasons: Vec<String>,
    pub provenance: Option<RouteProvenance>,
}

/// How a recommendation list was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// Weighted scoring over routes from peer trips
    Scored,
    /// Nearby catalog destinations, used when no peer routes are available
    ProximityFallback,
}

/// Ranked recommendations for one trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub mode: RecommendationMode,
    pub routes: Vec<RecommendedRoute>,
}

impl Recommendations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
