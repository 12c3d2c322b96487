//! `RouteWise` - route recommendations and itinerary planning for trips
//!
//! This library scores routes planned in other trips against the trip being
//! planned, falls back to nearby destinations when there is nothing to score,
//! and generates day-by-day itineraries for a destination.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod geo;
pub mod itinerary;
pub mod models;
pub mod recommender;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use backend::{RestBackend, TripBackend};
pub use cache::PersistentCache;
pub use config::RouteWiseConfig;
pub use error::RouteWiseError;
pub use geo::{Coordinate, distance_km};
pub use itinerary::{GeneratedItinerary, ItineraryGenerator, ItineraryRequest};
pub use models::{CurrentTrip, Destination, RecommendedRoute, Recommendations, Route, RouteDraft};
pub use recommender::{RouteRecommender, recommend};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RouteWiseError>;
