//! Data models for the RouteWise service
//!
//! This module contains the core domain models organized by concern:
//! - Destination: catalog entries and their category metadata
//! - Route: trip legs and detached route drafts
//! - Trip: backend trips and the trip being planned
//! - Recommendation: candidates and ranked suggestions

pub mod destination;
pub mod recommendation;
pub mod route;
pub mod trip;

// Re-export all public types for convenient access
pub use destination::{Destination, DestinationCategory};
pub use recommendation::{
    Candidate, RecommendationMode, RecommendedRoute, Recommendations, RouteProvenance, SourceTrip,
};
pub use route::{Route, RouteDraft};
pub use trip::{CurrentTrip, Trip};
