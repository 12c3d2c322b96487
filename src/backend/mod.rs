//! Trip backend collaborator
//!
//! The recommender and HTTP layer talk to the backend only through
//! [`TripBackend`]. [`RestBackend`] is the production implementation over the
//! REST API; every payload crosses [`wire`] where it is validated into the
//! domain models.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Destination, Route, RouteDraft, Trip};

pub mod rest;
pub mod wire;

pub use rest::RestBackend;

#[async_trait]
pub trait TripBackend: Send + Sync {
    /// All trips visible to the service
    async fn list_trips(&self) -> Result<Vec<Trip>>;

    /// A single trip, `NotFound` when it does not exist
    async fn get_trip(&self, trip_id: &str) -> Result<Trip>;

    /// Routes of a trip in trip order. Routes with unusable coordinates are
    /// dropped rather than failing the call.
    async fn list_routes(&self, trip_id: &str) -> Result<Vec<Route>>;

    /// The destination catalog
    async fn list_destinations(&self) -> Result<Vec<Destination>>;

    /// Append a route to the end of a trip, returning the stored route
    async fn append_route(&self, trip_id: &str, draft: RouteDraft) -> Result<Route>;
}
