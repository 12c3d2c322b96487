//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use routewise::models::DestinationCategory;
use routewise::{Coordinate, Destination, Result, Route, RouteDraft, RouteWiseError, TripBackend};
use routewise::models::Trip;

pub const HANOI: Coordinate = Coordinate::new(21.0285, 105.8542);

pub fn hanoi() -> Destination {
    Destination::new("hanoi", "Hanoi", HANOI)
        .with_country("Vietnam")
        .with_category(DestinationCategory::City)
}

/// ~87 km south of Hanoi
pub fn ninh_binh() -> Destination {
    Destination::new("ninhbinh", "Ninh Binh", Coordinate::new(20.2506, 105.9745))
        .with_country("Vietnam")
        .with_category(DestinationCategory::Cultural)
}

/// ~250 km north-west of Hanoi
pub fn sa_pa() -> Destination {
    Destination::new("sapa", "Sa Pa", Coordinate::new(22.3364, 103.8438))
        .with_country("Vietnam")
        .with_category(DestinationCategory::Mountain)
}

pub fn trip(id: &str, title: &str, destination_id: &str) -> Trip {
    Trip {
        id: id.to_string(),
        title: title.to_string(),
        destination_id: Some(destination_id.to_string()),
        destination: None,
    }
}

pub fn route(trip_id: &str, title: &str, start: Coordinate, end: Coordinate, activities: &[&str]) -> Route {
    Route {
        id: None,
        trip_id: trip_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        start,
        end,
        activities: activities.iter().map(|a| (*a).to_string()).collect(),
    }
}

/// Trip backend kept in memory, with switchable failures
#[derive(Default)]
pub struct InMemoryBackend {
    trips: Vec<Trip>,
    routes: Mutex<HashMap<String, Vec<Route>>>,
    destinations: Vec<Destination>,
    failing_routes: HashSet<String>,
    fail_trip_listing: bool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destinations.push(destination);
        self
    }

    pub fn with_trip(mut self, trip: Trip, routes: Vec<Route>) -> Self {
        self.routes
            .get_mut()
            .unwrap()
            .insert(trip.id.clone(), routes);
        self.trips.push(trip);
        self
    }

    /// Route listing of `trip_id` answers with an API error
    pub fn with_failing_routes(mut self, trip_id: &str) -> Self {
        self.failing_routes.insert(trip_id.to_string());
        self
    }

    pub fn with_failing_trip_listing(mut self) -> Self {
        self.fail_trip_listing = true;
        self
    }

    pub fn stored_routes(&self, trip_id: &str) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap()
            .get(trip_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TripBackend for InMemoryBackend {
    async fn list_trips(&self) -> Result<Vec<Trip>> {
        if self.fail_trip_listing {
            return Err(RouteWiseError::api("trip listing unavailable"));
        }
        Ok(self.trips.clone())
    }

    async fn get_trip(&self, trip_id: &str) -> Result<Trip> {
        self.trips
            .iter()
            .find(|t| t.id == trip_id)
            .cloned()
            .ok_or_else(|| RouteWiseError::not_found(format!("trip {trip_id}")))
    }

    async fn list_routes(&self, trip_id: &str) -> Result<Vec<Route>> {
        if self.failing_routes.contains(trip_id) {
            return Err(RouteWiseError::api(format!("routes of {trip_id} unavailable")));
        }
        Ok(self.stored_routes(trip_id))
    }

    async fn list_destinations(&self) -> Result<Vec<Destination>> {
        Ok(self.destinations.clone())
    }

    async fn append_route(&self, trip_id: &str, draft: RouteDraft) -> Result<Route> {
        if !self.trips.iter().any(|t| t.id == trip_id) {
            return Err(RouteWiseError::not_found(format!("trip {trip_id}")));
        }
        let mut routes = self.routes.lock().unwrap();
        let list = routes.entry(trip_id.to_string()).or_default();
        let route = draft.into_route(trip_id, Some(format!("r-{}", list.len() + 1)));
        list.push(route.clone());
        Ok(route)
    }
}
