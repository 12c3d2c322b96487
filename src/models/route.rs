//! Route model, one leg or stop of a trip itinerary

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A route that belongs to a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Backend id, absent for routes not persisted yet
    pub id: Option<String>,
    pub trip_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: Coordinate,
    pub end: Coordinate,
    /// Ordered activities planned along the route
    #[serde(default)]
    pub activities: Vec<String>,
}

impl Route {
    #[must_use]
    pub fn midpoint(&self) -> Coordinate {
        self.start.midpoint(&self.end)
    }

    /// Strip trip ownership, keeping the route content
    #[must_use]
    pub fn to_draft(&self) -> RouteDraft {
        RouteDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
            activities: self.activities.clone(),
        }
    }
}

/// Route content not yet attached to a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub activities: Vec<String>,
}

impl RouteDraft {
    /// Attach the draft to a trip
    #[must_use]
    pub fn into_route(self, trip_id: impl Into<String>, id: Option<String>) -> Route {
        Route {
            id,
            trip_id: trip_id.into(),
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            activities: self.activities,
        }
    }

    /// Reject drafts that could never be stored as a valid route
    pub fn validate(&self) -> crate::Result<()> {
        if self.title.trim().is_empty() {
            return Err(crate::RouteWiseError::validation("Route title cannot be empty"));
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(crate::RouteWiseError::validation(
                "Route coordinates must be finite numbers",
            ));
        }
        Ok(())
    }
}
