//! Trip model and the recommender's view of the trip being planned

use serde::{Deserialize, Serialize};

use super::{Destination, Route};

/// A planned journey as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub title: String,
    pub destination_id: Option<String>,
    /// Embedded destination, when the backend expands it
    pub destination: Option<Destination>,
}

impl Trip {
    /// Destination id from the embedded destination or the foreign key
    #[must_use]
    pub fn destination_id(&self) -> Option<&str> {
        self.destination
            .as_ref()
            .map(|d| d.id.as_str())
            .or(self.destination_id.as_deref())
    }

    /// Resolve the trip destination, falling back to a catalog lookup
    #[must_use]
    pub fn resolve_destination(&self, catalog: &[Destination]) -> Option<Destination> {
        if let Some(destination) = &self.destination {
            return Some(destination.clone());
        }
        let id = self.destination_id.as_deref()?;
        catalog.iter().find(|d| d.id == id).cloned()
    }
}

/// The trip a recommendation is computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTrip {
    pub id: String,
    pub destination: Destination,
    /// Existing routes in trip order
    pub routes: Vec<Route>,
}
