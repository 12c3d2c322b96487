//! Day-by-day itinerary generation
//!
//! Generation is a two-stage strategy. A configured remote endpoint is asked
//! first; when it is missing, unreachable or returns nothing usable, the
//! deterministic template builder produces the itinerary instead. The result
//! records which stage produced it, and callers never see an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::models::{Destination, RouteDraft};
use crate::{Result, RouteWiseError};

pub mod activities;
pub mod remote;
pub mod template;

pub use remote::RemoteGenerator;

/// Longest itinerary that can be requested
pub const MAX_DAYS: u32 = 30;

/// Part of the day a planned route covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySlot {
    Morning,
    AfternoonEvening,
}

impl DaySlot {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DaySlot::Morning => "Morning",
            DaySlot::AfternoonEvening => "Afternoon & evening",
        }
    }

    /// Anything that is not clearly a morning slot is treated as the later slot
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.trim().to_lowercase().starts_with("morning") {
            DaySlot::Morning
        } else {
            DaySlot::AfternoonEvening
        }
    }
}

/// What to plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub destination: Destination,
    pub days: u32,
    pub start_date: Option<NaiveDate>,
}

impl ItineraryRequest {
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 || self.days > MAX_DAYS {
            return Err(RouteWiseError::validation(format!(
                "Itinerary length must be between 1 and {MAX_DAYS} days"
            )));
        }
        if !self.destination.coordinate.is_finite() {
            return Err(RouteWiseError::validation(
                "Destination coordinates must be finite numbers",
            ));
        }
        Ok(())
    }

    /// Calendar date of `day` (1-based), when a start date was given
    #[must_use]
    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        self.start_date?
            .checked_add_days(chrono::Days::new(u64::from(day.saturating_sub(1))))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub slot: DaySlot,
    #[serde(flatten)]
    pub route: RouteDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    /// 1-based day number
    pub day: u32,
    pub date: Option<NaiveDate>,
    pub routes: Vec<PlannedRoute>,
}

/// Stage that produced an itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItinerarySource {
    Remote,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItinerary {
    pub destination_id: String,
    pub source: ItinerarySource,
    pub days: Vec<ItineraryDay>,
}

impl GeneratedItinerary {
    /// All planned routes in travel order
    pub fn routes(&self) -> impl Iterator<Item = &PlannedRoute> {
        self.days.iter().flat_map(|day| day.routes.iter())
    }
}

/// Itinerary generator with an optional remote stage
pub struct ItineraryGenerator {
    remote: Option<RemoteGenerator>,
}

impl ItineraryGenerator {
    /// Build from configuration, enabling the remote stage when an endpoint is set
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let remote = config
            .endpoint
            .as_deref()
            .map(|endpoint| RemoteGenerator::new(endpoint, config.timeout_seconds))
            .transpose()?;
        Ok(Self { remote })
    }

    /// Generator that only uses the template stage
    #[must_use]
    pub fn template_only() -> Self {
        Self { remote: None }
    }

    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn generate(&self, request: &ItineraryRequest) -> GeneratedItinerary {
        if let Some(remote) = &self.remote {
            match remote.generate(request).await {
                Ok(days) if days.iter().any(|d| !d.routes.is_empty()) => {
                    info!(
                        "Remote generator planned {} days for {}",
                        days.len(),
                        request.destination.name
                    );
                    return GeneratedItinerary {
                        destination_id: request.destination.id.clone(),
                        source: ItinerarySource::Remote,
                        days,
                    };
                }
                Ok(_) => warn!("Remote generator returned no usable routes, using template"),
                Err(e) => warn!("Remote generator failed, using template: {}", e),
            }
        }

        GeneratedItinerary {
            destination_id: request.destination.id.clone(),
            source: ItinerarySource::Template,
            days: template_days(request),
        }
    }
}

fn template_days(request: &ItineraryRequest) -> Vec<ItineraryDay> {
    template::build(request, &mut rand::rng())
}
