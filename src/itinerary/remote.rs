//! Client for an external itinerary generation service
//!
//! The service receives the destination and trip length and answers with a
//! `{ "data": [...] }` envelope of planned routes tagged with their day and
//! slot. Rows are validated like backend rows; anything unusable is dropped.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{DaySlot, ItineraryDay, ItineraryRequest, PlannedRoute};
use crate::backend::wire::{self, Envelope};
use crate::models::RouteDraft;
use crate::{Result, RouteWiseError};

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    destination_id: &'a str,
    destination_name: &'a str,
    country: Option<&'a str>,
    category: &'static str,
    latitude: f64,
    longitude: f64,
    days: u32,
    start_date: Option<NaiveDate>,
}

impl<'a> GenerationRequest<'a> {
    fn new(request: &'a ItineraryRequest) -> Self {
        let destination = &request.destination;
        Self {
            destination_id: &destination.id,
            destination_name: &destination.name,
            country: destination.country.as_deref(),
            category: destination.category.label(),
            latitude: destination.coordinate.latitude,
            longitude: destination.coordinate.longitude,
            days: request.days,
            start_date: request.start_date,
        }
    }
}

/// One planned route as returned by the service
#[derive(Debug, Deserialize)]
pub struct ApiPlannedRoute {
    pub day: Option<u32>,
    pub slot: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_lat: Option<Value>,
    pub start_lng: Option<Value>,
    pub end_lat: Option<Value>,
    pub end_lng: Option<Value>,
    pub activities: Option<Value>,
}

pub struct RemoteGenerator {
    client: Client,
    endpoint: String,
}

impl RemoteGenerator {
    pub fn new(endpoint: &str, timeout_seconds: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .user_agent(concat!("RouteWise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RouteWiseError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    #[instrument(skip_all, fields(destination = %request.destination.name, days = request.days))]
    pub async fn generate(&self, request: &ItineraryRequest) -> Result<Vec<ItineraryDay>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerationRequest::new(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteWiseError::api(format!(
                "Itinerary service answered {status}"
            )));
        }

        let envelope: Envelope<Vec<Value>> = response.json().await?;
        let rows = wire::decode_rows::<ApiPlannedRoute>(envelope.data, "itinerary route");
        Ok(assemble_days(rows, request))
    }
}

/// Group service rows into days, dropping rows outside the requested length
/// or without usable coordinates. Days without any route are left out.
#[must_use]
pub fn assemble_days(rows: Vec<ApiPlannedRoute>, request: &ItineraryRequest) -> Vec<ItineraryDay> {
    let mut by_day: BTreeMap<u32, Vec<PlannedRoute>> = BTreeMap::new();

    for row in rows {
        let Some(day) = row.day.filter(|d| (1..=request.days).contains(d)) else {
            debug!("Skipping itinerary row with day {:?}", row.day);
            continue;
        };
        let start = wire::parse_coordinate(row.start_lat.as_ref(), row.start_lng.as_ref());
        let end = wire::parse_coordinate(row.end_lat.as_ref(), row.end_lng.as_ref());
        let (Some(start), Some(end)) = (start, end) else {
            debug!("Skipping itinerary row of day {} without coordinates", day);
            continue;
        };

        let slot = row
            .slot
            .as_deref()
            .map_or(DaySlot::Morning, DaySlot::from_label);
        let title = row
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Day {day}: {}", slot.label()));

        by_day.entry(day).or_default().push(PlannedRoute {
            slot,
            route: RouteDraft {
                title,
                description: row.description.unwrap_or_default(),
                start,
                end,
                activities: wire::parse_activities(row.activities.as_ref()),
            },
        });
    }

    by_day
        .into_iter()
        .map(|(day, routes)| ItineraryDay {
            day,
            date: request.date_of(day),
            routes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::models::Destination;
    use serde_json::json;

    fn request(days: u32) -> ItineraryRequest {
        ItineraryRequest {
            destination: Destination::new("hue", "Hue", Coordinate::new(16.4637, 107.5909))
                .with_country("Vietnam"),
            days,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1),
        }
    }

    fn rows(values: Vec<Value>) -> Vec<ApiPlannedRoute> {
        wire::decode_rows(values, "itinerary route")
    }

    #[test]
    fn test_assemble_groups_and_orders_days() {
        let rows = rows(vec![
            json!({"day": 2, "slot": "morning", "title": "Royal tombs",
                   "start_lat": 16.46, "start_lng": 107.59, "end_lat": 16.43, "end_lng": 107.56,
                   "activities": ["Tu Duc tomb"]}),
            json!({"day": 1, "slot": "afternoon_evening",
                   "start_lat": "16.47", "start_lng": "107.58", "end_lat": 16.46, "end_lng": 107.59,
                   "activities": "Night market, Perfume River"}),
            json!({"day": 1, "slot": "morning", "title": "Citadel",
                   "start_lat": 16.46, "start_lng": 107.59, "end_lat": 16.47, "end_lng": 107.58}),
        ]);

        let days = assemble_days(rows, &request(2));
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(days[0].routes.len(), 2);
        assert_eq!(days[0].routes[0].slot, DaySlot::AfternoonEvening);
        assert_eq!(days[0].routes[0].route.title, "Day 1: Afternoon & evening");
        assert_eq!(
            days[0].routes[0].route.activities,
            vec!["Night market", "Perfume River"]
        );
        assert_eq!(days[1].routes[0].route.title, "Royal tombs");
    }

    #[test]
    fn test_assemble_drops_unusable_rows() {
        let rows = rows(vec![
            json!({"day": 0, "start_lat": 16.4, "start_lng": 107.5, "end_lat": 16.4, "end_lng": 107.5}),
            json!({"day": 4, "start_lat": 16.4, "start_lng": 107.5, "end_lat": 16.4, "end_lng": 107.5}),
            json!({"start_lat": 16.4, "start_lng": 107.5, "end_lat": 16.4, "end_lng": 107.5}),
            json!({"day": 1, "start_lat": "n/a", "start_lng": 107.5, "end_lat": 16.4, "end_lng": 107.5}),
            json!({"day": "one"}),
        ]);
        assert!(assemble_days(rows, &request(3)).is_empty());
    }

    #[test]
    fn test_request_body() {
        let req = request(3);
        let body = serde_json::to_value(GenerationRequest::new(&req)).unwrap();
        assert_eq!(body["destination_id"], "hue");
        assert_eq!(body["country"], "Vietnam");
        assert_eq!(body["category"], "generic");
        assert_eq!(body["days"], 3);
        assert_eq!(body["start_date"], "2026-03-01");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_api_error() {
        let generator = RemoteGenerator::new("http://127.0.0.1:9/itineraries", 2).unwrap();
        let result = generator.generate(&request(1)).await;
        assert!(matches!(result, Err(RouteWiseError::Api { .. })));
    }
}
