//! Backend JSON payloads and their validation into domain models
//!
//! The backend answers with `{ "data": ... }` envelopes whose rows are loosely
//! typed: ids may be strings or integers and coordinates may be numbers or
//! numeric strings. Rows are decoded one by one so a single malformed row
//! never discards the rest of a listing.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::geo::Coordinate;
use crate::models::{Destination, DestinationCategory, Route, RouteDraft, Trip};

/// Response envelope used by every backend endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Identifier that may arrive as text or as an integer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
    Text(String),
    Number(i64),
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiId::Text(text) => f.write_str(text),
            ApiId::Number(number) => write!(f, "{number}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiDestination {
    pub id: ApiId,
    pub name: Option<String>,
    #[serde(alias = "latitude")]
    pub lat: Option<Value>,
    #[serde(alias = "longitude", alias = "lon")]
    pub lng: Option<Value>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTrip {
    pub id: ApiId,
    pub title: Option<String>,
    pub destination_id: Option<ApiId>,
    pub destination: Option<ApiDestination>,
}

#[derive(Debug, Deserialize)]
pub struct ApiRoute {
    pub id: Option<ApiId>,
    pub trip_id: Option<ApiId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_lat: Option<Value>,
    pub start_lng: Option<Value>,
    pub end_lat: Option<Value>,
    pub end_lng: Option<Value>,
    pub activities: Option<Value>,
}

/// Body of a route creation request
#[derive(Debug, Serialize)]
pub struct ApiNewRoute<'a> {
    pub trip_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub activities: &'a [String],
}

impl<'a> ApiNewRoute<'a> {
    #[must_use]
    pub fn new(trip_id: &'a str, draft: &'a RouteDraft) -> Self {
        Self {
            trip_id,
            title: &draft.title,
            description: &draft.description,
            start_lat: draft.start.latitude,
            start_lng: draft.start.longitude,
            end_lat: draft.end.latitude,
            end_lng: draft.end.longitude,
            activities: &draft.activities,
        }
    }
}

/// Parse a degree value from a JSON number or numeric string
#[must_use]
pub fn parse_degrees(value: Option<&Value>) -> Option<f64> {
    let degrees = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    degrees.is_finite().then_some(degrees)
}

/// Build a coordinate, rejecting missing, non-numeric or out-of-range axes
#[must_use]
pub fn parse_coordinate(lat: Option<&Value>, lng: Option<&Value>) -> Option<Coordinate> {
    let latitude = parse_degrees(lat)?;
    let longitude = parse_degrees(lng)?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Coordinate::new(latitude, longitude))
}

/// Activities arrive as a string array or a comma separated string
#[must_use]
pub fn parse_activities(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Decode each row independently, dropping rows that do not fit `T`
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Skipping malformed {} row: {}", what, e);
                None
            }
        })
        .collect()
}

/// Single-row endpoints may answer with an object or a one-element array
#[must_use]
pub fn single_row(data: Value) -> Option<Value> {
    match data {
        Value::Array(rows) => rows.into_iter().next(),
        Value::Null => None,
        other => Some(other),
    }
}

impl ApiDestination {
    /// Convert to a catalog destination, `None` when the coordinate is unusable
    #[must_use]
    pub fn into_destination(self) -> Option<Destination> {
        let Some(coordinate) = parse_coordinate(self.lat.as_ref(), self.lng.as_ref()) else {
            debug!("Dropping destination {} without valid coordinates", self.id);
            return None;
        };

        let id = self.id.to_string();
        let name = self.name.unwrap_or_else(|| id.clone());
        let mut destination = Destination::new(id, name, coordinate).with_category(
            self.category
                .as_deref()
                .map(DestinationCategory::from_label)
                .unwrap_or_default(),
        );
        if let Some(country) = self.country {
            destination = destination.with_country(country);
        }
        destination.description = self.description.filter(|d| !d.trim().is_empty());
        Some(destination)
    }
}

impl ApiTrip {
    #[must_use]
    pub fn into_trip(self) -> Trip {
        let destination = self.destination.and_then(ApiDestination::into_destination);
        Trip {
            id: self.id.to_string(),
            title: self.title.unwrap_or_default(),
            destination_id: self
                .destination_id
                .map(|id| id.to_string())
                .or_else(|| destination.as_ref().map(|d| d.id.clone())),
            destination,
        }
    }
}

impl ApiRoute {
    /// Convert to a route owned by `trip_id` unless the row names its own trip.
    /// `None` when either endpoint lacks a usable coordinate.
    #[must_use]
    pub fn into_route(self, trip_id: &str) -> Option<Route> {
        let start = parse_coordinate(self.start_lat.as_ref(), self.start_lng.as_ref());
        let end = parse_coordinate(self.end_lat.as_ref(), self.end_lng.as_ref());
        let (Some(start), Some(end)) = (start, end) else {
            debug!(
                "Dropping route {:?} of trip {} without valid coordinates",
                self.title, trip_id
            );
            return None;
        };

        Some(Route {
            id: self.id.map(|id| id.to_string()),
            trip_id: self
                .trip_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| trip_id.to_string()),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            start,
            end,
            activities: parse_activities(self.activities.as_ref()),
        })
    }
}

/// Validate a route listing of `trip_id`
#[must_use]
pub fn parse_routes(rows: Vec<Value>, trip_id: &str) -> Vec<Route> {
    decode_rows::<ApiRoute>(rows, "route")
        .into_iter()
        .filter_map(|route| route.into_route(trip_id))
        .collect()
}

/// Validate a trip listing
#[must_use]
pub fn parse_trips(rows: Vec<Value>) -> Vec<Trip> {
    decode_rows::<ApiTrip>(rows, "trip")
        .into_iter()
        .map(ApiTrip::into_trip)
        .collect()
}

/// Validate the destination catalog
#[must_use]
pub fn parse_destinations(rows: Vec<Value>) -> Vec<Destination> {
    decode_rows::<ApiDestination>(rows, "destination")
        .into_iter()
        .filter_map(ApiDestination::into_destination)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(21.0285), Some(21.0285))]
    #[case(json!("105.8542"), Some(105.8542))]
    #[case(json!(" 12 "), Some(12.0))]
    #[case(json!("north"), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    #[case(json!([1.0]), None)]
    fn test_parse_degrees(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(parse_degrees(Some(&value)), expected);
    }

    #[test]
    fn test_parse_coordinate_rejects_out_of_range() {
        assert!(parse_coordinate(Some(&json!(91.0)), Some(&json!(0.0))).is_none());
        assert!(parse_coordinate(Some(&json!(0.0)), Some(&json!(-181.0))).is_none());
        assert!(parse_coordinate(None, Some(&json!(0.0))).is_none());
    }

    #[test]
    fn test_parse_routes_drops_invalid_rows() {
        let envelope: Envelope<Vec<Value>> = serde_json::from_value(json!({
            "data": [
                {
                    "id": 1,
                    "title": "Visit Old Quarter",
                    "start_lat": 21.0340, "start_lng": 105.8500,
                    "end_lat": "21.0300", "end_lng": "105.8550",
                    "activities": ["Street food", "Hoan Kiem Lake"]
                },
                {
                    "id": 2,
                    "title": "Missing end",
                    "start_lat": 21.0, "start_lng": 105.8,
                    "end_lat": null
                },
                {
                    "id": 3,
                    "title": "Text coordinates",
                    "start_lat": "abc", "start_lng": 105.8,
                    "end_lat": 21.0, "end_lng": 105.8
                },
                "not even an object"
            ]
        }))
        .unwrap();

        let routes = parse_routes(envelope.data, "trip-7");
        assert_eq!(routes.len(), 1);

        let route = &routes[0];
        assert_eq!(route.id.as_deref(), Some("1"));
        assert_eq!(route.trip_id, "trip-7");
        assert_eq!(route.end, Coordinate::new(21.03, 105.855));
        assert_eq!(route.activities, vec!["Street food", "Hoan Kiem Lake"]);
    }

    #[test]
    fn test_parse_activities_from_string() {
        let activities = parse_activities(Some(&json!("Kayaking, Cave tour,  ")));
        assert_eq!(activities, vec!["Kayaking", "Cave tour"]);
        assert!(parse_activities(Some(&json!(42))).is_empty());
    }

    #[test]
    fn test_parse_trip_with_embedded_destination() {
        let trips = parse_trips(vec![json!({
            "id": "t-1",
            "title": "Northern loop",
            "destination": {
                "id": 10,
                "name": "Hanoi",
                "lat": 21.0285,
                "lng": 105.8542,
                "country": "Vietnam",
                "category": "City"
            }
        })]);

        assert_eq!(trips.len(), 1);
        let trip = &trips[0];
        assert_eq!(trip.destination_id.as_deref(), Some("10"));
        let destination = trip.destination.as_ref().unwrap();
        assert_eq!(destination.category, DestinationCategory::City);
        assert_eq!(destination.country.as_deref(), Some("Vietnam"));
    }

    #[test]
    fn test_parse_destinations() {
        let destinations = parse_destinations(vec![
            json!({"id": 1, "name": "Ha Long Bay", "latitude": 20.91, "longitude": 107.18, "category": "beach"}),
            json!({"id": 2, "name": "Nowhere"}),
        ]);
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].category, DestinationCategory::Beach);
        assert!(destinations[0].country.is_none());
    }

    #[test]
    fn test_single_row() {
        assert_eq!(single_row(json!([{"id": 1}])), Some(json!({"id": 1})));
        assert_eq!(single_row(json!({"id": 2})), Some(json!({"id": 2})));
        assert_eq!(single_row(json!([])), None);
        assert_eq!(single_row(Value::Null), None);
    }

    #[test]
    fn test_new_route_body() {
        let draft = RouteDraft {
            title: "Visit Temple of Literature".to_string(),
            description: String::new(),
            start: Coordinate::new(21.0277, 105.8355),
            end: Coordinate::new(21.0277, 105.8355),
            activities: vec![],
        };
        let body = serde_json::to_value(ApiNewRoute::new("t-1", &draft)).unwrap();
        assert_eq!(body["trip_id"], "t-1");
        assert_eq!(body["start_lat"], 21.0277);
        assert_eq!(body["end_lng"], 105.8355);
    }
}
