//! JSON endpoints served under `/api`

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::backend::TripBackend;
use crate::itinerary::{GeneratedItinerary, ItineraryGenerator, ItineraryRequest};
use crate::models::{Destination, Recommendations, Route, RouteDraft};
use crate::recommender::RouteRecommender;
use crate::{RouteWiseError, VERSION};

/// Largest `limit` a recommendation request may ask for
pub const MAX_LIMIT: usize = 50;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn TripBackend>,
    pub recommender: Arc<RouteRecommender>,
    pub generator: Arc<ItineraryGenerator>,
}

impl AppState {
    #[must_use]
    pub fn new(
        backend: Arc<dyn TripBackend>,
        recommender: RouteRecommender,
        generator: ItineraryGenerator,
    ) -> Self {
        Self {
            backend,
            recommender: Arc::new(recommender),
            generator: Arc::new(generator),
        }
    }
}

impl IntoResponse for RouteWiseError {
    fn into_response(self) -> Response {
        let status = match &self {
            RouteWiseError::Validation { .. } => StatusCode::BAD_REQUEST,
            RouteWiseError::NotFound { .. } => StatusCode::NOT_FOUND,
            RouteWiseError::Api { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

type ApiResult<T> = Result<T, RouteWiseError>;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Itinerary request body, naming a catalog destination or carrying one inline
#[derive(Debug, Deserialize)]
pub struct ItineraryBody {
    pub destination_id: Option<String>,
    pub destination: Option<Destination>,
    pub days: u32,
    pub start_date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/trips/{trip_id}/recommendations",
            get(get_recommendations),
        )
        .route("/trips/{trip_id}/routes", post(accept_route))
        .route("/itineraries", post(create_itinerary))
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: VERSION,
    })
}

async fn get_recommendations(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> ApiResult<Json<Recommendations>> {
    if query.limit.is_some_and(|limit| limit > MAX_LIMIT) {
        return Err(RouteWiseError::validation(format!(
            "limit must not exceed {MAX_LIMIT}"
        )));
    }

    let recommendations = state
        .recommender
        .recommend_for_trip(&trip_id, query.limit)
        .await?;
    Ok(Json(recommendations))
}

async fn accept_route(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(draft): Json<RouteDraft>,
) -> ApiResult<(StatusCode, Json<Route>)> {
    draft.validate()?;
    let route = state.backend.append_route(&trip_id, draft).await?;
    info!("Added route {:?} to trip {}", route.title, trip_id);
    Ok((StatusCode::CREATED, Json(route)))
}

async fn create_itinerary(
    State(state): State<AppState>,
    Json(body): Json<ItineraryBody>,
) -> ApiResult<Json<GeneratedItinerary>> {
    let destination = match (body.destination, body.destination_id) {
        (Some(destination), _) => destination,
        (None, Some(id)) => state
            .backend
            .list_destinations()
            .await?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| RouteWiseError::not_found(format!("destination {id}")))?,
        (None, None) => {
            return Err(RouteWiseError::validation(
                "Either destination or destination_id is required",
            ));
        }
    };

    let request = ItineraryRequest {
        destination,
        days: body.days,
        start_date: body.start_date,
    };
    request.validate()?;

    Ok(Json(state.generator.generate(&request).await))
}
