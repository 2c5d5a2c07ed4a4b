//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{
    ApiResponse, Empty, HealthResponse, PageQuery, ReservationBody, RestaurantDraft,
    RestaurantPatch,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    Identity, PageRequest, Reservation, ReservationDetails, ReservationId, ReservationRequest,
    Restaurant, RestaurantId,
};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Result type for handlers that create a resource.
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

fn ok<T>(data: T) -> HandlerResult<T> {
    Ok(Json(ApiResponse::new(data)))
}

fn created<T>(data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::new(data))))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether the service is up and the repository reachable.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    })
}

// =============================================================================
// Restaurants
// =============================================================================

/// GET /api/v1/restaurants?page=&limit=
pub async fn list_restaurants(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Restaurant>>>, AppError> {
    let Query(query) = query?;
    let request = PageRequest::from(query);
    let page = services::list_restaurants(state.repository.as_ref(), request).await?;
    Ok(Json(ApiResponse::page(page, &request)))
}

/// GET /api/v1/restaurants/{id}
pub async fn get_restaurant(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Restaurant> {
    let Path(id) = id?;
    ok(services::get_restaurant(state.repository.as_ref(), RestaurantId::new(id)).await?)
}

/// POST /api/v1/restaurants
pub async fn create_restaurant(
    State(state): State<AppState>,
    identity: Identity,
    body: Result<Json<RestaurantDraft>, JsonRejection>,
) -> CreatedResult<Restaurant> {
    let Json(draft) = body?;
    let restaurant =
        services::create_restaurant(state.repository.as_ref(), &identity, &draft).await?;
    info!(restaurant_id = %restaurant.id, "restaurant created");
    created(restaurant)
}

/// PUT /api/v1/restaurants/{id}
pub async fn update_restaurant(
    State(state): State<AppState>,
    identity: Identity,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<RestaurantPatch>, JsonRejection>,
) -> HandlerResult<Restaurant> {
    let Path(id) = id?;
    let Json(patch) = body?;
    ok(services::update_restaurant(
        state.repository.as_ref(),
        &identity,
        RestaurantId::new(id),
        &patch,
    )
    .await?)
}

/// DELETE /api/v1/restaurants/{id}
pub async fn delete_restaurant(
    State(state): State<AppState>,
    identity: Identity,
    id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Empty> {
    let Path(id) = id?;
    services::delete_restaurant(state.repository.as_ref(), &identity, RestaurantId::new(id))
        .await?;
    info!(restaurant_id = id, "restaurant deleted");
    ok(Empty {})
}

// =============================================================================
// Reservations
// =============================================================================

/// GET /api/v1/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<Vec<ReservationDetails>>>, AppError> {
    let reservations =
        services::list_reservations(state.repository.as_ref(), &identity, None).await?;
    Ok(Json(ApiResponse::list(reservations)))
}

/// GET /api/v1/restaurants/{id}/reservations
pub async fn list_restaurant_reservations(
    State(state): State<AppState>,
    identity: Identity,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<ReservationDetails>>>, AppError> {
    let Path(id) = id?;
    let reservations = services::list_reservations(
        state.repository.as_ref(),
        &identity,
        Some(RestaurantId::new(id)),
    )
    .await?;
    Ok(Json(ApiResponse::list(reservations)))
}

/// POST /api/v1/restaurants/{id}/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    identity: Identity,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ReservationBody>, JsonRejection>,
) -> CreatedResult<Reservation> {
    let Path(id) = id?;
    let Json(body) = body?;
    let request = ReservationRequest {
        identity,
        restaurant_id: RestaurantId::new(id),
        reserved_date: body.reserved_date,
    };
    let reservation = services::create_reservation(state.repository.as_ref(), &request).await?;
    info!(
        reservation_id = %reservation.id,
        user_id = %reservation.user_id,
        "reservation created"
    );
    created(reservation)
}

/// GET /api/v1/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    identity: Identity,
    id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<ReservationDetails> {
    let Path(id) = id?;
    ok(
        services::get_reservation(state.repository.as_ref(), &identity, ReservationId::new(id))
            .await?,
    )
}

/// PUT /api/v1/reservations/{id}
pub async fn update_reservation(
    State(state): State<AppState>,
    identity: Identity,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ReservationBody>, JsonRejection>,
) -> HandlerResult<Reservation> {
    let Path(id) = id?;
    let Json(body) = body?;
    ok(services::update_reservation(
        state.repository.as_ref(),
        &identity,
        ReservationId::new(id),
        body.reserved_date,
    )
    .await?)
}

/// DELETE /api/v1/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    identity: Identity,
    id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Empty> {
    let Path(id) = id?;
    services::delete_reservation(state.repository.as_ref(), &identity, ReservationId::new(id))
        .await?;
    info!(reservation_id = id, "reservation deleted");
    ok(Empty {})
}
