//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `false`
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed caller identity
    Unauthorized(String),
    /// Malformed request body, path or query
    BadRequest(String),
    /// Error raised by a service
    Service(ServiceError),
}

fn service_response(err: ServiceError) -> (StatusCode, ApiError) {
    let message = err.to_string();
    match err {
        ServiceError::RestaurantNotFound(_) | ServiceError::ReservationNotFound(_) => {
            (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
        }
        ServiceError::QuotaExceeded { .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("QUOTA_EXCEEDED", message),
        ),
        ServiceError::OutsideAvailability { .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("OUTSIDE_AVAILABILITY", "Cannot reserve at this time")
                .with_details(message),
        ),
        ServiceError::InvalidSchedule(schedule_err) => (
            StatusCode::BAD_REQUEST,
            ApiError::new("INVALID_SCHEDULE", message)
                .with_details(format!("day={}", schedule_err.day())),
        ),
        ServiceError::InvalidRestaurant(_) => (
            StatusCode::BAD_REQUEST,
            ApiError::new("INVALID_RESTAURANT", message),
        ),
        ServiceError::Forbidden(_) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message)),
        ServiceError::Conflict(_) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", message)),
        ServiceError::Repository(repo_err) => repository_response(repo_err),
    }
}

fn repository_response(err: RepositoryError) -> (StatusCode, ApiError) {
    match err {
        RepositoryError::NotFound { message, .. } => {
            (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
        }
        RepositoryError::ConflictError { message, .. } => {
            (StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
        }
        other => {
            tracing::error!("Repository failure: {}", other);
            let details = other.context().to_string();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPOSITORY_ERROR", other.to_string()).with_details(details),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::new("UNAUTHORIZED", msg))
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Service(err) => service_response(err),
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Service(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RestaurantId, UserId};

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_service_error_status_mapping() {
        assert_eq!(
            status_of(ServiceError::RestaurantNotFound(RestaurantId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::QuotaExceeded {
                user_id: UserId::new(1),
                limit: 3
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Forbidden("no".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ServiceError::Conflict("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::Repository(RepositoryError::connection("down"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_not_found_is_404() {
        let response = AppError::from(RepositoryError::not_found("gone")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_is_401() {
        let response = AppError::Unauthorized("who?".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
