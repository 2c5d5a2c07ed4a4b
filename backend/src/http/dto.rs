//! Data Transfer Objects for the HTTP API.
//!
//! Restaurant and reservation records are serialized as-is; this module adds the
//! response envelope and the request shapes that only exist at the HTTP boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Page, PageRequest, Pagination};

pub use crate::services::{RestaurantDraft, RestaurantPatch};

/// Success envelope wrapping every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            total: None,
            pagination: None,
            data,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A list response carrying its length in `count`.
    pub fn list(data: Vec<T>) -> Self {
        Self {
            count: Some(data.len()),
            ..Self::new(data)
        }
    }

    /// One page of a listing with `count`, `total` and navigation links.
    pub fn page(page: Page<T>, request: &PageRequest) -> Self {
        Self {
            total: Some(page.total),
            pagination: Some(request.pagination(page.total)),
            ..Self::list(page.items)
        }
    }
}

/// Empty `data` object returned by deletes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

/// `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page, query.limit)
    }
}

/// Body of reservation create and update requests.
///
/// Any RFC 3339 offset is accepted and normalized to UTC.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationBody {
    #[serde(alias = "reservedDate")]
    pub reserved_date: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Repository connection status
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_normalized_to_utc() {
        let body: ReservationBody =
            serde_json::from_str(r#"{"reservedDate":"2024-01-01T19:00:00+07:00"}"#).unwrap();
        assert_eq!(body.reserved_date.to_rfc3339(), "2024-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_single_item_envelope_omits_list_fields() {
        let value = serde_json::to_value(ApiResponse::new(Empty {})).unwrap();
        assert_eq!(value, serde_json::json!({ "success": true, "data": {} }));
    }

    #[test]
    fn test_page_envelope() {
        let request = PageRequest::new(Some(2), Some(1));
        let response = ApiResponse::page(
            Page {
                items: vec![5],
                total: 3,
            },
            &request,
        );
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["total"], 3);
        assert_eq!(value["pagination"]["next"]["page"], 3);
        assert_eq!(value["pagination"]["prev"]["page"], 1);
    }
}
