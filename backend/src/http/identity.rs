//! Caller identity from trusted gateway headers.
//!
//! The upstream authentication gateway sets `x-user-id` and, for privileged
//! callers, `x-user-role`. Requests without a usable `x-user-id` are rejected
//! with 401 by any handler that takes an [`Identity`].

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use super::error::AppError;
use crate::api::{Identity, Role, UserId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::Unauthorized(format!("{} is not valid text", name)))
        })
        .transpose()
}

/// Build an [`Identity`] from request headers.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, AppError> {
    let user_id: UserId = header(headers, USER_ID_HEADER)?
        .ok_or_else(|| AppError::Unauthorized("Not authorized to access this route".to_string()))?
        .parse()
        .map_err(|_| AppError::Unauthorized(format!("{} must be an integer", USER_ID_HEADER)))?;

    let role = match header(headers, USER_ROLE_HEADER)? {
        Some(value) => value.parse::<Role>().map_err(AppError::Unauthorized)?,
        None => Role::default(),
    };

    Ok(Identity { user_id, role })
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers)
    }
}
