//! Centralized exception-to-response translation
//!
//! Every failed request renders the same JSON body: the path it was made
//! against and a human-readable message. Domain errors map onto status
//! codes in exactly one place.

use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Error body rendered for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Path of the request that failed
    pub url: String,
    /// Failure description
    pub message: String,
}

/// A failure bound to the request it occurred on
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, uri: &Uri, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                url: uri.path().to_string(),
                message: message.into(),
            },
        }
    }

    /// Translate a service-layer error into its HTTP rendering
    pub fn from_domain(uri: &Uri, err: DomainError) -> Self {
        let status = match &err {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status, uri, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
