//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pethub_domain::error::{PetHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`PetHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(PetHubError);

impl From<PetHubError> for ApiError {
    fn from(err: PetHubError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(PetHubError::Validation(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PetHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            PetHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            PetHubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
