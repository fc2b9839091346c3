use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use needs_core::NeedsError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Failure of a request handler
#[derive(Debug)]
pub enum ApiError {
    Needs(NeedsError),
    /// The blocking task running the operation did not complete
    Internal(String),
}

impl From<NeedsError> for ApiError {
    fn from(err: NeedsError) -> Self {
        ApiError::Needs(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Needs(NeedsError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Needs(NeedsError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Needs(NeedsError::InvalidReference(_)) => StatusCode::BAD_REQUEST,
            ApiError::Needs(NeedsError::PermissionDenied(_)) => StatusCode::FORBIDDEN,
            ApiError::Needs(NeedsError::InvalidField(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Needs(NeedsError::Storage(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Needs(err) => err.to_string(),
            ApiError::Internal(reason) => reason,
        };
        if status.is_server_error() {
            error!("Request failed: {}", detail);
        }
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
