//! API errors and their wire representation.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use famdoc_core::DocError;
use serde_json::json;
use tracing::{debug, error};

/// Error returned by every handler as `{ "error": CODE }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    NotFound,
    Forbidden,
    Unauthorized,
    MethodNotAllowed,
    BadRequest,
    EmailAlreadyExists,
    Internal,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::BadRequest => "BAD_REQUEST",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS_ERROR",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadRequest | Self::EmailAlreadyExists => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.code() }))).into_response()
    }
}

impl From<DocError> for ApiError {
    fn from(err: DocError) -> Self {
        match err {
            DocError::NotFound(what) => {
                debug!(%what, "not found");
                Self::NotFound
            }
            DocError::Forbidden(why) => {
                debug!(%why, "forbidden");
                Self::Forbidden
            }
            DocError::ValidationError(msg) => {
                debug!(%msg, "rejected input");
                Self::BadRequest
            }
            DocError::Json(e) => {
                debug!(error = %e, "rejected input");
                Self::BadRequest
            }
            other => {
                error!(error = %other, "request failed");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected body");
        Self::BadRequest
    }
}
