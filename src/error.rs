// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthServiceError;
use crate::storage::StorageError;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// 500 with a generic message. Log the details before calling this.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// HTTP status for an auth core error.
pub fn status_for(err: &AuthServiceError) -> StatusCode {
    match err {
        AuthServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthServiceError::DuplicateEmail => StatusCode::CONFLICT,
        AuthServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthServiceError::Store(_) | AuthServiceError::Hashing(_) | AuthServiceError::Token(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        let status = status_for(&err);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "Auth operation failed");
            return Self::internal();
        }

        match err {
            AuthServiceError::Validation(msg) => Self::bad_request(msg),
            AuthServiceError::DuplicateEmail => Self::conflict("Email already registered"),
            AuthServiceError::InvalidCredentials => Self::unauthorized("Invalid email or password"),
            other => Self::new(status, other.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => Self::not_found("Vocabulary not found"),
            other => {
                tracing::error!(error = %other, "Storage operation failed");
                Self::internal()
            }
        }
    }
}
