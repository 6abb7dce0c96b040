// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gate errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::token::TokenError;

/// Why the request gate rejected a request.
///
/// The variants keep the internal reason for logging. The HTTP response only
/// distinguishes "no credentials" from "bad credentials"; expired, tampered and
/// malformed tokens all produce the same body.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("authorization header is missing")]
    MissingAuthHeader,

    /// Header present but not usable (non-ASCII, empty, or an empty bearer value)
    #[error("authorization header is not a usable token")]
    InvalidAuthHeader,

    /// Token failed verification
    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Error code exposed to clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_credentials",
            AuthError::InvalidAuthHeader | AuthError::InvalidToken(_) => "invalid_token",
        }
    }

    /// Message exposed to clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "Authorization header is required",
            AuthError::InvalidAuthHeader | AuthError::InvalidToken(_) => {
                "Invalid or expired token"
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message().to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
