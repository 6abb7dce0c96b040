// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gate middleware for Axum.
//!
//! Every protected route sits behind [`require_auth`]. It reads the token
//! from the `Authorization` header, verifies it against the state's clock,
//! and on success stores the [`AuthenticatedUser`] in request extensions for
//! the [`Auth`](super::Auth) extractor to pick up.
//!
//! ## Header Format
//!
//! Both `Authorization: <token>` and `Authorization: Bearer <token>` are
//! accepted.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/vocab", get(list_vocabulary))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{token::TokenService, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Pull the raw token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?
        .trim();

    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Resolve the caller's identity from request headers.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    now: DateTime<Utc>,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    Ok(tokens.verify(token, now)?)
}

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), state.auth.tokens(), state.now()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(error) => {
            debug!(%error, path = %request.uri().path(), "Rejected request at auth gate");
            error.into_response()
        }
    }
}
