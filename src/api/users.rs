// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};

use crate::{auth::Auth, error::ApiError, models::UserResponse, state::AppState};

/// Get the current authenticated user's account.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserResponse>, ApiError> {
    // A valid token for an account that no longer exists is treated like a bad token.
    let account = state
        .auth
        .find_user(user.user_id)?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    Ok(Json(account.into()))
}
