// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{CredentialsRequest, LoginResponse, UserResponse},
    state::AppState,
};

/// Turn a body that fails to parse into a 400 with the usual error body.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email or password too short"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let request = json_body(body)?;
    let user = state
        .auth
        .register(request.email.trim(), &request.password, state.now())
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange email and password for a session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = json_body(body)?;
    let outcome = state
        .auth
        .login(request.email.trim(), &request.password, state.now())
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token.token,
        expires_at: outcome.token.expires_at,
        user: outcome.user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, test_state, T0, TEST_TTL_SECS};
    use chrono::TimeDelta;

    fn credentials(email: &str, password: &str) -> Result<Json<CredentialsRequest>, JsonRejection> {
        Ok(Json(CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn register_then_login_success() {
        let (state, _clock) = test_state();

        let (status, Json(user)) = register(State(state.clone()), credentials("alice@x.com", "secret1"))
            .await
            .expect("registration succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.email, "alice@x.com");
        assert_eq!(user.created_at, at(T0));

        let Json(login) = login(State(state.clone()), credentials("alice@x.com", "secret1"))
            .await
            .expect("login succeeds");
        assert_eq!(login.user, user);
        assert_eq!(login.expires_at, at(T0) + TimeDelta::seconds(TEST_TTL_SECS));

        let verified = state.auth.tokens().verify(&login.token, state.now()).unwrap();
        assert_eq!(verified.user_id, user.id);
    }

    #[tokio::test]
    async fn register_duplicate_is_conflict() {
        let (state, _clock) = test_state();
        register(State(state.clone()), credentials("alice@x.com", "secret1"))
            .await
            .unwrap();

        let err = register(State(state), credentials("alice@x.com", "other-password"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let (state, _clock) = test_state();

        let err = register(State(state.clone()), credentials("not-an-email", "secret1"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = register(State(state), credentials("alice@x.com", "short"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (state, _clock) = test_state();
        register(State(state.clone()), credentials("alice@x.com", "secret1"))
            .await
            .unwrap();

        let wrong_password = login(State(state.clone()), credentials("alice@x.com", "secret2"))
            .await
            .unwrap_err();
        let unknown_email = login(State(state), credentials("bob@x.com", "secret1"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.status, unknown_email.status);
        assert_eq!(wrong_password.message, unknown_email.message);
    }
}
