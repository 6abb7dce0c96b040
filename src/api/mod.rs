// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::require_auth, UserId},
    models::{
        CreateVocabularyRequest, CredentialsRequest, LoginResponse, MessageResponse,
        UpdateVocabularyRequest, UserResponse, VocabularyListResponse, VocabularyResponse,
    },
    state::AppState,
    storage::{ReviewStatus, VocabularyEntry},
};

pub mod auth;
pub mod health;
pub mod users;
pub mod vocabulary;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let protected_routes = Router::new()
        .route("/auth/me", get(users::get_current_user))
        .route(
            "/vocab",
            get(vocabulary::list_vocabulary).post(vocabulary::create_vocabulary),
        )
        .route(
            "/vocab/{id}",
            put(vocabulary::update_vocabulary).delete(vocabulary::delete_vocabulary),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(allowed_origins))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// CORS for the configured browser origins. Unparsable origins and the `*`
/// wildcard (incompatible with credentials) are skipped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            if origin.trim() == "*" {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
                return None;
            }
            match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        users::get_current_user,
        vocabulary::list_vocabulary,
        vocabulary::create_vocabulary,
        vocabulary::update_vocabulary,
        vocabulary::delete_vocabulary,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            UserId,
            CredentialsRequest,
            UserResponse,
            LoginResponse,
            ReviewStatus,
            VocabularyEntry,
            CreateVocabularyRequest,
            UpdateVocabularyRequest,
            VocabularyListResponse,
            VocabularyResponse,
            MessageResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Vocabulary", description = "Per-user vocabulary entries"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
