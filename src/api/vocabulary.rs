// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vocabulary endpoints. Every handler is scoped to the token's user.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use super::auth::json_body;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        CreateVocabularyRequest, MessageResponse, UpdateVocabularyRequest,
        VocabularyListResponse, VocabularyResponse,
    },
    state::AppState,
    storage::{NewVocabularyEntry, ReviewStatus, VocabularyFilter, VocabularyRepository},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct VocabularyQuery {
    /// Only entries for this day (`YYYY-MM-DD`); an unparsable value is ignored.
    pub date: Option<String>,
    /// Case-insensitive match on word or meaning.
    pub search: Option<String>,
}

impl VocabularyQuery {
    fn into_filter(self) -> VocabularyFilter {
        VocabularyFilter {
            date: self
                .date
                .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok()),
            search: self.search,
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::bad_request("Invalid date format. Use YYYY-MM-DD"))
}

fn parse_status(raw: &str) -> Result<ReviewStatus, ApiError> {
    ReviewStatus::parse(raw.trim())
        .ok_or_else(|| ApiError::bad_request("Invalid status. Use review_needed or mastered"))
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid vocabulary ID"))
}

/// Non-empty after trimming.
fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[utoipa::path(
    get,
    path = "/vocab",
    params(VocabularyQuery),
    tag = "Vocabulary",
    security(("bearer" = [])),
    responses(
        (status = 200, body = VocabularyListResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_vocabulary(
    State(state): State<AppState>,
    Auth(user): Auth,
    Query(params): Query<VocabularyQuery>,
) -> Result<Json<VocabularyListResponse>, ApiError> {
    let repo = VocabularyRepository::new(&state.storage);
    let entries = repo.list_by_owner(&user, &params.into_filter())?;
    Ok(Json(entries.into()))
}

#[utoipa::path(
    post,
    path = "/vocab",
    request_body = CreateVocabularyRequest,
    tag = "Vocabulary",
    security(("bearer" = [])),
    responses(
        (status = 201, body = VocabularyResponse),
        (status = 400, description = "Missing word or meaning, or bad date or status"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn create_vocabulary(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<CreateVocabularyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VocabularyResponse>), ApiError> {
    let request = json_body(body)?;

    let word = request.word.trim();
    let meaning = request.meaning.trim();
    if word.is_empty() || meaning.is_empty() {
        return Err(ApiError::bad_request("word and meaning are required"));
    }
    let date = parse_date(&request.date)?;
    let status = match provided(request.status) {
        Some(raw) => parse_status(&raw)?,
        None => ReviewStatus::default(),
    };

    let repo = VocabularyRepository::new(&state.storage);
    let entry = repo.create(
        &user,
        NewVocabularyEntry {
            word: word.to_string(),
            meaning: meaning.to_string(),
            example: request.example.trim().to_string(),
            date,
            status,
        },
        state.now(),
    )?;

    info!(user_id = %user.user_id, vocabulary_id = entry.id, "Created vocabulary entry");
    Ok((
        StatusCode::CREATED,
        Json(VocabularyResponse {
            message: "Vocabulary created successfully".to_string(),
            vocabulary: entry,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/vocab/{id}",
    params(
        ("id" = u64, Path, description = "Identifier of the vocabulary entry")
    ),
    request_body = UpdateVocabularyRequest,
    tag = "Vocabulary",
    security(("bearer" = [])),
    responses(
        (status = 200, body = VocabularyResponse),
        (status = 400, description = "Invalid id or status"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Vocabulary not found"),
    )
)]
pub async fn update_vocabulary(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<UpdateVocabularyRequest>, JsonRejection>,
) -> Result<Json<VocabularyResponse>, ApiError> {
    let id = parse_id(&id)?;
    let request = json_body(body)?;

    let word = provided(request.word);
    let meaning = provided(request.meaning);
    let example = provided(request.example);
    let status = provided(request.status)
        .map(|raw| parse_status(&raw))
        .transpose()?;

    let repo = VocabularyRepository::new(&state.storage);
    let entry = repo.update(id, &user, state.now(), |entry| {
        if let Some(word) = word {
            entry.word = word.trim().to_string();
        }
        if let Some(meaning) = meaning {
            entry.meaning = meaning.trim().to_string();
        }
        if let Some(example) = example {
            entry.example = example.trim().to_string();
        }
        if let Some(status) = status {
            entry.status = status;
        }
    })?;

    info!(user_id = %user.user_id, vocabulary_id = id, "Updated vocabulary entry");
    Ok(Json(VocabularyResponse {
        message: "Vocabulary updated successfully".to_string(),
        vocabulary: entry,
    }))
}

#[utoipa::path(
    delete,
    path = "/vocab/{id}",
    params(
        ("id" = u64, Path, description = "Identifier of the vocabulary entry")
    ),
    tag = "Vocabulary",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid id"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Vocabulary not found"),
    )
)]
pub async fn delete_vocabulary(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let repo = VocabularyRepository::new(&state.storage);
    repo.delete(id, &user)?;

    info!(user_id = %user.user_id, vocabulary_id = id, "Deleted vocabulary entry");
    Ok(Json(MessageResponse {
        message: "Vocabulary deleted successfully".to_string(),
    }))
}
