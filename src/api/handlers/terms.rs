use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, DeletedResponse};
use crate::store::models::{now_iso, TagsInput, TermRecord};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTermRequest {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub tags: Option<TagsInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTermRequest {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub tags: Option<TagsInput>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_terms(State(state): State<Arc<AppState>>) -> Json<Vec<TermRecord>> {
    Json(state.terms.load())
}

pub async fn create_term(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateTermRequest>,
) -> Result<(StatusCode, Json<TermRecord>), ApiError> {
    let term = req.term.trim();
    let definition = req.definition.trim();
    if term.is_empty() || definition.is_empty() {
        return Err(ApiError::bad_request(
            "missing or invalid fields, required: term, definition",
        ));
    }

    let mut items = state.terms.load();
    let now = now_iso();
    let record = TermRecord {
        id: uuid::Uuid::new_v4().to_string(),
        term: term.to_string(),
        definition: definition.to_string(),
        abbreviation: req
            .abbreviation
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string(),
        tags: req
            .tags
            .as_ref()
            .and_then(TagsInput::normalize)
            .unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
        extra: Default::default(),
    };
    items.push(record.clone());
    state
        .terms
        .save(&items)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(term_id = %record.id, "Created term");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_term(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateTermRequest>,
) -> Result<Json<TermRecord>, ApiError> {
    if matches!(&req.term, Some(t) if t.trim().is_empty()) {
        return Err(ApiError::bad_request("term must not be empty"));
    }
    if matches!(&req.definition, Some(d) if d.trim().is_empty()) {
        return Err(ApiError::bad_request("definition must not be empty"));
    }

    let mut items = state.terms.load();
    let Some(item) = items.iter_mut().find(|it| it.id == id) else {
        return Err(ApiError::not_found("not found"));
    };

    if let Some(term) = req.term {
        item.term = term.trim().to_string();
    }
    if let Some(definition) = req.definition {
        item.definition = definition.trim().to_string();
    }
    if let Some(abbreviation) = req.abbreviation {
        item.abbreviation = abbreviation.trim().to_string();
    }
    if let Some(tags) = req.tags {
        // A tags value that is neither a list nor a string leaves the
        // existing tags in place.
        if let Some(normalized) = tags.normalize() {
            item.tags = normalized;
        }
    }
    item.updated_at = now_iso();
    if item.created_at.is_empty() {
        item.created_at = item.updated_at.clone();
    }
    let updated = item.clone();

    state
        .terms
        .save(&items)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(term_id = %id, "Updated term");
    Ok(Json(updated))
}

pub async fn delete_term(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let mut items = state.terms.load();
    let before = items.len();
    items.retain(|it| it.id != id);
    if items.len() == before {
        return Err(ApiError::not_found("not found"));
    }

    state
        .terms
        .save(&items)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(term_id = %id, "Deleted term");
    Ok(Json(DeletedResponse { deleted: true }))
}
