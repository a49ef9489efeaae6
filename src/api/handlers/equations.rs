use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, DeletedResponse};
use crate::store::models::{now_iso, EquationRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEquationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEquationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn list_equations(State(state): State<Arc<AppState>>) -> Json<Vec<EquationRecord>> {
    Json(state.equations.load())
}

pub async fn create_equation(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateEquationRequest>,
) -> Result<(StatusCode, Json<EquationRecord>), ApiError> {
    let name = req.name.trim();
    let content = req.content.trim();
    if name.is_empty() || content.is_empty() {
        return Err(ApiError::bad_request(
            "missing or invalid fields, required: name, content",
        ));
    }

    let mut equations: Vec<EquationRecord> = state.equations.load();
    let now = now_iso();
    let record = EquationRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        content: content.to_string(),
        description: req
            .description
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    equations.push(record.clone());
    state
        .equations
        .save(&equations)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(equation_id = %record.id, "Created equation");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_equation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateEquationRequest>,
) -> Result<Json<EquationRecord>, ApiError> {
    if matches!(&req.name, Some(n) if n.trim().is_empty()) {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    if matches!(&req.content, Some(c) if c.trim().is_empty()) {
        return Err(ApiError::bad_request("content must not be empty"));
    }

    let mut equations: Vec<EquationRecord> = state.equations.load();
    let Some(equation) = equations.iter_mut().find(|eq| eq.id == id) else {
        return Err(ApiError::not_found("not found"));
    };

    if let Some(name) = req.name {
        equation.name = name.trim().to_string();
    }
    if let Some(content) = req.content {
        equation.content = content.trim().to_string();
    }
    if let Some(description) = req.description {
        equation.description = description.trim().to_string();
    }
    equation.updated_at = now_iso();
    let updated = equation.clone();

    state
        .equations
        .save(&equations)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(equation_id = %id, "Updated equation");
    Ok(Json(updated))
}

pub async fn delete_equation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let mut equations: Vec<EquationRecord> = state.equations.load();
    let before = equations.len();
    equations.retain(|eq| eq.id != id);
    if equations.len() == before {
        return Err(ApiError::not_found("not found"));
    }

    state
        .equations
        .save(&equations)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(equation_id = %id, "Deleted equation");
    Ok(Json(DeletedResponse { deleted: true }))
}
