use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use std::sync::Arc;

use crate::api::response::{ApiError, DeletedResponse};
use crate::asset_store::AssetStoreError;
use crate::store::models::{now_iso, ImageRecord};
use crate::AppState;

/// Common image types plus PDF.
const ALLOWED_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".pdf"];

pub async fn list_images(State(state): State<Arc<AppState>>) -> Json<Vec<ImageRecord>> {
    Json(state.images.load())
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageRecord>), ApiError> {
    let mut file_data: Option<Bytes> = None;
    let mut original_name: Option<String> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                original_name = field.file_name().map(|s| s.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "File exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }
                file_data = Some(data);
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid title: {e}")))?,
                );
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::bad_request("no file uploaded"))?;
    let original = original_name.unwrap_or_default();
    if original.is_empty() {
        return Err(ApiError::bad_request("no file selected"));
    }

    let suffix = std::path::Path::new(&original)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&suffix.as_str()) {
        return Err(ApiError::bad_request(format!(
            "file type not allowed: {suffix}"
        )));
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| original.clone());

    // Phase 1: store the bytes under a generated unique name
    let stored_name = format!("{}{suffix}", uuid::Uuid::new_v4().simple());
    state
        .assets
        .put(&stored_name, file_data)
        .await
        .map_err(|e| ApiError::internal(format!("could not save file: {e}")))?;

    // Phase 2: append the metadata record
    let mut images: Vec<ImageRecord> = state.images.load();
    let record = ImageRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        filename: stored_name.clone(),
        original,
        uploaded_at: now_iso(),
    };
    images.push(record.clone());

    if let Err(e) = state.images.save(&images) {
        // Best-effort cleanup of the stored bytes
        let _ = state.assets.delete(&stored_name).await;
        return Err(ApiError::internal(e.to_string()));
    }

    tracing::debug!(image_id = %record.id, filename = %record.filename, "Uploaded image");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Serve uploaded bytes by stored filename.
/// Route: GET /images/:filename
pub async fn serve_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let data = state.assets.get(&filename).await.map_err(|e| match e {
        AssetStoreError::NotFound(_) => ApiError::not_found("Image not found"),
        _ => ApiError::internal(format!("Failed to retrieve image: {e}")),
    })?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        mime.as_ref()
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );
    // Stored names are unique per upload, so content never changes under a name.
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=3600"),
    );

    Ok(response)
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let mut images: Vec<ImageRecord> = state.images.load();
    let Some(found) = images.iter().find(|it| it.id == id).cloned() else {
        return Err(ApiError::not_found("not found"));
    };

    // Phase 1: delete the bytes (best-effort)
    if !found.filename.is_empty() {
        if let Err(e) = state.assets.delete(&found.filename).await {
            tracing::warn!(image_id = %id, error = %e, "Failed to delete image file");
        }
    }

    // Phase 2: remove the metadata record
    images.retain(|it| it.id != id);
    state
        .images
        .save(&images)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(image_id = %id, "Deleted image");
    Ok(Json(DeletedResponse { deleted: true }))
}
