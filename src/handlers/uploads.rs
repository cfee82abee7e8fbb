//! Generic file upload handler

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use crate::handlers::form::FormData;
use crate::services::storage::validate_bucket;
use crate::services::AuthUser;
use crate::state::SharedState;
use crate::utils::errors::{SocioError, Result};

/// POST /api/upload/:bucket
pub async fn upload_file(
    State(state): State<SharedState>,
    Path(bucket): Path<String>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    validate_bucket(&bucket)?;

    let mut form = FormData::from_multipart(multipart).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| SocioError::InvalidInput("No file uploaded".to_string()))?;

    let stored = state
        .services
        .storage
        .store(&bucket, &auth.id, &file.file_name, &file.bytes)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "url": stored.url, "path": stored.path }))))
}
