//! Blob upload and download endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use mothr_core::{BlobId, BlobPayload, CostQuery, EpochCount, WriteReceipt};

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Identifier used when the upload has no filename.
const DEFAULT_IDENTIFIER: &str = "blob";

fn multipart_error(e: MultipartError, limit: u64) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::BadRequest(format!("invalid multipart body: {}", e.body_text()))
    }
}

/// POST /write[?epochs=N] - Upload the multipart `file` field.
pub async fn write_blob(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<WriteReceipt>> {
    let Query(pairs) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query: CostQuery = pairs.into_iter().collect();
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let epochs = query
        .epochs
        .as_deref()
        .map(EpochCount::parse)
        .transpose()?;

    let limit = state.gateway.max_size_bytes();
    let mut payload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let identifier = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_IDENTIFIER)
            .to_string();
        let contents = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        payload = Some(BlobPayload::new(identifier, contents));
        break;
    }

    let payload = payload.ok_or_else(|| {
        ApiError::BadRequest(format!("multipart field '{FILE_FIELD}' is required"))
    })?;

    let receipt = state.gateway.upload(payload, epochs).await?;
    Ok(Json(receipt))
}

/// GET /read/{blob_id} - Download a blob's original bytes.
pub async fn read_blob(
    State(state): State<AppState>,
    Path(blob_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = BlobId::new(blob_id)?;
    let bytes = state.gateway.download(&id).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    ))
}
