use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::uploads::model::{
    ListKind, PaginatedUploadsResponse, UploadFilterParams, UploadRecord, UploadRecordResponse,
};
use crate::modules::uploads::service::UploadService;
use crate::modules::users::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

fn to_response(state: &AppState, record: UploadRecord) -> UploadRecordResponse {
    let url = UploadService::file_url(&record, state.storage.as_ref(), &state.storage_config);
    UploadRecordResponse::new(record, url)
}

/// Pull the spreadsheet out of a multipart body. The field must be named
/// `file` and carry a filename, or the extension gate has nothing to check.
async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Upload has no filename")))?;
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read upload: {}", e)))?;

        return Ok((filename, content.to_vec()));
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Expected a 'file' field in the multipart body"
    )))
}

#[utoipa::path(
    post,
    path = "/api/uploads/{kind}",
    params(("kind" = ListKind, Path, description = "List kind: lecturer or student")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "List uploaded", body = UploadRecordResponse),
        (status = 400, description = "Malformed upload", body = ErrorResponse),
        (status = 422, description = "Extension not .xls/.xlsx", body = ErrorResponse)
    ),
    tag = "Uploads"
)]
#[instrument(skip(state, multipart))]
pub async fn create_upload(
    State(state): State<AppState>,
    Path(kind): Path<ListKind>,
    mut multipart: Multipart,
) -> Result<Json<UploadRecordResponse>, AppError> {
    let (filename, content) = extract_file(&mut multipart).await?;
    let record = UploadService::create_upload(
        &state.db,
        state.storage.as_ref(),
        kind,
        &filename,
        &content,
    )
    .await?;
    Ok(Json(to_response(&state, record)))
}

#[utoipa::path(
    get,
    path = "/api/uploads/{kind}",
    params(
        ("kind" = ListKind, Path, description = "List kind: lecturer or student"),
        ("limit" = Option<i64>, Query, description = "Page size (1-100)"),
        ("page" = Option<i64>, Query, description = "Page number, starting at 1")
    ),
    responses(
        (status = 200, description = "Upload records, newest first", body = PaginatedUploadsResponse)
    ),
    tag = "Uploads"
)]
#[instrument(skip(state))]
pub async fn get_uploads(
    State(state): State<AppState>,
    Path(kind): Path<ListKind>,
    Query(params): Query<UploadFilterParams>,
) -> Result<Json<PaginatedUploadsResponse>, AppError> {
    let (records, total) = UploadService::list_uploads(
        &state.db,
        kind,
        params.pagination.limit(),
        params.pagination.offset(),
    )
    .await?;

    let data = records
        .into_iter()
        .map(|record| to_response(&state, record))
        .collect();

    Ok(Json(PaginatedUploadsResponse {
        data,
        meta: PaginationMeta::for_page(&params.pagination, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/uploads/{kind}/{id}",
    params(
        ("kind" = ListKind, Path, description = "List kind: lecturer or student"),
        ("id" = Uuid, Path, description = "Upload record ID")
    ),
    responses(
        (status = 200, description = "Upload record", body = UploadRecordResponse),
        (status = 404, description = "Record not found", body = ErrorResponse)
    ),
    tag = "Uploads"
)]
#[instrument(skip(state))]
pub async fn get_upload(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ListKind, Uuid)>,
) -> Result<Json<UploadRecordResponse>, AppError> {
    let record = UploadService::get_upload(&state.db, kind, id).await?;
    Ok(Json(to_response(&state, record)))
}

#[utoipa::path(
    put,
    path = "/api/uploads/{kind}/{id}",
    params(
        ("kind" = ListKind, Path, description = "List kind: lecturer or student"),
        ("id" = Uuid, Path, description = "Upload record ID")
    ),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File replaced, updated_date refreshed", body = UploadRecordResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 422, description = "Extension not .xls/.xlsx", body = ErrorResponse)
    ),
    tag = "Uploads"
)]
#[instrument(skip(state, multipart))]
pub async fn replace_upload(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ListKind, Uuid)>,
    mut multipart: Multipart,
) -> Result<Json<UploadRecordResponse>, AppError> {
    let (filename, content) = extract_file(&mut multipart).await?;
    let record = UploadService::replace_upload(
        &state.db,
        state.storage.as_ref(),
        kind,
        id,
        &filename,
        &content,
    )
    .await?;
    Ok(Json(to_response(&state, record)))
}

#[utoipa::path(
    delete,
    path = "/api/uploads/{kind}/{id}",
    params(
        ("kind" = ListKind, Path, description = "List kind: lecturer or student"),
        ("id" = Uuid, Path, description = "Upload record ID")
    ),
    responses(
        (status = 200, description = "File and record deleted"),
        (status = 404, description = "Record not found", body = ErrorResponse)
    ),
    tag = "Uploads"
)]
#[instrument(skip(state))]
pub async fn delete_upload(
    State(state): State<AppState>,
    Path((kind, id)): Path<(ListKind, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    UploadService::delete_upload(&state.db, state.storage.as_ref(), kind, id).await?;
    Ok(Json(json!({"message": "Upload deleted successfully"})))
}
