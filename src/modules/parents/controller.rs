use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::parents::model::{
    CreateParentDto, PaginatedParentsResponse, Parent, ParentDetails, ParentFilterParams,
    UpdateParentDto,
};
use crate::modules::parents::service::ParentService;
use crate::modules::users::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/parents",
    request_body = CreateParentDto,
    responses(
        (status = 200, description = "Parent registered", body = Parent),
        (status = 400, description = "Already registered or unknown user/student", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn create_parent(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<Json<Parent>, AppError> {
    let parent = ParentService::create_parent(&state.db, dto).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    get,
    path = "/api/parents",
    params(
        ("limit" = Option<i64>, Query, description = "Page size (1-100)"),
        ("page" = Option<i64>, Query, description = "Page number, starting at 1")
    ),
    responses(
        (status = 200, description = "Registered parents", body = PaginatedParentsResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parents(
    State(state): State<AppState>,
    Query(params): Query<ParentFilterParams>,
) -> Result<Json<PaginatedParentsResponse>, AppError> {
    let (data, total) = ParentService::list_parents(
        &state.db,
        params.pagination.limit(),
        params.pagination.offset(),
    )
    .await?;

    Ok(Json(PaginatedParentsResponse {
        data,
        meta: PaginationMeta::for_page(&params.pagination, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent details", body = ParentDetails),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParentDetails>, AppError> {
    let parent = ParentService::get_parent(&state.db, id).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    put,
    path = "/api/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent ID")),
    request_body = UpdateParentDto,
    responses(
        (status = 200, description = "Parent updated", body = ParentDetails),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn update_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<Json<ParentDetails>, AppError> {
    let parent = ParentService::update_parent(&state.db, id, dto).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    delete,
    path = "/api/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent deleted; owning user and student untouched"),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn delete_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ParentService::delete_parent(&state.db, id).await?;
    Ok(Json(json!({"message": "Parent deleted successfully"})))
}
