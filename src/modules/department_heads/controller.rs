use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::department_heads::model::{
    CreateDepartmentHeadDto, DepartmentHead, DepartmentHeadDetails, DepartmentHeadFilterParams,
    PaginatedDepartmentHeadsResponse,
};
use crate::modules::department_heads::service::DepartmentHeadService;
use crate::modules::users::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/department-heads",
    request_body = CreateDepartmentHeadDto,
    responses(
        (status = 200, description = "Department head appointed", body = DepartmentHead),
        (status = 400, description = "Already appointed or unknown user/program", body = ErrorResponse)
    ),
    tag = "Department Heads"
)]
#[instrument(skip(state))]
pub async fn create_department_head(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentHeadDto>,
) -> Result<Json<DepartmentHead>, AppError> {
    let head = DepartmentHeadService::create_department_head(&state.db, dto).await?;
    Ok(Json(head))
}

#[utoipa::path(
    get,
    path = "/api/department-heads",
    params(
        ("limit" = Option<i64>, Query, description = "Page size (1-100)"),
        ("page" = Option<i64>, Query, description = "Page number, starting at 1")
    ),
    responses(
        (status = 200, description = "Department heads", body = PaginatedDepartmentHeadsResponse)
    ),
    tag = "Department Heads"
)]
#[instrument(skip(state))]
pub async fn get_department_heads(
    State(state): State<AppState>,
    Query(params): Query<DepartmentHeadFilterParams>,
) -> Result<Json<PaginatedDepartmentHeadsResponse>, AppError> {
    let (data, total) = DepartmentHeadService::list_department_heads(
        &state.db,
        params.pagination.limit(),
        params.pagination.offset(),
    )
    .await?;

    Ok(Json(PaginatedDepartmentHeadsResponse {
        data,
        meta: PaginationMeta::for_page(&params.pagination, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/department-heads/{id}",
    params(("id" = Uuid, Path, description = "Department head ID")),
    responses(
        (status = 200, description = "Department head details", body = DepartmentHeadDetails),
        (status = 404, description = "Department head not found", body = ErrorResponse)
    ),
    tag = "Department Heads"
)]
#[instrument(skip(state))]
pub async fn get_department_head(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DepartmentHeadDetails>, AppError> {
    let head = DepartmentHeadService::get_department_head(&state.db, id).await?;
    Ok(Json(head))
}

#[utoipa::path(
    delete,
    path = "/api/department-heads/{id}",
    params(("id" = Uuid, Path, description = "Department head ID")),
    responses(
        (status = 200, description = "Department head removed; owning user untouched"),
        (status = 404, description = "Department head not found", body = ErrorResponse)
    ),
    tag = "Department Heads"
)]
#[instrument(skip(state))]
pub async fn delete_department_head(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    DepartmentHeadService::delete_department_head(&state.db, id).await?;
    Ok(Json(json!({"message": "Department head deleted successfully"})))
}
