use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentDetails, StudentFilterParams,
    UpdateStudentDto,
};
use crate::modules::students::service::StudentService;
use crate::modules::users::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 200, description = "Student enrolled", body = Student),
        (status = 400, description = "Already enrolled or unknown user/program", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(
        ("q" = Option<String>, Query, description = "Substring matched against level or program title"),
        ("limit" = Option<i64>, Query, description = "Page size (1-100)"),
        ("page" = Option<i64>, Query, description = "Page number, starting at 1")
    ),
    responses(
        (status = 200, description = "Students matching the filter", body = PaginatedStudentsResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(params): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let (data, meta) = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => {
            let students = StudentService::search_students(&state.db, q).await?;
            let total = students.len() as i64;
            (
                students,
                PaginationMeta {
                    total,
                    limit: total.max(1),
                    page: None,
                    has_more: false,
                },
            )
        }
        _ => {
            let (students, total) = StudentService::list_students(
                &state.db,
                params.pagination.limit(),
                params.pagination.offset(),
            )
            .await?;
            (students, PaginationMeta::for_page(&params.pagination, total))
        }
    };

    Ok(Json(PaginatedStudentsResponse { data, meta }))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentDetails),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentDetails>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentDetails),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<StudentDetails>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student and owning user deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::delete_student(&state.db, state.storage.as_ref(), id).await?;
    Ok(Json(
        json!({"message": "Student and owning user deleted successfully"}),
    ))
}
