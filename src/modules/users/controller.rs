use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::users::model::{
    CreateUserDto, PaginatedUsersResponse, UpdateProfileDto, UserFilterParams, UserResponse,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;

/// Standard error payload, mirrored by every failure response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn to_response(state: &AppState, user: crate::modules::users::model::User) -> UserResponse {
    let url = UserService::picture_url(&user, state.storage.as_ref(), &state.storage_config);
    UserResponse::new(user, url)
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Duplicate username", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok(Json(to_response(&state, user)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("q" = Option<String>, Query, description = "Substring matched against username, first name, last name, or email"),
        ("limit" = Option<i64>, Query, description = "Page size (1-100)"),
        ("page" = Option<i64>, Query, description = "Page number, starting at 1")
    ),
    responses(
        (status = 200, description = "Users matching the filter", body = PaginatedUsersResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    // A search query returns the whole deduplicated match set; plain listing
    // is paginated.
    let (users, meta) = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => {
            let users = UserService::search_users(&state.db, q).await?;
            let total = users.len() as i64;
            (
                users,
                PaginationMeta {
                    total,
                    limit: total.max(1),
                    page: None,
                    has_more: false,
                },
            )
        }
        _ => {
            let (users, total) = UserService::list_users(
                &state.db,
                params.pagination.limit(),
                params.pagination.offset(),
            )
            .await?;
            (users, PaginationMeta::for_page(&params.pagination, total))
        }
    };

    let data = users
        .into_iter()
        .map(|user| to_response(&state, user))
        .collect();

    Ok(Json(PaginatedUsersResponse { data, meta }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(to_response(&state, user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_profile(&state.db, id, dto).await?;
    Ok(Json(to_response(&state, user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/picture",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Picture replaced", body = UserResponse),
        (status = 400, description = "No picture field in the upload", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_picture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("picture") {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read upload: {}", e)))?;

        let user = UserService::set_picture(
            &state.db,
            state.storage.as_ref(),
            id,
            filename.as_deref(),
            &content,
        )
        .await?;
        return Ok(Json(to_response(&state, user)));
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Expected a 'picture' field in the multipart body"
    )))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/picture",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Picture reset to default", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn reset_picture(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::reset_picture(&state.db, state.storage.as_ref(), id).await?;
    Ok(Json(to_response(&state, user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    UserService::delete_user(&state.db, state.storage.as_ref(), id).await?;
    Ok(Json(json!({"message": "User deleted successfully"})))
}
