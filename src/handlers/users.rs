// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManageUsers, RequirePermission},
    },
    models::auth::{CreateUserPayload, UpdateUserPayload, User},
};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Lista de usuários", body = [User]))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    security(("api_jwt" = [])),
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já existe")
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.auth_service.create_user(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    security(("api_jwt" = [])),
    responses((status = 200, description = "Usuário atualizado", body = User))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.auth_service.update_user(id, &payload).await?;
    Ok(Json(user))
}

// Desativação lógica; o usuário some do login mas continua na auditoria.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Usuário desativado", body = User),
        (status = 409, description = "Não é possível desativar a si mesmo")
    )
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(acting): AuthenticatedUser,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = app_state.auth_service.deactivate_user(id, &acting).await?;
    Ok(Json(user))
}
