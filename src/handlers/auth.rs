// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{LoginPayload, LoginResponse, LogoutPayload, RefreshPayload, TokenPair, User},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login realizado", body = LoginResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(response))
}

// Handler de refresh (rotação do refresh token)
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "Novo par de tokens", body = TokenPair),
        (status = 401, description = "Refresh token inválido ou expirado")
    )
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<TokenPair>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let tokens = app_state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(tokens))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    request_body = LogoutPayload,
    security(("api_jwt" = [])),
    responses((status = 204, description = "Sessão encerrada"))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<LogoutPayload>,
) -> Result<StatusCode, AppError> {
    app_state.auth_service.logout(&payload.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Usuário autenticado", body = User))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
