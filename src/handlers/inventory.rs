// src/handlers/inventory.rs

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermAdjustStock, RequirePermission},
    },
    models::inventory::{
        AdjustStockPayload, LowStockEntry, LowStockParams, MovementListParams,
        NewBalanceResponse, StockMovementEntry,
    },
};

// Ajuste manual de estoque. `add`/`remove` aplicam o delta direto; `set`
// calcula o delta para chegar no alvo. Tudo passa pelo razão: saldo novo e
// movimento são gravados juntos.
#[utoipa::path(
    post,
    path = "/api/inventory/adjust",
    tag = "Inventory",
    request_body = AdjustStockPayload,
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Novo saldo", body = NewBalanceResponse),
        (status = 409, description = "Estoque insuficiente para a remoção")
    )
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermAdjustStock>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<Json<NewBalanceResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let balance = app_state.stock_service.adjust(&payload, &user).await?;
    Ok(Json(balance))
}

#[utoipa::path(
    get,
    path = "/api/inventory/movements",
    tag = "Inventory",
    params(MovementListParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Histórico de movimentos", body = [StockMovementEntry]))
)]
pub async fn list_movements(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<MovementListParams>,
) -> Result<Json<Vec<StockMovementEntry>>, AppError> {
    let movements = app_state
        .stock_service
        .movements(params.product_id, params.limit)
        .await?;
    Ok(Json(movements))
}

// Produtos no nível mínimo ou abaixo, esgotados primeiro.
#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    tag = "Inventory",
    params(LowStockParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Produtos abaixo do mínimo", body = [LowStockEntry]))
)]
pub async fn low_stock(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<LowStockParams>,
) -> Result<Json<Vec<LowStockEntry>>, AppError> {
    let entries = app_state.stock_service.low_stock(params.threshold).await?;
    Ok(Json(entries))
}
