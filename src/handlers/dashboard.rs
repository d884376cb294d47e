// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{inventory::LowStockEntry, report::DashboardStats},
};

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Indicadores do dia", body = DashboardStats))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = app_state.dashboard_service.stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/low-stock-alerts",
    tag = "Dashboard",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Alertas de estoque baixo", body = [LowStockEntry]))
)]
pub async fn low_stock_alerts(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<LowStockEntry>>, AppError> {
    let alerts = app_state.dashboard_service.low_stock_alerts().await?;
    Ok(Json(alerts))
}
