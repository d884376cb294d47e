// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermViewReports, RequirePermission},
    models::report::{
        ActivityEntry, InventoryReportRow, ProfitReportRow, PurchasesReportRow, ReportParams,
        SalesReportRow,
    },
};

#[utoipa::path(
    get,
    path = "/api/reports/sales",
    tag = "Reports",
    params(ReportParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Vendas por dia", body = [SalesReportRow]))
)]
pub async fn sales_report(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewReports>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<SalesReportRow>>, AppError> {
    let rows = app_state.report_service.sales(&params).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/purchases",
    tag = "Reports",
    params(ReportParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Compras por dia", body = [PurchasesReportRow]))
)]
pub async fn purchases_report(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewReports>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<PurchasesReportRow>>, AppError> {
    let rows = app_state.report_service.purchases(&params).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/inventory",
    tag = "Reports",
    params(ReportParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Posição de estoque valorizada", body = [InventoryReportRow]))
)]
pub async fn inventory_report(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewReports>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<InventoryReportRow>>, AppError> {
    let rows = app_state.report_service.inventory(&params).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/profit",
    tag = "Reports",
    params(ReportParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Lucro bruto por produto", body = [ProfitReportRow]))
)]
pub async fn profit_report(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewReports>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<ProfitReportRow>>, AppError> {
    let rows = app_state.report_service.profit(&params).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/activity",
    tag = "Reports",
    params(ReportParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Linha do tempo de atividades", body = [ActivityEntry]))
)]
pub async fn activity_report(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewReports>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<ActivityEntry>>, AppError> {
    let rows = app_state.report_service.activity(&params).await?;
    Ok(Json(rows))
}
