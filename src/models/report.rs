// src/models/report.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Indicadores do painel inicial. Montado a partir de várias consultas
// dentro de uma mesma transação (snapshot consistente).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub products_active: i64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    pub sales_today: Decimal,
    pub purchases_today: Decimal,
    pub drafts_open: i64,
    pub movements_today: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportRow {
    pub day: NaiveDate,
    pub transactions: i64,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchasesReportRow {
    pub day: NaiveDate,
    pub transactions: i64,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReportRow {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub min_stock_level: i64,
    /// Valor do estoque ao custo (quantity * cost_price)
    pub stock_value: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReportRow {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub happened_at: DateTime<Utc>,
    pub kind: String,
    pub description: String,
    pub performed_by: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}
