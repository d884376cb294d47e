// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// --- Movimentações de Estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum MovementType {
    InitialStock, // Vira "INITIAL_STOCK"
    Sale,
    Purchase,
    Adjustment,
    Correction,
}

// Saldo atual de um produto. Só muda através do razão de estoque
// (StockService::apply_movement); escrita direta quebraria o invariante
// quantidade == soma dos deltas.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub product_id: Uuid,
    pub quantity: i64,
    pub last_movement_at: Option<DateTime<Utc>>,
}

// Linha de estoque travada para atualização (FOR UPDATE), com o nome do
// produto que as mensagens de erro precisam.
#[derive(Debug, Clone, FromRow)]
pub struct StockForUpdate {
    pub product_id: Uuid,
    pub quantity: i64,
    pub product_name: String,
}

// --- STOCK MOVEMENT (Histórico) ---
// Imutável depois de criado: é a trilha de auditoria.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub delta: i64,
    pub balance_after: i64,
    pub notes: Option<String>,
    pub performed_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// Movimento com nomes resolvidos (JOIN), para as telas de histórico
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub movement_type: MovementType,
    pub delta: i64,
    pub balance_after: i64,
    pub notes: Option<String>,
    pub performed_by_name: String,
    pub created_at: DateTime<Utc>,
}

// --- Ajuste manual ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Add,
    Remove,
    Set,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    pub product_id: Uuid,

    #[serde(rename = "type")]
    pub kind: AdjustmentKind,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i64,

    /// Motivo do ajuste ("correction" registra um movimento CORRECTION)
    pub reason: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBalanceResponse {
    pub product_id: Uuid,
    pub new_balance: i64,
}

// Entrada da lista de estoque baixo (quantity <= min_stock_level)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub min_stock_level: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MovementListParams {
    pub product_id: Option<Uuid>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockParams {
    /// Limite absoluto; sem ele, vale o mínimo de cada produto
    pub threshold: Option<i64>,
}
