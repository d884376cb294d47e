// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_negative;

// Catálogo de produtos/peças. Um produto referenciado por transações nunca
// é apagado de verdade: desativamos (is_active = false) para não quebrar o
// histórico.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub min_stock_level: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Produto com o saldo atual (JOIN com a tabela de estoque), usado nas
// listagens do catálogo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStock {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub category: Option<String>,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    pub selling_price: Decimal,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    #[serde(default)]
    pub min_stock_level: i64,

    // Carga inicial de estoque. Se maior que zero, gera um movimento
    // INITIAL_STOCK na criação.
    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[serde(default)]
    pub initial_stock: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,

    pub category: Option<String>,

    #[validate(length(min = 1, message = "A unidade não pode ficar vazia."))]
    pub unit: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub cost_price: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub selling_price: Option<Decimal>,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    pub min_stock_level: Option<i64>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// Busca por nome ou SKU
    pub search: Option<String>,
    pub category: Option<String>,
    pub active: Option<bool>,
}
