// src/models/transaction.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Sale,
    Purchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Draft,
    Confirmed,
    Completed,
    Canceled,
}

impl TransactionStatus {
    // Máquina de estados: DRAFT -> CONFIRMED -> COMPLETED, com CANCELED
    // alcançável a partir de DRAFT/CONFIRMED. COMPLETED e CANCELED são
    // terminais; uma transação concluída exige ajuste compensatório, nunca
    // cancelamento.
    pub fn can_transition(self, to: TransactionStatus) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, to),
            (Draft, Confirmed)
                | (Draft, Completed)
                | (Confirmed, Completed)
                | (Draft, Canceled)
                | (Confirmed, Canceled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Canceled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Draft => "DRAFT",
            TransactionStatus::Confirmed => "CONFIRMED",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

// Cabeçalho da transação. Invariante: total_amount == subtotal + tax_amount
// (também garantido por CHECK no banco).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub code: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub counterparty_name: String,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub confirmed_by: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Item de transação. O unit_price é congelado na criação: mudanças de preço
// no catálogo não afetam transações em andamento.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

// Item com os dados do produto resolvidos (JOIN), para detalhe e recibo
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemEntry {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

// Detalhe completo (para o frontend)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub items: Vec<TransactionItemEntry>,
}

// --- Payloads ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionItemPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    // O cliente (venda) ou fornecedor (compra)
    #[serde(alias = "customerName", alias = "supplierName")]
    #[validate(length(min = 1, message = "Informe o cliente ou fornecedor."))]
    pub counterparty_name: String,

    #[validate(
        length(min = 1, message = "A transação precisa de ao menos um item."),
        nested
    )]
    pub items: Vec<NewTransactionItemPayload>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraftPayload {
    #[validate(length(min = 1, message = "Informe o cliente ou fornecedor."))]
    pub counterparty_name: Option<String>,

    #[validate(
        length(min = 1, message = "A transação precisa de ao menos um item."),
        nested
    )]
    pub items: Option<Vec<NewTransactionItemPayload>>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionListParams {
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::TransactionStatus::*;

    #[test]
    fn valid_transitions() {
        assert!(Draft.can_transition(Confirmed));
        assert!(Draft.can_transition(Completed));
        assert!(Draft.can_transition(Canceled));
        assert!(Confirmed.can_transition(Completed));
        assert!(Confirmed.can_transition(Canceled));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for from in [Completed, Canceled] {
            for to in [Draft, Confirmed, Completed, Canceled] {
                assert!(!from.can_transition(to), "{from} -> {to} deveria falhar");
            }
        }
    }

    #[test]
    fn no_backwards_transitions() {
        assert!(!Confirmed.can_transition(Draft));
        assert!(!Draft.can_transition(Draft));
        assert!(!Confirmed.can_transition(Confirmed));
    }

    #[test]
    fn terminal_flags() {
        assert!(Completed.is_terminal());
        assert!(Canceled.is_terminal());
        assert!(!Draft.is_terminal());
        assert!(!Confirmed.is_terminal());
    }
}
