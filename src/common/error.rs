// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::transaction::TransactionStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia. Toda resposta
// de erro carrega um `code` legível por máquina além da mensagem humana.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("O ajuste não altera o saldo atual")]
    NoopAdjustment,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Refresh token inválido ou expirado")]
    RefreshTokenInvalid,

    #[error("Usuário desativado")]
    UserDisabled,

    #[error("Permissão insuficiente: {0}")]
    Forbidden(&'static str),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Transação não encontrada")]
    TransactionNotFound,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("SKU já existe: {0}")]
    SkuAlreadyExists(String),

    #[error("Código de transação já existe: {0}")]
    CodeAlreadyExists(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Produto desativado: {0}")]
    ProductInactive(String),

    #[error("Não é possível desativar o próprio usuário")]
    CannotDeactivateSelf,

    // Transição proibida pela máquina de estados (ou perdida para uma
    // transição concorrente; o UPDATE condicional não encontrou a linha).
    #[error("Não é possível {action} uma transação {from}")]
    InvalidStatusTransition {
        from: TransactionStatus,
        action: &'static str,
    },

    // A dedução deixaria o saldo negativo. Nenhuma escrita é feita.
    #[error("Estoque insuficiente para '{product}'")]
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
        shortfall: i64,
    },

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar PDF: {0}")]
    PdfError(String),
}

impl AppError {
    // Par (status HTTP, código de máquina) de cada variante.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) | AppError::NoopAdjustment => {
                (StatusCode::BAD_REQUEST, "VALIDATION")
            }
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::RefreshTokenInvalid
            | AppError::UserDisabled => (StatusCode::UNAUTHORIZED, "AUTH"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::UserNotFound
            | AppError::ProductNotFound
            | AppError::TransactionNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::EmailAlreadyExists
            | AppError::SkuAlreadyExists(_)
            | AppError::CodeAlreadyExists(_)
            | AppError::UniqueConstraintViolation(_)
            | AppError::ProductInactive(_)
            | AppError::CannotDeactivateSelf
            | AppError::InvalidStatusTransition { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::InsufficientStock { .. } => (StatusCode::CONFLICT, "INSUFFICIENT_STOCK"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "code": "VALIDATION",
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }

            // Conflito de estoque com os números que o cliente precisa mostrar.
            AppError::InsufficientStock {
                ref product,
                requested,
                available,
                shortfall,
            } => {
                let body = Json(json!({
                    "code": "INSUFFICIENT_STOCK",
                    "error": format!(
                        "Estoque insuficiente para '{}': pedido {}, disponível {} (faltam {}).",
                        product, requested, available, shortfall
                    ),
                    "details": {
                        "product": product,
                        "requested": requested,
                        "available": available,
                        "shortfall": shortfall,
                    },
                }));
                (StatusCode::CONFLICT, body).into_response()
            }

            // Os erros de infraestrutura viram 500 com corpo genérico.
            // O `tracing` guarda a mensagem detalhada que o `thiserror` montou.
            ref e => {
                let (status, code) = e.status_and_code();
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!("Erro Interno do Servidor: {}", e);
                    "Ocorreu um erro inesperado.".to_string()
                } else {
                    e.to_string()
                };
                let body = Json(json!({ "code": code, "error": message }));
                (status, body).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use crate::models::transaction::TransactionStatus;
    use axum::http::StatusCode;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::RefreshTokenInvalid, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("inventory:adjust"), StatusCode::FORBIDDEN),
            (AppError::ProductNotFound, StatusCode::NOT_FOUND),
            (AppError::EmailAlreadyExists, StatusCode::CONFLICT),
            (
                AppError::InvalidStatusTransition {
                    from: TransactionStatus::Completed,
                    action: "cancelar",
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::InsufficientStock {
                    product: "Filtro de óleo".into(),
                    requested: 5,
                    available: 2,
                    shortfall: 3,
                },
                StatusCode::CONFLICT,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_and_code().0, expected);
        }
    }

    #[test]
    fn insufficient_stock_has_its_own_code() {
        let error = AppError::InsufficientStock {
            product: "Correia".into(),
            requested: 4,
            available: 1,
            shortfall: 3,
        };
        assert_eq!(error.status_and_code().1, "INSUFFICIENT_STOCK");
    }
}
