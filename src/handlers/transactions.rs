// src/handlers/transactions.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{
            PermCancelTransaction, PermCompleteTransaction, PermConfirmTransaction,
            PermCreateTransaction, PermDeleteDraft, RequirePermission,
        },
    },
    models::transaction::{
        CreateTransactionPayload, Transaction, TransactionDetail, TransactionListParams,
        UpdateDraftPayload,
    },
};

// Cria em DRAFT: totais calculados, preços congelados, nenhum efeito de
// estoque ainda.
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = CreateTransactionPayload,
    security(("api_jwt" = [])),
    responses(
        (status = 201, description = "Transação criada em rascunho", body = TransactionDetail),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermCreateTransaction>,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<(StatusCode, Json<TransactionDetail>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.transaction_service.create(&payload, &user).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(TransactionListParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Lista de transações", body = [Transaction]))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = app_state.transaction_service.list(&params).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = Uuid, Path, description = "ID da transação")),
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Detalhe com itens", body = TransactionDetail),
        (status = 404, description = "Transação não encontrada")
    )
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionDetail>, AppError> {
    let detail = app_state.transaction_service.get(id).await?;
    Ok(Json(detail))
}

// Só rascunhos são editáveis; trocar itens recalcula os totais.
#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = Uuid, Path, description = "ID da transação")),
    request_body = UpdateDraftPayload,
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Rascunho atualizado", body = TransactionDetail),
        (status = 409, description = "Transação não está em rascunho")
    )
)]
pub async fn update_draft(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermCreateTransaction>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDraftPayload>,
) -> Result<Json<TransactionDetail>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.transaction_service.update_draft(id, &payload).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    patch,
    path = "/api/transactions/{id}/confirm",
    tag = "Transactions",
    params(("id" = Uuid, Path, description = "ID da transação")),
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Transação confirmada", body = Transaction),
        (status = 409, description = "Transição inválida para o status atual")
    )
)]
pub async fn confirm_transaction(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermConfirmTransaction>,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = app_state.transaction_service.confirm(id, &user).await?;
    Ok(Json(transaction))
}

// A conclusão é quem mexe no estoque: um movimento por item, tudo ou nada.
#[utoipa::path(
    patch,
    path = "/api/transactions/{id}/complete",
    tag = "Transactions",
    params(("id" = Uuid, Path, description = "ID da transação")),
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Transação concluída, estoque aplicado", body = Transaction),
        (status = 409, description = "Transição inválida ou estoque insuficiente")
    )
)]
pub async fn complete_transaction(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermCompleteTransaction>,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = app_state.transaction_service.complete(id, &user).await?;
    Ok(Json(transaction))
}

#[utoipa::path(
    patch,
    path = "/api/transactions/{id}/cancel",
    tag = "Transactions",
    params(("id" = Uuid, Path, description = "ID da transação")),
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Transação cancelada", body = Transaction),
        (status = 409, description = "Transação concluída não pode ser cancelada")
    )
)]
pub async fn cancel_transaction(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermCancelTransaction>,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = app_state.transaction_service.cancel(id).await?;
    Ok(Json(transaction))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = Uuid, Path, description = "ID da transação")),
    security(("api_jwt" = [])),
    responses(
        (status = 204, description = "Rascunho excluído"),
        (status = 409, description = "Só rascunhos podem ser excluídos")
    )
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermDeleteDraft>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.transaction_service.delete_draft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Recibo em PDF para impressão/download
pub async fn transaction_pdf(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (filename, pdf_bytes) = app_state.document_service.transaction_pdf(id).await?;

    // Configura os headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
