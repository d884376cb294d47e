// src/services/transaction_service.rs

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, TransactionRepository},
    models::{
        auth::User,
        event::ResourceKind,
        inventory::MovementType,
        transaction::{
            CreateTransactionPayload, NewTransactionItemPayload, Transaction, TransactionDetail,
            TransactionKind, TransactionListParams, TransactionStatus, UpdateDraftPayload,
        },
    },
    services::{
        notifier::Notifier,
        pricing::{self, LineAmount},
        stock_service::StockService,
    },
};

// Quantas vezes tentamos de novo quando duas criações concorrentes tiram o
// mesmo número da sequência (o índice único em `code` decide o vencedor).
const CODE_RETRIES: usize = 3;

// Código legível por humanos: VND-2026-0042 (venda) / CMP-2026-0007 (compra).
pub fn format_code(kind: TransactionKind, year: i32, sequence: i64) -> String {
    let prefix = match kind {
        TransactionKind::Sale => "VND",
        TransactionKind::Purchase => "CMP",
    };
    format!("{}-{}-{:04}", prefix, year, sequence)
}

pub fn code_prefix(kind: TransactionKind, year: i32) -> String {
    let prefix = match kind {
        TransactionKind::Sale => "VND",
        TransactionKind::Purchase => "CMP",
    };
    format!("{}-{}-", prefix, year)
}

// Gerencia o ciclo de vida: DRAFT -> CONFIRMED -> COMPLETED / CANCELED.
// Só a conclusão toca o estoque, e sempre dentro de uma única transação de
// banco: ou todos os itens baixam/entram, ou nenhum.
#[derive(Clone)]
pub struct TransactionService {
    transaction_repo: TransactionRepository,
    product_repo: ProductRepository,
    stock_service: StockService,
    pool: PgPool,
    tax_rate: Decimal,
    notifier: Notifier,
}

impl TransactionService {
    pub fn new(
        transaction_repo: TransactionRepository,
        product_repo: ProductRepository,
        stock_service: StockService,
        pool: PgPool,
        tax_rate: Decimal,
        notifier: Notifier,
    ) -> Self {
        Self {
            transaction_repo,
            product_repo,
            stock_service,
            pool,
            tax_rate,
            notifier,
        }
    }

    // Confere se todos os produtos existem e estão ativos. O preço unitário
    // do payload é congelado na linha; mudanças futuras de catálogo não
    // afetam a transação.
    async fn validate_items(
        &self,
        items: &[NewTransactionItemPayload],
    ) -> Result<Vec<LineAmount>, AppError> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .product_repo
                .find_by_id(item.product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;
            if !product.is_active {
                return Err(AppError::ProductInactive(product.sku));
            }
            lines.push(LineAmount {
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }
        Ok(lines)
    }

    /// Cria a transação em DRAFT com itens e totais calculados. Nenhum
    /// efeito sobre o estoque ainda.
    pub async fn create(
        &self,
        payload: &CreateTransactionPayload,
        user: &User,
    ) -> Result<TransactionDetail, AppError> {
        let lines = self.validate_items(&payload.items).await?;
        let totals = pricing::compute_totals(&lines, self.tax_rate);

        let year = Utc::now().year();
        let prefix = code_prefix(payload.kind, year);

        let mut attempt = 0;
        let transaction = loop {
            attempt += 1;
            let mut tx = self.pool.begin().await?;

            let sequence = self.transaction_repo.next_sequence(&mut *tx, &prefix).await?;
            let code = format_code(payload.kind, year, sequence + 1);

            let inserted = self
                .transaction_repo
                .insert(
                    &mut *tx,
                    &code,
                    payload.kind,
                    &payload.counterparty_name,
                    totals.subtotal,
                    totals.tax_amount,
                    totals.total_amount,
                    user.id,
                    payload.notes.as_deref(),
                )
                .await;

            match inserted {
                Ok(transaction) => {
                    for item in &payload.items {
                        self.transaction_repo
                            .insert_item(
                                &mut *tx,
                                transaction.id,
                                item.product_id,
                                item.quantity,
                                item.unit_price,
                                pricing::line_total(item.quantity, item.unit_price),
                            )
                            .await?;
                    }
                    tx.commit().await?;
                    break transaction;
                }
                // Outra criação levou o número; tenta a sequência de novo.
                Err(AppError::CodeAlreadyExists(_)) if attempt < CODE_RETRIES => {
                    tx.rollback().await?;
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        let items = self
            .transaction_repo
            .list_items(&self.pool, transaction.id)
            .await?;

        self.notifier
            .publish(ResourceKind::Transaction, "created", Some(transaction.id));

        Ok(TransactionDetail { transaction, items })
    }

    pub async fn get(&self, id: Uuid) -> Result<TransactionDetail, AppError> {
        let transaction = self
            .transaction_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;
        let items = self.transaction_repo.list_items(&self.pool, id).await?;
        Ok(TransactionDetail { transaction, items })
    }

    pub async fn list(&self, params: &TransactionListParams) -> Result<Vec<Transaction>, AppError> {
        self.transaction_repo.list(params).await
    }

    /// Edição de rascunho: contraparte, observações e/ou itens. Trocar os
    /// itens recalcula os totais; fora de DRAFT nada é editável.
    pub async fn update_draft(
        &self,
        id: Uuid,
        payload: &UpdateDraftPayload,
    ) -> Result<TransactionDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .transaction_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;
        if current.status != TransactionStatus::Draft {
            return Err(AppError::InvalidStatusTransition {
                from: current.status,
                action: "editar",
            });
        }

        let totals = match &payload.items {
            Some(items) => {
                let lines = self.validate_items(items).await?;
                let totals = pricing::compute_totals(&lines, self.tax_rate);

                self.transaction_repo.delete_items(&mut *tx, id).await?;
                for item in items {
                    self.transaction_repo
                        .insert_item(
                            &mut *tx,
                            id,
                            item.product_id,
                            item.quantity,
                            item.unit_price,
                            pricing::line_total(item.quantity, item.unit_price),
                        )
                        .await?;
                }
                Some((totals.subtotal, totals.tax_amount, totals.total_amount))
            }
            None => None,
        };

        let transaction = self
            .transaction_repo
            .update_draft(
                &mut *tx,
                id,
                payload.counterparty_name.as_deref(),
                payload.notes.as_deref(),
                totals,
            )
            .await?;
        let items = self.transaction_repo.list_items(&mut *tx, id).await?;

        tx.commit().await?;

        self.notifier
            .publish(ResourceKind::Transaction, "updated", Some(id));

        Ok(TransactionDetail { transaction, items })
    }

    /// DRAFT -> CONFIRMED. Sem efeito de estoque; usado principalmente em
    /// pedidos de compra aguardando recebimento.
    pub async fn confirm(&self, id: Uuid, user: &User) -> Result<Transaction, AppError> {
        match self
            .transaction_repo
            .mark_confirmed(&self.pool, id, user.id)
            .await?
        {
            Some(transaction) => {
                self.notifier
                    .publish(ResourceKind::Transaction, "confirmed", Some(id));
                Ok(transaction)
            }
            None => Err(self.transition_conflict(id, "confirmar").await?),
        }
    }

    /// DRAFT/CONFIRMED -> COMPLETED. Um movimento de estoque por item,
    /// tudo na mesma transação de banco: se qualquer baixa falhar por falta
    /// de estoque, nenhuma linha é alterada e o status não muda.
    pub async fn complete(&self, id: Uuid, user: &User) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        // O UPDATE condicional vem primeiro: quem perder a corrida não
        // aplica movimento nenhum.
        let Some(transaction) = self.transaction_repo.mark_completed(&mut *tx, id).await? else {
            // Reusa a conexão da transação aberta para diagnosticar o conflito
            let status = self
                .transaction_repo
                .status_of(&mut *tx, id)
                .await?
                .ok_or(AppError::TransactionNotFound)?;
            return Err(AppError::InvalidStatusTransition {
                from: status,
                action: "concluir",
            });
        };

        let items = self.transaction_repo.list_items(&mut *tx, id).await?;
        for item in &items {
            let (movement_type, delta) = match transaction.kind {
                TransactionKind::Sale => (MovementType::Sale, -item.quantity),
                TransactionKind::Purchase => (MovementType::Purchase, item.quantity),
            };
            self.stock_service
                .apply_movement(
                    &mut tx,
                    item.product_id,
                    movement_type,
                    delta,
                    user.id,
                    Some(&transaction.code),
                )
                .await?;
        }

        tx.commit().await?;

        self.notifier
            .publish(ResourceKind::Transaction, "completed", Some(id));
        self.notifier.publish(ResourceKind::Inventory, "changed", None);
        self.notifier.publish(ResourceKind::Dashboard, "refresh", None);

        Ok(transaction)
    }

    /// DRAFT/CONFIRMED -> CANCELED. Transação concluída nunca é cancelada:
    /// o caminho é um ajuste manual compensatório, que deixa rastro.
    pub async fn cancel(&self, id: Uuid) -> Result<Transaction, AppError> {
        match self.transaction_repo.mark_canceled(&self.pool, id).await? {
            Some(transaction) => {
                self.notifier
                    .publish(ResourceKind::Transaction, "canceled", Some(id));
                Ok(transaction)
            }
            None => Err(self.transition_conflict(id, "cancelar").await?),
        }
    }

    /// Exclusão física, permitida só em DRAFT (ainda não há estoque nem
    /// auditoria). Itens primeiro, depois o cabeçalho, na mesma transação.
    pub async fn delete_draft(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .transaction_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;
        if current.status != TransactionStatus::Draft {
            return Err(AppError::InvalidStatusTransition {
                from: current.status,
                action: "excluir",
            });
        }

        self.transaction_repo.delete_items(&mut *tx, id).await?;
        self.transaction_repo.delete(&mut *tx, id).await?;

        tx.commit().await?;

        self.notifier
            .publish(ResourceKind::Transaction, "deleted", Some(id));

        Ok(())
    }

    // Monta o erro de conflito de uma transição que não encontrou a linha:
    // ou a transação não existe, ou o status atual não permite a ação.
    async fn transition_conflict(
        &self,
        id: Uuid,
        action: &'static str,
    ) -> Result<AppError, AppError> {
        let status = self
            .transaction_repo
            .status_of(&self.pool, id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;
        Ok(AppError::InvalidStatusTransition {
            from: status,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_format_is_year_scoped() {
        assert_eq!(format_code(TransactionKind::Sale, 2026, 42), "VND-2026-0042");
        assert_eq!(format_code(TransactionKind::Purchase, 2026, 7), "CMP-2026-0007");
        // Sequências longas não são truncadas
        assert_eq!(format_code(TransactionKind::Sale, 2026, 12345), "VND-2026-12345");
    }

    #[test]
    fn prefix_matches_format() {
        let code = format_code(TransactionKind::Sale, 2026, 1);
        assert!(code.starts_with(&code_prefix(TransactionKind::Sale, 2026)));
        let code = format_code(TransactionKind::Purchase, 2026, 1);
        assert!(code.starts_with(&code_prefix(TransactionKind::Purchase, 2026)));
    }
}
