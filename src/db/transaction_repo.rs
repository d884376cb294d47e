// src/db/transaction_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::transaction::{
        Transaction, TransactionItem, TransactionItemEntry, TransactionKind, TransactionListParams,
        TransactionStatus,
    },
};

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        let transaction =
            sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(transaction)
    }

    // Trava o cabeçalho durante edição/exclusão de rascunho.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction =
            sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(transaction)
    }

    pub async fn status_of<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<TransactionStatus>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let status = sqlx::query_scalar::<_, TransactionStatus>(
            "SELECT status FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(status)
    }

    pub async fn list(&self, params: &TransactionListParams) -> Result<Vec<Transaction>, AppError> {
        let limit = params.limit.unwrap_or(50).clamp(1, 500);
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::transaction_kind IS NULL OR kind = $1)
              AND ($2::transaction_status IS NULL OR status = $2)
              AND ($3::DATE IS NULL OR created_at::date >= $3)
              AND ($4::DATE IS NULL OR created_at::date <= $4)
            ORDER BY created_at DESC
            LIMIT $5
            "#,
        )
        .bind(params.kind)
        .bind(params.status)
        .bind(params.from)
        .bind(params.to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(transactions)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        transaction_id: Uuid,
    ) -> Result<Vec<TransactionItemEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, TransactionItemEntry>(
            r#"
            SELECT i.id, i.transaction_id, i.product_id, p.name AS product_name,
                   p.sku, i.quantity, i.unit_price, i.line_total
            FROM transaction_items i
            JOIN products p ON p.id = i.product_id
            WHERE i.transaction_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    // Próximo número da sequência anual do prefixo ("VND-2026-", ...).
    // A unicidade real vem do índice único em `code`; corrida entre duas
    // criações é resolvida com retry no service.
    pub async fn next_sequence<'e, E>(&self, executor: E, prefix: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let next: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(SUBSTRING(code FROM LENGTH($1) + 1)::BIGINT), 0)
            FROM transactions
            WHERE code LIKE $1 || '%'
            "#,
        )
        .bind(prefix)
        .fetch_one(executor)
        .await?;
        Ok(next)
    }

    // ---
    // Escrita
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        code: &str,
        kind: TransactionKind,
        counterparty_name: &str,
        subtotal: Decimal,
        tax_amount: Decimal,
        total_amount: Decimal,
        created_by: Uuid,
        notes: Option<&str>,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (code, kind, counterparty_name, subtotal, tax_amount, total_amount, created_by, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(kind)
        .bind(counterparty_name)
        .bind(subtotal)
        .bind(tax_amount)
        .bind(total_amount)
        .bind(created_by)
        .bind(notes)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CodeAlreadyExists(code.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        transaction_id: Uuid,
        product_id: Uuid,
        quantity: i64,
        unit_price: Decimal,
        line_total: Decimal,
    ) -> Result<TransactionItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, TransactionItem>(
            r#"
            INSERT INTO transaction_items (transaction_id, product_id, quantity, unit_price, line_total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(transaction_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(line_total)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    // ---
    // Transições de status (compare-and-swap)
    // ---
    // O UPDATE condicional no status atual é o que impede duas transições
    // concorrentes de aplicarem estoque duas vezes: a perdedora não
    // encontra a linha e recebe None.

    pub async fn mark_confirmed<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        confirmed_by: Uuid,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET status = 'CONFIRMED', confirmed_by = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'DRAFT'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(confirmed_by)
        .fetch_optional(executor)
        .await?;
        Ok(transaction)
    }

    pub async fn mark_completed<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET status = 'COMPLETED', completed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status IN ('DRAFT', 'CONFIRMED')
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(transaction)
    }

    pub async fn mark_canceled<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET status = 'CANCELED', updated_at = NOW()
            WHERE id = $1 AND status IN ('DRAFT', 'CONFIRMED')
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(transaction)
    }

    // Atualiza cabeçalho de um rascunho (o service valida o status antes,
    // com a linha travada). Totais só mudam quando os itens mudam.
    pub async fn update_draft<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        counterparty_name: Option<&str>,
        notes: Option<&str>,
        totals: Option<(Decimal, Decimal, Decimal)>,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (subtotal, tax_amount, total_amount) = match totals {
            Some((s, t, tt)) => (Some(s), Some(t), Some(tt)),
            None => (None, None, None),
        };
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                counterparty_name = COALESCE($2, counterparty_name),
                notes = COALESCE($3, notes),
                subtotal = COALESCE($4, subtotal),
                tax_amount = COALESCE($5, tax_amount),
                total_amount = COALESCE($6, total_amount),
                updated_at = NOW()
            WHERE id = $1 AND status = 'DRAFT'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(counterparty_name)
        .bind(notes)
        .bind(subtotal)
        .bind(tax_amount)
        .bind(total_amount)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::TransactionNotFound)
    }

    pub async fn delete_items<'e, E>(
        &self,
        executor: E,
        transaction_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM transaction_items WHERE transaction_id = $1")
            .bind(transaction_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
