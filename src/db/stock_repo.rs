// src/db/stock_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{
        LowStockEntry, MovementType, Stock, StockForUpdate, StockMovement, StockMovementEntry,
    },
};

// Persistência do razão de estoque. A regra de negócio (validação de saldo,
// atomicidade do par saldo+movimento) mora no StockService; aqui ficam só
// as consultas.
#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_product(&self, product_id: Uuid) -> Result<Option<Stock>, AppError> {
        let stock = sqlx::query_as::<_, Stock>("SELECT * FROM stock WHERE product_id = $1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(stock)
    }

    // Trava a linha de estoque até o fim da transação do chamador. É o
    // ponto de serialização entre requisições concorrentes sobre o mesmo
    // produto.
    pub async fn get_for_update<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<StockForUpdate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, StockForUpdate>(
            r#"
            SELECT s.product_id, s.quantity, p.name AS product_name
            FROM stock s
            JOIN products p ON p.id = s.product_id
            WHERE s.product_id = $1
            FOR UPDATE OF s
            "#,
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    pub async fn create_for_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO stock (product_id, quantity) VALUES ($1, 0)")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn update_quantity<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        new_balance: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE stock SET quantity = $2, last_movement_at = NOW() WHERE product_id = $1",
        )
        .bind(product_id)
        .bind(new_balance)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        movement_type: MovementType,
        delta: i64,
        balance_after: i64,
        performed_by: Uuid,
        notes: Option<&str>,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (product_id, movement_type, delta, balance_after, performed_by, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(movement_type)
        .bind(delta)
        .bind(balance_after)
        .bind(performed_by)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    // Produtos no nível mínimo ou abaixo (ou abaixo do limite informado).
    // Esgotados (quantity = 0) vêm primeiro porque a ordenação é crescente
    // por saldo; o desempate por nome mantém a ordem estável.
    pub async fn low_stock(&self, threshold: Option<i64>) -> Result<Vec<LowStockEntry>, AppError> {
        let entries = sqlx::query_as::<_, LowStockEntry>(
            r#"
            SELECT p.id AS product_id, p.sku, p.name, s.quantity, p.min_stock_level
            FROM stock s
            JOIN products p ON p.id = s.product_id
            WHERE p.is_active AND s.quantity <= COALESCE($1::BIGINT, p.min_stock_level)
            ORDER BY s.quantity ASC, p.name ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn list_movements(
        &self,
        product_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<StockMovementEntry>, AppError> {
        let movements = sqlx::query_as::<_, StockMovementEntry>(
            r#"
            SELECT m.id, m.product_id, p.name AS product_name, m.movement_type,
                   m.delta, m.balance_after, m.notes, u.full_name AS performed_by_name,
                   m.created_at
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            JOIN users u ON u.id = m.performed_by
            WHERE ($1::UUID IS NULL OR m.product_id = $1)
            ORDER BY m.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
