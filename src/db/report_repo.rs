// src/db/report_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::report::{
        ActivityEntry, DashboardStats, InventoryReportRow, ProfitReportRow, PurchasesReportRow,
        SalesReportRow,
    },
};

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Resumo do painel. As contagens rodam dentro de uma transação para um
    // snapshot consistente dos dados.
    pub async fn dashboard_stats<'e, E>(&self, executor: E) -> Result<DashboardStats, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let products_active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active")
                .fetch_one(&mut *tx)
                .await?;

        let low_stock_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM stock s
            JOIN products p ON p.id = s.product_id
            WHERE p.is_active AND s.quantity <= p.min_stock_level
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let out_of_stock_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM stock s
            JOIN products p ON p.id = s.product_id
            WHERE p.is_active AND s.quantity = 0
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let sales_today: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM transactions
            WHERE kind = 'SALE' AND status = 'COMPLETED'
              AND completed_at::date = CURRENT_DATE
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let purchases_today: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM transactions
            WHERE kind = 'PURCHASE' AND status = 'COMPLETED'
              AND completed_at::date = CURRENT_DATE
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let drafts_open: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE status = 'DRAFT'")
                .fetch_one(&mut *tx)
                .await?;

        let movements_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_movements WHERE created_at::date = CURRENT_DATE",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardStats {
            products_active,
            low_stock_count,
            out_of_stock_count,
            sales_today,
            purchases_today,
            drafts_open,
            movements_today,
        })
    }

    pub async fn sales_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<SalesReportRow>, AppError> {
        let rows = sqlx::query_as::<_, SalesReportRow>(
            r#"
            SELECT completed_at::date AS day,
                   COUNT(*) AS transactions,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM transactions
            WHERE kind = 'SALE' AND status = 'COMPLETED' AND completed_at IS NOT NULL
              AND ($1::DATE IS NULL OR completed_at::date >= $1)
              AND ($2::DATE IS NULL OR completed_at::date <= $2)
            GROUP BY day
            ORDER BY day DESC
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn purchases_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<PurchasesReportRow>, AppError> {
        let rows = sqlx::query_as::<_, PurchasesReportRow>(
            r#"
            SELECT completed_at::date AS day,
                   COUNT(*) AS transactions,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM transactions
            WHERE kind = 'PURCHASE' AND status = 'COMPLETED' AND completed_at IS NOT NULL
              AND ($1::DATE IS NULL OR completed_at::date >= $1)
              AND ($2::DATE IS NULL OR completed_at::date <= $2)
            GROUP BY day
            ORDER BY day DESC
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn inventory_report(&self, limit: i64) -> Result<Vec<InventoryReportRow>, AppError> {
        let rows = sqlx::query_as::<_, InventoryReportRow>(
            r#"
            SELECT p.id AS product_id, p.sku, p.name, s.quantity, p.min_stock_level,
                   (s.quantity * p.cost_price) AS stock_value
            FROM products p
            JOIN stock s ON s.product_id = p.id
            WHERE p.is_active
            ORDER BY p.name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Lucro bruto por produto: receita das vendas concluídas menos o custo
    // de catálogo atual.
    pub async fn profit_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<ProfitReportRow>, AppError> {
        let rows = sqlx::query_as::<_, ProfitReportRow>(
            r#"
            SELECT p.id AS product_id, p.sku, p.name,
                   COALESCE(SUM(i.quantity), 0)::BIGINT AS quantity_sold,
                   COALESCE(SUM(i.line_total), 0) AS revenue,
                   COALESCE(SUM(i.quantity * p.cost_price), 0) AS cost,
                   COALESCE(SUM(i.line_total - i.quantity * p.cost_price), 0) AS profit
            FROM transaction_items i
            JOIN transactions t ON t.id = i.transaction_id
            JOIN products p ON p.id = i.product_id
            WHERE t.kind = 'SALE' AND t.status = 'COMPLETED'
              AND ($1::DATE IS NULL OR t.completed_at::date >= $1)
              AND ($2::DATE IS NULL OR t.completed_at::date <= $2)
            GROUP BY p.id, p.sku, p.name
            ORDER BY profit DESC
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Linha do tempo recente: movimentos de estoque e transações juntos.
    pub async fn activity_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<ActivityEntry>, AppError> {
        let rows = sqlx::query_as::<_, ActivityEntry>(
            r#"
            SELECT m.created_at AS happened_at,
                   'movement' AS kind,
                   p.name || ': ' || m.delta::TEXT AS description,
                   u.full_name AS performed_by
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            JOIN users u ON u.id = m.performed_by
            WHERE ($1::DATE IS NULL OR m.created_at::date >= $1)
              AND ($2::DATE IS NULL OR m.created_at::date <= $2)
            UNION ALL
            SELECT t.updated_at AS happened_at,
                   'transaction' AS kind,
                   t.code || ' (' || t.status::TEXT || ')' AS description,
                   u.full_name AS performed_by
            FROM transactions t
            JOIN users u ON u.id = t.created_by
            WHERE ($1::DATE IS NULL OR t.updated_at::date >= $1)
              AND ($2::DATE IS NULL OR t.updated_at::date <= $2)
            ORDER BY happened_at DESC
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
