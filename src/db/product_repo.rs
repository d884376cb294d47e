// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{Product, ProductListParams, ProductWithStock},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn find_with_stock(&self, id: Uuid) -> Result<Option<ProductWithStock>, AppError> {
        let product = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT p.*, s.quantity
            FROM products p
            JOIN stock s ON s.product_id = p.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn list(&self, params: &ProductListParams) -> Result<Vec<ProductWithStock>, AppError> {
        let products = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT p.*, s.quantity
            FROM products p
            JOIN stock s ON s.product_id = p.id
            WHERE ($1::TEXT IS NULL OR p.name ILIKE '%' || $1 || '%' OR p.sku ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR p.category = $2)
              AND ($3::BOOL IS NULL OR p.is_active = $3)
            ORDER BY p.name ASC
            "#,
        )
        .bind(params.search.as_deref())
        .bind(params.category.as_deref())
        .bind(params.active)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---

    /// Cria um produto de catálogo. A linha de estoque correspondente é
    /// criada pelo StockService dentro da mesma transação.
    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        sku: &str,
        name: &str,
        category: Option<&str>,
        unit: &str,
        cost_price: Decimal,
        selling_price: Decimal,
        min_stock_level: i64,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (sku, name, category, unit, cost_price, selling_price, min_stock_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(sku)
        .bind(name)
        .bind(category)
        .bind(unit)
        .bind(cost_price)
        .bind(selling_price)
        .bind(min_stock_level)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists(sku.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        category: Option<&str>,
        unit: Option<&str>,
        cost_price: Option<Decimal>,
        selling_price: Option<Decimal>,
        min_stock_level: Option<i64>,
        is_active: Option<bool>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                unit = COALESCE($4, unit),
                cost_price = COALESCE($5, cost_price),
                selling_price = COALESCE($6, selling_price),
                min_stock_level = COALESCE($7, min_stock_level),
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(unit)
        .bind(cost_price)
        .bind(selling_price)
        .bind(min_stock_level)
        .bind(is_active)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ProductNotFound)
    }

    // Desativação lógica; o produto continua visível no histórico.
    pub async fn deactivate<'e, E>(&self, executor: E, id: Uuid) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ProductNotFound)
    }
}
