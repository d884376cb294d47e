// src/services/product_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::{
        auth::User,
        event::ResourceKind,
        inventory::MovementType,
        product::{CreateProductPayload, Product, ProductListParams, ProductWithStock, UpdateProductPayload},
    },
    services::{notifier::Notifier, stock_service::StockService},
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    stock_service: StockService,
    pool: PgPool,
    notifier: Notifier,
}

impl ProductService {
    pub fn new(
        product_repo: ProductRepository,
        stock_service: StockService,
        pool: PgPool,
        notifier: Notifier,
    ) -> Self {
        Self {
            product_repo,
            stock_service,
            pool,
            notifier,
        }
    }

    /// Cria o produto junto com a sua linha de estoque (saldo zero) e, se
    /// houver carga inicial, o movimento INITIAL_STOCK, tudo em uma única
    /// transação.
    pub async fn create(
        &self,
        payload: &CreateProductPayload,
        user: &User,
    ) -> Result<ProductWithStock, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .create(
                &mut *tx,
                &payload.sku,
                &payload.name,
                payload.category.as_deref(),
                &payload.unit,
                payload.cost_price,
                payload.selling_price,
                payload.min_stock_level,
            )
            .await?;

        self.stock_service.init_product(&mut tx, product.id).await?;

        let mut quantity = 0;
        if payload.initial_stock > 0 {
            let movement = self
                .stock_service
                .apply_movement(
                    &mut tx,
                    product.id,
                    MovementType::InitialStock,
                    payload.initial_stock,
                    user.id,
                    Some("Carga inicial"),
                )
                .await?;
            quantity = movement.balance_after;
        }

        tx.commit().await?;

        self.notifier
            .publish(ResourceKind::Product, "created", Some(product.id));

        Ok(ProductWithStock { product, quantity })
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductWithStock, AppError> {
        self.product_repo
            .find_with_stock(id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn list(&self, params: &ProductListParams) -> Result<Vec<ProductWithStock>, AppError> {
        self.product_repo.list(params).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        let product = self
            .product_repo
            .update(
                &self.pool,
                id,
                payload.name.as_deref(),
                payload.category.as_deref(),
                payload.unit.as_deref(),
                payload.cost_price,
                payload.selling_price,
                payload.min_stock_level,
                payload.is_active,
            )
            .await?;

        self.notifier
            .publish(ResourceKind::Product, "updated", Some(id));

        Ok(product)
    }

    /// Desativação lógica. O histórico de transações e movimentos continua
    /// apontando para o produto.
    pub async fn deactivate(&self, id: Uuid) -> Result<Product, AppError> {
        let product = self.product_repo.deactivate(&self.pool, id).await?;

        self.notifier
            .publish(ResourceKind::Product, "deactivated", Some(id));

        Ok(product)
    }
}
