// src/services/stock_service.rs

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::StockRepository,
    models::{
        auth::User,
        event::ResourceKind,
        inventory::{
            AdjustStockPayload, AdjustmentKind, LowStockEntry, MovementType, NewBalanceResponse,
            Stock, StockMovement, StockMovementEntry,
        },
    },
    services::notifier::Notifier,
};

// Converte o ajuste pedido em delta. `Set` calcula o delta necessário para
// chegar no alvo; ajustes sem efeito são rejeitados para não poluir a
// trilha de auditoria.
pub fn delta_for_adjustment(
    kind: AdjustmentKind,
    current: i64,
    quantity: i64,
) -> Result<i64, AppError> {
    let delta = match kind {
        AdjustmentKind::Add => quantity,
        AdjustmentKind::Remove => -quantity,
        AdjustmentKind::Set => quantity - current,
    };
    if delta == 0 {
        return Err(AppError::NoopAdjustment);
    }
    Ok(delta)
}

// O razão de estoque. Todo saldo muda por aqui: o par (saldo novo,
// movimento) é gravado dentro de uma única transação de banco, com a linha
// de estoque travada (FOR UPDATE). Nenhum lock em memória: com várias
// instâncias do servidor, o banco é o único ponto de serialização.
#[derive(Clone)]
pub struct StockService {
    stock_repo: StockRepository,
    pool: PgPool,
    notifier: Notifier,
}

impl StockService {
    pub fn new(stock_repo: StockRepository, pool: PgPool, notifier: Notifier) -> Self {
        Self {
            stock_repo,
            pool,
            notifier,
        }
    }

    /// Aplica um movimento dentro da transação do chamador. Para deltas
    /// negativos, o saldo resultante não pode ficar abaixo de zero: nesse
    /// caso nada é escrito e o erro carrega produto e falta.
    pub async fn apply_movement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        movement_type: MovementType,
        delta: i64,
        performed_by: Uuid,
        notes: Option<&str>,
    ) -> Result<StockMovement, AppError> {
        let stock = self
            .stock_repo
            .get_for_update(&mut **tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let new_balance = stock.quantity + delta;
        if new_balance < 0 {
            return Err(AppError::InsufficientStock {
                product: stock.product_name,
                requested: -delta,
                available: stock.quantity,
                shortfall: -new_balance,
            });
        }

        self.stock_repo
            .update_quantity(&mut **tx, product_id, new_balance)
            .await?;
        let movement = self
            .stock_repo
            .insert_movement(
                &mut **tx,
                product_id,
                movement_type,
                delta,
                new_balance,
                performed_by,
                notes,
            )
            .await?;

        Ok(movement)
    }

    /// Ajuste manual vindo do endpoint de inventário (add/remove/set).
    pub async fn adjust(
        &self,
        payload: &AdjustStockPayload,
        user: &User,
    ) -> Result<NewBalanceResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lê o saldo já com a linha travada; o apply_movement reusa o lock.
        let stock = self
            .stock_repo
            .get_for_update(&mut *tx, payload.product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let delta = delta_for_adjustment(payload.kind, stock.quantity, payload.quantity)?;

        let movement_type = match payload.reason.as_deref() {
            Some(r) if r.eq_ignore_ascii_case("correction") => MovementType::Correction,
            _ => MovementType::Adjustment,
        };
        let notes = payload.notes.as_deref().or(payload.reason.as_deref());

        let movement = self
            .apply_movement(
                &mut tx,
                payload.product_id,
                movement_type,
                delta,
                user.id,
                notes,
            )
            .await?;

        tx.commit().await?;

        self.notifier
            .publish(ResourceKind::Inventory, "adjusted", Some(payload.product_id));
        self.notifier.publish(ResourceKind::Dashboard, "refresh", None);

        Ok(NewBalanceResponse {
            product_id: payload.product_id,
            new_balance: movement.balance_after,
        })
    }

    /// Cria a linha de estoque de um produto novo (saldo zero), dentro da
    /// transação de criação do produto.
    pub async fn init_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
    ) -> Result<(), AppError> {
        self.stock_repo.create_for_product(&mut **tx, product_id).await
    }

    pub async fn get_stock(&self, product_id: Uuid) -> Result<Stock, AppError> {
        self.stock_repo
            .get_by_product(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn low_stock(&self, threshold: Option<i64>) -> Result<Vec<LowStockEntry>, AppError> {
        self.stock_repo.low_stock(threshold).await
    }

    pub async fn movements(
        &self,
        product_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> Result<Vec<StockMovementEntry>, AppError> {
        let limit = limit.unwrap_or(50).clamp(1, 500);
        self.stock_repo.list_movements(product_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_map_directly() {
        assert_eq!(delta_for_adjustment(AdjustmentKind::Add, 5, 3).unwrap(), 3);
        assert_eq!(delta_for_adjustment(AdjustmentKind::Remove, 5, 3).unwrap(), -3);
    }

    #[test]
    fn set_computes_the_difference() {
        assert_eq!(delta_for_adjustment(AdjustmentKind::Set, 5, 12).unwrap(), 7);
        assert_eq!(delta_for_adjustment(AdjustmentKind::Set, 12, 5).unwrap(), -7);
        assert_eq!(delta_for_adjustment(AdjustmentKind::Set, 5, 0).unwrap(), -5);
    }

    #[test]
    fn noop_adjustments_are_rejected() {
        assert!(matches!(
            delta_for_adjustment(AdjustmentKind::Set, 5, 5),
            Err(AppError::NoopAdjustment)
        ));
        assert!(matches!(
            delta_for_adjustment(AdjustmentKind::Add, 5, 0),
            Err(AppError::NoopAdjustment)
        ));
    }
}
