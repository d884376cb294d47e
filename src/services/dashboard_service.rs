// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::{ReportRepository, StockRepository},
    models::{inventory::LowStockEntry, report::DashboardStats},
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct DashboardService {
    report_repo: ReportRepository,
    stock_repo: StockRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(report_repo: ReportRepository, stock_repo: StockRepository, pool: PgPool) -> Self {
        Self {
            report_repo,
            stock_repo,
            pool,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        self.report_repo.dashboard_stats(&self.pool).await
    }

    pub async fn low_stock_alerts(&self) -> Result<Vec<LowStockEntry>, AppError> {
        self.stock_repo.low_stock(None).await
    }
}
