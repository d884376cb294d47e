// src/services/report_service.rs

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::report::{
        ActivityEntry, InventoryReportRow, ProfitReportRow, PurchasesReportRow, ReportParams,
        SalesReportRow,
    },
};

const DEFAULT_LIMIT: i64 = 30;
const MAX_LIMIT: i64 = 365;

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    fn limit(params: &ReportParams) -> i64 {
        params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub async fn sales(&self, params: &ReportParams) -> Result<Vec<SalesReportRow>, AppError> {
        self.repo
            .sales_report(params.from, params.to, Self::limit(params))
            .await
    }

    pub async fn purchases(
        &self,
        params: &ReportParams,
    ) -> Result<Vec<PurchasesReportRow>, AppError> {
        self.repo
            .purchases_report(params.from, params.to, Self::limit(params))
            .await
    }

    pub async fn inventory(
        &self,
        params: &ReportParams,
    ) -> Result<Vec<InventoryReportRow>, AppError> {
        self.repo.inventory_report(Self::limit(params)).await
    }

    pub async fn profit(&self, params: &ReportParams) -> Result<Vec<ProfitReportRow>, AppError> {
        self.repo
            .profit_report(params.from, params.to, Self::limit(params))
            .await
    }

    pub async fn activity(&self, params: &ReportParams) -> Result<Vec<ActivityEntry>, AppError> {
        self.repo
            .activity_report(params.from, params.to, Self::limit(params))
            .await
    }
}
