// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Catalog ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::deactivate_product,

        // --- Inventory ---
        handlers::inventory::adjust_stock,
        handlers::inventory::list_movements,
        handlers::inventory::low_stock,

        // --- Transactions ---
        handlers::transactions::create_transaction,
        handlers::transactions::list_transactions,
        handlers::transactions::get_transaction,
        handlers::transactions::update_draft,
        handlers::transactions::confirm_transaction,
        handlers::transactions::complete_transaction,
        handlers::transactions::cancel_transaction,
        handlers::transactions::delete_transaction,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::low_stock_alerts,

        // --- Reports ---
        handlers::reports::sales_report,
        handlers::reports::purchases_report,
        handlers::reports::inventory_report,
        handlers::reports::profit_report,
        handlers::reports::activity_report,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::deactivate_user,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::RefreshPayload,
            models::auth::LogoutPayload,
            models::auth::TokenPair,
            models::auth::LoginResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,

            // --- Catalog ---
            models::product::Product,
            models::product::ProductWithStock,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,

            // --- Inventory ---
            models::inventory::MovementType,
            models::inventory::Stock,
            models::inventory::StockMovement,
            models::inventory::StockMovementEntry,
            models::inventory::AdjustmentKind,
            models::inventory::AdjustStockPayload,
            models::inventory::NewBalanceResponse,
            models::inventory::LowStockEntry,

            // --- Transactions ---
            models::transaction::TransactionKind,
            models::transaction::TransactionStatus,
            models::transaction::Transaction,
            models::transaction::TransactionItem,
            models::transaction::TransactionItemEntry,
            models::transaction::TransactionDetail,
            models::transaction::NewTransactionItemPayload,
            models::transaction::CreateTransactionPayload,
            models::transaction::UpdateDraftPayload,

            // --- Reports ---
            models::report::DashboardStats,
            models::report::SalesReportRow,
            models::report::PurchasesReportRow,
            models::report::InventoryReportRow,
            models::report::ProfitReportRow,
            models::report::ActivityEntry,

            // --- Events ---
            models::event::ResourceKind,
            models::event::ChangeEvent,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e sessões"),
        (name = "Catalog", description = "Catálogo de produtos e peças"),
        (name = "Inventory", description = "Razão de estoque e ajustes"),
        (name = "Transactions", description = "Vendas e compras (ciclo de vida)"),
        (name = "Dashboard", description = "Indicadores gerenciais"),
        (name = "Reports", description = "Relatórios"),
        (name = "Users", description = "Gestão de usuários")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
