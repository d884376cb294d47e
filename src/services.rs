pub mod auth;
pub mod dashboard_service;
pub mod document_service;
pub mod notifier;
pub mod pricing;
pub mod product_service;
pub mod report_service;
pub mod stock_service;
pub mod transaction_service;
