pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod session_repo;
pub use session_repo::SessionRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
