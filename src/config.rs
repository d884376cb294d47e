// src/config.rs

use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        ProductRepository, ReportRepository, SessionRepository, StockRepository,
        TransactionRepository, UserRepository,
    },
    services::{
        auth::AuthService, dashboard_service::DashboardService, document_service::DocumentService,
        notifier::Notifier, product_service::ProductService, report_service::ReportService,
        stock_service::StockService, transaction_service::TransactionService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação. A pool
// mora aqui e desce explicitamente para os repositórios; não existe
// singleton global de conexão.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub tax_rate: Decimal,
    pub notifier: Notifier,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub stock_service: StockService,
    pub transaction_service: TransactionService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Alíquota sobre o subtotal (fração, ex: "0.05" = 5%). Sem a
        // variável, rascunhos saem com imposto zero.
        let tax_rate = env::var("TAX_RATE")
            .ok()
            .and_then(|value| value.parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO);

        let company_name =
            env::var("COMPANY_NAME").unwrap_or_else(|_| "Oficina".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let notifier = Notifier::new();

        let user_repo = UserRepository::new(db_pool.clone());
        let session_repo = SessionRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let stock_repo = StockRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            session_repo,
            jwt_secret.clone(),
            db_pool.clone(),
            notifier.clone(),
        );
        let stock_service =
            StockService::new(stock_repo.clone(), db_pool.clone(), notifier.clone());
        let product_service = ProductService::new(
            product_repo.clone(),
            stock_service.clone(),
            db_pool.clone(),
            notifier.clone(),
        );
        let transaction_service = TransactionService::new(
            transaction_repo.clone(),
            product_repo,
            stock_service.clone(),
            db_pool.clone(),
            tax_rate,
            notifier.clone(),
        );
        let dashboard_service =
            DashboardService::new(report_repo.clone(), stock_repo, db_pool.clone());
        let report_service = ReportService::new(report_repo);
        let document_service =
            DocumentService::new(transaction_repo, db_pool.clone(), company_name);

        Ok(Self {
            db_pool,
            jwt_secret,
            tax_rate,
            notifier,
            auth_service,
            product_service,
            stock_service,
            transaction_service,
            dashboard_service,
            report_service,
            document_service,
        })
    }
}
