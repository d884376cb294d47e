//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve
    // iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Primeiro start: cria o OWNER inicial se a tabela estiver vazia
    if let Err(e) = app_state.auth_service.bootstrap_admin().await {
        tracing::warn!("Falha ao criar o usuário inicial: {}", e);
    }

    // Rotas públicas de autenticação + rotas protegidas do próprio /auth
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .merge(
            Router::new()
                .route("/logout", post(handlers::auth::logout))
                .route("/me", get(handlers::auth::get_me))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::deactivate_product),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let inventory_routes = Router::new()
        .route("/adjust", post(handlers::inventory::adjust_stock))
        .route("/movements", get(handlers::inventory::list_movements))
        .route("/low-stock", get(handlers::inventory::low_stock))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let transaction_routes = Router::new()
        .route(
            "/",
            post(handlers::transactions::create_transaction)
                .get(handlers::transactions::list_transactions),
        )
        .route(
            "/{id}",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_draft)
                .delete(handlers::transactions::delete_transaction),
        )
        .route("/{id}/confirm", patch(handlers::transactions::confirm_transaction))
        .route("/{id}/complete", patch(handlers::transactions::complete_transaction))
        .route("/{id}/cancel", patch(handlers::transactions::cancel_transaction))
        .route("/{id}/pdf", get(handlers::transactions::transaction_pdf))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .route("/low-stock-alerts", get(handlers::dashboard::low_stock_alerts))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let report_routes = Router::new()
        .route("/sales", get(handlers::reports::sales_report))
        .route("/purchases", get(handlers::reports::purchases_report))
        .route("/inventory", get(handlers::reports::inventory_report))
        .route("/profit", get(handlers::reports::profit_report))
        .route("/activity", get(handlers::reports::activity_report))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/{id}",
            put(handlers::users::update_user).delete(handlers::users::deactivate_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Stream de eventos (SSE) para o refresh reativo do cliente
    let event_routes = Router::new()
        .route("/", get(handlers::events::subscribe))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/products", product_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/transactions", transaction_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/users", user_routes)
        .nest("/api/events", event_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
