// src/handlers/products.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManageCatalog, RequirePermission},
    },
    models::product::{
        CreateProductPayload, Product, ProductListParams, ProductWithStock, UpdateProductPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catalog",
    request_body = CreateProductPayload,
    security(("api_jwt" = [])),
    responses(
        (status = 201, description = "Produto criado", body = ProductWithStock),
        (status = 409, description = "SKU já existe")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermManageCatalog>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<(StatusCode, Json<ProductWithStock>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.product_service.create(&payload, &user).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    params(ProductListParams),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Lista de produtos com saldo", body = [ProductWithStock]))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<ProductWithStock>>, AppError> {
    let products = app_state.product_service.list(&params).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Produto", body = ProductWithStock),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductWithStock>, AppError> {
    let product = app_state.product_service.get(id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    security(("api_jwt" = [])),
    responses((status = 200, description = "Produto atualizado", body = Product))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageCatalog>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.product_service.update(id, &payload).await?;
    Ok(Json(product))
}

// DELETE é desativação lógica: produtos referenciados por transações nunca
// somem do histórico.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = [])),
    responses((status = 200, description = "Produto desativado", body = Product))
)]
pub async fn deactivate_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageCatalog>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = app_state.product_service.deactivate(id).await?;
    Ok(Json(product))
}
