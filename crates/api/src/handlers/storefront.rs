//! Handlers for the `/api/productos` storefront registry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dulpromax_core::error::CoreError;
use dulpromax_core::pricing::SegmentPrices;
use dulpromax_core::types::DbId;
use dulpromax_db::models::storefront::{
    CreateStorefrontProduct, ProductLine, StorefrontProduct, UpdateStorefrontProduct,
};

use crate::error::AppResult;
use crate::query::StorefrontParams;
use crate::state::AppState;

fn not_found(id: DbId) -> CoreError {
    CoreError::not_found("Storefront product", id)
}

/// GET /api/productos
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StorefrontParams>,
) -> AppResult<Json<Vec<StorefrontProduct>>> {
    let line = params
        .categoria
        .as_deref()
        .map(str::parse::<ProductLine>)
        .transpose()?;
    Ok(Json(state.storefront.list(line).await?))
}

/// GET /api/productos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StorefrontProduct>> {
    let product = state
        .storefront
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// GET /api/productos/categoria/{categoria}
pub async fn list_by_line(
    State(state): State<AppState>,
    Path(categoria): Path<String>,
) -> AppResult<Json<Vec<StorefrontProduct>>> {
    let line: ProductLine = categoria.parse()?;
    Ok(Json(state.storefront.list(Some(line)).await?))
}

/// POST /api/productos
///
/// All four segment prices are derived from `base_price`.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStorefrontProduct>,
) -> AppResult<(StatusCode, Json<StorefrontProduct>)> {
    input.ensure_valid()?;
    let prices = SegmentPrices::derive(input.base_price)?;
    let product = state.storefront.create(&input, prices).await?;
    tracing::info!(
        product_id = product.id,
        product_line = %product.product_line,
        "Storefront product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/productos/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStorefrontProduct>,
) -> AppResult<Json<StorefrontProduct>> {
    input.ensure_valid()?;
    let product = state
        .storefront
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// DELETE /api/productos/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.storefront.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}
