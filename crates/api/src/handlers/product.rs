//! Handlers for the `/products` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dulpromax_core::catalog::ensure_unique;
use dulpromax_core::error::CoreError;
use dulpromax_core::types::DbId;
use dulpromax_db::models::category::{Category, CategorySummary};
use dulpromax_db::models::product::{
    CreateProduct, Product, ProductList, ProductWithCategory, UpdateProduct,
};

use crate::error::AppResult;
use crate::query::{ProductListParams, StockParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the category a product is being pointed at; unknown ids are a
/// validation error, not a 404.
async fn require_category(state: &AppState, category_id: DbId) -> AppResult<Category> {
    let category = state.categories.find_by_id(category_id).await?;
    category.ok_or_else(|| {
        CoreError::Validation(format!("category {category_id} does not exist")).into()
    })
}

/// Reject slug or SKU values already held by another product.
async fn ensure_unique_keys(
    state: &AppState,
    slug: Option<&str>,
    sku: Option<&str>,
    self_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(slug) = slug {
        let holder = state.products.find_id_by_slug(slug).await?;
        ensure_unique("product", "slug", slug, holder, self_id)?;
    }
    if let Some(sku) = sku {
        let holder = state.products.find_id_by_sku(sku).await?;
        ensure_unique("product", "SKU", sku, holder, self_id)?;
    }
    Ok(())
}

async fn with_category(state: &AppState, product: Product) -> AppResult<ProductWithCategory> {
    let category = match product.category_id {
        Some(id) => state.categories.find_by_id(id).await?,
        None => None,
    };
    Ok(ProductWithCategory {
        category: category.as_ref().map(CategorySummary::from),
        product,
    })
}

fn not_found(id: DbId) -> CoreError {
    CoreError::not_found("Product", id)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /products
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<ProductList>> {
    let (filter, page) = params.into_parts()?;
    let result = state.products.list(&filter, page).await?;
    Ok(Json(ProductList::new(result, page)))
}

/// GET /products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProductWithCategory>> {
    let product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// POST /products
///
/// Segment prices not given explicitly are derived from `base_price`.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<ProductWithCategory>)> {
    input.ensure_valid()?;
    let prices = input.resolve_segment_prices()?;
    ensure_unique_keys(&state, Some(&input.slug), input.sku.as_deref(), None).await?;
    let category = match input.category_id {
        Some(id) => Some(require_category(&state, id).await?),
        None => None,
    };

    let product = state.products.create(&input, prices).await?;
    tracing::info!(
        product_id = product.id,
        slug = %product.slug,
        price_distributor = product.price_distributor,
        "Product created"
    );

    let body = ProductWithCategory {
        category: category.as_ref().map(CategorySummary::from),
        product,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /products/{id}
///
/// Stored segment prices change only when sent explicitly.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<ProductWithCategory>> {
    input.ensure_valid()?;
    if state.products.find_by_id(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    ensure_unique_keys(&state, input.slug.as_deref(), input.sku.as_deref(), Some(id)).await?;
    if let Some(category_id) = input.category_id {
        require_category(&state, category_id).await?;
    }

    let product = state
        .products
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(with_category(&state, product).await?))
}

/// PATCH /products/{id}/stock?new_stock=N
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<StockParams>,
) -> AppResult<Json<ProductWithCategory>> {
    if params.new_stock < 0 {
        return Err(CoreError::Validation(format!(
            "new_stock must not be negative, got {}",
            params.new_stock
        ))
        .into());
    }

    let product = state
        .products
        .update_stock(id, params.new_stock)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(product_id = id, stock = params.new_stock, "Product stock updated");
    Ok(Json(with_category(&state, product).await?))
}

/// DELETE /products/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.products.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}
