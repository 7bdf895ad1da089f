//! Handlers for the `/categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dulpromax_core::catalog::{ensure_category_unreferenced, ensure_unique};
use dulpromax_core::error::CoreError;
use dulpromax_core::types::DbId;
use dulpromax_db::models::category::{Category, CreateCategory, UpdateCategory};

use crate::error::AppResult;
use crate::query::ActiveOnlyParams;
use crate::state::AppState;

fn not_found(id: DbId) -> CoreError {
    CoreError::not_found("Category", id)
}

/// GET /categories
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActiveOnlyParams>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.categories.list(params.active_only).await?;
    Ok(Json(categories))
}

/// GET /categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Category>> {
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    input.ensure_valid()?;
    let holder = state.categories.find_id_by_slug(&input.slug).await?;
    ensure_unique("category", "slug", &input.slug, holder, None)?;

    let category = state.categories.create(&input).await?;
    tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    input.ensure_valid()?;
    if state.categories.find_by_id(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    if let Some(slug) = &input.slug {
        let holder = state.categories.find_id_by_slug(slug).await?;
        ensure_unique("category", "slug", slug, holder, Some(id))?;
    }

    let category = state
        .categories
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// DELETE /categories/{id}
///
/// Refused while any product still references the category.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.categories.find_by_id(id).await?.is_none() {
        return Err(not_found(id).into());
    }
    let product_count = state.products.count_by_category(id).await?;
    ensure_category_unreferenced(id, product_count)?;

    if state.categories.delete(id).await? {
        tracing::info!(category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}
