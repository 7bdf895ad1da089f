//! Repository for the `categories` table.

use async_trait::async_trait;
use sqlx::PgPool;
use dulpromax_core::types::DbId;

use crate::error::{store_error, StoreResult};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::repositories::CategoryRepository;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, description, image_url, is_active, created_at, updated_at";

/// PostgreSQL-backed [`CategoryRepository`].
#[derive(Clone)]
pub struct PgCategoryRepo {
    pool: PgPool,
}

impl PgCategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepo {
    async fn list(&self, active_only: bool) -> StoreResult<Vec<Category>> {
        let query = if active_only {
            format!("SELECT {COLUMNS} FROM categories WHERE is_active = true ORDER BY name")
        } else {
            format!("SELECT {COLUMNS} FROM categories ORDER BY name")
        };
        sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn find_id_by_slug(&self, slug: &str) -> StoreResult<Option<DbId>> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    /// If `is_active` is `None` in the input, defaults to `true`.
    async fn create(&self, input: &CreateCategory) -> StoreResult<Category> {
        let query = format!(
            "INSERT INTO categories (name, slug, description, image_url, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn update(&self, id: DbId, input: &UpdateCategory) -> StoreResult<Option<Category>> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}
