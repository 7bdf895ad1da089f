//! Repository for the `products` table.
//!
//! Reads join `categories` so each product carries a category summary.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use dulpromax_core::pagination::PageRequest;
use dulpromax_core::pricing::SegmentPrices;
use dulpromax_core::product_filter::ProductFilter;
use dulpromax_core::types::DbId;

use crate::error::{store_error, StoreResult};
use crate::models::category::CategorySummary;
use crate::models::product::{
    CreateProduct, Product, ProductPage, ProductWithCategory, UpdateProduct,
};
use crate::repositories::ProductRepository;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, slug, sku, category_id, base_price, \
    price_health_store, price_distributor, price_gym, price_cafeteria, weight_grams, \
    dimensions_cm, ingredients, allergens, nutritional_info, main_image_url, \
    gallery_images, stock_quantity, min_stock_alert, min_order_quantity, \
    max_order_quantity, is_active, is_featured, tags, created_at, updated_at";

/// Product columns plus the joined category summary, without a `WHERE`.
const SELECT_WITH_CATEGORY: &str = "SELECT p.id, p.name, p.description, p.slug, p.sku, \
    p.category_id, p.base_price, p.price_health_store, p.price_distributor, p.price_gym, \
    p.price_cafeteria, p.weight_grams, p.dimensions_cm, p.ingredients, p.allergens, \
    p.nutritional_info, p.main_image_url, p.gallery_images, p.stock_quantity, \
    p.min_stock_alert, p.min_order_quantity, p.max_order_quantity, p.is_active, \
    p.is_featured, p.tags, p.created_at, p.updated_at, c.name AS category_name, \
    c.slug AS category_slug \
    FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// Row shape of [`SELECT_WITH_CATEGORY`].
#[derive(FromRow)]
struct ProductCategoryRow {
    #[sqlx(flatten)]
    product: Product,
    category_name: Option<String>,
    category_slug: Option<String>,
}

impl From<ProductCategoryRow> for ProductWithCategory {
    fn from(row: ProductCategoryRow) -> Self {
        let category = match (row.product.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategorySummary { id, name, slug }),
            _ => None,
        };
        ProductWithCategory {
            product: row.product,
            category,
        }
    }
}

/// Append the `WHERE` clause for `filter`. Aliases `products` as `p`.
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    query.push(" WHERE TRUE");
    if filter.active_only {
        query.push(" AND p.is_active = TRUE");
    }
    if filter.featured_only {
        query.push(" AND p.is_featured = TRUE");
    }
    if let Some(category_id) = filter.category_id {
        query.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(pattern) = filter.search_pattern() {
        query
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(min_price) = filter.min_price {
        query.push(" AND p.price_distributor >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        query.push(" AND p.price_distributor <= ").push_bind(max_price);
    }
}

/// PostgreSQL-backed [`ProductRepository`].
#[derive(Clone)]
pub struct PgProductRepo {
    pool: PgPool,
}

impl PgProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepo {
    async fn list(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<ProductPage> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        let mut page_query = QueryBuilder::<Postgres>::new(SELECT_WITH_CATEGORY);
        push_filters(&mut page_query, filter);
        page_query
            .push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = page_query
            .build_query_as::<ProductCategoryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        tracing::debug!(total, returned = rows.len(), page = page.page, "Listed products");

        Ok(ProductPage {
            products: rows.into_iter().map(ProductWithCategory::from).collect(),
            total,
        })
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<ProductWithCategory>> {
        let query = format!("{SELECT_WITH_CATEGORY} WHERE p.id = $1");
        let row = sqlx::query_as::<_, ProductCategoryRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(row.map(ProductWithCategory::from))
    }

    async fn find_id_by_slug(&self, slug: &str) -> StoreResult<Option<DbId>> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM products WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn find_id_by_sku(&self, sku: &str) -> StoreResult<Option<DbId>> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM products WHERE sku = $1")
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn count_by_category(&self, category_id: DbId) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    /// Omitted stock, order and flag fields fall back to the column defaults.
    async fn create(&self, input: &CreateProduct, prices: SegmentPrices) -> StoreResult<Product> {
        let query = format!(
            "INSERT INTO products (
                name, description, slug, sku, category_id, base_price,
                price_health_store, price_distributor, price_gym, price_cafeteria,
                weight_grams, ingredients, allergens, nutritional_info, main_image_url,
                gallery_images, stock_quantity, min_stock_alert, min_order_quantity,
                max_order_quantity, is_active, is_featured, tags, dimensions_cm)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                COALESCE($17, 0), COALESCE($18, 10), COALESCE($19, 1), $20,
                COALESCE($21, true), COALESCE($22, false), $23, $24)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.slug)
            .bind(&input.sku)
            .bind(input.category_id)
            .bind(input.base_price)
            .bind(prices.health_store)
            .bind(prices.distributor)
            .bind(prices.gym)
            .bind(prices.cafeteria)
            .bind(input.weight_grams)
            .bind(&input.ingredients)
            .bind(&input.allergens)
            .bind(&input.nutritional_info)
            .bind(&input.main_image_url)
            .bind(&input.gallery_images)
            .bind(input.stock_quantity)
            .bind(input.min_stock_alert)
            .bind(input.min_order_quantity)
            .bind(input.max_order_quantity)
            .bind(input.is_active)
            .bind(input.is_featured)
            .bind(&input.tags)
            .bind(&input.dimensions_cm)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn update(&self, id: DbId, input: &UpdateProduct) -> StoreResult<Option<Product>> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                slug = COALESCE($4, slug),
                sku = COALESCE($5, sku),
                category_id = COALESCE($6, category_id),
                base_price = COALESCE($7, base_price),
                price_health_store = COALESCE($8, price_health_store),
                price_distributor = COALESCE($9, price_distributor),
                price_gym = COALESCE($10, price_gym),
                price_cafeteria = COALESCE($11, price_cafeteria),
                weight_grams = COALESCE($12, weight_grams),
                ingredients = COALESCE($13, ingredients),
                allergens = COALESCE($14, allergens),
                nutritional_info = COALESCE($15, nutritional_info),
                main_image_url = COALESCE($16, main_image_url),
                gallery_images = COALESCE($17, gallery_images),
                stock_quantity = COALESCE($18, stock_quantity),
                min_stock_alert = COALESCE($19, min_stock_alert),
                min_order_quantity = COALESCE($20, min_order_quantity),
                max_order_quantity = COALESCE($21, max_order_quantity),
                is_active = COALESCE($22, is_active),
                is_featured = COALESCE($23, is_featured),
                tags = COALESCE($24, tags),
                dimensions_cm = COALESCE($25, dimensions_cm),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.slug)
            .bind(&input.sku)
            .bind(input.category_id)
            .bind(input.base_price)
            .bind(input.price_health_store)
            .bind(input.price_distributor)
            .bind(input.price_gym)
            .bind(input.price_cafeteria)
            .bind(input.weight_grams)
            .bind(&input.ingredients)
            .bind(&input.allergens)
            .bind(&input.nutritional_info)
            .bind(&input.main_image_url)
            .bind(&input.gallery_images)
            .bind(input.stock_quantity)
            .bind(input.min_stock_alert)
            .bind(input.min_order_quantity)
            .bind(input.max_order_quantity)
            .bind(input.is_active)
            .bind(input.is_featured)
            .bind(&input.tags)
            .bind(&input.dimensions_cm)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn update_stock(&self, id: DbId, stock_quantity: i32) -> StoreResult<Option<Product>> {
        let query = format!(
            "UPDATE products SET stock_quantity = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(stock_quantity)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}
