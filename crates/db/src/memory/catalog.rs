use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use dulpromax_core::catalog::next_id;
use dulpromax_core::error::CoreError;
use dulpromax_core::pagination::PageRequest;
use dulpromax_core::pricing::SegmentPrices;
use dulpromax_core::product_filter::ProductFilter;
use dulpromax_core::types::DbId;

use crate::error::{poisoned, StoreResult};
use crate::models::category::{Category, CategorySummary, CreateCategory, UpdateCategory};
use crate::models::product::{
    CreateProduct, Product, ProductPage, ProductWithCategory, UpdateProduct,
};
use crate::repositories::{CategoryRepository, ProductRepository};

#[derive(Debug, Default)]
struct CatalogRows {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl CatalogRows {
    fn summary_for(&self, category_id: Option<DbId>) -> Option<CategorySummary> {
        let id = category_id?;
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(CategorySummary::from)
    }

    fn with_category(&self, product: &Product) -> ProductWithCategory {
        ProductWithCategory {
            product: product.clone(),
            category: self.summary_for(product.category_id),
        }
    }

    /// Same wording as a PostgreSQL unique violation surfaced by `store_error`.
    fn check_unique<'a>(
        constraint: &str,
        mut values: impl Iterator<Item = (DbId, &'a str)>,
        value: &str,
        self_id: Option<DbId>,
    ) -> StoreResult<()> {
        if values.any(|(id, v)| v == value && Some(id) != self_id) {
            return Err(CoreError::Conflict(format!(
                "duplicate value violates unique constraint: {constraint}"
            )));
        }
        Ok(())
    }

    fn check_category_slug(&self, slug: &str, self_id: Option<DbId>) -> StoreResult<()> {
        let slugs = self.categories.iter().map(|c| (c.id, c.slug.as_str()));
        Self::check_unique("uq_categories_slug", slugs, slug, self_id)
    }

    fn check_product_keys(
        &self,
        slug: Option<&str>,
        sku: Option<&str>,
        self_id: Option<DbId>,
    ) -> StoreResult<()> {
        if let Some(slug) = slug {
            let slugs = self.products.iter().map(|p| (p.id, p.slug.as_str()));
            Self::check_unique("uq_products_slug", slugs, slug, self_id)?;
        }
        if let Some(sku) = sku {
            let skus = self
                .products
                .iter()
                .filter_map(|p| p.sku.as_deref().map(|s| (p.id, s)));
            Self::check_unique("uq_products_sku", skus, sku, self_id)?;
        }
        Ok(())
    }
}

/// Categories and products held in process memory.
///
/// Ids come from [`next_id`], so a deleted trailing row's id is reused.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    rows: RwLock<CatalogRows>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, CatalogRows>> {
        self.rows.read().map_err(|_| poisoned("catalog"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, CatalogRows>> {
        self.rows.write().map_err(|_| poisoned("catalog"))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn list(&self, active_only: bool) -> StoreResult<Vec<Category>> {
        let rows = self.read()?;
        let mut categories: Vec<Category> = rows
            .categories
            .iter()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Category>> {
        Ok(self.read()?.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_id_by_slug(&self, slug: &str) -> StoreResult<Option<DbId>> {
        Ok(self
            .read()?
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .map(|c| c.id))
    }

    async fn create(&self, input: &CreateCategory) -> StoreResult<Category> {
        let mut rows = self.write()?;
        rows.check_category_slug(&input.slug, None)?;

        let now = Utc::now();
        let category = Category {
            id: next_id(rows.categories.iter().map(|c| c.id)),
            name: input.name.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        rows.categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: DbId, input: &UpdateCategory) -> StoreResult<Option<Category>> {
        let mut rows = self.write()?;
        if !rows.categories.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        if let Some(slug) = &input.slug {
            rows.check_category_slug(slug, Some(id))?;
        }
        let Some(category) = rows.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            category.name = name.clone();
        }
        if let Some(slug) = &input.slug {
            category.slug = slug.clone();
        }
        if let Some(description) = &input.description {
            category.description = Some(description.clone());
        }
        if let Some(image_url) = &input.image_url {
            category.image_url = Some(image_url.clone());
        }
        if let Some(is_active) = input.is_active {
            category.is_active = is_active;
        }
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut rows = self.write()?;
        let before = rows.categories.len();
        rows.categories.retain(|c| c.id != id);
        Ok(rows.categories.len() < before)
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn list(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<ProductPage> {
        let rows = self.read()?;
        let mut matching: Vec<&Product> = rows
            .products
            .iter()
            .filter(|p| filter.matches(&p.facts()))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let products = page
            .window(matching)
            .into_iter()
            .map(|p| rows.with_category(p))
            .collect();
        Ok(ProductPage { products, total })
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<ProductWithCategory>> {
        let rows = self.read()?;
        Ok(rows
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| rows.with_category(p)))
    }

    async fn find_id_by_slug(&self, slug: &str) -> StoreResult<Option<DbId>> {
        Ok(self
            .read()?
            .products
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| p.id))
    }

    async fn find_id_by_sku(&self, sku: &str) -> StoreResult<Option<DbId>> {
        Ok(self
            .read()?
            .products
            .iter()
            .find(|p| p.sku.as_deref() == Some(sku))
            .map(|p| p.id))
    }

    async fn count_by_category(&self, category_id: DbId) -> StoreResult<i64> {
        let count = self
            .read()?
            .products
            .iter()
            .filter(|p| p.category_id == Some(category_id))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn create(&self, input: &CreateProduct, prices: SegmentPrices) -> StoreResult<Product> {
        let mut rows = self.write()?;
        rows.check_product_keys(Some(&input.slug), input.sku.as_deref(), None)?;

        let now = Utc::now();
        let product = Product {
            id: next_id(rows.products.iter().map(|p| p.id)),
            name: input.name.clone(),
            description: input.description.clone(),
            slug: input.slug.clone(),
            sku: input.sku.clone(),
            category_id: input.category_id,
            base_price: input.base_price,
            price_health_store: prices.health_store,
            price_distributor: prices.distributor,
            price_gym: prices.gym,
            price_cafeteria: prices.cafeteria,
            weight_grams: input.weight_grams,
            dimensions_cm: input.dimensions_cm.clone(),
            ingredients: input.ingredients.clone(),
            allergens: input.allergens.clone(),
            nutritional_info: input.nutritional_info.clone(),
            main_image_url: input.main_image_url.clone(),
            gallery_images: input.gallery_images.clone(),
            stock_quantity: input.stock_quantity.unwrap_or(0),
            min_stock_alert: input.min_stock_alert.unwrap_or(10),
            min_order_quantity: input.min_order_quantity.unwrap_or(1),
            max_order_quantity: input.max_order_quantity,
            is_active: input.is_active.unwrap_or(true),
            is_featured: input.is_featured.unwrap_or(false),
            tags: input.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: DbId, input: &UpdateProduct) -> StoreResult<Option<Product>> {
        let mut rows = self.write()?;
        if !rows.products.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        rows.check_product_keys(input.slug.as_deref(), input.sku.as_deref(), Some(id))?;
        let Some(product) = rows.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        // Plain overwrites.
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &input.$field {
                    product.$field = value.clone();
                })*
            };
        }
        // Nullable columns.
        macro_rules! apply_some {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &input.$field {
                    product.$field = Some(value.clone());
                })*
            };
        }

        apply!(
            name,
            slug,
            base_price,
            price_health_store,
            price_distributor,
            price_gym,
            price_cafeteria,
            allergens,
            gallery_images,
            stock_quantity,
            min_stock_alert,
            min_order_quantity,
            is_active,
            is_featured,
            tags,
        );
        apply_some!(
            description,
            sku,
            category_id,
            weight_grams,
            dimensions_cm,
            ingredients,
            nutritional_info,
            main_image_url,
            max_order_quantity,
        );
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn update_stock(&self, id: DbId, stock_quantity: i32) -> StoreResult<Option<Product>> {
        let mut rows = self.write()?;
        let Some(product) = rows.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.stock_quantity = stock_quantity;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut rows = self.write()?;
        let before = rows.products.len();
        rows.products.retain(|p| p.id != id);
        Ok(rows.products.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn category(name: &str, slug: &str) -> CreateCategory {
        CreateCategory {
            name: name.into(),
            slug: slug.into(),
            description: None,
            image_url: None,
            is_active: None,
        }
    }

    fn product(name: &str, slug: &str, category_id: Option<DbId>, base_price: f64) -> CreateProduct {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "slug": slug,
            "category_id": category_id,
            "base_price": base_price,
        }))
        .unwrap()
    }

    async fn add_product(store: &InMemoryCatalog, input: CreateProduct) -> Product {
        let prices = input.resolve_segment_prices().unwrap();
        ProductRepository::create(store, &input, prices).await.unwrap()
    }

    #[tokio::test]
    async fn categories_list_by_name_and_hide_inactive() {
        let store = InMemoryCatalog::new();
        CategoryRepository::create(&store, &category("Snacks", "snacks")).await.unwrap();
        CategoryRepository::create(&store, &category("Bakery", "bakery")).await.unwrap();
        let hidden = CreateCategory {
            is_active: Some(false),
            ..category("Archive", "archive")
        };
        CategoryRepository::create(&store, &hidden).await.unwrap();

        let active = CategoryRepository::list(&store, true).await.unwrap();
        let names: Vec<_> = active.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Bakery", "Snacks"]);

        let all = CategoryRepository::list(&store, false).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Archive");
    }

    #[tokio::test]
    async fn duplicate_category_slug_is_a_conflict() {
        let store = InMemoryCatalog::new();
        CategoryRepository::create(&store, &category("Bakery", "bakery")).await.unwrap();
        let result = CategoryRepository::create(&store, &category("Bread", "bakery")).await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn category_can_keep_its_own_slug() {
        let store = InMemoryCatalog::new();
        let created = CategoryRepository::create(&store, &category("Bakery", "bakery"))
            .await
            .unwrap();
        let update = UpdateCategory {
            name: Some("Fresh Bakery".into()),
            slug: Some("bakery".into()),
            ..Default::default()
        };
        let updated = CategoryRepository::update(&store, created.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Fresh Bakery");
        assert_eq!(updated.slug, "bakery");
    }

    #[tokio::test]
    async fn updating_missing_category_returns_none() {
        let store = InMemoryCatalog::new();
        CategoryRepository::create(&store, &category("Bakery", "bakery")).await.unwrap();
        let result = CategoryRepository::update(&store, 42, &UpdateCategory::default()).await;
        assert_matches!(result, Ok(None));

        let taken = UpdateCategory {
            slug: Some("bakery".into()),
            ..Default::default()
        };
        let result = CategoryRepository::update(&store, 42, &taken).await;
        assert_matches!(result, Ok(None));
    }

    #[tokio::test]
    async fn products_embed_category_summary() {
        let store = InMemoryCatalog::new();
        let bakery = CategoryRepository::create(&store, &category("Bakery", "bakery"))
            .await
            .unwrap();
        let bread = add_product(&store, product("Bread", "bread", Some(bakery.id), 8.99)).await;

        let found = ProductRepository::find_by_id(&store, bread.id).await.unwrap().unwrap();
        let summary = found.category.unwrap();
        assert_eq!(summary.name, "Bakery");
        assert_eq!(summary.slug, "bakery");
        assert_eq!(found.product.price_distributor, 6.74);
        assert_eq!(found.product.stock_quantity, 0);
        assert_eq!(found.product.min_stock_alert, 10);
        assert_eq!(found.product.min_order_quantity, 1);
        assert!(found.product.is_active);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_paginated() {
        let store = InMemoryCatalog::new();
        for i in 1..=5 {
            add_product(&store, product(&format!("Bar {i}"), &format!("bar-{i}"), None, 10.0)).await;
        }
        let page = PageRequest::new(Some(2), Some(2)).unwrap();
        let result = ProductRepository::list(&store, &ProductFilter::default(), page)
            .await
            .unwrap();

        assert_eq!(result.total, 5);
        let ids: Vec<_> = result.products.iter().map(|p| p.product.id).collect();
        assert_eq!(ids, [3, 2]);
    }

    #[tokio::test]
    async fn listing_applies_filters_before_counting() {
        let store = InMemoryCatalog::new();
        add_product(&store, product("Granola", "granola", None, 12.0)).await;
        add_product(&store, product("Quinoa Bites", "quinoa-bites", None, 15.5)).await;
        let filter = ProductFilter {
            search: Some("granola".into()),
            ..Default::default()
        };
        let result = ProductRepository::list(&store, &filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.products[0].product.slug, "granola");
    }

    #[tokio::test]
    async fn repeated_filter_gives_identical_page() {
        let store = InMemoryCatalog::new();
        let bakery = CategoryRepository::create(&store, &category("Bakery", "bakery"))
            .await
            .unwrap();
        for (name, slug, price) in [
            ("Oat Bread", "oat-bread", 6.0),
            ("Rye Bread", "rye-bread", 9.0),
            ("Seed Bread", "seed-bread", 40.0),
            ("Oat Cookies", "oat-cookies", 7.0),
        ] {
            add_product(&store, product(name, slug, Some(bakery.id), price)).await;
        }
        let filter = ProductFilter {
            category_id: Some(bakery.id),
            search: Some("bread".into()),
            max_price: Some(20.0),
            ..Default::default()
        };
        let page = PageRequest::new(Some(1), Some(1)).unwrap();

        let first = ProductRepository::list(&store, &filter, page).await.unwrap();
        ProductRepository::list(&store, &ProductFilter::default(), PageRequest::default())
            .await
            .unwrap();
        ProductRepository::find_by_id(&store, 1).await.unwrap();
        CategoryRepository::list(&store, true).await.unwrap();
        let second = ProductRepository::list(&store, &filter, page).await.unwrap();

        let ids = |page: &ProductPage| -> Vec<DbId> {
            page.products.iter().map(|p| p.product.id).collect()
        };
        assert_eq!(first.total, 2);
        assert_eq!(first.total, second.total);
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn updating_missing_product_ignores_taken_slug() {
        let store = InMemoryCatalog::new();
        add_product(&store, product("Granola", "granola", None, 12.0)).await;
        let update = UpdateProduct {
            slug: Some("granola".into()),
            ..Default::default()
        };
        let result = ProductRepository::update(&store, 99, &update).await;
        assert_matches!(result, Ok(None));
    }

    #[tokio::test]
    async fn duplicate_sku_is_a_conflict() {
        let store = InMemoryCatalog::new();
        let mut first = product("Granola", "granola", None, 12.0);
        first.sku = Some("GR-001".into());
        add_product(&store, first).await;

        let mut second = product("Granola XL", "granola-xl", None, 14.0);
        second.sku = Some("GR-001".into());
        let prices = second.resolve_segment_prices().unwrap();
        let result = ProductRepository::create(&store, &second, prices).await;
        assert_matches!(result, Err(CoreError::Conflict(msg)) if msg.contains("uq_products_sku"));
    }

    #[tokio::test]
    async fn dimensions_are_stored_and_updated() {
        let store = InMemoryCatalog::new();
        let mut input = product("Granola", "granola", None, 12.0);
        input.dimensions_cm = Some("20x12x6".into());
        let granola = add_product(&store, input).await;
        assert_eq!(granola.dimensions_cm.as_deref(), Some("20x12x6"));

        let untouched = ProductRepository::update(&store, granola.id, &UpdateProduct::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.dimensions_cm.as_deref(), Some("20x12x6"));

        let update = UpdateProduct {
            dimensions_cm: Some("25x15x6".into()),
            ..Default::default()
        };
        let resized = ProductRepository::update(&store, granola.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resized.dimensions_cm.as_deref(), Some("25x15x6"));
    }

    #[tokio::test]
    async fn base_price_update_keeps_segment_prices() {
        let store = InMemoryCatalog::new();
        let bread = add_product(&store, product("Bread", "bread", None, 8.99)).await;
        let update = UpdateProduct {
            base_price: Some(20.0),
            ..Default::default()
        };
        let updated = ProductRepository::update(&store, bread.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.base_price, 20.0);
        assert_eq!(updated.price_distributor, 6.74);
    }

    #[tokio::test]
    async fn stock_update_and_category_count() {
        let store = InMemoryCatalog::new();
        let bakery = CategoryRepository::create(&store, &category("Bakery", "bakery"))
            .await
            .unwrap();
        let bread = add_product(&store, product("Bread", "bread", Some(bakery.id), 8.99)).await;

        let updated = ProductRepository::update_stock(&store, bread.id, 75)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.stock_quantity, 75);
        assert_eq!(store.count_by_category(bakery.id).await.unwrap(), 1);

        assert!(ProductRepository::delete(&store, bread.id).await.unwrap());
        assert_eq!(store.count_by_category(bakery.id).await.unwrap(), 0);
        assert!(!ProductRepository::delete(&store, bread.id).await.unwrap());
    }
}
