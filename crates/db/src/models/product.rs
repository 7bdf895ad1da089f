//! Catalog product model and DTOs.
//!
//! Segment prices are stored columns, filled once at creation (explicit
//! values win, the rest are derived from `base_price`). Updating
//! `base_price` later leaves them untouched.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use dulpromax_core::catalog::{validate_slug, MAX_PRODUCT_SLUG_LEN};
use dulpromax_core::error::CoreError;
use dulpromax_core::pagination::{total_pages, PageRequest};
use dulpromax_core::pricing::{validate_price, SegmentPrices};
use dulpromax_core::product_filter::ProductFacts;
use dulpromax_core::types::{DbId, Timestamp};
use dulpromax_core::validation::validate_input;

use crate::models::category::CategorySummary;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub sku: Option<String>,
    pub category_id: Option<DbId>,
    /// Retail reference price before any segment discount.
    pub base_price: f64,
    pub price_health_store: f64,
    /// Wholesale price; listing price filters apply to this column.
    pub price_distributor: f64,
    pub price_gym: f64,
    pub price_cafeteria: f64,
    pub weight_grams: Option<i32>,
    /// Free-form package size, e.g. `"20x10x5"`.
    pub dimensions_cm: Option<String>,
    pub ingredients: Option<String>,
    pub allergens: Vec<String>,
    pub nutritional_info: Option<serde_json::Value>,
    pub main_image_url: Option<String>,
    pub gallery_images: Vec<String>,
    pub stock_quantity: i32,
    pub min_stock_alert: i32,
    pub min_order_quantity: i32,
    pub max_order_quantity: Option<i32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// The fields listing filters look at.
    pub fn facts(&self) -> ProductFacts<'_> {
        ProductFacts {
            name: &self.name,
            description: self.description.as_deref(),
            category_id: self.category_id,
            is_active: self.is_active,
            is_featured: self.is_featured,
            price_distributor: self.price_distributor,
        }
    }

    pub fn segment_prices(&self) -> SegmentPrices {
        SegmentPrices {
            health_store: self.price_health_store,
            distributor: self.price_distributor,
            gym: self.price_gym,
            cafeteria: self.price_cafeteria,
        }
    }
}

/// A product enriched with a summary of its category.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<CategorySummary>,
}

/// One page of a product listing plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<ProductWithCategory>,
    pub total: i64,
}

/// Response body of `GET /products`.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<ProductWithCategory>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl ProductList {
    pub fn new(page: ProductPage, request: PageRequest) -> Self {
        Self {
            total_pages: total_pages(page.total, request.per_page),
            products: page.products,
            total: page.total,
            page: request.page,
            per_page: request.per_page,
        }
    }
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub sku: Option<String>,
    pub category_id: Option<DbId>,
    pub base_price: f64,
    /// Explicit segment prices; any omitted is derived from `base_price`.
    pub price_health_store: Option<f64>,
    pub price_distributor: Option<f64>,
    pub price_gym: Option<f64>,
    pub price_cafeteria: Option<f64>,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub weight_grams: Option<i32>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub dimensions_cm: Option<String>,
    pub ingredients: Option<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    pub nutritional_info: Option<serde_json::Value>,
    pub main_image_url: Option<String>,
    #[serde(default)]
    pub gallery_images: Vec<String>,
    /// Defaults to 0 if omitted.
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock_quantity: Option<i32>,
    /// Defaults to 10 if omitted.
    #[validate(range(min = 0, message = "must not be negative"))]
    pub min_stock_alert: Option<i32>,
    /// Defaults to 1 if omitted.
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub min_order_quantity: Option<i32>,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub max_order_quantity: Option<i32>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    /// Defaults to `false` if omitted.
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateProduct {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        validate_slug(&self.slug, MAX_PRODUCT_SLUG_LEN)?;
        validate_price("base_price", self.base_price)?;
        validate_optional_prices(
            self.price_health_store,
            self.price_distributor,
            self.price_gym,
            self.price_cafeteria,
        )?;
        validate_order_window(self.min_order_quantity, self.max_order_quantity)
    }

    /// Segment prices to store: explicit ones kept, the rest derived.
    ///
    /// Fails when a derived price would round to zero.
    pub fn resolve_segment_prices(&self) -> Result<SegmentPrices, CoreError> {
        SegmentPrices::derive_with_overrides(
            self.base_price,
            self.price_health_store,
            self.price_distributor,
            self.price_gym,
            self.price_cafeteria,
        )
    }
}

/// DTO for updating an existing product. All fields are optional.
///
/// Changing `base_price` does not touch the stored segment prices; send them
/// explicitly to re-price.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub sku: Option<String>,
    pub category_id: Option<DbId>,
    pub base_price: Option<f64>,
    pub price_health_store: Option<f64>,
    pub price_distributor: Option<f64>,
    pub price_gym: Option<f64>,
    pub price_cafeteria: Option<f64>,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub weight_grams: Option<i32>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub dimensions_cm: Option<String>,
    pub ingredients: Option<String>,
    pub allergens: Option<Vec<String>>,
    pub nutritional_info: Option<serde_json::Value>,
    pub main_image_url: Option<String>,
    pub gallery_images: Option<Vec<String>>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock_quantity: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub min_stock_alert: Option<i32>,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub min_order_quantity: Option<i32>,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub max_order_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl UpdateProduct {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        if let Some(slug) = &self.slug {
            validate_slug(slug, MAX_PRODUCT_SLUG_LEN)?;
        }
        if let Some(base_price) = self.base_price {
            validate_price("base_price", base_price)?;
        }
        validate_optional_prices(
            self.price_health_store,
            self.price_distributor,
            self.price_gym,
            self.price_cafeteria,
        )?;
        validate_order_window(self.min_order_quantity, self.max_order_quantity)
    }
}

fn validate_optional_prices(
    health_store: Option<f64>,
    distributor: Option<f64>,
    gym: Option<f64>,
    cafeteria: Option<f64>,
) -> Result<(), CoreError> {
    let prices = [
        ("price_health_store", health_store),
        ("price_distributor", distributor),
        ("price_gym", gym),
        ("price_cafeteria", cafeteria),
    ];
    for (field, price) in prices {
        if let Some(price) = price {
            validate_price(field, price)?;
        }
    }
    Ok(())
}

/// When both order bounds are given, the maximum may not undercut the minimum.
fn validate_order_window(min: Option<i32>, max: Option<i32>) -> Result<(), CoreError> {
    match (min, max) {
        (Some(min), Some(max)) if max < min => Err(CoreError::Validation(format!(
            "max_order_quantity ({max}) must be >= min_order_quantity ({min})"
        ))),
        _ => Ok(()),
    }
}
