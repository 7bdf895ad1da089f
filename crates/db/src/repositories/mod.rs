//! Repository layer.
//!
//! Each entity has an object-safe repository trait; handlers hold them as
//! `Arc<dyn ...>` so production can use PostgreSQL while tests swap in the
//! stores from [`crate::memory`]. Write methods receive values the caller
//! already derived (segment prices, base discount); repositories only store.

pub mod category_repo;
pub mod product_repo;

use async_trait::async_trait;
use dulpromax_core::pagination::PageRequest;
use dulpromax_core::pricing::{Segment, SegmentPrices};
use dulpromax_core::product_filter::ProductFilter;
use dulpromax_core::types::DbId;

use crate::error::StoreResult;
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::models::product::{
    CreateProduct, Product, ProductPage, ProductWithCategory, UpdateProduct,
};
use crate::models::storefront::{
    CreateStorefrontProduct, ProductLine, StorefrontProduct, UpdateStorefrontProduct,
};

pub use category_repo::PgCategoryRepo;
pub use product_repo::PgProductRepo;

/// Storage for categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name, optionally only active ones.
    async fn list(&self, active_only: bool) -> StoreResult<Vec<Category>>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Category>>;

    /// Id of the category holding `slug` (exact, case-sensitive match).
    async fn find_id_by_slug(&self, slug: &str) -> StoreResult<Option<DbId>>;

    async fn create(&self, input: &CreateCategory) -> StoreResult<Category>;

    /// Apply the non-`None` fields. Returns `None` if the id does not exist.
    async fn update(&self, id: DbId, input: &UpdateCategory) -> StoreResult<Option<Category>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

/// Storage for catalog products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of products matching `filter`, newest first, with the total
    /// match count.
    async fn list(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<ProductPage>;

    /// A product with its category summary.
    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<ProductWithCategory>>;

    async fn find_id_by_slug(&self, slug: &str) -> StoreResult<Option<DbId>>;

    async fn find_id_by_sku(&self, sku: &str) -> StoreResult<Option<DbId>>;

    /// Number of products referencing a category.
    async fn count_by_category(&self, category_id: DbId) -> StoreResult<i64>;

    /// Insert a product with already-resolved segment prices.
    async fn create(&self, input: &CreateProduct, prices: SegmentPrices) -> StoreResult<Product>;

    /// Apply the non-`None` fields. Returns `None` if the id does not exist.
    async fn update(&self, id: DbId, input: &UpdateProduct) -> StoreResult<Option<Product>>;

    /// Overwrite the stock level. Returns `None` if the id does not exist.
    async fn update_stock(&self, id: DbId, stock_quantity: i32) -> StoreResult<Option<Product>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

/// Registry of B2B clients.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Client>>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Client>>;

    async fn list_by_segment(&self, segment: Segment) -> StoreResult<Vec<Client>>;

    /// Register a client with the given base discount.
    async fn create(&self, input: &CreateClient, base_discount: f64) -> StoreResult<Client>;

    async fn update(&self, id: DbId, input: &UpdateClient) -> StoreResult<Option<Client>>;

    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}

/// Registry of storefront products.
#[async_trait]
pub trait StorefrontRepository: Send + Sync {
    /// All products, optionally restricted to one product line.
    async fn list(&self, line: Option<ProductLine>) -> StoreResult<Vec<StorefrontProduct>>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<StorefrontProduct>>;

    async fn create(
        &self,
        input: &CreateStorefrontProduct,
        prices: SegmentPrices,
    ) -> StoreResult<StorefrontProduct>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateStorefrontProduct,
    ) -> StoreResult<Option<StorefrontProduct>>;

    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}
