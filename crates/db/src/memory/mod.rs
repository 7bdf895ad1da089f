//! In-memory repository implementations.
//!
//! [`InMemoryCatalog`] mirrors the PostgreSQL category/product tables
//! (unique slugs and SKUs, newest-first listing) so the API can run without
//! a database. [`InMemoryClientRepo`] and [`InMemoryStorefrontRepo`] are the
//! production registries for clients and storefront products.

mod catalog;
mod clients;
mod storefront;

pub use catalog::InMemoryCatalog;
pub use clients::InMemoryClientRepo;
pub use storefront::InMemoryStorefrontRepo;
