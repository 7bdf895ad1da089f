//! Domain logic for the DulProMax catalog service.
//!
//! Zero I/O: segment pricing, listing filters, pagination, catalog
//! integrity rules and the shared error type. Used by both the store layer
//! (`dulpromax_db`) and the HTTP layer (`dulpromax_api`).

pub mod catalog;
pub mod error;
pub mod pagination;
pub mod pricing;
pub mod product_filter;
pub mod types;
pub mod validation;
