//! Typed records and request DTOs, one module per entity.

pub mod category;
pub mod client;
pub mod product;
pub mod storefront;
