pub mod category;
pub mod client;
pub mod product;
pub mod storefront;
