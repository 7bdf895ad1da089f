use std::sync::Arc;

use dulpromax_db::repositories::{
    CategoryRepository, ClientRepository, ProductRepository, StorefrontRepository,
};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; every store sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub storefront: Arc<dyn StorefrontRepository>,
}
