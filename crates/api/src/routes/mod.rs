pub mod category;
pub mod client;
pub mod health;
pub mod product;
pub mod storefront;

use axum::Router;

use crate::state::AppState;

/// Build the resource route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                          list, create
/// /categories/{id}                     get, update, delete
///
/// /products                            list (filtered, paginated), create
/// /products/{id}                       get, update, delete
/// /products/{id}/stock                 set stock (PATCH)
///
/// /api/clientes                        list, register
/// /api/clientes/{id}                   get, update, delete
/// /api/clientes/tipo/{tipo}            list by segment
///
/// /api/productos                       list (?categoria=), create
/// /api/productos/{id}                  get, update, delete
/// /api/productos/categoria/{categoria} list by product line
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/products", product::router())
        .nest("/api/clientes", client::router())
        .nest("/api/productos", storefront::router())
}
