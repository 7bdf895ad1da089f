use axum::routing::get;
use axum::Router;

use crate::handlers::storefront;
use crate::state::AppState;

/// Routes mounted at `/api/productos`.
///
/// ```text
/// GET    /                       -> list (?categoria=)
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /categoria/{categoria}  -> list_by_line
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(storefront::list).post(storefront::create))
        .route(
            "/{id}",
            get(storefront::get_by_id)
                .put(storefront::update)
                .delete(storefront::delete),
        )
        .route("/categoria/{categoria}", get(storefront::list_by_line))
}
