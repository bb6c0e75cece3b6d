pub mod health;
pub mod items;
pub mod token;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenHandler;
use crate::database::unit_of_work::UnitOfWork;
use crate::middleware::auth::require_bearer;
use crate::services::ItemService;

/// Shared application state: the item service and the token handler.
pub struct AppState<U: UnitOfWork> {
    pub service: ItemService<U>,
    pub tokens: TokenHandler,
}

impl<U: UnitOfWork + Clone> Clone for AppState<U> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

/// Build the full application router. The bearer guard applies to the
/// /items routes only; /token and /health stay public.
pub fn router<U>(state: AppState<U>) -> Router
where
    U: UnitOfWork + Clone + 'static,
{
    let protected = Router::new()
        .route(
            "/items",
            get(items::get_items::<U>).post(items::post_item::<U>),
        )
        .route(
            "/items/:id",
            get(items::get_item::<U>)
                .patch(items::patch_item::<U>)
                .delete(items::delete_item::<U>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(protected)
        .route("/token", get(token::get_token::<U>))
        .route("/health", get(health::health::<U>))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
