use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;

use crate::db::Database;
use crate::handlers::{healthz, todo};
use crate::service::TodoService;

/// Exact-path routes only. `/healthz` answers every method; other methods on
/// `/todos` get 405, unlisted paths 404.
pub fn new_router(db: Arc<Database>) -> Router {
    let svc = TodoService::new(db);

    Router::new()
        .route("/healthz", any(healthz::healthz))
        .route(
            "/todos",
            get(todo::read)
                .post(todo::create)
                .put(todo::update)
                .delete(todo::delete),
        )
        .with_state(svc)
}
