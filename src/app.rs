use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::controllers::Controllers;
use crate::handlers::api;
use crate::middleware::auth;

/// Shared per-process state: immutable config plus the controller seam.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub controllers: Arc<dyn Controllers>,
}

/// Build the router. The auth middleware is layered onto the dispatch route
/// only, so it runs before lookup and body parsing but never touches `/`.
pub fn app(state: AppState) -> Router {
    let dispatch = Router::new()
        .route(
            "/api/:action",
            get(api::api_get)
                .post(api::api_post)
                .options(api::api_options),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::token_auth,
        ));

    Router::new()
        .route("/", get(index))
        .merge(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": "bgmi-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "dispatch": "/api/:action (GET: cal, config; POST: add, delete, search, config, download)",
        },
    }))
}
