//! REST API for per-account personal notes.
//!
//! Accounts register and log in with a name and password; every `/notes`
//! operation sits behind a signed-bearer-token gate and is scoped to the
//! notes the caller owns. Records live in a JSON-file store under the data
//! directory.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod storage;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use notes_core::TokenService;

use crate::config::Config;
use crate::storage::Storage;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
    pub tokens: TokenService,
}

/// Build the service router.
///
/// The `/user` routes are public; everything under `/notes` requires a
/// verified bearer token.
pub fn app(state: Arc<AppState>) -> Router {
    let notes = Router::new()
        .route(
            "/notes",
            get(routes::notes::list)
                .post(routes::notes::create)
                .put(routes::notes::update)
                .delete(routes::notes::remove),
        )
        .route("/notes/search", get(routes::notes::search))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/user/signup", post(routes::signup::handler))
        .route("/user/login", post(routes::login::handler))
        .merge(notes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
