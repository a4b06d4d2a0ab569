//! This crate gives you CRUD (create, read, update, delete)
//! functionality for articles via a restful JSON API.
//! *There is no authentication*, we consider you using a gateway for this.
//!
//! ## Routes
//! ```text
//! GET    /articles        all articles
//! POST   /articles        {title, style, content}
//! GET    /articles/:id
//! PATCH  /articles/:id    any of {title, style, content}
//! DELETE /articles/:id
//! ```
//! Routes sit under `API_PREFIX` when it is set, see [`config`].
//!
//! Stored text is kept as submitted. `title` and `content` are run
//! through [`sanitizer::clean`] on every response instead.

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod handlers;
pub mod models;
pub mod sanitizer;
pub mod store;

use handlers::errors::{render_store_failures, ErrorPolicy};
use store::ArticleStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ArticleStore,
    /// Collection path used for routing and `Location` headers.
    pub articles_path: Arc<str>,
}

impl AppState {
    pub fn new(store: ArticleStore, articles_path: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            articles_path: articles_path.into(),
        }
    }
}

/// Full application: article routes, error rendering and the usual HTTP layers.
pub fn app(state: AppState, policy: ErrorPolicy) -> Router {
    let cors = CorsLayer::new().allow_origin(Any);
    Router::new()
        .route("/", get(handlers::root))
        .merge(handlers::api_router(&state.articles_path))
        .layer(middleware::from_fn_with_state(policy, render_store_failures))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-xss-protection"),
            HeaderValue::from_static("0"),
        ))
        .with_state(state)
}
