use crate::AppState;
use axum::routing::{get, Router};

pub mod errors;
mod handler;
pub mod model;
pub mod response;

pub(crate) mod consts {
    pub(crate) const NOT_FOUND_MESSAGE: &str = "Article doesn't exist";
    pub(crate) const PATCH_FIELDS_MESSAGE: &str =
        "Request body must contain either 'title', 'style', or 'content'";
}

/// Article routes, mounted at `articles_path` (e.g. `/api/articles`).
pub fn api_router(articles_path: &str) -> Router<AppState> {
    use handler::*;
    Router::<AppState>::new()
        .route(articles_path, get(read_articles).post(create_article))
        .route(
            &format!("{articles_path}/:id"),
            get(read_article)
                .delete(delete_article)
                .patch(update_article),
        )
}

pub async fn root() -> &'static str {
    "Hello, world!"
}
