use serde::{Deserialize, Serialize};

use crate::models::Article;
use crate::sanitizer::clean;

/// `ErrorResponse` is the body of every 4xx answer: `{"error": {"message": ...}}`
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

/// `DetailedErrorResponse` carries store failure details outside production.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DetailedErrorResponse {
    pub message: String,
    pub error: ErrorMessage,
}

/// Article as sent to clients, with `title` and `content` run through the sanitizer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ArticleResponse(pub Article);

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self(Article {
            title: clean(&article.title),
            content: clean(&article.content),
            ..article
        })
    }
}
