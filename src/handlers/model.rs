use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;

use super::consts::PATCH_FIELDS_MESSAGE;
use super::errors::ArticleError;
use crate::models::{ArticleChanges, NewArticle};

/// Body of POST and PATCH. Unknown keys are ignored by serde.
#[derive(Deserialize, Debug, Default)]
pub struct ArticlePayload {
    pub title: Option<String>,
    pub style: Option<String>,
    pub content: Option<String>,
}

impl ArticlePayload {
    /// A body sent without a JSON content type counts as `{}`.
    pub fn from_extracted(
        payload: Result<Json<ArticlePayload>, JsonRejection>,
    ) -> Result<Self, ArticleError> {
        match payload {
            Ok(Json(payload)) => Ok(payload),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(Self::default()),
            Err(rejection) => Err(ArticleError::Validation(rejection.body_text())),
        }
    }

    /// Requires `title`, `style` and `content`, reporting the first missing one in that order.
    pub fn into_new_article(self) -> Result<NewArticle, ArticleError> {
        Ok(NewArticle {
            title: required(self.title, "title")?,
            style: required(self.style, "style")?,
            content: required(self.content, "content")?,
        })
    }

    /// Keeps the supplied fields, fails when there are none.
    pub fn into_changes(self) -> Result<ArticleChanges, ArticleError> {
        let changes = ArticleChanges {
            title: supplied(self.title),
            style: supplied(self.style),
            content: supplied(self.content),
        };
        if changes.is_empty() {
            return Err(ArticleError::Validation(PATCH_FIELDS_MESSAGE.into()));
        }
        Ok(changes)
    }
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, ArticleError> {
    supplied(value)
        .ok_or_else(|| ArticleError::Validation(format!("Missing '{field}' in request body")))
}
