use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted article, exactly as it sits in the table.
/// `title` and `content` are raw here; handlers sanitize them on the way out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub style: String,
    pub content: String,
    pub date_published: DateTime<Utc>,
}

/// Validated input for an insert. `id` and `date_published` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub style: String,
    pub content: String,
}

/// Columns to overwrite on a partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub style: Option<String>,
    pub content: Option<String>,
}

impl ArticleChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.style.is_none() && self.content.is_none()
    }
}
