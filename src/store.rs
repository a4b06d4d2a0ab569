//! Persistence for articles.
//!
//! `ArticleStore` never opens or closes connections itself: it is handed a
//! connected [`SqlitePool`] at startup and only runs queries against it.
//! Nothing here validates or sanitizes text, callers do that.

use chrono::Utc;
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::QueryBuilder;

use crate::models::{Article, ArticleChanges, NewArticle};

const COLUMNS: &str = "id, title, style, content, date_published";

#[derive(Clone, Debug)]
pub struct ArticleStore {
    pool: SqlitePool,
    /// Already quoted, safe to splice into SQL.
    table: String,
}

impl ArticleStore {
    pub fn new(pool: SqlitePool, table: &str) -> Self {
        Self {
            pool,
            table: quote_identifier(table),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the articles table when it is missing.
    pub async fn create_table(&self) -> Result<(), sqlx::Error> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                style TEXT NOT NULL,
                content TEXT NOT NULL,
                date_published TEXT NOT NULL
            )",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Article>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY id", self.table);
        sqlx::query_as::<_, Article>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn insert(&self, article: NewArticle) -> Result<Article, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} (title, style, content, date_published)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}",
            self.table
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(article.title)
            .bind(article.style)
            .bind(article.content)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);
        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Returns the number of rows removed, 0 when `id` did not exist.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let done = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    /// Writes only the columns present in `changes`.
    /// Returns the number of rows touched, 0 when `id` did not exist.
    pub async fn update_by_id(&self, id: i64, changes: ArticleChanges) -> Result<u64, sqlx::Error> {
        if changes.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", self.table));
        let mut set = query.separated(", ");
        if let Some(title) = changes.title {
            set.push("title = ");
            set.push_bind_unseparated(title);
        }
        if let Some(style) = changes.style {
            set.push("style = ");
            set.push_bind_unseparated(style);
        }
        if let Some(content) = changes.content {
            set.push("content = ");
            set.push_bind_unseparated(content);
        }
        query.push(" WHERE id = ");
        query.push_bind(id);

        let done = query.build().execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
