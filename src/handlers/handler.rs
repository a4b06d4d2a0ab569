use crate::AppState;

use super::errors::*;
use super::model::*;
use super::response::*;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};

/// Ids that do not parse can not match a row.
fn parse_id(raw: &str) -> Result<i64, ArticleError> {
    raw.parse().map_err(|_| ArticleError::NotFound)
}

/// `GET /articles`: every article, oldest first.
pub async fn read_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleResponse>>, ArticleError> {
    let articles = state.store.list_all().await?;
    tracing::debug!("Read {} articles", articles.len());
    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
}

/// `GET /articles/:id`
pub async fn read_article(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ArticleResponse>, ArticleError> {
    let id = parse_id(&id)?;
    match state.store.get_by_id(id).await? {
        Some(article) => Ok(Json(article.into())),
        None => Err(ArticleError::NotFound),
    }
}

/// `POST /articles`
/// Request: {title, style, content}, all required.
/// Response: 201 with the new article and a Location header.
pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<ArticlePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ArticleError> {
    let new_article = ArticlePayload::from_extracted(payload)?.into_new_article()?;
    tracing::info!("Creating article with title: {}", new_article.title);

    let article = state.store.insert(new_article).await?;
    let location = format!("{}/{}", state.articles_path, article.id);

    tracing::info!("Created article: {}", article.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ArticleResponse::from(article)),
    ))
}

/// `DELETE /articles/:id`
pub async fn delete_article(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ArticleError> {
    let id = parse_id(&id)?;
    if state.store.delete_by_id(id).await? == 0 {
        return Err(ArticleError::NotFound);
    }
    tracing::info!("Deleted article: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /articles/:id`
/// Existence is checked before the body is looked at. The check and the
/// update are separate statements, so a concurrent delete in between
/// leaves the update with nothing to touch; that still answers 204.
pub async fn update_article(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<ArticlePayload>, JsonRejection>,
) -> Result<StatusCode, ArticleError> {
    let id = parse_id(&id)?;
    if state.store.get_by_id(id).await?.is_none() {
        return Err(ArticleError::NotFound);
    }

    let changes = ArticlePayload::from_extracted(payload)?.into_changes()?;
    let updated = state.store.update_by_id(id, changes).await?;
    if updated == 0 {
        tracing::warn!("Article {} vanished before it could be updated", id);
    } else {
        tracing::info!("Updated article: {}", id);
    }
    Ok(StatusCode::NO_CONTENT)
}
