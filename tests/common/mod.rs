#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

use blogful_articles::handlers::errors::ErrorPolicy;
use blogful_articles::models::Article;
use blogful_articles::store::ArticleStore;
use blogful_articles::{app, AppState};

pub const TABLE: &str = "articles";

pub struct TestApp {
    pub router: Router,
    pub store: ArticleStore,
}

impl TestApp {
    pub fn pool(&self) -> &SqlitePool {
        self.store.pool()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        send(&self.router, Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        send(&self.router, Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Option<Value>) -> TestResponse {
        send(&self.router, Method::PATCH, uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        send(&self.router, Method::DELETE, uri, None).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// In-memory database with the articles table, one connection kept alive for the test.
pub async fn test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

pub async fn spawn_app_with(prefix: &str, policy: ErrorPolicy) -> TestApp {
    let store = ArticleStore::new(test_pool().await, TABLE);
    store.create_table().await.unwrap();
    let state = AppState::new(store.clone(), format!("{prefix}/articles"));
    TestApp {
        router: app(state, policy),
        store,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with("", ErrorPolicy::Detailed).await
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

fn date(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn make_articles_array() -> Vec<Article> {
    vec![
        Article {
            id: 1,
            title: "First test post!".into(),
            style: "How-to".into(),
            content: "Lorem ipsum dolor sit amet, consectetur adipisicing elit.".into(),
            date_published: date("2029-01-22T16:28:32.615Z"),
        },
        Article {
            id: 2,
            title: "Second test post!".into(),
            style: "News".into(),
            content: "Natus consequuntur deserunt commodi, nobis qui inventore corrupti.".into(),
            date_published: date("2100-05-22T16:28:32.615Z"),
        },
        Article {
            id: 3,
            title: "Third test post!".into(),
            style: "Listicle".into(),
            content: "Possimus, voluptate? Necessitatibus dolores earum in sunt.".into(),
            date_published: date("1919-12-22T16:28:32.615Z"),
        },
        Article {
            id: 4,
            title: "Fourth test post!".into(),
            style: "Story".into(),
            content: "Cum, exercitationem cupiditate dignissimos est perspiciatis.".into(),
            date_published: date("1919-12-22T16:28:32.615Z"),
        },
    ]
}

/// Returns the article as stored and as it must come back out.
pub fn make_malicious_article() -> (Article, Article) {
    let malicious = Article {
        id: 911,
        title: r#"Naughty naughty very naughty <script>alert("xss");</script>"#.into(),
        style: "How-to".into(),
        content: r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#.into(),
        date_published: Utc::now(),
    };
    let expected = Article {
        title: r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#.into(),
        content: r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#.into(),
        ..malicious.clone()
    };
    (malicious, expected)
}

/// Inserts rows as-is, ids included, bypassing the store.
pub async fn seed(pool: &SqlitePool, articles: &[Article]) {
    for article in articles {
        sqlx::query(&format!(
            "INSERT INTO \"{TABLE}\" (id, title, style, content, date_published) VALUES (?, ?, ?, ?, ?)"
        ))
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.style)
        .bind(&article.content)
        .bind(article.date_published)
        .execute(pool)
        .await
        .unwrap();
    }
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}
