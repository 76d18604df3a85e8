#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use foodgram_adapters::MemoryImageStore;
use foodgram_backend::{
    build_app,
    database::{self, models::ROLE_ADMIN, queries},
    AppState, Config,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";
pub const PASSWORD: &str = "str0ng-pass";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub images: Arc<MemoryImageStore>,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl Response {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::default();
        let pool = database::connect(&config.database_url, 1).await.unwrap();
        database::migrate(&pool).await.unwrap();

        let images = Arc::new(MemoryImageStore::new());
        let state = AppState::new(pool, config, images.clone());

        Self {
            app: build_app(state.clone()),
            state,
            images,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        Response {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(Method::POST, uri, token, None).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Registers `username` and logs in, returning (user id, token).
    pub async fn user(&self, username: &str) -> (i64, String) {
        let email = format!("{username}@example.com");
        let response = self
            .post(
                "/api/users/",
                None,
                json!({
                    "email": email,
                    "username": username,
                    "first_name": "Test",
                    "last_name": "User",
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        let id = response.json()["id"].as_i64().unwrap();

        let response = self
            .post(
                "/api/auth/token/login/",
                None,
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        let token = response.json()["auth_token"].as_str().unwrap().to_string();

        (id, token)
    }

    pub async fn make_admin(&self, username: &str) {
        let email = format!("{username}@example.com");
        let updated = queries::set_role_by_email(&self.state.pool, &email, ROLE_ADMIN)
            .await
            .unwrap();
        assert_eq!(updated, 1);
    }

    pub async fn tag(&self, slug: &str) -> i64 {
        queries::upsert_tag(&self.state.pool, slug, "#49B64E", slug)
            .await
            .unwrap();
        sqlx::query_scalar("SELECT id FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.state.pool)
            .await
            .unwrap()
    }

    pub async fn ingredient(&self, name: &str, unit: &str) -> i64 {
        queries::insert_ingredient(&self.state.pool, name, unit)
            .await
            .unwrap()
            .id
    }

    /// Creates a recipe through the API and returns its id.
    pub async fn recipe(&self, token: &str, name: &str, tags: &[i64], ingredients: &[(i64, i64)]) -> i64 {
        let response = self
            .post("/api/recipes/", Some(token), recipe_body(name, tags, ingredients))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json()["id"].as_i64().unwrap()
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql)
            .fetch_one(&self.state.pool)
            .await
            .unwrap()
    }
}

pub fn recipe_body(name: &str, tags: &[i64], ingredients: &[(i64, i64)]) -> Value {
    json!({
        "name": name,
        "text": "Mix everything and cook.",
        "cooking_time": 25,
        "image": PNG,
        "tags": tags,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({ "id": id, "amount": amount }))
            .collect::<Vec<_>>(),
    })
}
