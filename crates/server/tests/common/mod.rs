//! Shared helpers for the HTTP-level tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bloglist_server::core::{router, AppState, ServerConfig};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    // Keeps the database directory alive for the test's duration
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let mut config = ServerConfig::with_base_dir(dir.path());
    config.bcrypt_cost = 4;
    let state = AppState::new(config).await.unwrap();

    TestApp {
        app: router(state.clone()),
        state,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            content_type,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    /// Registers a user and returns a session token for them.
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let created = self
            .request(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "username": username, "name": "Avory Richie", "password": password })),
            )
            .await;
        assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);

        let login = self
            .request(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        login.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_blog(&self, token: &str, blog: Value) -> TestResponse {
        self.request(Method::POST, "/api/blogs", Some(token), Some(blog))
            .await
    }

    pub async fn blogs_in_db(&self) -> Vec<Value> {
        let response = self.get("/api/blogs").await;
        response.body.as_array().unwrap().clone()
    }

    pub async fn users_in_db(&self) -> Vec<Value> {
        let response = self.get("/api/users").await;
        response.body.as_array().unwrap().clone()
    }
}

pub fn initial_blogs() -> Vec<Value> {
    vec![
        json!({ "title": "React patterns", "author": "Michael Chan", "url": "https://reactpatterns.com/", "likes": 7 }),
        json!({ "title": "Go To Statement Considered Harmful", "author": "Edsger W. Dijkstra", "url": "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html", "likes": 5 }),
        json!({ "title": "Canonical string reduction", "author": "Edsger W. Dijkstra", "url": "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html", "likes": 12 }),
        json!({ "title": "First class tests", "author": "Robert C. Martin", "url": "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll", "likes": 10 }),
        json!({ "title": "TDD harms architecture", "author": "Robert C. Martin", "url": "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html", "likes": 0 }),
        json!({ "title": "Type wars", "author": "Robert C. Martin", "url": "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html", "likes": 2 }),
    ]
}

/// App with one seeded user owning the six initial blogs.
pub async fn seeded_app() -> (TestApp, String) {
    let app = spawn_app().await;
    let token = app.register_and_login("seeder", "password").await;
    for blog in initial_blogs() {
        let response = app.create_blog(&token, blog).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }
    (app, token)
}
