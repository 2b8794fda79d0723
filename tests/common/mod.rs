#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

use achievement_tracker::{create_app, seed};

pub const PASSWORD: &str = "Password123!";
pub const SUPERADMIN_EMAIL: &str = "root@example.com";

/// Fresh sqlite file with migrations applied, plus the router and a superadmin.
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create tempdir")?;
        let opts = SqliteConnectOptions::new()
            .filename(dir.path().join("test.db"))
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;

        let migrator =
            sqlx::migrate::Migrator::new(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")).await?;
        migrator.run(&pool).await?;

        std::env::set_var("JWT_SECRET", "test-secret");
        let app = create_app(pool.clone()).await?;

        seed::create_superadmin(&pool, "Root Admin", SUPERADMIN_EMAIL, PASSWORD).await?;

        Ok(Self { app, pool, _dir: dir })
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-json body: {}", String::from_utf8_lossy(&bytes)))?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.post("/auth/login", None, json!({ "email": email, "password": password })).await
    }

    pub async fn token_for(&self, email: &str) -> Result<String> {
        let (status, body) = self.login(email, PASSWORD).await?;
        if status != StatusCode::OK {
            panic!("login for {} failed: {} - {}", email, status, body);
        }
        body_str(&body, &["data", "token"])
    }

    pub async fn superadmin_token(&self) -> Result<String> {
        self.token_for(SUPERADMIN_EMAIL).await
    }

    /// Registers a student and returns (id, token).
    pub async fn student(&self, name: &str, email: &str, department: &str) -> Result<(String, String)> {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                    "role": "student",
                    "department": department,
                    "year": 2
                }),
            )
            .await?;
        if status != StatusCode::CREATED {
            panic!("student register failed: {} - {}", status, body);
        }

        let id = body_str(&body, &["data", "user", "id"])?;
        Ok((id, self.token_for(email).await?))
    }

    /// Registers an admin for `field` and returns its id, still unapproved.
    pub async fn pending_admin(&self, name: &str, email: &str, field: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                    "role": "admin",
                    "field": field
                }),
            )
            .await?;
        if status != StatusCode::CREATED {
            panic!("admin register failed: {} - {}", status, body);
        }
        body_str(&body, &["data", "user", "id"])
    }

    /// Registers and approves an admin, returning (id, token).
    pub async fn admin(&self, name: &str, email: &str, field: &str) -> Result<(String, String)> {
        let id = self.pending_admin(name, email, field).await?;
        let root = self.superadmin_token().await?;

        let (status, body) = self
            .put(&format!("/superadmin/approve-admin/{}", id), &root, json!({}))
            .await?;
        if status != StatusCode::OK {
            panic!("admin approval failed: {} - {}", status, body);
        }

        Ok((id, self.token_for(email).await?))
    }
}

pub fn body_str(body: &Value, path: &[&str]) -> Result<String> {
    let mut current = body;
    for key in path {
        current = current.get(*key).with_context(|| format!("missing '{}' in {}", key, body))?;
    }
    current
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("'{}' is not a string in {}", path.join("."), body))
}
