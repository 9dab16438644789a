#![allow(dead_code)]

pub mod ledger;

use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use forum_service::inbound::http::router::create_router;
use forum_service::inbound::http::router::AppState;
use forum_service::repositories::InMemoryStore;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "secret1";

/// Test application that spawns a real server on the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryStore::new());
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let state = AppState::from_repositories(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            authenticator,
        );
        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register `username` with `<username>@example.com` and the shared test password.
    pub async fn register(&self, username: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD,
                "confirm_password": TEST_PASSWORD,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the bearer token.
    pub async fn signed_up(&self, username: &str) -> String {
        assert_eq!(self.register(username).await.status(), 201);
        let body: Value = self
            .login(username, TEST_PASSWORD)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["token"].as_str().expect("Missing token").to_string()
    }

    /// Create a post as the token's owner, returning its ID.
    pub async fn create_post(&self, token: &str, title: &str) -> i64 {
        let response = self
            .post_authenticated("/api/posts", token)
            .json(&json!({
                "section": "general",
                "title": title,
                "content": "Body text",
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), 201);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["id"].as_i64().expect("Missing post id")
    }

    pub async fn toggle_like(&self, token: &str, post_id: i64) -> reqwest::Response {
        self.post_authenticated(&format!("/api/posts/{}/like", post_id), token)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Throwaway PostgreSQL database with migrations applied.
///
/// Points at the server named by `DATABASE__URL` (or `DATABASE_URL`).
/// `connect` returns `None` when neither is set so the caller can skip.
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    server_url: String,
}

impl TestDb {
    pub async fn connect() -> Option<Self> {
        let Some(server_url) = std::env::var("DATABASE__URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()
        else {
            eprintln!("DATABASE__URL not set, skipping PostgreSQL test");
            return None;
        };

        let db_name = format!(
            "test_forum_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE__URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let db_name = self.db_name.clone();
        let server_url = self.server_url.clone();
        let pool = self.pool.clone();
        tokio::spawn(async move {
            pool.close().await;

            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
