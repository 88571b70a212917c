//! Common test utilities for E2E tests

#![allow(dead_code)]

use std::path::PathBuf;

use postkeeper::data::{ExternalId, PostContent};
use postkeeper::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        Self::with_static_dir(None).await
    }

    /// Create a test server that also serves UI files from `static_dir`
    pub async fn with_static_dir(static_dir: Option<PathBuf>) -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                static_dir,
                max_body_bytes: 1024 * 1024,
            },
            database: config::DatabaseConfig {
                path: db_path,
                max_connections: 5,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = postkeeper::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// POST /addUser for a user in upstream API shape
    pub async fn add_user(&self, api_user_id: ExternalId) -> reqwest::Response {
        self.client
            .post(self.url("/addUser"))
            .json(&user_body(api_user_id))
            .send()
            .await
            .unwrap()
    }

    /// POST a `{ posts: [...] }` body to `path`
    pub async fn post_posts(
        &self,
        path: &str,
        owner: ExternalId,
        posts: &[(&str, &str)],
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&posts_body(owner, posts))
            .send()
            .await
            .unwrap()
    }

    /// Posts stored for the owner
    pub async fn stored_posts(&self, owner: ExternalId) -> Vec<PostContent> {
        self.state
            .db
            .get_posts_by_owner(owner)
            .await
            .unwrap()
            .iter()
            .map(PostContent::from)
            .collect()
    }
}

/// A user as the browser sends it to /addUser
pub fn user_body(api_user_id: ExternalId) -> serde_json::Value {
    serde_json::json!({
        "name": "Clementine Bauch",
        "email": "Nathan@yesenia.net",
        "phone": "1-463-123-4447",
        "website": "ramiro.info",
        "city": "McKenziehaven",
        "company_name": "Romaguera-Jacobson",
        "catch_phrase": "Face to face bifurcated interface",
        "bs": "e-enable strategic applications",
        "api_user_id": api_user_id
    })
}

/// A `{ posts: [...] }` body in upstream API shape
pub fn posts_body(owner: ExternalId, posts: &[(&str, &str)]) -> serde_json::Value {
    let posts: Vec<serde_json::Value> = posts
        .iter()
        .enumerate()
        .map(|(index, (title, body))| {
            serde_json::json!({
                "userId": owner,
                "id": index + 1,
                "title": title,
                "body": body
            })
        })
        .collect();
    serde_json::json!({ "posts": posts })
}
