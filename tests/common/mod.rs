#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use complex_api::app::{app, AppState};
use complex_api::auth::generate_jwt;
use complex_api::config::AppConfig;
use complex_api::database::models::{Building, BuildingMembership, Complex, User};
use complex_api::database::fixture::Fixture;
use complex_api::database::MemoryStore;
use complex_api::types::{BuildingId, ComplexId, UserId};

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// In-process application over a seeded memory store.
///
/// One complex with two buildings, plus four users: an admin, a moderator
/// and a resident of that complex, and an outsider moderating another one.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<AppConfig>,
    pub complex: Complex,
    pub admin: String,
    pub moderator: String,
    pub resident: String,
    pub outsider: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.jwt_secret = JWT_SECRET.to_string();
        let config = Arc::new(config);

        let now = Utc::now();
        let complex = Complex {
            id: ComplexId::generate(),
            name: "Green Park".to_string(),
            address: "12 Linden Ave".to_string(),
            buildings: vec![
                Building { id: BuildingId::generate(), name: "Block A".to_string(), address: None },
                Building { id: BuildingId::generate(), name: "Block B".to_string(), address: None },
            ],
            created_at: now,
            updated_at: now,
        };

        let user = |name: &str, is_admin: bool, buildings: Vec<BuildingMembership>| User {
            id: UserId::generate(),
            name: name.to_string(),
            is_admin,
            buildings,
            created_at: now,
        };
        let member = |moderator: bool| BuildingMembership { complex_id: complex.id, moderator };

        let admin = user("admin", true, vec![]);
        let moderator = user("moderator", false, vec![member(true)]);
        let resident = user("resident", false, vec![member(false)]);
        let outsider = user(
            "outsider",
            false,
            vec![BuildingMembership { complex_id: ComplexId::generate(), moderator: true }],
        );

        let token = |u: &User| generate_jwt(&config.security, u.id).unwrap();
        let tokens = [token(&admin), token(&moderator), token(&resident), token(&outsider)];

        let store = Arc::new(MemoryStore::new());
        Fixture {
            users: vec![admin, moderator, resident, outsider],
            complexes: vec![complex.clone()],
        }
        .apply(store.as_ref())
        .await
        .unwrap();

        let [admin, moderator, resident, outsider] = tokens;
        Self {
            router: app(AppState::from_store(config.clone(), store)),
            config,
            complex,
            admin,
            moderator,
            resident,
            outsider,
        }
    }

    pub fn token_for(&self, user_id: UserId) -> String {
        generate_jwt(&self.config.security, user_id).unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

/// The compiled binary, listening on a free port with the memory backend.
/// Killed on drop.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn spawn(extra_args: &[&str]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = binary();
        cmd.args(extra_args)
            .env("SERVER_HOST", "127.0.0.1")
            .env("COMPLEX_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;
        let server = Self { port, base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// The binary with a deterministic environment
pub fn binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_complex-api"));
    cmd.env("APP_ENV", "development")
        .env("STORE_BACKEND", "memory")
        .env("JWT_SECRET", JWT_SECRET)
        .env("RUST_LOG", "warn");
    cmd
}
