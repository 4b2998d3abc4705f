#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use faculty_chat_relay::app::{app, AppState};
use faculty_chat_relay::auth::{Claims, JwtKeys};
use faculty_chat_relay::chat::{ChatPolicy, ChatService, Principal};
use faculty_chat_relay::config::AppConfig;
use faculty_chat_relay::database::{DatabaseError, Record, RecordStore, SelectQuery};
use faculty_chat_relay::llm::{LanguageModel, LlmError};
use serde_json::Value;

pub const JWT_SECRET: &str = "integration-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

/// Serve the relay router in-process on a free port, backed by the given doubles.
pub async fn spawn_server(store: Arc<FakeStore>, model: Arc<FakeModel>) -> Result<TestServer> {
    let service = ChatService::new(ChatPolicy::default(), store, model);
    let config = AppConfig::from_env();
    let router = app(AppState::new(service, JwtKeys::new(JWT_SECRET)), &config.api, &config.security);
    serve(router).await
}

/// Bind `router` on a free local port and wait until it accepts connections.
pub async fn serve(router: axum::Router) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer { port, base_url };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

impl TestServer {
    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port)).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub fn token_for(principal: &Principal) -> String {
    JwtKeys::new(JWT_SECRET)
        .generate(&Claims::new(principal, 1))
        .expect("token")
}

#[derive(Default)]
pub struct FakeStore {
    tables: HashMap<String, Vec<Record>>,
    failing: HashSet<String>,
    down: bool,
    issued: Mutex<Vec<SelectQuery>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, table: &str, rows: Vec<Value>) -> Self {
        let rows = rows.into_iter().filter_map(|v| v.as_object().cloned()).collect();
        self.tables.insert(table.to_string(), rows);
        self
    }

    pub fn failing(mut self, table: &str) -> Self {
        self.failing.insert(table.to_string());
        self
    }

    pub fn down(mut self) -> Self {
        self.down = true;
        self
    }

    pub fn issued(&self) -> Vec<SelectQuery> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, DatabaseError> {
        self.issued.lock().unwrap().push(query.clone());
        if self.down || self.failing.contains(&query.table) {
            return Err(DatabaseError::QueryError("connection reset".to_string()));
        }
        let rows = self.tables.get(&query.table).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .filter(|row| match &query.key {
                Some(key) => row.get(&key.column).and_then(Value::as_str) == Some(key.value.as_str()),
                None => true,
            })
            .take(query.limit as usize)
            .collect())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.down {
            Err(DatabaseError::QueryError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct FakeModel {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(text: &str) -> Self {
        Self { reply: Some(text.to_string()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn broken() -> Self {
        Self { reply: None, prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or(LlmError::Status { status: 500, body: "internal".to_string() })
    }
}

/// Small faculty dataset with a few columns that must never leave the store.
pub fn faculty_store() -> FakeStore {
    FakeStore::new()
        .with_rows(
            "lecturers",
            (1..=7)
                .map(|i| {
                    serde_json::json!({
                        "name": format!("Giảng viên {}", i),
                        "email": format!("gv{}@fit.edu.vn", i),
                        "research_direction": if i == 1 { "AI" } else { "Mạng máy tính" },
                        "salary": 1000 + i,
                    })
                })
                .collect(),
        )
        .with_rows("news", vec![serde_json::json!({"title": "Lịch thi học kỳ", "summary": "s", "content": "c"})])
        .with_rows("enterprises", vec![serde_json::json!({"name": "FPT Software", "industry": "IT", "tax_code": "0101"})])
        .with_rows("period_enterprises", vec![serde_json::json!({"name": "Viettel", "job_description": "Backend", "address": "Hà Nội"})])
        .with_rows(
            "students",
            vec![
                serde_json::json!({"student_code": "SV001", "name": "An", "password_hash": "h1"}),
                serde_json::json!({"student_code": "SV002", "name": "Bình", "password_hash": "h2"}),
            ],
        )
}
