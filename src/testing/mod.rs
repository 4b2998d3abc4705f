//! In-memory doubles for the store and model seams.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::database::{DatabaseError, Record, RecordStore, SelectQuery};
use crate::llm::{LanguageModel, LlmError};

/// Store backed by per-table row vectors. Rows are returned unprojected so
/// callers are forced to apply the whitelist themselves.
#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Record>>,
    failing: HashSet<String>,
    issued: Mutex<Vec<SelectQuery>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, table: &str, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.tables.insert(table.to_string(), rows);
        self
    }

    /// Make every select against `table` fail.
    pub fn failing(mut self, table: &str) -> Self {
        self.failing.insert(table.to_string());
        self
    }

    /// Queries received so far, in order.
    pub fn issued(&self) -> Vec<SelectQuery> {
        self.issued.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, DatabaseError> {
        query.to_sql()?;
        if let Ok(mut issued) = self.issued.lock() {
            issued.push(query.clone());
        }
        if self.failing.contains(&query.table) {
            return Err(DatabaseError::QueryError(format!("relation \"{}\" is unavailable", query.table)));
        }

        let rows = self.tables.get(&query.table).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .filter(|row| match &query.key {
                Some(key) => row.get(&key.column) == Some(&Value::String(key.value.clone())),
                None => true,
            })
            .take(query.limit as usize)
            .collect())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Model that answers every prompt with a fixed outcome and records prompts.
pub struct ScriptedModel {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self { reply: Ok(text.into()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn failing(status_body: impl Into<String>) -> Self {
        Self { reply: Err(status_body.into()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(body) => Err(LlmError::Status { status: 503, body: body.clone() }),
        }
    }
}
