use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::ChatError;
use super::fetcher::DataFetcher;
use super::policy::ChatPolicy;
use super::prompt;
use super::types::{FetchedDataset, Principal, Table};
use crate::database::RecordStore;
use crate::llm::LanguageModel;

/// Routing decisions and data gathered for one message.
#[derive(Debug, Clone)]
pub struct Gathered {
    pub detected: BTreeSet<Table>,
    pub authorized: BTreeSet<Table>,
    pub dataset: FetchedDataset,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub authorized: BTreeSet<Table>,
    pub fetched: Vec<Table>,
}

/// Runs detect -> authorize -> fetch -> assemble -> generate for one message.
pub struct ChatService {
    policy: Arc<ChatPolicy>,
    store: Arc<dyn RecordStore>,
    model: Arc<dyn LanguageModel>,
    expose_error_detail: bool,
}

impl ChatService {
    pub fn new(policy: ChatPolicy, store: Arc<dyn RecordStore>, model: Arc<dyn LanguageModel>) -> Self {
        Self { policy: Arc::new(policy), store, model, expose_error_detail: false }
    }

    pub fn with_error_detail(mut self, expose: bool) -> Self {
        self.expose_error_detail = expose;
        self
    }

    pub fn policy(&self) -> &ChatPolicy {
        &self.policy
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Answer `message`. Every failure is turned into a fallback reply here
    /// and nowhere else.
    pub async fn handle(&self, message: &str, principal: &Principal) -> String {
        match self.respond(message, principal).await {
            Ok(reply) => reply.text,
            Err(e) => {
                error!(role = %principal.role, "Chat pipeline failed: {}", e);
                e.fallback_reply(self.expose_error_detail)
            }
        }
    }

    pub async fn respond(&self, message: &str, principal: &Principal) -> Result<ChatReply, ChatError> {
        let gathered = self.gather(message, principal).await;
        let prompt = prompt::assemble(principal.role, &gathered.dataset, message)?;

        // All store connections are closed by now.
        let raw = self.model.generate(&prompt).await?;
        let text = raw.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyReply);
        }

        Ok(ChatReply {
            text: text.to_string(),
            authorized: gathered.authorized,
            fetched: gathered.dataset.keys().copied().collect(),
        })
    }

    /// Detection, access filtering and fetching. A table whose fetch fails is
    /// left out; the rest of the request goes on.
    pub async fn gather(&self, message: &str, principal: &Principal) -> Gathered {
        let detected = self.policy.detector.detect(message);
        let authorized = self.policy.access.authorize(principal.role, &detected);
        info!(
            role = %principal.role,
            detected = ?detected,
            authorized = ?authorized,
            "Routing chat message"
        );

        let fetcher = DataFetcher::new(&self.policy, self.store.as_ref());
        let mut dataset = FetchedDataset::new();
        for table in &authorized {
            match fetcher.fetch(*table, principal).await {
                Ok(Some(records)) => {
                    debug!(table = %table, rows = records.len(), "Fetched table");
                    dataset.insert(*table, records);
                }
                Ok(None) => debug!(table = %table, "Table not whitelisted, skipped"),
                Err(e) => warn!(table = %table, "Fetch failed, omitting table: {}", e),
            }
        }

        Gathered { detected, authorized, dataset }
    }
}
