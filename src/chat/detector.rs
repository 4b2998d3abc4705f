//! Keyword based table detection.
//!
//! A message is matched against an ordered list of trigger rules. A rule fires
//! when its trigger occurs verbatim in the message; matching is case and
//! diacritic sensitive and does no tokenization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::Table;

/// One trigger substring and the tables it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub trigger: String,
    pub tables: Vec<Table>,
}

impl TriggerRule {
    pub fn new(trigger: impl Into<String>, tables: impl IntoIterator<Item = Table>) -> Self {
        Self { trigger: trigger.into(), tables: tables.into_iter().collect() }
    }

    pub fn matches(&self, message: &str) -> bool {
        !self.trigger.is_empty() && message.contains(self.trigger.as_str())
    }
}

/// Built-in rule table.
pub fn default_rules() -> Vec<TriggerRule> {
    vec![
        TriggerRule::new("như thế nào", [Table::Faq]),
        TriggerRule::new("giảng viên", [Table::Lecturers]),
        TriggerRule::new("tin tức", [Table::News]),
        TriggerRule::new("sự kiện", [Table::Events]),
        // Both enterprise tables on purpose.
        TriggerRule::new("doanh nghiệp", [Table::PeriodEnterprises, Table::Enterprises]),
        TriggerRule::new("tài liệu", [Table::StudentDocuments]),
    ]
}

#[derive(Debug, Clone)]
pub struct TableDetector {
    rules: Vec<TriggerRule>,
}

impl TableDetector {
    pub fn new(rules: Vec<TriggerRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[TriggerRule] {
        &self.rules
    }

    /// Candidate tables for `message`. Empty when no rule fires.
    pub fn detect(&self, message: &str) -> BTreeSet<Table> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(message))
            .flat_map(|rule| rule.tables.iter().copied())
            .collect()
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new(default_rules())
    }
}
