//! Immutable routing policy shared by every request.
//!
//! Built once at process start, either from the built-in defaults or from a
//! YAML file, then handed to `ChatService` behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::access::AccessPolicy;
use super::detector::{default_rules, TableDetector, TriggerRule};
use super::types::Table;
use super::whitelist::ColumnWhitelist;
use crate::database::query::is_valid_identifier;

pub const DEFAULT_SAMPLE_LIMIT: u32 = 5;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Failed to read policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid column '{column}' for table {table}")]
    InvalidColumn { table: Table, column: String },

    #[error("Whitelist for table {0} has no columns")]
    EmptyColumns(Table),

    #[error("Invalid self-record key column: {0}")]
    InvalidKeyColumn(String),

    #[error("Sample limit must be at least 1")]
    InvalidSampleLimit,
}

/// Table that gets a personalized single-row lookup for students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfRecord {
    pub table: Table,
    pub key_column: String,
}

impl Default for SelfRecord {
    fn default() -> Self {
        Self { table: Table::Students, key_column: "student_code".to_string() }
    }
}

/// On-disk shape of the policy. Omitted sections fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyFile {
    #[serde(default = "default_sample_limit")]
    pub sample_limit: u32,
    #[serde(default)]
    pub self_record: SelfRecord,
    #[serde(default = "default_rules")]
    pub rules: Vec<TriggerRule>,
    #[serde(default)]
    pub access: AccessPolicy,
    #[serde(default)]
    pub whitelist: ColumnWhitelist,
}

fn default_sample_limit() -> u32 {
    DEFAULT_SAMPLE_LIMIT
}

#[derive(Debug, Clone)]
pub struct ChatPolicy {
    pub detector: TableDetector,
    pub access: AccessPolicy,
    pub whitelist: ColumnWhitelist,
    pub self_record: SelfRecord,
    pub sample_limit: u32,
}

impl ChatPolicy {
    pub fn from_file(file: PolicyFile) -> Result<Self, PolicyError> {
        if file.sample_limit == 0 {
            return Err(PolicyError::InvalidSampleLimit);
        }
        if !is_valid_identifier(&file.self_record.key_column) {
            return Err(PolicyError::InvalidKeyColumn(file.self_record.key_column));
        }
        for (table, columns) in file.whitelist.iter() {
            if columns.is_empty() {
                return Err(PolicyError::EmptyColumns(*table));
            }
            if let Some(bad) = columns.iter().find(|c| !is_valid_identifier(c)) {
                return Err(PolicyError::InvalidColumn { table: *table, column: bad.clone() });
            }
        }

        Ok(Self {
            detector: TableDetector::new(file.rules),
            access: file.access,
            whitelist: file.whitelist,
            self_record: file.self_record,
            sample_limit: file.sample_limit,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, PolicyError> {
        let file: PolicyFile = serde_yaml::from_str(yaml)?;
        Self::from_file(file)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Load from `path` when given, otherwise use the built-in policy.
    pub fn load(path: Option<&str>) -> Result<Self, PolicyError> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_file(&self) -> PolicyFile {
        PolicyFile {
            sample_limit: self.sample_limit,
            self_record: self.self_record.clone(),
            rules: self.detector.rules().to_vec(),
            access: self.access.clone(),
            whitelist: self.whitelist.clone(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, PolicyError> {
        Ok(serde_yaml::to_string(&self.to_file())?)
    }
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            detector: TableDetector::default(),
            access: AccessPolicy::default(),
            whitelist: ColumnWhitelist::default(),
            self_record: SelfRecord::default(),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::Role;

    #[test]
    fn built_in_policy_passes_validation() {
        let policy = ChatPolicy::from_file(ChatPolicy::default().to_file()).unwrap();
        assert_eq!(policy.sample_limit, 5);
        assert_eq!(policy.self_record.table, Table::Students);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_sections() {
        let policy = ChatPolicy::from_yaml_str(
            r#"
access:
  guest: [news]
"#,
        )
        .unwrap();

        assert_eq!(policy.sample_limit, DEFAULT_SAMPLE_LIMIT);
        assert_eq!(policy.detector.rules().len(), default_rules().len());
        assert_eq!(policy.access.allowed(Role::Guest).map(|t| t.len()), Some(1));
        assert!(policy.access.allowed(Role::Student).is_none());
        assert!(policy.whitelist.columns(Table::News).is_some());
    }

    #[test]
    fn yaml_rules_and_whitelist_are_used() {
        let policy = ChatPolicy::from_yaml_str(
            r#"
sample_limit: 3
rules:
  - trigger: "ngành"
    tables: [majors]
whitelist:
  majors: [name]
"#,
        )
        .unwrap();

        assert_eq!(policy.sample_limit, 3);
        assert!(policy.detector.detect("ngành học").contains(&Table::Majors));
        assert_eq!(policy.whitelist.columns(Table::Majors), Some(&["name".to_string()][..]));
        assert!(policy.whitelist.columns(Table::News).is_none());
    }

    #[test]
    fn rejects_column_that_is_not_an_identifier() {
        let err = ChatPolicy::from_yaml_str(
            r#"
whitelist:
  news: ["title, content"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidColumn { table: Table::News, .. }));
    }

    #[test]
    fn rejects_table_with_empty_column_list() {
        let err = ChatPolicy::from_yaml_str(
            r#"
whitelist:
  news: []
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::EmptyColumns(Table::News)));
    }

    #[test]
    fn rejects_unknown_table_names() {
        let err = ChatPolicy::from_yaml_str(
            r#"
whitelist:
  users: [password_hash]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::Yaml(_)));
    }

    #[test]
    fn rejects_zero_sample_limit() {
        let err = ChatPolicy::from_yaml_str("sample_limit: 0").unwrap_err();
        assert!(matches!(err, PolicyError::InvalidSampleLimit));
    }

    #[test]
    fn yaml_dump_loads_back_to_same_policy() {
        let yaml = ChatPolicy::default().to_yaml().unwrap();
        let policy = ChatPolicy::from_yaml_str(&yaml).unwrap();
        assert_eq!(policy.access, AccessPolicy::default());
        assert_eq!(policy.whitelist, ColumnWhitelist::default());
        assert_eq!(policy.detector.rules(), default_rules().as_slice());
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = ChatPolicy::load(Some("/nonexistent/policy.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/policy.yaml"));
    }
}
