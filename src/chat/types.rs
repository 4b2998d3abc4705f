use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::database::Record;

/// Caller role as resolved by the identity layer.
///
/// Any role string this service does not know deserializes to `Unknown`,
/// which never has an access-policy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Student,
    Guest,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Guest => "guest",
            Role::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "admin" => Role::Admin,
            "student" => Role::Student,
            "guest" => Role::Guest,
            _ => Role::Unknown,
        })
    }
}

/// Resolved identity of the caller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_code: Option<String>,
}

impl Principal {
    pub fn new(role: Role, student_code: Option<String>) -> Self {
        Self { role, student_code }
    }

    /// Principal used when a request carries no credentials.
    pub fn guest() -> Self {
        Self { role: Role::Guest, student_code: None }
    }

    pub fn student(student_code: impl Into<String>) -> Self {
        Self { role: Role::Student, student_code: Some(student_code.into()) }
    }
}

/// Closed catalog of tables the relay may read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Students,
    Lecturers,
    News,
    Events,
    Faq,
    StudentDocuments,
    Enterprises,
    PeriodEnterprises,
    Majors,
    Courses,
    Departments,
    ChatbotCourses,
}

impl Table {
    pub const ALL: [Table; 12] = [
        Table::Students,
        Table::Lecturers,
        Table::News,
        Table::Events,
        Table::Faq,
        Table::StudentDocuments,
        Table::Enterprises,
        Table::PeriodEnterprises,
        Table::Majors,
        Table::Courses,
        Table::Departments,
        Table::ChatbotCourses,
    ];

    /// Name of the table in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Students => "students",
            Table::Lecturers => "lecturers",
            Table::News => "news",
            Table::Events => "events",
            Table::Faq => "faq",
            Table::StudentDocuments => "student_documents",
            Table::Enterprises => "enterprises",
            Table::PeriodEnterprises => "period_enterprises",
            Table::Majors => "majors",
            Table::Courses => "courses",
            Table::Departments => "departments",
            Table::ChatbotCourses => "chatbot_courses",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown table: {0}")]
pub struct UnknownTable(pub String);

impl FromStr for Table {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTable(s.to_string()))
    }
}

/// Per-request data pulled from the store, keyed by table.
pub type FetchedDataset = BTreeMap<Table, Vec<Record>>;
