use serde_json::Value;
use sqlx::postgres::PgArguments;

use crate::database::manager::DatabaseError;

/// Rendered statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// `column = value` restriction on a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFilter {
    pub column: String,
    pub value: String,
}

/// Read-only, column-projected, bounded select against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub key: Option<KeyFilter>,
    pub limit: u32,
}

impl SelectQuery {
    pub fn sample(table: impl Into<String>, columns: Vec<String>, limit: u32) -> Self {
        Self { table: table.into(), columns, key: None, limit }
    }

    pub fn by_key(
        table: impl Into<String>,
        columns: Vec<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            columns,
            key: Some(KeyFilter { column: column.into(), value: value.into() }),
            limit: 1,
        }
    }

    /// Render as a single statement returning one JSON object per row in a
    /// column named `row`.
    pub fn to_sql(&self) -> Result<SqlResult, DatabaseError> {
        validate(&self.table)?;
        if self.columns.is_empty() {
            return Err(DatabaseError::QueryError(format!(
                "No columns selected for {}",
                self.table
            )));
        }
        for column in &self.columns {
            validate(column)?;
        }

        let select = self
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut params = Vec::new();
        let mut inner = format!("SELECT {} FROM {}", select, quote_identifier(&self.table));

        if let Some(key) = &self.key {
            validate(&key.column)?;
            params.push(Value::String(key.value.clone()));
            inner.push_str(&format!(" WHERE {} = ${}", quote_identifier(&key.column), params.len()));
        }

        params.push(Value::from(self.limit as i64));
        inner.push_str(&format!(" LIMIT ${}", params.len()));

        Ok(SqlResult {
            query: format!("SELECT row_to_json(t) AS row FROM ({}) t", inner),
            params,
        })
    }
}

/// Plain SQL identifier: ASCII letter or underscore, then letters, digits, underscores.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate(name: &str) -> Result<(), DatabaseError> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_string()))
    }
}

/// Quote SQL identifier to prevent injection
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
