use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Connection, PgConnection, Row};
use tracing::{debug, warn};

use super::manager::{DatabaseError, DatabaseManager};
use super::query::{bind_param, SelectQuery};
use super::Record;

/// Read-only access to the backing store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run one bounded select and return its rows as JSON objects.
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, DatabaseError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Postgres store opening one connection per call.
pub struct PgRecordStore {
    manager: DatabaseManager,
}

impl PgRecordStore {
    pub fn new(manager: DatabaseManager) -> Self {
        Self { manager }
    }

    async fn run_select(conn: &mut PgConnection, query: &SelectQuery) -> Result<Vec<Record>, DatabaseError> {
        let sql_result = query.to_sql()?;
        debug!(table = %query.table, "{}", sql_result.query);

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&mut *conn).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match row.try_get::<Value, _>("row")? {
                Value::Object(map) => records.push(map),
                other => {
                    return Err(DatabaseError::QueryError(format!(
                        "Expected a JSON object per row, got {}",
                        other
                    )))
                }
            }
        }
        Ok(records)
    }
}

/// Close `conn`, logging instead of failing: the statement already ran.
async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close store connection: {}", e);
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, DatabaseError> {
        // Validate before opening a connection.
        query.to_sql()?;
        let mut conn = self.manager.connect().await?;
        let result = Self::run_select(&mut conn, query).await;
        release(conn).await;
        result
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        let mut conn = self.manager.connect().await?;
        let result = sqlx::query("SELECT 1").execute(&mut conn).await;
        release(conn).await;
        result.map(|_| ()).map_err(DatabaseError::from)
    }
}
