pub mod manager;
pub mod query;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use query::{KeyFilter, SelectQuery, SqlResult};
pub use store::{PgRecordStore, RecordStore};

/// One row as a JSON object of column -> value.
pub type Record = serde_json::Map<String, serde_json::Value>;
