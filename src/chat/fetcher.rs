use super::policy::ChatPolicy;
use super::types::{Principal, Role, Table};
use crate::database::{DatabaseError, Record, RecordStore, SelectQuery};

/// Pulls whitelisted rows for one table at a time.
pub struct DataFetcher<'a> {
    policy: &'a ChatPolicy,
    store: &'a dyn RecordStore,
}

impl<'a> DataFetcher<'a> {
    pub fn new(policy: &'a ChatPolicy, store: &'a dyn RecordStore) -> Self {
        Self { policy, store }
    }

    /// Build the statement for `table`, or `None` when nothing may be read.
    ///
    /// Students asking about the self-record table get their own row only; a
    /// student with no code gets an empty result without a query.
    pub fn plan(&self, table: Table, principal: &Principal) -> Plan {
        let Some(columns) = self.policy.whitelist.columns(table) else {
            return Plan::Absent;
        };
        let columns = columns.to_vec();

        let self_record = &self.policy.self_record;
        if table == self_record.table && principal.role == Role::Student {
            return match principal.student_code.as_deref() {
                Some(code) => Plan::Query(SelectQuery::by_key(
                    table.as_str(),
                    columns,
                    self_record.key_column.as_str(),
                    code,
                )),
                None => Plan::Empty,
            };
        }

        Plan::Query(SelectQuery::sample(table.as_str(), columns, self.policy.sample_limit))
    }

    /// Rows of `table` visible to `principal`, projected to the whitelist.
    /// `Ok(None)` means the table is not whitelisted and no query was issued.
    pub async fn fetch(
        &self,
        table: Table,
        principal: &Principal,
    ) -> Result<Option<Vec<Record>>, DatabaseError> {
        let query = match self.plan(table, principal) {
            Plan::Absent => return Ok(None),
            Plan::Empty => return Ok(Some(Vec::new())),
            Plan::Query(query) => query,
        };

        let rows = self.store.select(&query).await?;
        let records = rows
            .into_iter()
            .take(query.limit as usize)
            .map(|row| self.policy.whitelist.project(table, row))
            .collect();
        Ok(Some(records))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Absent,
    Empty,
    Query(SelectQuery),
}
