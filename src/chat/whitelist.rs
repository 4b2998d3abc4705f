use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::Table;
use crate::database::Record;

/// Columns permitted to leave the store, per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnWhitelist {
    tables: HashMap<Table, Vec<String>>,
}

impl ColumnWhitelist {
    pub fn new(tables: HashMap<Table, Vec<String>>) -> Self {
        Self { tables }
    }

    /// Ordered column list for `table`, or `None` when the table was never reviewed.
    pub fn columns(&self, table: Table) -> Option<&[String]> {
        self.tables.get(&table).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Table, &Vec<String>)> {
        self.tables.iter()
    }

    /// Drop every key of `record` that is not whitelisted for `table`.
    pub fn project(&self, table: Table, record: Record) -> Record {
        let Some(columns) = self.columns(table) else {
            return Record::new();
        };
        record
            .into_iter()
            .filter(|(key, _)| columns.iter().any(|c| c == key))
            .collect()
    }
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnWhitelist {
    fn default() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            Table::Students,
            cols(&["student_code", "name", "email", "phone", "class_name", "major_id", "gpa"]),
        );
        tables.insert(
            Table::Lecturers,
            cols(&[
                "name",
                "email",
                "academic_degree",
                "academic_rank",
                "research_direction",
                "department_id",
            ]),
        );
        tables.insert(Table::StudentDocuments, cols(&["title", "category", "description"]));
        tables.insert(Table::News, cols(&["title", "summary", "content"]));
        tables.insert(Table::Events, cols(&["title", "description", "event_date", "location"]));
        tables.insert(Table::Faq, cols(&["question", "answer"]));
        tables.insert(Table::PeriodEnterprises, cols(&["name", "job_description", "address"]));
        tables.insert(Table::Enterprises, cols(&["name", "industry", "description"]));
        tables.insert(Table::Majors, cols(&["name", "description", "degree", "duration_years"]));
        tables.insert(
            Table::Courses,
            cols(&["name", "description", "credits", "semester", "category"]),
        );
        tables.insert(Table::Departments, cols(&["name", "description"]));
        tables.insert(Table::ChatbotCourses, cols(&["course_code", "course_name", "lecturers"]));
        Self { tables }
    }
}
