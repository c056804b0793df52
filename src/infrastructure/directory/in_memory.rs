//! In-memory title directory backed by the project's table list

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::meta::{TableSummary, TitleDirectory};

/// Holds the application-scoped list of known tables
#[derive(Debug, Default)]
pub struct InMemoryTitleDirectory {
    tables: RwLock<Vec<TableSummary>>,
}

impl InMemoryTitleDirectory {
    /// Creates an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: Vec<TableSummary>) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Replaces the whole table list
    pub fn set_tables(&self, tables: Vec<TableSummary>) {
        *self.write() = tables;
    }

    /// Inserts a table, or replaces the existing row with the same id
    pub fn upsert(&self, table: TableSummary) {
        let mut tables = self.write();

        match tables.iter_mut().find(|t| t.id == table.id) {
            Some(existing) => *existing = table,
            None => tables.push(table),
        }
    }

    /// Removes the table with the given id; returns whether it was present
    pub fn remove(&self, id: &str) -> bool {
        let mut tables = self.write();
        let before = tables.len();
        tables.retain(|t| t.id != id);
        tables.len() != before
    }

    pub fn tables(&self) -> Vec<TableSummary> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<TableSummary>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<TableSummary>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TitleDirectory for InMemoryTitleDirectory {
    async fn find_id_by_title(&self, title: &str) -> Option<String> {
        self.read()
            .iter()
            .find(|t| t.title == title)
            .map(|t| t.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> InMemoryTitleDirectory {
        InMemoryTitleDirectory::with_tables(vec![
            TableSummary::new("md_1", "Users"),
            TableSummary::new("md_2", "Orders"),
        ])
    }

    #[tokio::test]
    async fn test_find_id_by_title() {
        let directory = directory();

        assert_eq!(
            directory.find_id_by_title("Orders").await,
            Some("md_2".to_string())
        );
        assert_eq!(directory.find_id_by_title("orders").await, None);
        assert_eq!(directory.find_id_by_title("md_1").await, None);
    }

    #[tokio::test]
    async fn test_upsert_renames_existing_table() {
        let directory = directory();
        directory.upsert(TableSummary::new("md_1", "Customers"));

        assert_eq!(directory.find_id_by_title("Users").await, None);
        assert_eq!(
            directory.find_id_by_title("Customers").await,
            Some("md_1".to_string())
        );
        assert_eq!(directory.tables().len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_appends_new_table() {
        let directory = InMemoryTitleDirectory::new();
        directory.upsert(TableSummary::new("md_3", "Invoices"));

        assert_eq!(
            directory.find_id_by_title("Invoices").await,
            Some("md_3".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_and_set_tables() {
        let directory = directory();

        assert!(directory.remove("md_1"));
        assert!(!directory.remove("md_1"));
        assert_eq!(directory.find_id_by_title("Users").await, None);

        directory.set_tables(vec![TableSummary::new("md_9", "Audit")]);
        assert_eq!(directory.tables(), vec![TableSummary::new("md_9", "Audit")]);
    }
}
