use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::repository::{
    entities::Table,
    store::{Error, Result, Store},
};

/// In-process [`Store`] used when no remote backend is configured, and by tests.
///
/// Rows are kept as the JSON documents the remote backend would hold. Individual tables can be
/// marked as failing to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<Table, Vec<Value>>>>,
    failing: Arc<RwLock<HashSet<Table>>>,
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of `table` wholesale.
    pub fn insert_rows(&self, table: Table, rows: Vec<Value>) {
        self.tables.write().insert(table, rows);
    }

    /// Make every subsequent operation on `table` fail with [`Error::Unavailable`].
    pub fn fail_table(&self, table: Table) {
        self.failing.write().insert(table);
    }

    pub fn restore_table(&self, table: Table) {
        self.failing.write().remove(&table);
    }

    /// Raw rows of `table` in storage order.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables.read().get(&table).cloned().unwrap_or_default()
    }

    fn check(&self, table: Table) -> Result<()> {
        if self.failing.read().contains(&table) {
            return Err(Error::Unavailable(table));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select_ordered(&self, table: Table, order_by: &str) -> Result<Vec<Value>> {
        self.check(table)?;

        let mut rows = self.rows(table);
        // Stable, so rows sharing a position keep their storage order
        rows.sort_by_key(|row| row.get(order_by).and_then(Value::as_i64));
        Ok(rows)
    }

    async fn select_single(&self, table: Table) -> Result<Option<Value>> {
        self.check(table)?;

        let mut rows = self.rows(table);
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            count => Err(Error::MultipleRows { table, count }),
        }
    }

    async fn upsert(&self, table: Table, rows: Vec<Value>) -> Result<()> {
        self.check(table)?;
        debug!("Upserting {} row(s) into in-memory {table}", rows.len());

        let mut tables = self.tables.write();
        let stored = tables.entry(table).or_default();

        for row in rows {
            let position = row_id(&row).and_then(|id| {
                stored
                    .iter()
                    .position(|candidate| row_id(candidate) == Some(id))
            });

            match position {
                // Swap the replacement into place, keeping storage order
                Some(index) => {
                    stored.push(row);
                    stored.swap_remove(index);
                }
                None => stored.push(row),
            }
        }

        Ok(())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<()> {
        self.check(table)?;

        let id = id.to_string();
        if let Some(stored) = self.tables.write().get_mut(&table) {
            stored.retain(|row| row_id(row) != Some(id.as_str()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn skill(id: Uuid, name: &str, order_index: i64) -> Value {
        json!({ "id": id, "name": name, "level": 50, "order_index": order_index })
    }

    #[tokio::test]
    async fn test_select_ordered_is_stable() {
        let store = MemoryStore::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store.insert_rows(
            Table::Skills,
            vec![skill(a, "SQL", 2), skill(b, "Python", 1), skill(c, "Go", 2)],
        );

        let names: Vec<Value> = store
            .select_ordered(Table::Skills, "order_index")
            .await
            .unwrap()
            .into_iter()
            .map(|row| row["name"].clone())
            .collect();

        assert_eq!(names, [json!("Python"), json!("SQL"), json!("Go")]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store.insert_rows(Table::Skills, vec![skill(id, "SQL", 1)]);

        store
            .upsert(
                Table::Skills,
                vec![skill(id, "PostgreSQL", 1), skill(Uuid::new_v4(), "Rust", 2)],
            )
            .await
            .unwrap();

        let rows = store.rows(Table::Skills);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.first().unwrap()["name"], json!("PostgreSQL"));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_ok() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store.insert_rows(Table::Skills, vec![skill(id, "SQL", 1)]);

        store.delete(Table::Skills, Uuid::new_v4()).await.unwrap();
        assert_eq!(store.rows(Table::Skills).len(), 1);

        store.delete(Table::Skills, id).await.unwrap();
        assert!(store.rows(Table::Skills).is_empty());
    }

    #[tokio::test]
    async fn test_select_single() {
        let store = MemoryStore::new();
        assert_eq!(store.select_single(Table::Profile).await.unwrap(), None);

        store.insert_rows(Table::Profile, vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        assert!(matches!(
            store.select_single(Table::Profile).await,
            Err(Error::MultipleRows { count: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_failing_table() {
        let store = MemoryStore::new();
        store.fail_table(Table::Projects);

        assert!(matches!(
            store.select_ordered(Table::Projects, "order_index").await,
            Err(Error::Unavailable(Table::Projects))
        ));
        assert!(store.select_ordered(Table::Skills, "order_index").await.is_ok());

        store.restore_table(Table::Projects);
        assert!(store.select_ordered(Table::Projects, "order_index").await.is_ok());
    }
}
