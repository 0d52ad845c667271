use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::repository::{
    entities::Record,
    store::{Error, Result, Store},
};

pub mod entities;
pub mod seed;
pub mod store;

pub use entities::{
    Achievement, AchievementRow, Education, EducationRow, Experience, ExperienceRow, Profile,
    ProfileRow, Project, ProjectRow, ProjectStatus, Skill, SkillRow, SocialLinks, SocialLinksRow,
    Table,
};
pub use store::{MemoryStore, RestStore, TokenCell};

const ORDER_COLUMN: &str = "order_index";

/// Typed access to the content tables.
///
/// The [`Repository`] turns the raw rows of a [`Store`] into [`Record`]s and back. It is cheap
/// to clone and every clone talks to the same backend.
#[derive(Clone, Debug)]
pub struct Repository {
    store: Arc<dyn Store>,
}

impl Repository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Every row of a collection table in display order. Rows sharing an `order_index` keep
    /// the order the backend returned them in.
    pub async fn list<R: Record>(&self) -> Result<Vec<R>> {
        let rows = self.store.select_ordered(R::TABLE, ORDER_COLUMN).await?;

        let mut records = rows
            .into_iter()
            .map(decode::<R>)
            .collect::<Result<Vec<R>>>()?;
        records.sort_by_key(R::order_index);

        Ok(records)
    }

    /// The row of a singleton table, if there is one.
    pub async fn single<R: Record>(&self) -> Result<Option<R>> {
        self.store
            .select_single(R::TABLE)
            .await?
            .map(decode::<R>)
            .transpose()
    }

    /// Rows of any table: the full ordered list for collections, zero or one row for
    /// singletons.
    pub async fn fetch<R: Record>(&self) -> Result<Vec<R>> {
        if R::TABLE.is_singleton() {
            Ok(self.single::<R>().await?.into_iter().collect())
        } else {
            self.list::<R>().await
        }
    }

    /// Insert or replace `records` by id, stamping `updated_at` on each.
    pub async fn upsert<R: Record>(&self, records: &[R]) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let rows = records
            .iter()
            .map(|record| {
                let mut row = serde_json::to_value(record).map_err(|source| Error::Encode {
                    table: R::TABLE,
                    source,
                })?;
                if let Value::Object(columns) = &mut row {
                    columns.insert("updated_at".into(), Value::String(now.clone()));
                }
                Ok(row)
            })
            .collect::<Result<Vec<Value>>>()?;

        debug!("Saving {} {} row(s)", rows.len(), R::LABEL);
        self.store.upsert(R::TABLE, rows).await
    }

    pub async fn delete<R: Record>(&self, id: Uuid) -> Result<()> {
        self.store.delete(R::TABLE, id).await
    }

    #[cfg(test)]
    /// Return a [`Repository`] over a seeded in-memory backend, together with a handle to
    /// that backend for inspection and failure injection.
    pub(crate) fn mock() -> (Self, MemoryStore) {
        let store = MemoryStore::new();
        seed::seed(&store);
        (Self::new(Arc::new(store.clone())), store)
    }
}

fn decode<R: Record>(row: Value) -> Result<R> {
    serde_json::from_value(row).map_err(|source| Error::Decode {
        table: R::TABLE,
        source,
    })
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_list_is_sorted_by_order_index() {
        let (repo, store) = Repository::mock();
        let mut rows = store.rows(Table::Skills);
        rows.reverse();
        store.insert_rows(Table::Skills, rows);

        let skills = repo.list::<SkillRow>().await.unwrap();

        let order: Vec<i32> = skills.iter().map(|s| s.order_index).collect();
        assert!(order.is_sorted());
        assert_eq!(order.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_singleton() {
        let (repo, store) = Repository::mock();

        assert_eq!(repo.fetch::<ProfileRow>().await.unwrap().len(), 1);

        store.insert_rows(Table::Profile, Vec::new());
        assert!(repo.fetch::<ProfileRow>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_stamps_updated_at() {
        let (repo, store) = Repository::mock();
        let mut skill = SkillRow::blank(9).unwrap();
        skill.name = "Haskell".into();

        repo.upsert(&[skill.clone()]).await.unwrap();

        let stored = store
            .rows(Table::Skills)
            .into_iter()
            .find(|row| row["id"] == json!(skill.id))
            .unwrap();
        assert!(stored["updated_at"].is_string());

        let reread = repo.list::<SkillRow>().await.unwrap();
        let reread = reread.iter().find(|s| s.id == skill.id).unwrap();
        assert_eq!(reread.name, "Haskell");
        assert!(reread.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_malformed_row() {
        let (repo, store) = Repository::mock();
        store.insert_rows(Table::Skills, vec![json!({ "id": "not-a-uuid" })]);

        assert!(matches!(
            repo.list::<SkillRow>().await,
            Err(Error::Decode {
                table: Table::Skills,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, _store) = Repository::mock();
        let achievements = repo.list::<AchievementRow>().await.unwrap();
        let first = achievements.first().unwrap().id;

        repo.delete::<AchievementRow>(first).await.unwrap();

        let remaining = repo.list::<AchievementRow>().await.unwrap();
        assert_eq!(remaining.len(), achievements.len() - 1);
        assert!(remaining.iter().all(|a| a.id != first));
    }
}
