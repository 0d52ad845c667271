//! The admin editor, shared by every entity.
//!
//! [`Editor`] holds a local copy of one table and tracks where it is in the
//! load / edit / save cycle. The synchronous transitions (`loaded`, `add`, `edit`,
//! `begin_save`, `saved`, `deleted`) never touch the backend so that a frontend can drive
//! them from its own event loop; the `async` helpers run the whole round trip for callers
//! that can simply await.

use std::{collections::HashSet, fmt::Display};

use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::repository::{
    Repository,
    entities::{Edit, PatchError, Record},
    store,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a save is already in progress")]
    Busy,
    #[error("{0} cannot be added or deleted")]
    Singleton(&'static str),
    #[error("no row with id {0}")]
    RowNotFound(Uuid),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Store(#[from] store::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Saving,
}

/// Transient feedback shown above the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Saved(String),
    Error(String),
}

impl Banner {
    pub fn text(&self) -> &str {
        match self {
            Banner::Saved(text) | Banner::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Banner::Error(_))
    }
}

#[derive(Debug, Clone)]
pub struct Editor<R: Record> {
    rows: Vec<R>,
    phase: Phase,
    dirty: bool,
    deleting: HashSet<Uuid>,
    banner: Option<Banner>,
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<R: Record> Editor<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            phase: Phase::Loading,
            dirty: false,
            deleting: HashSet::new(),
            banner: None,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row(&self, id: Uuid) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ready with local modifications that have not been saved.
    pub fn is_editing(&self) -> bool {
        self.phase == Phase::Ready && self.dirty
    }

    pub fn is_deleting(&self, id: Uuid) -> bool {
        self.deleting.contains(&id)
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// The message to show instead of a form when a singleton has no row.
    pub fn missing(&self) -> Option<String> {
        (R::TABLE.is_singleton() && self.phase == Phase::Ready && self.rows.is_empty())
            .then(|| format!("No {} found", R::LABEL))
    }

    pub fn loaded<E: Display>(&mut self, result: std::result::Result<Vec<R>, E>) {
        self.phase = Phase::Ready;
        self.dirty = false;

        match result {
            Ok(rows) => {
                debug!("Loaded {} {} row(s)", rows.len(), R::LABEL);
                self.rows = rows;
            }
            Err(err) => {
                error!("Failed to load {}: {err}", R::LABEL);
                self.banner = Some(Banner::Error(format!("Error loading {}", R::LABEL)));
            }
        }
    }

    /// Append a blank row at the end of the display order and return its id.
    pub fn add(&mut self) -> Result<Uuid> {
        if self.phase == Phase::Saving {
            return Err(Error::Busy);
        }

        let next = i32::try_from(self.rows.len())
            .unwrap_or(i32::MAX)
            .saturating_add(1);
        let row = R::blank(next).ok_or(Error::Singleton(R::LABEL))?;
        let id = row.id();

        self.rows.push(row);
        self.dirty = true;

        Ok(id)
    }

    /// Apply `edit` to the row `id`. A rejected edit leaves the row untouched.
    pub fn edit(&mut self, id: Uuid, edit: Edit<R::Field>) -> Result<()> {
        if self.phase == Phase::Saving {
            return Err(Error::Busy);
        }

        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(Error::RowNotFound(id))?;

        let mut patched = row.clone();
        patched.apply(edit)?;
        *row = patched;
        self.dirty = true;

        Ok(())
    }

    /// Check that `id` may be deleted and mark it as in flight. The remote delete is issued by
    /// the caller, whose outcome is reported back through [`Editor::deleted`].
    pub fn begin_delete(&mut self, id: Uuid) -> Result<()> {
        if R::TABLE.is_singleton() {
            return Err(Error::Singleton(R::LABEL));
        }
        if self.phase == Phase::Saving {
            return Err(Error::Busy);
        }
        if self.row(id).is_none() {
            return Err(Error::RowNotFound(id));
        }

        self.deleting.insert(id);
        Ok(())
    }

    /// Complete a delete. The row only disappears locally once the backend has confirmed it.
    /// The remote error, if any, is handed back after the banner has been set.
    pub fn deleted<E: Display>(
        &mut self,
        id: Uuid,
        result: std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        self.deleting.remove(&id);

        match &result {
            Ok(()) => {
                debug!("Deleted {} row {id}", R::LABEL);
                self.rows.retain(|row| row.id() != id);
            }
            Err(err) => {
                error!("Failed to delete {} row {id}: {err}", R::LABEL);
                self.banner = Some(Banner::Error(format!("Error deleting {}", R::LABEL)));
            }
        }

        result
    }

    /// Enter the saving phase and return the rows to upsert. Rows with a delete in flight are
    /// left out so that the upsert cannot bring them back.
    pub fn begin_save(&mut self) -> Result<Vec<R>> {
        if self.phase != Phase::Ready {
            return Err(Error::Busy);
        }

        self.phase = Phase::Saving;
        self.banner = None;

        Ok(self
            .rows
            .iter()
            .filter(|row| !self.deleting.contains(&row.id()))
            .cloned()
            .collect())
    }

    /// Complete a save with the re-fetched rows. On failure the local rows are kept as they
    /// were so that nothing typed is lost.
    pub fn saved<E: Display>(
        &mut self,
        result: std::result::Result<Vec<R>, E>,
    ) -> std::result::Result<(), E> {
        self.phase = Phase::Ready;

        match result {
            Ok(rows) => {
                self.rows = rows;
                self.dirty = false;
                self.banner = Some(Banner::Saved(format!(
                    "{} saved successfully!",
                    capitalize(R::LABEL)
                )));
                Ok(())
            }
            Err(err) => {
                error!("Failed to save {}: {err}", R::LABEL);
                self.banner = Some(Banner::Error(format!("Error saving {}", R::LABEL)));
                Err(err)
            }
        }
    }

    /// Load (or reload) the table from `repo`.
    pub async fn refresh(&mut self, repo: &Repository) {
        self.phase = Phase::Loading;
        let result = fetch::<R>(repo.clone()).await;
        self.loaded(result);
    }

    /// Delete the row `id` remotely, then locally.
    pub async fn delete(&mut self, repo: &Repository, id: Uuid) -> Result<()> {
        self.begin_delete(id)?;
        let result = remove::<R>(repo.clone(), id).await;

        Ok(self.deleted(id, result.map(|_| ()))?)
    }

    /// Upsert every local row and reload.
    pub async fn save(&mut self, repo: &Repository) -> Result<()> {
        let rows = self.begin_save()?;
        let result = commit(repo.clone(), rows).await;

        Ok(self.saved(result)?)
    }
}

impl<R: Record> Default for Editor<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the rows an editor for `R` works on.
pub async fn fetch<R: Record>(repo: Repository) -> store::Result<Vec<R>> {
    repo.fetch::<R>().await
}

/// Upsert `rows` in one request, then read the table back.
pub async fn commit<R: Record>(repo: Repository, rows: Vec<R>) -> store::Result<Vec<R>> {
    repo.upsert(&rows).await?;
    repo.fetch::<R>().await
}

/// Delete one row, yielding its id back for the completion message.
pub async fn remove<R: Record>(repo: Repository, id: Uuid) -> store::Result<Uuid> {
    repo.delete::<R>(id).await?;
    Ok(id)
}

#[cfg(test)]
mod test {
    use crate::repository::{
        ProfileRow, ProjectRow, SkillRow, SocialLinksRow, Table,
        entities::{FieldValue, SkillField},
    };

    use super::*;

    async fn ready<R: Record>(repo: &Repository) -> Editor<R> {
        let mut editor = Editor::new();
        editor.refresh(repo).await;
        editor
    }

    #[tokio::test]
    async fn test_load() {
        let (repo, _store) = Repository::mock();

        let editor = ready::<SkillRow>(&repo).await;

        assert_eq!(editor.phase(), Phase::Ready);
        assert_eq!(editor.rows().len(), 4);
        assert!(!editor.is_editing());
    }

    #[tokio::test]
    async fn test_load_failure() {
        let (repo, store) = Repository::mock();
        store.fail_table(Table::Skills);

        let editor = ready::<SkillRow>(&repo).await;

        assert_eq!(
            editor.banner(),
            Some(&Banner::Error("Error loading skills".into()))
        );
        assert!(editor.rows().is_empty());
    }

    #[tokio::test]
    async fn test_add_uses_next_order_index() {
        let (repo, _store) = Repository::mock();
        let mut editor = ready::<SkillRow>(&repo).await;

        let id = editor.add().unwrap();

        let added = editor.row(id).unwrap();
        assert_eq!(added.order_index, 5);
        assert_eq!(added.level, 50);
        assert!(editor.is_editing());
    }

    #[tokio::test]
    async fn test_singleton_rejects_add_and_delete() {
        let (repo, _store) = Repository::mock();
        let mut editor = ready::<ProfileRow>(&repo).await;
        let id = editor.rows().first().unwrap().id;

        assert!(matches!(editor.add(), Err(Error::Singleton("profile"))));
        assert!(matches!(
            editor.begin_delete(id),
            Err(Error::Singleton("profile"))
        ));
    }

    #[tokio::test]
    async fn test_missing_singleton() {
        let (repo, store) = Repository::mock();
        store.insert_rows(Table::SocialLinks, Vec::new());

        let editor = ready::<SocialLinksRow>(&repo).await;

        assert_eq!(editor.missing().as_deref(), Some("No social links found"));
    }

    #[tokio::test]
    async fn test_save_during_delete_keeps_row_deleted() {
        let (repo, _store) = Repository::mock();
        let mut editor = ready::<SkillRow>(&repo).await;
        let id = editor.rows().first().unwrap().id;

        editor.begin_delete(id).unwrap();
        let rows = editor.begin_save().unwrap();
        assert!(rows.iter().all(|row| row.id != id));

        let removed = remove::<SkillRow>(repo.clone(), id).await;
        editor.saved(commit(repo.clone(), rows).await).unwrap();
        editor.deleted(id, removed.map(|_| ())).unwrap();

        assert!(editor.row(id).is_none());
        let stored = repo.list::<SkillRow>().await.unwrap();
        assert!(stored.iter().all(|row| row.id != id));
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn test_save_round_trip() {
        let (repo, _store) = Repository::mock();
        let mut editor = ready::<SkillRow>(&repo).await;
        let id = editor.rows().first().unwrap().id;

        editor
            .edit(id, Edit::Set(SkillField::Level, FieldValue::Integer(99)))
            .unwrap();
        editor.save(&repo).await.unwrap();

        assert_eq!(
            editor.banner(),
            Some(&Banner::Saved("Skills saved successfully!".into()))
        );
        assert!(!editor.is_editing());

        let reloaded = ready::<SkillRow>(&repo).await;
        assert_eq!(reloaded.row(id).unwrap().level, 99);
    }

    #[tokio::test]
    async fn test_save_twice_is_idempotent() {
        let (repo, _store) = Repository::mock();
        let mut editor = ready::<ProjectRow>(&repo).await;
        editor.add().unwrap();

        editor.save(&repo).await.unwrap();
        let first: Vec<Uuid> = editor.rows().iter().map(|r| r.id).collect();
        editor.save(&repo).await.unwrap();
        let second: Vec<Uuid> = editor.rows().iter().map(|r| r.id).collect();

        assert_eq!(first, second);
        assert_eq!(second.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_local_rows() {
        let (repo, store) = Repository::mock();
        let mut editor = ready::<SkillRow>(&repo).await;
        let id = editor.add().unwrap();
        store.fail_table(Table::Skills);

        assert!(editor.save(&repo).await.is_err());

        assert_eq!(
            editor.banner(),
            Some(&Banner::Error("Error saving skills".into()))
        );
        assert!(editor.row(id).is_some());
        assert!(editor.is_editing());
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, _store) = Repository::mock();
        let mut editor = ready::<SkillRow>(&repo).await;
        let id = editor.rows().first().unwrap().id;

        editor.delete(&repo, id).await.unwrap();

        assert!(editor.row(id).is_none());
        assert!(!editor.is_deleting(id));
        let reloaded = ready::<SkillRow>(&repo).await;
        assert!(reloaded.row(id).is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_row() {
        let (repo, store) = Repository::mock();
        let mut editor = ready::<SkillRow>(&repo).await;
        let id = editor.rows().first().unwrap().id;
        store.fail_table(Table::Skills);

        assert!(editor.delete(&repo, id).await.is_err());

        assert!(editor.row(id).is_some());
        assert_eq!(
            editor.banner(),
            Some(&Banner::Error("Error deleting skills".into()))
        );
    }

    #[tokio::test]
    async fn test_rejected_edit_leaves_row_unchanged() {
        let (repo, _store) = Repository::mock();
        let mut editor = ready::<SkillRow>(&repo).await;
        let before = editor.rows().first().unwrap().clone();

        let edit = Edit::parse::<SkillRow>("level", "very high");

        assert!(edit.is_err());
        assert!(matches!(
            editor.edit(before.id, Edit::Set(SkillField::Level, FieldValue::Text("x".into()))),
            Err(Error::Patch(PatchError::TypeMismatch { .. }))
        ));
        assert_eq!(editor.row(before.id), Some(&before));
    }

    #[test]
    fn test_busy_while_saving() {
        let mut editor = Editor::<SkillRow>::new();
        editor.loaded::<store::Error>(Ok(Vec::new()));

        editor.begin_save().unwrap();

        assert!(matches!(editor.begin_save(), Err(Error::Busy)));
        assert!(matches!(editor.add(), Err(Error::Busy)));
    }
}
