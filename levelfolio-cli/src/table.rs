//! Row level commands, applied through the same [`Editor`] the admin panel uses.

use colored::Colorize;
use levelfolio_lib::{
    Edit, Editor, Record, Result, Table, editor,
    repository::{
        AchievementRow, EducationRow, ExperienceRow, ProfileRow, ProjectRow, Repository,
        SkillRow, SocialLinksRow,
    },
};
use uuid::Uuid;

/// Call the generic `$handler` with the row type of `$table`.
macro_rules! for_table {
    ($table:expr, $handler:ident ( $($arg:expr),* )) => {
        match $table {
            Table::Profile => $handler::<ProfileRow>($($arg),*).await,
            Table::Skills => $handler::<SkillRow>($($arg),*).await,
            Table::Education => $handler::<EducationRow>($($arg),*).await,
            Table::Experience => $handler::<ExperienceRow>($($arg),*).await,
            Table::Projects => $handler::<ProjectRow>($($arg),*).await,
            Table::Achievements => $handler::<AchievementRow>($($arg),*).await,
            Table::SocialLinks => $handler::<SocialLinksRow>($($arg),*).await,
        }
    };
}

pub async fn list(repo: &Repository, table: Table) -> Result<()> {
    for_table!(table, list_rows(repo))
}

pub async fn set(
    repo: &Repository,
    table: Table,
    id: Uuid,
    field: &str,
    value: &str,
) -> Result<()> {
    for_table!(table, set_field(repo, id, field, value))
}

pub async fn add(repo: &Repository, table: Table) -> Result<()> {
    for_table!(table, add_row(repo))
}

pub async fn delete(repo: &Repository, table: Table, id: Uuid) -> Result<()> {
    for_table!(table, delete_row(repo, id))
}

async fn open<R: Record>(repo: &Repository) -> Result<Editor<R>> {
    let rows = editor::fetch::<R>(repo.clone()).await?;
    let mut editor = Editor::new();
    editor.loaded::<levelfolio_lib::Error>(Ok(rows));

    Ok(editor)
}

fn print_row<R: Record>(row: &R) {
    println!("{}", row.id().to_string().bold());
    for spec in R::FIELDS {
        println!(
            "  {:<16} {}",
            spec.field.to_string().dimmed(),
            row.get(spec.field)
        );
    }
}

fn print_banner<R: Record>(editor: &Editor<R>) {
    if let Some(banner) = editor.banner() {
        println!("{}", banner.text().green());
    }
}

async fn list_rows<R: Record>(repo: &Repository) -> Result<()> {
    let editor = open::<R>(repo).await?;

    if editor.rows().is_empty() {
        println!("No {} found", R::LABEL);
    }
    editor.rows().iter().for_each(print_row::<R>);

    Ok(())
}

async fn set_field<R: Record>(
    repo: &Repository,
    id: Uuid,
    field: &str,
    value: &str,
) -> Result<()> {
    let mut editor = open::<R>(repo).await?;

    let edit = Edit::parse::<R>(field, value)?;
    editor.edit(id, edit)?;
    editor.save(repo).await?;

    print_banner(&editor);
    if let Some(row) = editor.row(id) {
        print_row(row);
    }
    Ok(())
}

async fn add_row<R: Record>(repo: &Repository) -> Result<()> {
    let mut editor = open::<R>(repo).await?;

    let id = editor.add()?;
    editor.save(repo).await?;

    print_banner(&editor);
    if let Some(row) = editor.row(id) {
        print_row(row);
    }
    Ok(())
}

async fn delete_row<R: Record>(repo: &Repository, id: Uuid) -> Result<()> {
    let mut editor = open::<R>(repo).await?;

    editor.delete(repo, id).await?;

    println!("Deleted {} row {id}", R::LABEL);
    Ok(())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use levelfolio_lib::{
        Error,
        repository::{MemoryStore, seed},
    };

    use super::*;

    fn repo() -> Repository {
        let store = MemoryStore::new();
        seed::seed(&store);
        Repository::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_set_persists() {
        let repo = repo();
        let skills = repo.list::<SkillRow>().await.unwrap();
        let id = skills.first().unwrap().id;

        set(&repo, Table::Skills, id, "level", "99").await.unwrap();

        let skills = repo.list::<SkillRow>().await.unwrap();
        assert_eq!(skills.iter().find(|s| s.id == id).unwrap().level, 99);
    }

    #[tokio::test]
    async fn test_invalid_integer_rejected() {
        let repo = repo();
        let id = repo.list::<SkillRow>().await.unwrap().first().unwrap().id;

        let result = set(&repo, Table::Skills, id, "level", "lots").await;

        assert!(matches!(result, Err(Error::Patch(_))));
    }

    #[tokio::test]
    async fn test_add_appends_row() {
        let repo = repo();
        let before = repo.list::<AchievementRow>().await.unwrap().len();

        add(&repo, Table::Achievements).await.unwrap();

        assert_eq!(
            repo.list::<AchievementRow>().await.unwrap().len(),
            before + 1
        );
    }

    #[tokio::test]
    async fn test_singletons_cannot_be_added() {
        let result = add(&repo(), Table::Profile).await;

        assert!(matches!(
            result,
            Err(Error::Editor(editor::Error::Singleton("profile")))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_row() {
        let result = delete(&repo(), Table::Projects, Uuid::nil()).await;

        assert!(matches!(
            result,
            Err(Error::Editor(editor::Error::RowNotFound(_)))
        ));
    }
}
