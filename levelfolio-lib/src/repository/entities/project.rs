use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};
use uuid::Uuid;

use crate::repository::entities::{FieldSpec, FieldValue, InputKind, PatchError, Record, Table};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
pub enum ProjectStatus {
    Completed,
    #[default]
    Ongoing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub status: ProjectStatus,
    /// Intended range 0-100
    pub progress: i32,
    pub role: Option<String>,
    pub order_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ProjectField {
    Title,
    Description,
    Role,
    TechStack,
    Status,
    Progress,
    OrderIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub status: ProjectStatus,
    pub progress: i32,
    pub role: Option<String>,
}

impl From<&ProjectRow> for Project {
    fn from(row: &ProjectRow) -> Self {
        Self {
            title: row.title.clone(),
            description: row.description.clone(),
            tech_stack: row.tech_stack.clone(),
            status: row.status,
            progress: row.progress,
            role: row.role.clone(),
        }
    }
}

impl Record for ProjectRow {
    type Field = ProjectField;

    const TABLE: Table = Table::Projects;
    const LABEL: &'static str = "projects";
    const FIELDS: &'static [FieldSpec<ProjectField>] = &[
        FieldSpec::new(ProjectField::Title, "Project Title", InputKind::Text)
            .placeholder("e.g., BLOCKCHAIN IOT SECURITY"),
        FieldSpec::new(ProjectField::Description, "Description", InputKind::LongText)
            .placeholder("Project description"),
        FieldSpec::new(ProjectField::Role, "Role (Optional)", InputKind::OptionalText)
            .placeholder("e.g., Lead Developer"),
        FieldSpec::new(ProjectField::TechStack, "Tech Stack", InputKind::List)
            .placeholder("Add technology"),
        FieldSpec::new(
            ProjectField::Status,
            "Status",
            InputKind::Choice(ProjectStatus::VARIANTS),
        ),
        FieldSpec::new(ProjectField::Progress, "Progress", InputKind::Integer).range(0..=100),
        FieldSpec::new(ProjectField::OrderIndex, "Order", InputKind::Integer),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn order_index(&self) -> Option<i32> {
        Some(self.order_index)
    }

    fn blank(order_index: i32) -> Option<Self> {
        Some(Self {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            tech_stack: Vec::new(),
            status: ProjectStatus::Ongoing,
            progress: 0,
            role: None,
            order_index,
            updated_at: None,
        })
    }

    fn get(&self, field: ProjectField) -> FieldValue {
        match field {
            ProjectField::Title => FieldValue::Text(self.title.clone()),
            ProjectField::Description => FieldValue::Text(self.description.clone()),
            ProjectField::Role => FieldValue::OptionalText(self.role.clone()),
            ProjectField::TechStack => FieldValue::List(self.tech_stack.clone()),
            ProjectField::Status => FieldValue::Text(self.status.to_string()),
            ProjectField::Progress => FieldValue::Integer(self.progress),
            ProjectField::OrderIndex => FieldValue::Integer(self.order_index),
        }
    }

    fn set(&mut self, field: ProjectField, value: FieldValue) -> Result<(), PatchError> {
        match field {
            ProjectField::Title => self.title = expect_value!(value, Text, field),
            ProjectField::Description => self.description = expect_value!(value, Text, field),
            ProjectField::Role => self.role = expect_value!(value, OptionalText, field),
            ProjectField::TechStack => self.tech_stack = expect_value!(value, List, field),
            ProjectField::Status => {
                let input = expect_value!(value, Text, field);
                self.status = input.parse().map_err(|_| PatchError::InvalidChoice {
                    field: field.to_string(),
                    input,
                    options: ProjectStatus::VARIANTS,
                })?;
            }
            ProjectField::Progress => self.progress = expect_value!(value, Integer, field),
            ProjectField::OrderIndex => self.order_index = expect_value!(value, Integer, field),
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::repository::entities::Edit;

    use super::*;

    #[test]
    fn test_status_serializes_as_title_case() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::Completed).unwrap(),
            serde_json::json!("Completed")
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(matches!(
            Edit::parse::<ProjectRow>("status", "Abandoned"),
            Err(PatchError::InvalidChoice { .. })
        ));

        let mut row = ProjectRow::blank(1).unwrap();
        assert!(matches!(
            row.set(ProjectField::Status, FieldValue::Text("Abandoned".into())),
            Err(PatchError::InvalidChoice { .. })
        ));
        assert_eq!(row.status, ProjectStatus::Ongoing);
    }

    #[test]
    fn test_status_choice() {
        let mut row = ProjectRow::blank(1).unwrap();

        row.apply(Edit::parse::<ProjectRow>("status", "Completed").unwrap())
            .unwrap();

        assert_eq!(row.status, ProjectStatus::Completed);
    }

    #[test]
    fn test_tech_stack_append_and_remove() {
        let mut row = ProjectRow::blank(1).unwrap();

        row.apply(Edit::Push(ProjectField::TechStack, " Rust ".into()))
            .unwrap();
        row.apply(Edit::Push(ProjectField::TechStack, "   ".into()))
            .unwrap();
        row.apply(Edit::Push(ProjectField::TechStack, "SQL".into()))
            .unwrap();
        row.apply(Edit::Remove(ProjectField::TechStack, 0)).unwrap();

        assert_eq!(row.tech_stack, ["SQL"]);
        assert!(matches!(
            row.apply(Edit::Remove(ProjectField::TechStack, 3)),
            Err(PatchError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_push_to_scalar_field() {
        let mut row = ProjectRow::blank(1).unwrap();

        assert!(matches!(
            row.apply(Edit::Push(ProjectField::Title, "x".into())),
            Err(PatchError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_blank_defaults() {
        let row = ProjectRow::blank(3).unwrap();

        assert_eq!(row.status, ProjectStatus::Ongoing);
        assert_eq!(row.progress, 0);
        assert!(row.tech_stack.is_empty());
        assert_eq!(row.role, None);
    }
}
