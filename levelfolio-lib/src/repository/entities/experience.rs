use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::repository::entities::{FieldSpec, FieldValue, InputKind, PatchError, Record, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    /// Free text range, e.g. "2023 - Present"
    pub period: String,
    pub description: Option<String>,
    pub order_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ExperienceField {
    Title,
    Company,
    Period,
    Description,
    OrderIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    pub description: Option<String>,
}

impl From<&ExperienceRow> for Experience {
    fn from(row: &ExperienceRow) -> Self {
        Self {
            title: row.title.clone(),
            company: row.company.clone(),
            period: row.period.clone(),
            description: row.description.clone(),
        }
    }
}

impl Record for ExperienceRow {
    type Field = ExperienceField;

    const TABLE: Table = Table::Experience;
    const LABEL: &'static str = "experience";
    const FIELDS: &'static [FieldSpec<ExperienceField>] = &[
        FieldSpec::new(ExperienceField::Title, "Job Title", InputKind::Text),
        FieldSpec::new(ExperienceField::Company, "Company", InputKind::Text),
        FieldSpec::new(ExperienceField::Period, "Period", InputKind::Text)
            .placeholder("e.g., 2023 - Present"),
        FieldSpec::new(
            ExperienceField::Description,
            "Description (Optional)",
            InputKind::OptionalText,
        ),
        FieldSpec::new(ExperienceField::OrderIndex, "Order", InputKind::Integer),
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
            company: String::new(),
            period: String::new(),
            description: None,
            order_index,
            updated_at: None,
        })
    }

    fn get(&self, field: ExperienceField) -> FieldValue {
        match field {
            ExperienceField::Title => FieldValue::Text(self.title.clone()),
            ExperienceField::Company => FieldValue::Text(self.company.clone()),
            ExperienceField::Period => FieldValue::Text(self.period.clone()),
            ExperienceField::Description => FieldValue::OptionalText(self.description.clone()),
            ExperienceField::OrderIndex => FieldValue::Integer(self.order_index),
        }
    }

    fn set(&mut self, field: ExperienceField, value: FieldValue) -> Result<(), PatchError> {
        match field {
            ExperienceField::Title => self.title = expect_value!(value, Text, field),
            ExperienceField::Company => self.company = expect_value!(value, Text, field),
            ExperienceField::Period => self.period = expect_value!(value, Text, field),
            ExperienceField::Description => {
                self.description = expect_value!(value, OptionalText, field)
            }
            ExperienceField::OrderIndex => self.order_index = expect_value!(value, Integer, field),
        }
        Ok(())
    }
}
