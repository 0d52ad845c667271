use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::repository::entities::{FieldSpec, FieldValue, InputKind, PatchError, Record, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRow {
    pub id: Uuid,
    /// Displayed verbatim, conventionally wrapped in brackets: "[Data Wizard]"
    pub title: String,
    pub description: String,
    pub order_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AchievementField {
    Title,
    Description,
    OrderIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

impl From<&AchievementRow> for Achievement {
    fn from(row: &AchievementRow) -> Self {
        Self {
            title: row.title.clone(),
            description: row.description.clone(),
        }
    }
}

impl Record for AchievementRow {
    type Field = AchievementField;

    const TABLE: Table = Table::Achievements;
    const LABEL: &'static str = "achievements";
    const FIELDS: &'static [FieldSpec<AchievementField>] = &[
        FieldSpec::new(
            AchievementField::Title,
            "Title (use brackets for title format)",
            InputKind::Text,
        )
        .placeholder("e.g., [Data Wizard]"),
        FieldSpec::new(AchievementField::Description, "Description", InputKind::Text),
        FieldSpec::new(AchievementField::OrderIndex, "Order", InputKind::Integer),
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
            order_index,
            updated_at: None,
        })
    }

    fn get(&self, field: AchievementField) -> FieldValue {
        match field {
            AchievementField::Title => FieldValue::Text(self.title.clone()),
            AchievementField::Description => FieldValue::Text(self.description.clone()),
            AchievementField::OrderIndex => FieldValue::Integer(self.order_index),
        }
    }

    fn set(&mut self, field: AchievementField, value: FieldValue) -> Result<(), PatchError> {
        match field {
            AchievementField::Title => self.title = expect_value!(value, Text, field),
            AchievementField::Description => self.description = expect_value!(value, Text, field),
            AchievementField::OrderIndex => {
                self.order_index = expect_value!(value, Integer, field)
            }
        }
        Ok(())
    }
}
