use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::repository::entities::{FieldSpec, FieldValue, InputKind, PatchError, Record, Table};

/// A row of the `skills` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    /// Intended range 0-100
    pub level: i32,
    pub order_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SkillField {
    Name,
    Level,
    OrderIndex,
}

/// A skill as shown on the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub name: String,
    pub level: i32,
}

impl From<&SkillRow> for Skill {
    fn from(row: &SkillRow) -> Self {
        Self {
            name: row.name.clone(),
            level: row.level,
        }
    }
}

impl Record for SkillRow {
    type Field = SkillField;

    const TABLE: Table = Table::Skills;
    const LABEL: &'static str = "skills";
    const FIELDS: &'static [FieldSpec<SkillField>] = &[
        FieldSpec::new(SkillField::Name, "Skill Name", InputKind::Text)
            .placeholder("e.g., SEO Optimization"),
        FieldSpec::new(SkillField::Level, "Level", InputKind::Integer).range(0..=100),
        FieldSpec::new(SkillField::OrderIndex, "Order", InputKind::Integer),
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
            name: String::new(),
            level: 50,
            order_index,
            updated_at: None,
        })
    }

    fn get(&self, field: SkillField) -> FieldValue {
        match field {
            SkillField::Name => FieldValue::Text(self.name.clone()),
            SkillField::Level => FieldValue::Integer(self.level),
            SkillField::OrderIndex => FieldValue::Integer(self.order_index),
        }
    }

    fn set(&mut self, field: SkillField, value: FieldValue) -> Result<(), PatchError> {
        match field {
            SkillField::Name => self.name = expect_value!(value, Text, field),
            SkillField::Level => self.level = expect_value!(value, Integer, field),
            SkillField::OrderIndex => self.order_index = expect_value!(value, Integer, field),
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::repository::entities::Edit;

    use super::*;

    #[test]
    fn test_blank_defaults() {
        let row = SkillRow::blank(4).unwrap();

        assert_eq!(row.level, 50);
        assert_eq!(row.order_index, 4);
        assert!(row.name.is_empty());
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut row = SkillRow::blank(1).unwrap();

        assert!(matches!(
            row.set(SkillField::Level, FieldValue::Text("high".into())),
            Err(PatchError::TypeMismatch { .. })
        ));
        assert_eq!(row.level, 50);
    }

    #[test]
    fn test_parsed_edit() {
        let mut row = SkillRow::blank(1).unwrap();

        row.apply(Edit::parse::<SkillRow>("level", "88").unwrap())
            .unwrap();

        assert_eq!(row.level, 88);
    }

    #[test]
    fn test_deserialize_storage_shape() {
        let row: SkillRow = serde_json::from_value(serde_json::json!({
            "id": "5b0b5a7e-8c9a-4a55-9a2c-3f0e1f1e2a11",
            "name": "Rust",
            "level": 90,
            "order_index": 2,
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(Skill::from(&row), Skill { name: "Rust".into(), level: 90 });
    }
}
