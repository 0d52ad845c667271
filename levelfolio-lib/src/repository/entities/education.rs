use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::repository::entities::{FieldSpec, FieldValue, InputKind, PatchError, Record, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRow {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    /// Free text range, e.g. "2019 - 2023"
    pub years: String,
    pub level_gain: Option<i32>,
    pub order_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum EducationField {
    Degree,
    Institution,
    Years,
    LevelGain,
    OrderIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub years: String,
    pub level_gain: Option<i32>,
}

impl From<&EducationRow> for Education {
    fn from(row: &EducationRow) -> Self {
        Self {
            degree: row.degree.clone(),
            institution: row.institution.clone(),
            years: row.years.clone(),
            level_gain: row.level_gain,
        }
    }
}

impl Record for EducationRow {
    type Field = EducationField;

    const TABLE: Table = Table::Education;
    const LABEL: &'static str = "education";
    const FIELDS: &'static [FieldSpec<EducationField>] = &[
        FieldSpec::new(EducationField::Degree, "Degree", InputKind::Text)
            .placeholder("e.g., Bachelor of Technology"),
        FieldSpec::new(EducationField::Institution, "Institution", InputKind::Text),
        FieldSpec::new(EducationField::Years, "Years", InputKind::Text)
            .placeholder("e.g., 2019 - 2023"),
        FieldSpec::new(
            EducationField::LevelGain,
            "Level Gain (Optional)",
            InputKind::OptionalInteger,
        ),
        FieldSpec::new(EducationField::OrderIndex, "Order", InputKind::Integer),
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
            degree: String::new(),
            institution: String::new(),
            years: String::new(),
            level_gain: None,
            order_index,
            updated_at: None,
        })
    }

    fn get(&self, field: EducationField) -> FieldValue {
        match field {
            EducationField::Degree => FieldValue::Text(self.degree.clone()),
            EducationField::Institution => FieldValue::Text(self.institution.clone()),
            EducationField::Years => FieldValue::Text(self.years.clone()),
            EducationField::LevelGain => FieldValue::OptionalInteger(self.level_gain),
            EducationField::OrderIndex => FieldValue::Integer(self.order_index),
        }
    }

    fn set(&mut self, field: EducationField, value: FieldValue) -> Result<(), PatchError> {
        match field {
            EducationField::Degree => self.degree = expect_value!(value, Text, field),
            EducationField::Institution => self.institution = expect_value!(value, Text, field),
            EducationField::Years => self.years = expect_value!(value, Text, field),
            EducationField::LevelGain => {
                self.level_gain = expect_value!(value, OptionalInteger, field)
            }
            EducationField::OrderIndex => self.order_index = expect_value!(value, Integer, field),
        }
        Ok(())
    }
}
