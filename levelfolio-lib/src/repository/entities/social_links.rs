use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::repository::entities::{FieldSpec, FieldValue, InputKind, PatchError, Record, Table};

/// The single row of the `social_links` table. Values are not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinksRow {
    pub id: Uuid,
    pub linkedin: String,
    pub github: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SocialLinksField {
    Linkedin,
    Github,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub linkedin: String,
    pub github: String,
    pub email: String,
}

impl From<&SocialLinksRow> for SocialLinks {
    fn from(row: &SocialLinksRow) -> Self {
        Self {
            linkedin: row.linkedin.clone(),
            github: row.github.clone(),
            email: row.email.clone(),
        }
    }
}

impl Record for SocialLinksRow {
    type Field = SocialLinksField;

    const TABLE: Table = Table::SocialLinks;
    const LABEL: &'static str = "social links";
    const FIELDS: &'static [FieldSpec<SocialLinksField>] = &[
        FieldSpec::new(SocialLinksField::Linkedin, "LinkedIn URL", InputKind::Text)
            .placeholder("https://www.linkedin.com/in/..."),
        FieldSpec::new(SocialLinksField::Github, "GitHub URL", InputKind::Text)
            .placeholder("https://github.com/..."),
        FieldSpec::new(SocialLinksField::Email, "Email", InputKind::Text)
            .placeholder("you@example.com"),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn order_index(&self) -> Option<i32> {
        None
    }

    fn blank(_order_index: i32) -> Option<Self> {
        None
    }

    fn get(&self, field: SocialLinksField) -> FieldValue {
        match field {
            SocialLinksField::Linkedin => FieldValue::Text(self.linkedin.clone()),
            SocialLinksField::Github => FieldValue::Text(self.github.clone()),
            SocialLinksField::Email => FieldValue::Text(self.email.clone()),
        }
    }

    fn set(&mut self, field: SocialLinksField, value: FieldValue) -> Result<(), PatchError> {
        match field {
            SocialLinksField::Linkedin => self.linkedin = expect_value!(value, Text, field),
            SocialLinksField::Github => self.github = expect_value!(value, Text, field),
            SocialLinksField::Email => self.email = expect_value!(value, Text, field),
        }
        Ok(())
    }
}
