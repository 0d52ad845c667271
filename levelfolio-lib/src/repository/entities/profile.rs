use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::repository::entities::{FieldSpec, FieldValue, InputKind, PatchError, Record, Table};

/// The single row of the `profile` table.
///
/// `hp` may exceed `max_hp`; nothing validates the relation between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    /// URL of the avatar image
    pub avatar: String,
    pub about: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ProfileField {
    Name,
    Title,
    Level,
    Hp,
    MaxHp,
    Avatar,
    About,
}

/// The profile header as shown on the portfolio. The about text is carried separately by
/// the aggregate content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub avatar: String,
}

impl From<&ProfileRow> for Profile {
    fn from(row: &ProfileRow) -> Self {
        Self {
            name: row.name.clone(),
            title: row.title.clone(),
            level: row.level,
            hp: row.hp,
            max_hp: row.max_hp,
            avatar: row.avatar.clone(),
        }
    }
}

impl Record for ProfileRow {
    type Field = ProfileField;

    const TABLE: Table = Table::Profile;
    const LABEL: &'static str = "profile";
    const FIELDS: &'static [FieldSpec<ProfileField>] = &[
        FieldSpec::new(ProfileField::Name, "Name", InputKind::Text),
        FieldSpec::new(ProfileField::Title, "Title", InputKind::Text),
        FieldSpec::new(ProfileField::Level, "Level", InputKind::Integer),
        FieldSpec::new(ProfileField::Hp, "HP", InputKind::Integer),
        FieldSpec::new(ProfileField::MaxHp, "Max HP", InputKind::Integer),
        FieldSpec::new(ProfileField::Avatar, "Avatar URL", InputKind::Text),
        FieldSpec::new(ProfileField::About, "About", InputKind::LongText),
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

    fn get(&self, field: ProfileField) -> FieldValue {
        match field {
            ProfileField::Name => FieldValue::Text(self.name.clone()),
            ProfileField::Title => FieldValue::Text(self.title.clone()),
            ProfileField::Level => FieldValue::Integer(self.level),
            ProfileField::Hp => FieldValue::Integer(self.hp),
            ProfileField::MaxHp => FieldValue::Integer(self.max_hp),
            ProfileField::Avatar => FieldValue::Text(self.avatar.clone()),
            ProfileField::About => FieldValue::Text(self.about.clone()),
        }
    }

    fn set(&mut self, field: ProfileField, value: FieldValue) -> Result<(), PatchError> {
        match field {
            ProfileField::Name => self.name = expect_value!(value, Text, field),
            ProfileField::Title => self.title = expect_value!(value, Text, field),
            ProfileField::Level => self.level = expect_value!(value, Integer, field),
            ProfileField::Hp => self.hp = expect_value!(value, Integer, field),
            ProfileField::MaxHp => self.max_hp = expect_value!(value, Integer, field),
            ProfileField::Avatar => self.avatar = expect_value!(value, Text, field),
            ProfileField::About => self.about = expect_value!(value, Text, field),
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_no_blank_profile() {
        assert!(ProfileRow::blank(1).is_none());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ProfileField::MaxHp.to_string(), "max_hp");
        assert_eq!("avatar".parse::<ProfileField>().unwrap(), ProfileField::Avatar);
    }

    #[test]
    fn test_hp_may_exceed_max() {
        let mut row = ProfileRow {
            id: Uuid::new_v4(),
            name: "Player".into(),
            title: "Hunter".into(),
            level: 1,
            hp: 10,
            max_hp: 10,
            avatar: String::new(),
            about: String::new(),
            updated_at: None,
        };

        row.set(ProfileField::Hp, FieldValue::Integer(9000)).unwrap();

        assert_eq!(Profile::from(&row).hp, 9000);
    }
}
