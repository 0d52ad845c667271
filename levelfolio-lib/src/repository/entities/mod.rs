//! Content entities for Levelfolio.
//!
//! Each entity has a storage shape (the `*Row` types, named after the table
//! columns) and a display shape produced from it with `From<&Row>`. Rows
//! implement [`Record`], which ties them to their table and to the declarative
//! field schema used by the admin editors.

use std::{fmt, hash::Hash, str::FromStr};

use serde::{Serialize, de::DeserializeOwned};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Unwrap a [`FieldValue`] into the given variant or bail out of `set` with a mismatch.
macro_rules! expect_value {
    ($value:expr, $variant:ident, $field:expr) => {
        match $value {
            $crate::repository::entities::FieldValue::$variant(inner) => inner,
            other => return Err(other.mismatch($field)),
        }
    };
}

mod achievement;
mod education;
mod experience;
pub mod fields;
mod profile;
mod project;
mod skill;
mod social_links;

pub use achievement::{Achievement, AchievementField, AchievementRow};
pub use education::{Education, EducationField, EducationRow};
pub use experience::{Experience, ExperienceField, ExperienceRow};
pub use fields::{Edit, FieldSpec, FieldValue, InputKind, PatchError};
pub use profile::{Profile, ProfileField, ProfileRow};
pub use project::{Project, ProjectField, ProjectRow, ProjectStatus};
pub use skill::{Skill, SkillField, SkillRow};
pub use social_links::{SocialLinks, SocialLinksField, SocialLinksRow};

/// The tables of the hosted backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    Profile,
    Skills,
    Education,
    Experience,
    Projects,
    Achievements,
    SocialLinks,
}

impl Table {
    /// Singleton tables hold exactly one logical row and are read with "at most one"
    /// semantics.
    pub fn is_singleton(self) -> bool {
        matches!(self, Table::Profile | Table::SocialLinks)
    }
}

/// A row of one of the [`Table`]s.
pub trait Record:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The closed set of editable fields of this record.
    type Field: Copy
        + Eq
        + Hash
        + fmt::Debug
        + fmt::Display
        + FromStr
        + Send
        + Sync
        + 'static;

    const TABLE: Table;
    /// Human friendly name used in editor messages, e.g. "skills"
    const LABEL: &'static str;
    const FIELDS: &'static [FieldSpec<Self::Field>];

    fn id(&self) -> Uuid;

    /// Position in the display order. `None` for singletons.
    fn order_index(&self) -> Option<i32>;

    /// A fresh row with default field values, or `None` for singletons which cannot be
    /// created through an editor.
    fn blank(order_index: i32) -> Option<Self>;

    fn get(&self, field: Self::Field) -> FieldValue;

    fn set(&mut self, field: Self::Field, value: FieldValue) -> Result<(), PatchError>;

    fn apply(&mut self, edit: Edit<Self::Field>) -> Result<(), PatchError> {
        fields::apply(self, edit)
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_table_names() {
        let names: Vec<String> = Table::iter().map(|t| t.to_string()).collect();

        assert_eq!(
            names,
            [
                "profile",
                "skills",
                "education",
                "experience",
                "projects",
                "achievements",
                "social_links"
            ]
        );
        assert_eq!(Table::from_str("social_links").unwrap(), Table::SocialLinks);
    }

    #[test]
    fn test_singletons() {
        let singletons: Vec<Table> = Table::iter().filter(|t| t.is_singleton()).collect();

        assert_eq!(singletons, [Table::Profile, Table::SocialLinks]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert_eq!(
            Edit::<SkillField>::parse::<SkillRow>("colour", "red"),
            Err(PatchError::UnknownField("colour".into()))
        );
    }
}
