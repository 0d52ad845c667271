//! Declarative field schema and typed patches.
//!
//! Every entity exposes a closed set of field identifiers together with a
//! [`FieldSpec`] per field. Editors are generated from the specs, and every
//! modification goes through an [`Edit`] naming one of those identifiers, so an
//! unknown field can never reach a row.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use thiserror::Error;

use crate::repository::entities::Record;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("`{input}` is not a valid integer for `{field}`")]
    InvalidInteger { field: String, input: String },
    #[error("`{input}` is not one of {options:?} for `{field}`")]
    InvalidChoice {
        field: String,
        input: String,
        options: &'static [&'static str],
    },
    #[error("field `{field}` does not accept a {got} value")]
    TypeMismatch { field: String, got: &'static str },
    #[error("no item at index {index} in `{field}`")]
    IndexOutOfRange { field: String, index: usize },
}

/// How a field is presented and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    /// Multi-line free text
    LongText,
    /// Empty input is stored as `null`
    OptionalText,
    Integer,
    /// Empty input is stored as `null`
    OptionalInteger,
    Choice(&'static [&'static str]),
    /// Ordered list of strings, appended to and removed from by index
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec<F: 'static> {
    pub field: F,
    pub label: &'static str,
    pub kind: InputKind,
    /// Intended range, shown next to the input. Not enforced.
    pub range: Option<RangeInclusive<i32>>,
    pub placeholder: &'static str,
}

impl<F> FieldSpec<F> {
    pub const fn new(field: F, label: &'static str, kind: InputKind) -> Self {
        Self {
            field,
            label,
            kind,
            range: None,
            placeholder: "",
        }
    }

    pub const fn range(mut self, range: RangeInclusive<i32>) -> Self {
        self.range = Some(range);
        self
    }

    pub const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    OptionalText(Option<String>),
    Integer(i32),
    OptionalInteger(Option<i32>),
    List(Vec<String>),
}

impl FieldValue {
    /// Parse raw user input according to `kind`.
    pub fn parse(field: &str, kind: InputKind, input: &str) -> Result<Self, PatchError> {
        let invalid_integer = || PatchError::InvalidInteger {
            field: field.into(),
            input: input.into(),
        };

        Ok(match kind {
            InputKind::Text | InputKind::LongText => Self::Text(input.into()),
            InputKind::OptionalText => {
                Self::OptionalText(Some(input).filter(|s| !s.is_empty()).map(str::to_string))
            }
            InputKind::Integer => Self::Integer(input.trim().parse().map_err(|_| invalid_integer())?),
            InputKind::OptionalInteger => match input.trim() {
                "" => Self::OptionalInteger(None),
                trimmed => {
                    Self::OptionalInteger(Some(trimmed.parse().map_err(|_| invalid_integer())?))
                }
            },
            InputKind::Choice(options) => {
                if !options.contains(&input) {
                    return Err(PatchError::InvalidChoice {
                        field: field.into(),
                        input: input.into(),
                        options,
                    });
                }
                Self::Text(input.into())
            }
            InputKind::List => Self::List(
                input
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::OptionalText(_) => "optional text",
            Self::Integer(_) => "integer",
            Self::OptionalInteger(_) => "optional integer",
            Self::List(_) => "list",
        }
    }

    pub(crate) fn mismatch(&self, field: impl fmt::Display) -> PatchError {
        PatchError::TypeMismatch {
            field: field.to_string(),
            got: self.kind_name(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::OptionalText(s) => f.write_str(s.as_deref().unwrap_or_default()),
            Self::Integer(n) => write!(f, "{n}"),
            Self::OptionalInteger(Some(n)) => write!(f, "{n}"),
            Self::OptionalInteger(None) => Ok(()),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// A single modification to one field of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<F> {
    Set(F, FieldValue),
    /// Append an item to a list field. Blank items are ignored.
    Push(F, String),
    /// Remove the item at the given index from a list field.
    Remove(F, usize),
}

impl<F: FromStr + Copy + PartialEq + 'static> Edit<F> {
    /// Build a `Set` edit from a field name and raw input, rejecting fields that the record
    /// does not declare.
    pub fn parse<R>(field: &str, input: &str) -> Result<Self, PatchError>
    where
        R: Record<Field = F>,
    {
        let field_id = <R::Field as FromStr>::from_str(field)
            .map_err(|_| PatchError::UnknownField(field.to_string()))?;
        let spec = spec_for::<R>(field_id).ok_or_else(|| PatchError::UnknownField(field.into()))?;

        Ok(Self::Set(field_id, FieldValue::parse(field, spec.kind, input)?))
    }
}

pub fn spec_for<R: Record>(field: R::Field) -> Option<&'static FieldSpec<R::Field>> {
    R::FIELDS.iter().find(|spec| spec.field == field)
}

/// Apply `edit` to `record`.
pub(crate) fn apply<R: Record>(record: &mut R, edit: Edit<R::Field>) -> Result<(), PatchError> {
    match edit {
        Edit::Set(field, value) => record.set(field, value),
        Edit::Push(field, item) => {
            let mut items = list(record, field)?;
            let item = item.trim();
            if item.is_empty() {
                return Ok(());
            }
            items.push(item.to_string());
            record.set(field, FieldValue::List(items))
        }
        Edit::Remove(field, index) => {
            let mut items = list(record, field)?;
            if index >= items.len() {
                return Err(PatchError::IndexOutOfRange {
                    field: field.to_string(),
                    index,
                });
            }
            items.remove(index);
            record.set(field, FieldValue::List(items))
        }
    }
}

fn list<R: Record>(record: &R, field: R::Field) -> Result<Vec<String>, PatchError> {
    match record.get(field) {
        FieldValue::List(items) => Ok(items),
        other => Err(other.mismatch(field)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repository::entities::{ProjectField, ProjectRow, SkillField, SkillRow};

    #[test]
    fn test_parse_named_field() {
        assert_eq!(
            Edit::parse::<SkillRow>("level", "88").unwrap(),
            Edit::Set(SkillField::Level, FieldValue::Integer(88))
        );
        assert_eq!(
            Edit::parse::<ProjectRow>("tech_stack", "Rust, SQL").unwrap(),
            Edit::Set(
                ProjectField::TechStack,
                FieldValue::List(vec!["Rust".into(), "SQL".into()])
            )
        );
        assert!(matches!(
            Edit::<SkillField>::parse::<SkillRow>("level", "high"),
            Err(PatchError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_optional_text_empty_is_null() {
        assert_eq!(
            FieldValue::parse("role", InputKind::OptionalText, "").unwrap(),
            FieldValue::OptionalText(None)
        );
    }

    #[test]
    fn test_optional_integer() {
        assert_eq!(
            FieldValue::parse("level_gain", InputKind::OptionalInteger, " ").unwrap(),
            FieldValue::OptionalInteger(None)
        );
        assert_eq!(
            FieldValue::parse("level_gain", InputKind::OptionalInteger, "15").unwrap(),
            FieldValue::OptionalInteger(Some(15))
        );
    }

    #[test]
    fn test_integer_rejects_garbage() {
        assert!(matches!(
            FieldValue::parse("level", InputKind::Integer, "ten"),
            Err(PatchError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_integer_range_not_enforced() {
        assert_eq!(
            FieldValue::parse("progress", InputKind::Integer, "250").unwrap(),
            FieldValue::Integer(250)
        );
    }

    #[test]
    fn test_choice() {
        const OPTIONS: &[&str] = &["Completed", "Ongoing"];

        assert!(FieldValue::parse("status", InputKind::Choice(OPTIONS), "Ongoing").is_ok());
        assert!(matches!(
            FieldValue::parse("status", InputKind::Choice(OPTIONS), "Abandoned"),
            Err(PatchError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_list_splits_on_commas() {
        assert_eq!(
            FieldValue::parse("tech_stack", InputKind::List, "Rust, ,Go ").unwrap(),
            FieldValue::List(vec!["Rust".into(), "Go".into()])
        );
    }
}
