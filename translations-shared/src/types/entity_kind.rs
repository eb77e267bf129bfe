use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The closed set of entity tables that can carry translation overlays.
///
/// The string form is the name of the owning table and is what gets stored
/// in the `table_name` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Employees,
    Contracts,
    Tasks,
}

/// Attributes that may be translated on some entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatableField {
    Name,
    Position,
    Department,
    Title,
    Description,
}

const EMPLOYEE_FIELDS: &[TranslatableField] = &[
    TranslatableField::Name,
    TranslatableField::Position,
    TranslatableField::Department,
];

const CONTRACT_FIELDS: &[TranslatableField] =
    &[TranslatableField::Title, TranslatableField::Description];

const TASK_FIELDS: &[TranslatableField] =
    &[TranslatableField::Title, TranslatableField::Description];

impl EntityKind {
    /// Every supported kind, in backfill order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Employees, EntityKind::Contracts, EntityKind::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Employees => "employees",
            EntityKind::Contracts => "contracts",
            EntityKind::Tasks => "tasks",
        }
    }

    /// Fields of this kind that carry translatable text.
    pub fn translatable_fields(&self) -> &'static [TranslatableField] {
        match self {
            EntityKind::Employees => EMPLOYEE_FIELDS,
            EntityKind::Contracts => CONTRACT_FIELDS,
            EntityKind::Tasks => TASK_FIELDS,
        }
    }

    pub fn supports(&self, field: TranslatableField) -> bool {
        self.translatable_fields().contains(&field)
    }

    /// Parses a field name and checks it belongs to this kind.
    pub fn field(&self, name: &str) -> Result<TranslatableField, ValidationError> {
        let unsupported = || ValidationError::UnsupportedField {
            kind: self.as_str().to_string(),
            field: name.to_string(),
        };
        let field = match name.parse::<TranslatableField>() {
            Ok(field) => field,
            Err(missing @ ValidationError::MissingField(_)) => return Err(missing),
            Err(_) => return Err(unsupported()),
        };
        if self.supports(field) {
            Ok(field)
        } else {
            Err(unsupported())
        }
    }
}

impl TranslatableField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslatableField::Name => "name",
            TranslatableField::Position => "position",
            TranslatableField::Department => "department",
            TranslatableField::Title => "title",
            TranslatableField::Description => "description",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TranslatableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ValidationError::MissingField("table_name")),
            "employees" => Ok(EntityKind::Employees),
            "contracts" => Ok(EntityKind::Contracts),
            "tasks" => Ok(EntityKind::Tasks),
            other => Err(ValidationError::UnknownEntityKind(other.to_string())),
        }
    }
}

impl FromStr for TranslatableField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ValidationError::MissingField("field_name")),
            "name" => Ok(TranslatableField::Name),
            "position" => Ok(TranslatableField::Position),
            "department" => Ok(TranslatableField::Department),
            "title" => Ok(TranslatableField::Title),
            "description" => Ok(TranslatableField::Description),
            other => Err(ValidationError::UnsupportedField {
                kind: String::new(),
                field: other.to_string(),
            }),
        }
    }
}
