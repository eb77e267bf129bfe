use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::types::{EntityKind, LanguageCode, TranslatableField};

/// Identifier of a record within its entity table.
pub type RecordId = i64;

/// The (kind, record, field, language) quadruple addressing one overlay entry.
///
/// A `Coordinate` can only be built through [`Coordinate::new`] or
/// [`Coordinate::parse`], so every instance names a field that is
/// translatable for its kind and a positive record id. Deserialization goes
/// through the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    kind: EntityKind,
    record_id: RecordId,
    field: TranslatableField,
    language: LanguageCode,
}

impl Coordinate {
    pub fn new(
        kind: EntityKind,
        record_id: RecordId,
        field: TranslatableField,
        language: LanguageCode,
    ) -> Result<Self, ValidationError> {
        validate_record_id(record_id)?;
        if !kind.supports(field) {
            return Err(ValidationError::UnsupportedField {
                kind: kind.as_str().to_string(),
                field: field.as_str().to_string(),
            });
        }
        Ok(Self {
            kind,
            record_id,
            field,
            language,
        })
    }

    /// Validates raw caller strings into a coordinate.
    pub fn parse(
        kind: &str,
        record_id: RecordId,
        field: &str,
        language: &str,
    ) -> Result<Self, ValidationError> {
        let kind: EntityKind = kind.parse()?;
        let field = kind.field(field)?;
        let language = LanguageCode::new(language)?;
        Self::new(kind, record_id, field, language)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn field(&self) -> TranslatableField {
        self.field
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }
}

/// Unchecked wire shape of a [`Coordinate`].
#[derive(Deserialize)]
struct RawCoordinate {
    kind: EntityKind,
    record_id: RecordId,
    field: TranslatableField,
    language: LanguageCode,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.record_id, raw.field, raw.language)
    }
}

/// Record ids are positive database identifiers.
pub fn validate_record_id(record_id: RecordId) -> Result<RecordId, ValidationError> {
    if record_id <= 0 {
        return Err(ValidationError::InvalidRecordId(record_id));
    }
    Ok(record_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_coordinate() {
        let coord = Coordinate::parse("employees", 7, "name", "EN").unwrap();
        assert_eq!(coord.kind(), EntityKind::Employees);
        assert_eq!(coord.record_id(), 7);
        assert_eq!(coord.field(), TranslatableField::Name);
        assert_eq!(coord.language().as_str(), "en");
    }

    #[test]
    fn test_rejects_non_positive_ids() {
        assert_eq!(
            Coordinate::parse("tasks", 0, "title", "sq").unwrap_err(),
            ValidationError::InvalidRecordId(0)
        );
        assert_eq!(
            Coordinate::parse("tasks", -3, "title", "sq").unwrap_err(),
            ValidationError::InvalidRecordId(-3)
        );
    }

    #[test]
    fn test_rejects_field_of_other_kind() {
        let err = Coordinate::new(
            EntityKind::Contracts,
            1,
            TranslatableField::Department,
            LanguageCode::new("sq").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedField { .. }));
    }

    #[test]
    fn test_validation_order_reports_kind_first() {
        let err = Coordinate::parse("payroll", 0, "", "").unwrap_err();
        assert_eq!(err, ValidationError::UnknownEntityKind("payroll".to_string()));
    }

    #[test]
    fn test_deserialize_validates() {
        let coord: Coordinate = serde_json::from_str(
            r#"{"kind":"tasks","record_id":5,"field":"title","language":"EN"}"#,
        )
        .unwrap();
        assert_eq!(coord, Coordinate::parse("tasks", 5, "title", "en").unwrap());

        assert!(serde_json::from_str::<Coordinate>(
            r#"{"kind":"tasks","record_id":-5,"field":"title","language":"en"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<Coordinate>(
            r#"{"kind":"tasks","record_id":5,"field":"department","language":"en"}"#
        )
        .is_err());
    }
}
