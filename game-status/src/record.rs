//! Typed game records.
//!
//! A [`GameRecord`] is a snapshot of one game as last synchronized from the
//! server. Records are never mutated after construction; a refresh replaces
//! the whole record. Field access is typed against the [`Field`] registry and
//! fails fast instead of coercing.

use std::collections::BTreeMap;
use std::fmt;

use crate::field::{Field, ValueKind};

/// A record that does not conform to the field registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    /// A recognized field has no value
    #[error("missing field `{field}`")]
    MissingField { field: Field },

    /// A field holds a value of a kind other than the registry declares
    #[error("field `{field}` holds {found}, expected {expected}")]
    WrongKind {
        field: Field,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A field was read through an accessor for a kind the registry does
    /// not declare for it
    #[error("field `{field}` is declared {declared}, read as {requested}")]
    AccessKindMismatch {
        field: Field,
        declared: ValueKind,
        requested: ValueKind,
    },

    /// A server row carries a JSON type that cannot hold the field's kind
    #[error("field `{field}` holds JSON {found}, expected {expected}")]
    WrongJsonType {
        field: Field,
        expected: ValueKind,
        found: &'static str,
    },

    /// `state` is neither 0 nor 1 on an unresolved game
    #[error("game {game_id}: state {value} is not a turn (expected 0 or 1)")]
    StateOutOfRange { game_id: String, value: i64 },

    /// More than one terminal outcome flag is set
    #[error("game {game_id}: more than one outcome flag is set")]
    ConflictingOutcome { game_id: String },

    /// A server row is not a JSON object
    #[error("row is not an object")]
    NotAnObject,

    /// A snapshot is not a JSON array of rows
    #[error("snapshot is not an array")]
    NotAnArray,

    /// A row in a batch failed to convert
    #[error("row {index}: {source}")]
    MalformedRow {
        index: usize,
        #[source]
        source: Box<SchemaViolation>,
    },
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    Boolean(bool),
    Identifier(String),
}

impl FieldValue {
    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Identifier(_) => ValueKind::Identifier,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Identifier(v) => f.write_str(v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Identifier(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Identifier(value)
    }
}

/// One game's identity and status flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    values: BTreeMap<Field, FieldValue>,
}

impl GameRecord {
    /// Start building a record.
    pub fn builder() -> GameRecordBuilder {
        GameRecordBuilder::default()
    }

    /// Get the raw value of a field.
    pub fn get(&self, field: Field) -> Result<&FieldValue, SchemaViolation> {
        self.values
            .get(&field)
            .ok_or(SchemaViolation::MissingField { field })
    }

    /// Get a field declared as [`ValueKind::Integer`].
    pub fn integer(&self, field: Field) -> Result<i64, SchemaViolation> {
        match self.typed(field, ValueKind::Integer)? {
            FieldValue::Integer(v) => Ok(*v),
            other => Err(wrong_kind(field, ValueKind::Integer, other)),
        }
    }

    /// Get a field declared as [`ValueKind::Boolean`].
    pub fn flag(&self, field: Field) -> Result<bool, SchemaViolation> {
        match self.typed(field, ValueKind::Boolean)? {
            FieldValue::Boolean(v) => Ok(*v),
            other => Err(wrong_kind(field, ValueKind::Boolean, other)),
        }
    }

    /// Get a field declared as [`ValueKind::Identifier`].
    pub fn identifier(&self, field: Field) -> Result<&str, SchemaViolation> {
        match self.typed(field, ValueKind::Identifier)? {
            FieldValue::Identifier(v) => Ok(v),
            other => Err(wrong_kind(field, ValueKind::Identifier, other)),
        }
    }

    /// Stable identity of the game.
    pub fn game_id(&self) -> Result<&str, SchemaViolation> {
        self.identifier(Field::GameId)
    }

    /// Whether the game has been archived.
    pub fn is_archived(&self) -> Result<bool, SchemaViolation> {
        self.flag(Field::Archived)
    }

    /// Check that every registry field is present with its declared kind.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        for field in Field::ALL {
            self.typed(field, field.kind())?;
        }
        Ok(())
    }

    /// Iterate over the stored fields in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }

    /// Identifier for log fields; never fails.
    pub(crate) fn label(&self) -> &str {
        self.game_id().unwrap_or("<unknown>")
    }

    /// Look up a field, checking the access kind against the registry and
    /// the stored kind against the access kind.
    fn typed(&self, field: Field, kind: ValueKind) -> Result<&FieldValue, SchemaViolation> {
        if field.kind() != kind {
            return Err(SchemaViolation::AccessKindMismatch {
                field,
                declared: field.kind(),
                requested: kind,
            });
        }
        let value = self.get(field)?;
        if value.kind() != kind {
            return Err(wrong_kind(field, kind, value));
        }
        Ok(value)
    }
}

fn wrong_kind(field: Field, expected: ValueKind, value: &FieldValue) -> SchemaViolation {
    SchemaViolation::WrongKind {
        field,
        expected,
        found: value.kind(),
    }
}

/// Builder for [`GameRecord`].
///
/// `build` does not validate; records from the ingestion boundary are
/// validated there, and the classification functions fail fast on anything
/// that slipped through.
#[derive(Debug, Clone, Default)]
pub struct GameRecordBuilder {
    values: BTreeMap<Field, FieldValue>,
}

impl GameRecordBuilder {
    /// Set a field value.
    pub fn set(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Finish the record.
    pub fn build(self) -> GameRecord {
        GameRecord {
            values: self.values,
        }
    }

    /// Finish the record, rejecting it unless it is complete and well-kinded.
    pub fn build_validated(self) -> Result<GameRecord, SchemaViolation> {
        let record = self.build();
        record.validate()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> GameRecordBuilder {
        GameRecord::builder()
            .set(Field::GameId, "g-1")
            .set(Field::Archived, false)
            .set(Field::State, 1)
            .set(Field::UserWon, false)
            .set(Field::UserLost, false)
            .set(Field::Drawn, false)
    }

    #[test]
    fn test_typed_access() {
        let record = complete().build();
        assert_eq!(record.game_id().unwrap(), "g-1");
        assert_eq!(record.integer(Field::State).unwrap(), 1);
        assert!(!record.is_archived().unwrap());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_missing_field_fails_fast() {
        let mut builder = complete();
        builder.values.remove(&Field::State);
        let record = builder.build();

        assert_eq!(
            record.integer(Field::State),
            Err(SchemaViolation::MissingField { field: Field::State })
        );
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_stored_kind_mismatch() {
        let record = complete().set(Field::State, true).build();
        assert_eq!(
            record.integer(Field::State),
            Err(SchemaViolation::WrongKind {
                field: Field::State,
                expected: ValueKind::Integer,
                found: ValueKind::Boolean,
            })
        );
    }

    #[test]
    fn test_access_kind_mismatch_never_coerces() {
        let record = complete().build();
        // State is an integer; reading it as a flag is a programming error.
        assert_eq!(
            record.flag(Field::State),
            Err(SchemaViolation::AccessKindMismatch {
                field: Field::State,
                declared: ValueKind::Integer,
                requested: ValueKind::Boolean,
            })
        );
    }

    #[test]
    fn test_build_validated() {
        assert!(complete().build_validated().is_ok());
        let err = GameRecord::builder()
            .set(Field::GameId, "g-2")
            .build_validated()
            .unwrap_err();
        assert_eq!(err, SchemaViolation::MissingField { field: Field::Archived });
    }
}
