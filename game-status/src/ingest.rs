//! Conversion between server rows and typed records.
//!
//! Server rows carry flags as narrow integers. This is the only place where
//! "nonzero means true" applies; everything past this boundary works with
//! real booleans.

use serde_json::{Map, Value};
use tracing::trace;

use crate::field::{Field, ValueKind};
use crate::record::{FieldValue, GameRecord, SchemaViolation};

/// Convert one server row into a record.
///
/// Every registry field must be present. Unknown keys are ignored.
pub fn record_from_json(row: &Value) -> Result<GameRecord, SchemaViolation> {
    let object = row.as_object().ok_or(SchemaViolation::NotAnObject)?;

    for key in object.keys() {
        if Field::from_wire_name(key).is_none() {
            trace!(key = %key, "Ignoring unrecognized field");
        }
    }

    let mut builder = GameRecord::builder();
    for field in Field::ALL {
        builder = builder.set(field, read_field(object, field)?);
    }
    Ok(builder.build())
}

/// Convert a JSON array of server rows, failing on the first malformed row.
pub fn records_from_json(rows: &Value) -> Result<Vec<GameRecord>, SchemaViolation> {
    let rows = rows.as_array().ok_or(SchemaViolation::NotAnArray)?;
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            record_from_json(row).map_err(|source| SchemaViolation::MalformedRow {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

/// Convert a record back into a server row, emitting flags as 0/1.
pub fn record_to_json(record: &GameRecord) -> Value {
    let mut object = Map::new();
    for (field, value) in record.iter() {
        let json = match value {
            FieldValue::Integer(v) => Value::from(*v),
            FieldValue::Boolean(v) => Value::from(i64::from(*v)),
            FieldValue::Identifier(v) => Value::from(v.as_str()),
        };
        object.insert(field.wire_name().to_string(), json);
    }
    Value::Object(object)
}

fn read_field(object: &Map<String, Value>, field: Field) -> Result<FieldValue, SchemaViolation> {
    let value = object
        .get(field.wire_name())
        .filter(|v| !v.is_null())
        .ok_or(SchemaViolation::MissingField { field })?;

    let converted = match (field.kind(), value) {
        (ValueKind::Boolean, Value::Bool(b)) => Some(FieldValue::Boolean(*b)),
        (ValueKind::Boolean, Value::Number(n)) => n.as_i64().map(|v| FieldValue::Boolean(v != 0)),
        (ValueKind::Integer, Value::Number(n)) => n.as_i64().map(FieldValue::Integer),
        (ValueKind::Identifier, Value::String(s)) => Some(FieldValue::Identifier(s.clone())),
        // Server ids are numeric on some endpoints.
        (ValueKind::Identifier, Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Some(FieldValue::Identifier(n.to_string()))
        }
        _ => None,
    };

    converted.ok_or_else(|| SchemaViolation::WrongJsonType {
        field,
        expected: field.kind(),
        found: json_type_name(value),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(n) if n.is_u64() => "integer out of range",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
