//! Pure conversions from JSON values to `prost_reflect` values, one field kind at a time.
//!
//! Integers are narrowed with native `as` casts and are never range-checked, so a value that
//! does not fit the declared width is truncated rather than rejected. Bytes fields take the raw
//! UTF-8 bytes of a JSON string; no base64 decoding happens.
use super::error::{FieldError, json_type_name};
use prost::bytes::Bytes;
use prost_reflect::{EnumDescriptor, Kind, MapKey, Value};
use serde_json::Value as Json;

/// Converts a JSON value into the representation of a non-message field kind.
///
/// Message kinds are populated recursively by the builder; reaching this function with one
/// is reported as an unsupported field type.
pub(crate) fn convert_scalar(value: &Json, kind: &Kind, path: &str) -> Result<Value, FieldError> {
    let converted = match kind {
        Kind::Bool => value.as_bool().map(Value::Bool),
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => signed(value).map(|n| Value::I32(n as i32)),
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => signed(value).map(Value::I64),
        Kind::Uint32 | Kind::Fixed32 => unsigned(value).map(|n| Value::U32(n as u32)),
        Kind::Uint64 | Kind::Fixed64 => unsigned(value).map(Value::U64),
        Kind::Float => value.as_f64().map(|n| Value::F32(n as f32)),
        Kind::Double => value.as_f64().map(Value::F64),
        Kind::String => value.as_str().map(|s| Value::String(s.to_string())),
        Kind::Bytes => value
            .as_str()
            .map(|s| Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))),
        Kind::Enum(descriptor) => enum_number(value, descriptor).map(Value::EnumNumber),
        Kind::Message(descriptor) => {
            return Err(unsupported(path, descriptor.full_name()));
        }
    };

    converted.ok_or_else(|| mismatch(path, kind, value))
}

/// Converts the text of a JSON object key into a map key of the given kind.
pub(crate) fn convert_map_key(key: &str, kind: &Kind, path: &str) -> Result<MapKey, FieldError> {
    let converted = match kind {
        Kind::String => Some(MapKey::String(key.to_string())),
        Kind::Bool => match key {
            "true" => Some(MapKey::Bool(true)),
            "false" => Some(MapKey::Bool(false)),
            _ => None,
        },
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => {
            key.parse::<i64>().ok().map(|n| MapKey::I32(n as i32))
        }
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => key.parse().ok().map(MapKey::I64),
        Kind::Uint32 | Kind::Fixed32 => key.parse::<u64>().ok().map(|n| MapKey::U32(n as u32)),
        Kind::Uint64 | Kind::Fixed64 => key.parse().ok().map(MapKey::U64),
        other => return Err(unsupported(path, kind_name(other))),
    };

    converted.ok_or_else(|| {
        let (expected, _) = describe(kind);
        FieldError::new(path, expected, "string", "invalid map key")
    })
}

/// Expected type name and mismatch message for each field kind.
pub(crate) fn describe(kind: &Kind) -> (&'static str, &'static str) {
    match kind {
        Kind::Bool => ("boolean", "expected boolean value"),
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => ("int32", "expected 32-bit integer"),
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => ("int64", "expected 64-bit integer"),
        Kind::Uint32 | Kind::Fixed32 => ("uint32", "expected 32-bit unsigned integer"),
        Kind::Uint64 | Kind::Fixed64 => ("uint64", "expected 64-bit unsigned integer"),
        Kind::Float => ("float32", "expected 32-bit float"),
        Kind::Double => ("float64", "expected 64-bit float"),
        Kind::String => ("string", "expected string value"),
        Kind::Bytes => ("string (for bytes)", "expected string value for bytes field"),
        Kind::Enum(_) => ("valid enum name or number", "invalid enum value"),
        Kind::Message(_) => ("object", "expected object for message field"),
    }
}

pub(crate) fn mismatch(path: &str, kind: &Kind, value: &Json) -> FieldError {
    let (expected, message) = describe(kind);
    FieldError::new(path, expected, json_type_name(value), message)
}

pub(crate) fn unsupported(path: &str, actual: &str) -> FieldError {
    FieldError::new(path, "supported type", actual, "unsupported field type")
}

fn kind_name(kind: &Kind) -> &str {
    match kind {
        Kind::Float => "float",
        Kind::Double => "double",
        Kind::Bytes => "bytes",
        Kind::Enum(descriptor) => descriptor.full_name(),
        Kind::Message(descriptor) => descriptor.full_name(),
        _ => describe(kind).0,
    }
}

fn signed(value: &Json) -> Option<i64> {
    let Json::Number(number) = value else {
        return None;
    };
    number
        .as_i64()
        .or_else(|| number.as_u64().map(|n| n as i64))
        .or_else(|| number.as_f64().map(|n| n as i64))
}

fn unsigned(value: &Json) -> Option<u64> {
    let Json::Number(number) = value else {
        return None;
    };
    number
        .as_u64()
        .or_else(|| number.as_i64().map(|n| n as u64))
        .or_else(|| number.as_f64().map(|n| n as u64))
}

fn enum_number(value: &Json, descriptor: &EnumDescriptor) -> Option<i32> {
    match value {
        Json::String(name) => descriptor.get_value_by_name(name).map(|v| v.number()),
        Json::Number(_) => signed(value)
            .map(|n| n as i32)
            .filter(|n| descriptor.get_value(*n).is_some()),
        _ => None,
    }
}
