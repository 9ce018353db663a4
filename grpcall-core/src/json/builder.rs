//! # JSON -> DynamicMessage
//!
//! Builds a [`DynamicMessage`] for a runtime [`MessageDescriptor`] out of an untyped JSON
//! object, validating every field against its declared kind.
//!
//! The builder never stops at the first problem: every unknown key, type mismatch, bad list
//! element, bad map entry and oneof conflict found in the payload (at any nesting depth) is
//! collected, and the caller receives them all in one [`ValidationError`]. A message is only
//! returned when that list is empty.
//!
//! Keys are matched against a field's JSON name first (`userId`) and its declared name
//! second (`user_id`).
use super::convert::{convert_map_key, convert_scalar, mismatch, unsupported};
use super::error::{BuildError, FieldError, ValidationError, json_type_name};
use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, MessageDescriptor, Value};
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

/// Parses JSON text and builds a message of the given type from it.
pub fn from_json(
    descriptor: &MessageDescriptor,
    json: &[u8],
) -> Result<DynamicMessage, BuildError> {
    let value: Json = serde_json::from_slice(json)?;
    from_value(descriptor, &value)
}

/// Builds a message from an already parsed JSON value, which must be an object.
///
/// A top-level `null` builds an empty message.
pub fn from_value(
    descriptor: &MessageDescriptor,
    value: &Json,
) -> Result<DynamicMessage, BuildError> {
    match value {
        Json::Object(object) => Ok(populate(descriptor, object)?),
        Json::Null => Ok(DynamicMessage::new(descriptor.clone())),
        other => Err(BuildError::NotAnObject {
            message: descriptor.full_name().to_string(),
            actual: json_type_name(other).to_string(),
        }),
    }
}

/// Populates a new message of type `descriptor` from the keys of `object`.
///
/// # Returns
///
/// * `Ok(DynamicMessage)` - Every key matched a field and every value matched its kind.
/// * `Err(ValidationError)` - All the problems found, in the order they were found.
pub fn populate(
    descriptor: &MessageDescriptor,
    object: &Map<String, Json>,
) -> Result<DynamicMessage, ValidationError> {
    let mut builder = MessageBuilder::default();
    let message = builder.message(descriptor, object, "");

    match ValidationError::from_errors(builder.errors) {
        Some(err) => Err(err),
        None => Ok(message),
    }
}

#[derive(Default)]
struct MessageBuilder {
    errors: Vec<FieldError>,
}

impl MessageBuilder {
    fn message(
        &mut self,
        descriptor: &MessageDescriptor,
        object: &Map<String, Json>,
        base_path: &str,
    ) -> DynamicMessage {
        let mut message = DynamicMessage::new(descriptor.clone());
        // Oneof name -> names of the member fields set, in processing order.
        let mut oneofs: Vec<(String, Vec<String>)> = Vec::new();

        for (key, value) in object {
            let path = field_path(base_path, key);

            let Some(field) = descriptor
                .get_field_by_json_name(key)
                .or_else(|| descriptor.get_field_by_name(key))
            else {
                self.errors.push(FieldError::new(
                    path,
                    "known field",
                    json_type_name(value),
                    "unknown field",
                ));
                continue;
            };

            if let Some(oneof) = field.containing_oneof() {
                let name = field.name().to_string();
                match oneofs.iter_mut().find(|(group, _)| group == oneof.name()) {
                    Some((_, fields)) if fields.contains(&name) => {}
                    Some((_, fields)) => fields.push(name),
                    None => oneofs.push((oneof.name().to_string(), vec![name])),
                }
            }

            let Some(value) = self.field_value(&field, value, &path) else {
                continue;
            };

            if let Err(err) = message.try_set_field(&field, value) {
                self.errors.push(unsupported(&path, &err.to_string()));
            }
        }

        for (group, fields) in oneofs.iter().filter(|(_, fields)| fields.len() > 1) {
            for name in &fields[1..] {
                self.errors.push(FieldError::new(
                    field_path(base_path, name),
                    "only one field in oneof group",
                    format!("multiple fields set: [{}]", fields.join(", ")),
                    format!("oneof group '{group}' has multiple fields set"),
                ));
            }
        }

        message
    }

    fn field_value(&mut self, field: &FieldDescriptor, value: &Json, path: &str) -> Option<Value> {
        if field.is_map() {
            self.map_value(field, value, path)
        } else if field.is_list() {
            self.list_value(field, value, path)
        } else {
            self.value(&field.kind(), value, path)
        }
    }

    fn list_value(&mut self, field: &FieldDescriptor, value: &Json, path: &str) -> Option<Value> {
        let items = match value {
            Json::Null => return Some(Value::List(Vec::new())),
            Json::Array(items) => items,
            other => {
                self.errors.push(FieldError::new(
                    path,
                    "array",
                    json_type_name(other),
                    "repeated field must be an array",
                ));
                return None;
            }
        };

        let kind = field.kind();
        let list = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.value(&kind, item, &format!("{path}[{i}]")))
            .collect();

        Some(Value::List(list))
    }

    fn map_value(&mut self, field: &FieldDescriptor, value: &Json, path: &str) -> Option<Value> {
        let entries = match value {
            Json::Null => return Some(Value::Map(HashMap::new())),
            Json::Object(entries) => entries,
            other => {
                self.errors.push(FieldError::new(
                    path,
                    "object",
                    json_type_name(other),
                    "map field must be an object",
                ));
                return None;
            }
        };

        let Kind::Message(entry) = field.kind() else {
            self.errors.push(unsupported(path, field.full_name()));
            return None;
        };
        let key_kind = entry.map_entry_key_field().kind();
        let value_kind = entry.map_entry_value_field().kind();

        let mut map = HashMap::with_capacity(entries.len());
        for (key, item) in entries {
            let entry_path = format!("{path}.{key}");

            let key = convert_map_key(key, &key_kind, &entry_path)
                .map_err(|err| self.errors.push(err))
                .ok();
            let item = self.value(&value_kind, item, &entry_path);

            if let (Some(key), Some(item)) = (key, item) {
                map.insert(key, item);
            }
        }

        Some(Value::Map(map))
    }

    fn value(&mut self, kind: &Kind, value: &Json, path: &str) -> Option<Value> {
        match (kind, value) {
            (Kind::Message(descriptor), Json::Object(object)) => {
                Some(Value::Message(self.message(descriptor, object, path)))
            }
            (Kind::Message(_), other) => {
                self.errors.push(mismatch(path, kind, other));
                None
            }
            _ => convert_scalar(value, kind, path)
                .map_err(|err| self.errors.push(err))
                .ok(),
        }
    }
}

fn field_path(base_path: &str, key: &str) -> String {
    if base_path.is_empty() {
        key.to_string()
    } else {
        format!("{base_path}.{key}")
    }
}
