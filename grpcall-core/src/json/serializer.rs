//! # DynamicMessage -> JSON
//!
//! Renders messages with a fixed policy:
//!
//! * fields use their declared Protobuf names (`user_id`, not `userId`),
//! * fields holding their default value are omitted,
//! * enums are rendered by name,
//! * 64-bit integers are plain JSON numbers,
//! * bytes are base64 encoded,
//! * the text output is pretty printed with two-space indentation.
use prost_reflect::{DynamicMessage, SerializeOptions};
use serde_json::ser::PrettyFormatter;

/// Serializes a message to pretty printed JSON text.
pub fn to_json(message: &DynamicMessage) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
    message.serialize_with_options(&mut serializer, &options())?;
    Ok(buffer)
}

/// Serializes a message to a `serde_json::Value` using the same policy as [`to_json`].
pub fn to_value(message: &DynamicMessage) -> Result<serde_json::Value, serde_json::Error> {
    message.serialize_with_options(serde_json::value::Serializer, &options())
}

fn options() -> SerializeOptions {
    SerializeOptions::new()
        .use_proto_field_name(true)
        .skip_default_fields(true)
        .use_enum_numbers(false)
        .stringify_64_bit_integers(false)
}
