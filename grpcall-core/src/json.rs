//! # JSON <-> Protobuf
//!
//! Conversions between untyped JSON payloads and `prost_reflect::DynamicMessage`s, driven
//! entirely by descriptors loaded at runtime.
//!
//! * [`builder`]: JSON -> message, with aggregated, path-addressed validation errors.
//! * [`serializer`]: message -> JSON.
//!
//! The two are inverses up to defaults: building a message from a valid payload and
//! serializing it back yields the same payload minus the keys that held a default value.
//! Bytes fields are the exception: the builder takes raw string bytes while the serializer
//! emits base64.
pub mod builder;
mod convert;
mod error;
pub mod serializer;

pub use builder::{from_json, from_value, populate};
pub use error::{BuildError, FieldError, ValidationError};
pub use serializer::{to_json, to_value};
