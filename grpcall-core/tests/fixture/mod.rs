//! Descriptor sets used across the integration tests, built in code.
//!
//! `common.proto` (package `common`):
//!
//! ```proto
//! message Address { string city = 1; uint32 zip = 2; }
//! ```
//!
//! `user.proto` (no package, imports `common.proto`):
//!
//! ```proto
//! enum Role { ROLE_UNSPECIFIED = 0; ROLE_ADMIN = 1; ROLE_MEMBER = 2; }
//! message GetUserRequest { int64 user_id = 1; }
//! message User {
//!   int64 user_id = 1;          string name = 2;          bool active = 3;
//!   Role role = 4;              common.Address address = 5;
//!   repeated string tags = 6;   map<string, int32> scores = 7;
//!   double rating = 8;          float weight = 9;         bytes avatar = 10;
//!   oneof contact { string email = 11; string phone = 12; string work_phone = 18; }
//!   uint64 visits = 13;         sint32 delta = 14;        fixed32 checksum = 15;
//!   map<int64, string> labels = 16;
//!   repeated common.Address history = 17;
//! }
//! service UserService {
//!   rpc GetUser(GetUserRequest) returns (User);
//!   rpc CreateUser(User) returns (User);
//! }
//! ```
//!
//! `pkg/svc.proto` (package `pkg`, imports `common.proto`):
//!
//! ```proto
//! message Item { string id = 1; common.Address location = 2; }
//! service Svc { rpc Get(Item) returns (Item); rpc Create(Item) returns (Item); }
//! ```
#![allow(dead_code)]

use grpcall_core::prost_reflect::MessageDescriptor;
use grpcall_core::schema::SchemaRegistry;
use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MessageOptions, MethodDescriptorProto,
    OneofDescriptorProto, ServiceDescriptorProto,
};
use std::sync::OnceLock;

pub fn common_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("common.proto".into()),
        package: Some("common".into()),
        syntax: Some("proto3".into()),
        message_type: vec![message(
            "Address",
            vec![field("city", 1, Type::String), field("zip", 2, Type::Uint32)],
        )],
        ..Default::default()
    }
}

pub fn user_file() -> FileDescriptorProto {
    let mut user = message(
        "User",
        vec![
            field("user_id", 1, Type::Int64),
            field("name", 2, Type::String),
            field("active", 3, Type::Bool),
            typed("role", 4, Type::Enum, ".Role"),
            typed("address", 5, Type::Message, ".common.Address"),
            repeated(field("tags", 6, Type::String)),
            repeated(typed("scores", 7, Type::Message, ".User.ScoresEntry")),
            field("rating", 8, Type::Double),
            field("weight", 9, Type::Float),
            field("avatar", 10, Type::Bytes),
            in_oneof(field("email", 11, Type::String), 0),
            in_oneof(field("phone", 12, Type::String), 0),
            field("visits", 13, Type::Uint64),
            field("delta", 14, Type::Sint32),
            field("checksum", 15, Type::Fixed32),
            repeated(typed("labels", 16, Type::Message, ".User.LabelsEntry")),
            repeated(typed("history", 17, Type::Message, ".common.Address")),
            in_oneof(field("work_phone", 18, Type::String), 0),
        ],
    );
    user.nested_type = vec![
        map_entry("ScoresEntry", Type::String, field("value", 2, Type::Int32)),
        map_entry("LabelsEntry", Type::Int64, field("value", 2, Type::String)),
    ];
    user.oneof_decl = vec![OneofDescriptorProto {
        name: Some("contact".into()),
        ..Default::default()
    }];

    FileDescriptorProto {
        name: Some("user.proto".into()),
        syntax: Some("proto3".into()),
        dependency: vec!["common.proto".into()],
        enum_type: vec![EnumDescriptorProto {
            name: Some("Role".into()),
            value: vec![
                enum_value("ROLE_UNSPECIFIED", 0),
                enum_value("ROLE_ADMIN", 1),
                enum_value("ROLE_MEMBER", 2),
            ],
            ..Default::default()
        }],
        message_type: vec![
            message("GetUserRequest", vec![field("user_id", 1, Type::Int64)]),
            user,
        ],
        service: vec![service(
            "UserService",
            vec![
                method("GetUser", ".GetUserRequest", ".User"),
                method("CreateUser", ".User", ".User"),
            ],
        )],
        ..Default::default()
    }
}

pub fn pkg_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("pkg/svc.proto".into()),
        package: Some("pkg".into()),
        syntax: Some("proto3".into()),
        dependency: vec!["common.proto".into()],
        message_type: vec![message(
            "Item",
            vec![
                field("id", 1, Type::String),
                typed("location", 2, Type::Message, ".common.Address"),
            ],
        )],
        service: vec![service(
            "Svc",
            vec![
                method("Get", ".pkg.Item", ".pkg.Item"),
                method("Create", ".pkg.Item", ".pkg.Item"),
            ],
        )],
        ..Default::default()
    }
}

/// `common.proto` + `user.proto`, encoded.
pub fn user_set() -> Vec<u8> {
    encode(vec![common_file(), user_file()])
}

/// `common.proto` + `pkg/svc.proto`, encoded.
pub fn pkg_set() -> Vec<u8> {
    encode(vec![common_file(), pkg_file()])
}

pub fn encode(files: Vec<FileDescriptorProto>) -> Vec<u8> {
    FileDescriptorSet { file: files }.encode_to_vec()
}

/// Both sets, loaded once per test binary.
///
/// Descriptors only compare equal within one pool, so every caller gets a clone of the same
/// registry.
pub fn registry() -> SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

    REGISTRY
        .get_or_init(|| {
            let mut registry = SchemaRegistry::new();
            registry.load(&user_set()).expect("user set loads");
            registry.load(&pkg_set()).expect("pkg set loads");
            registry
        })
        .clone()
}

pub fn user_descriptor() -> MessageDescriptor {
    registry().message("User").expect("User is registered")
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        field: fields,
        ..Default::default()
    }
}

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(json_name(name)),
        ..Default::default()
    }
}

fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.into()),
        ..field(name, number, ty)
    }
}

fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..field
    }
}

fn in_oneof(field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        oneof_index: Some(index),
        ..field
    }
}

fn map_entry(name: &str, key: Type, value: FieldDescriptorProto) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        field: vec![field("key", 1, key), value],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn enum_value(name: &str, number: i32) -> EnumValueDescriptorProto {
    EnumValueDescriptorProto {
        name: Some(name.into()),
        number: Some(number),
        ..Default::default()
    }
}

fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.into()),
        method: methods,
        ..Default::default()
    }
}

fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.into()),
        input_type: Some(input.into()),
        output_type: Some(output.into()),
        ..Default::default()
    }
}

fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
