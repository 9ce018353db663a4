//! # grpcall Core
//!
//! `grpcall-core` is the foundational library powering the grpcall CLI. It provides a dynamic
//! gRPC client capable of calling unary methods of any gRPC server without compile-time
//! knowledge of the Protobuf schema: schemas are binary `FileDescriptorSet`s loaded at runtime.
//!
//! ## Key Components
//!
//! * **[`schema::SchemaRegistry`]:** Loads descriptor sets and resolves `(service, method)`
//!   pairs into method descriptors.
//! * **[`json`]:** Builds request messages out of untyped JSON, reporting every schema
//!   mismatch with its field path, and renders response messages back to JSON.
//! * **[`client::Invoker`]:** Resolves, builds, calls and serializes. Transport failures are
//!   classified into [`client::ClassifiedError`]s.
//! * **[`grpc::UnaryChannel`]:** The transport seam. [`grpc::client::GrpcClient`] implements it
//!   on top of `tonic`, using the [`grpc::codec::DynamicCodec`].
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-reflect`, and `tonic` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod client;
pub mod grpc;
pub mod json;
pub mod schema;

// Re-exports
pub use prost;
pub use prost_reflect;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
