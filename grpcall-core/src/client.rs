//! # Invoker
//!
//! This module implements the high-level logic for executing dynamic unary gRPC requests.
//!
//! An [`Invoker`] owns a shared, read-only [`SchemaRegistry`] and an injected
//! [`UnaryChannel`]. A call goes through four steps:
//!
//! 1. **Resolve**: the service and method names are looked up in the registry. A miss is a
//!    [`ResolveError`], returned unchanged.
//! 2. **Build**: the JSON payload becomes a request message of the method's input type.
//!    Every schema mismatch is reported at once in a [`crate::json::ValidationError`].
//! 3. **Call**: the message is sent to `/<package.Service>/<Method>` over the channel.
//!    Failures are classified into a [`ClassifiedError`]. Nothing is retried.
//! 4. **Serialize**: the response message is rendered as JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grpcall_core::client::{CallOptions, Invoker};
//! use grpcall_core::grpc::client::GrpcClient;
//! use grpcall_core::schema::SchemaRegistry;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = SchemaRegistry::new();
//! registry.load_file("descriptor.bin")?;
//!
//! let channel = GrpcClient::connect("http://localhost:50051").await?;
//! let mut invoker = Invoker::new(registry, channel);
//!
//! let response = invoker
//!     .invoke("users.v1.UserService", "GetUser", br#"{"user_id": 42}"#, &CallOptions::new())
//!     .await?;
//! println!("{}", String::from_utf8_lossy(&response));
//! # Ok(())
//! # }
//! ```
mod error;
mod options;

pub use error::{CallError, ClassifiedError, ErrorCategory, classify};
pub use options::CallOptions;

use crate::grpc::UnaryChannel;
use crate::json::{self, BuildError};
use crate::schema::{ResolveError, SchemaRegistry};
use prost_reflect::{DynamicMessage, MethodDescriptor, ReflectMessage};
use std::str::FromStr;
use std::sync::Arc;
use tonic::metadata::{MetadataKey, MetadataValue};

/// Invokes methods of any service known to its registry over an injected channel.
///
/// Clones share the registry; whether they share a connection depends on the channel
/// (a `tonic` `Channel` multiplexes one connection across clones).
#[derive(Debug, Clone)]
pub struct Invoker<C> {
    registry: Arc<SchemaRegistry>,
    channel: C,
}

impl<C> Invoker<C>
where
    C: UnaryChannel,
{
    pub fn new(registry: impl Into<Arc<SchemaRegistry>>, channel: C) -> Self {
        Self {
            registry: registry.into(),
            channel,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Resolves a method into an [`Invocation`] that can build and decode its messages.
    pub fn invocation(&self, service: &str, method: &str) -> Result<Invocation, ResolveError> {
        self.registry.resolve(service, method).map(Invocation::new)
    }

    /// Calls `service`/`method` with a JSON request and returns the JSON response.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The pretty printed JSON response.
    /// * `Err(CallError::Resolve)` - Unknown service or method.
    /// * `Err(CallError::Encode)` - The request is not valid JSON or does not match the schema.
    /// * `Err(CallError::Transport)` - The call failed; see [`ClassifiedError::category`].
    pub async fn invoke(
        &mut self,
        service: &str,
        method: &str,
        request_json: &[u8],
        options: &CallOptions,
    ) -> Result<Vec<u8>, CallError> {
        let invocation = self.invocation(service, method)?;
        let request = invocation
            .request_from_json(request_json)
            .map_err(CallError::Encode)?;

        let response = self.call(&invocation, request, options).await?;

        json::to_json(&response).map_err(CallError::Serialize)
    }

    /// Sends an already built request message and returns the response message.
    pub async fn call(
        &mut self,
        invocation: &Invocation,
        request: DynamicMessage,
        options: &CallOptions,
    ) -> Result<DynamicMessage, CallError> {
        let input = invocation.method.input();
        if request.descriptor() != input {
            return Err(CallError::RequestTypeMismatch {
                expected: input.full_name().to_string(),
                actual: request.descriptor().full_name().to_string(),
            });
        }

        let path = invocation.path();
        let uri_path = http::uri::PathAndQuery::try_from(path.clone())
            .map_err(|source| CallError::InvalidPath {
                path: path.clone(),
                source,
            })?;
        let request = build_request(request, options)?;
        let response_desc = invocation.method.output();

        tracing::debug!(path = %path, "invoking unary method");

        let call = self.channel.unary(uri_path, request, response_desc);
        let result = match options.timeout() {
            Some(timeout) => match tokio::time::timeout(timeout, call).await {
                Ok(result) => result.map_err(classify),
                Err(_) => Err(ClassifiedError::timed_out(timeout)),
            },
            None => call.await.map_err(classify),
        };

        match result {
            Ok(response) => {
                tracing::debug!(path = %path, "unary method succeeded");
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(path = %path, code = ?err.code(), "unary method failed");
                Err(CallError::Transport(err))
            }
        }
    }
}

/// A resolved method, ready to build requests for and decode responses of.
#[derive(Debug, Clone)]
pub struct Invocation {
    method: MethodDescriptor,
}

impl Invocation {
    pub fn new(method: MethodDescriptor) -> Self {
        Self { method }
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// The HTTP/2 path of the method, e.g. `/users.v1.UserService/GetUser`.
    pub fn path(&self) -> String {
        format!(
            "/{}/{}",
            self.method.parent_service().full_name(),
            self.method.name()
        )
    }

    /// Builds a request message from JSON text, validating it against the input type.
    pub fn request_from_json(&self, json: &[u8]) -> Result<DynamicMessage, BuildError> {
        json::from_json(&self.method.input(), json)
    }

    /// Builds a message of the output type from JSON text, e.g. an expected response.
    pub fn response_from_json(&self, json: &[u8]) -> Result<DynamicMessage, BuildError> {
        json::from_json(&self.method.output(), json)
    }

    /// Decodes a binary Protobuf request.
    pub fn decode_request(&self, bytes: &[u8]) -> Result<DynamicMessage, BuildError> {
        Ok(DynamicMessage::decode(self.method.input(), bytes)?)
    }

    /// Decodes a binary Protobuf response.
    pub fn decode_response(&self, bytes: &[u8]) -> Result<DynamicMessage, BuildError> {
        Ok(DynamicMessage::decode(self.method.output(), bytes)?)
    }
}

fn build_request(
    message: DynamicMessage,
    options: &CallOptions,
) -> Result<tonic::Request<DynamicMessage>, CallError> {
    let mut request = tonic::Request::new(message);

    for (k, v) in options.headers() {
        let key = MetadataKey::from_str(k).map_err(|source| CallError::InvalidMetadataKey {
            key: k.clone(),
            source,
        })?;
        let val = MetadataValue::from_str(v).map_err(|source| CallError::InvalidMetadataValue {
            key: k.clone(),
            source,
        })?;
        request.metadata_mut().insert(key, val);
    }

    if let Some(timeout) = options.timeout() {
        request.set_timeout(timeout);
    }

    Ok(request)
}
