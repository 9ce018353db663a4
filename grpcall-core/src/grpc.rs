//! # Generic gRPC Transport
//!
//! This module contains the low-level building blocks for performing gRPC calls using
//! dynamic message types.
//!
//! Unlike standard `tonic` clients which are strongly typed (e.g., `HelloRequest`),
//! the components here carry `prost_reflect::DynamicMessage`s whose shape is only known
//! through the descriptors loaded at runtime.
//!
//! [`UnaryChannel`] is the seam between the invoker and the network: the invoker only needs
//! "perform one unary call", and anything able to do that can be injected. [`client::GrpcClient`]
//! is the `tonic` implementation used in production.
pub mod client;
pub mod codec;

use prost_reflect::{DynamicMessage, MessageDescriptor};
use std::future::Future;

/// A transport able to perform a single unary call with dynamic messages.
///
/// Connection setup, TLS and credentials belong to whoever builds the channel.
pub trait UnaryChannel {
    /// Sends `request` to the method at `path` (`/package.Service/Method`) and decodes the
    /// reply as a message of type `response`.
    ///
    /// # Returns
    ///
    /// * `Ok(DynamicMessage)` - The server's reply.
    /// * `Err(Status)` - The call failed, either on the server or in the transport.
    fn unary(
        &mut self,
        path: http::uri::PathAndQuery,
        request: tonic::Request<DynamicMessage>,
        response: MessageDescriptor,
    ) -> impl Future<Output = Result<DynamicMessage, tonic::Status>> + Send;
}
