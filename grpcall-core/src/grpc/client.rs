//! # Generic gRPC Client
//!
//! This module wraps a standard `tonic` client to provide a generic interface for
//! gRPC communication. It is agnostic to the specific Protobuf messages being exchanged.
//!
//! The [`GrpcClient`] uses the [`super::codec::DynamicCodec`] to handle serialization.
//! It does not need to know the structure of the data it is sending; it simply waits for
//! the service to be ready and hands the request and the response descriptor to the codec.
use super::UnaryChannel;
use super::codec::DynamicCodec;
use crate::BoxError;
use http_body::Body as HttpBody;
use prost_reflect::{DynamicMessage, MessageDescriptor};
use std::future::Future;
use tonic::{
    client::GrpcService,
    transport::{Channel, Endpoint},
};

/// Errors that can occur when connecting to a gRPC server.
#[derive(Debug, thiserror::Error)]
pub enum ClientConnectError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, #[source] tonic::transport::Error),
    #[error("Failed to connect to '{0}': {1}")]
    ConnectionFailed(String, #[source] tonic::transport::Error),
}

/// A dynamic unary gRPC client over any `tonic` service, a `Channel` by default.
#[derive(Debug, Clone)]
pub struct GrpcClient<S = Channel> {
    client: tonic::client::Grpc<S>,
}

impl GrpcClient<Channel> {
    /// Connects to a gRPC server.
    ///
    /// # Arguments
    ///
    /// * `addr` - The server URI (e.g., `http://localhost:50051`).
    pub async fn connect(addr: &str) -> Result<Self, ClientConnectError> {
        let endpoint = Endpoint::new(addr.to_string())
            .map_err(|e| ClientConnectError::InvalidUrl(addr.to_string(), e))?;

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ClientConnectError::ConnectionFailed(addr.to_string(), e))?;

        tracing::debug!(addr, "connected to gRPC server");
        Ok(Self::new(channel))
    }
}

impl<S> GrpcClient<S>
where
    S: GrpcService<tonic::body::Body> + Send,
    S::Future: Send,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        let client = tonic::client::Grpc::new(service);
        Self { client }
    }

    /// Performs a Unary gRPC call (Single Request -> Single Response).
    ///
    /// # Returns
    ///
    /// * `Ok(DynamicMessage)` - Successful RPC execution.
    /// * `Err(Status)` - The service was not ready, or the server returned an error.
    pub async fn unary(
        &mut self,
        path: http::uri::PathAndQuery,
        request: tonic::Request<DynamicMessage>,
        response: MessageDescriptor,
    ) -> Result<DynamicMessage, tonic::Status> {
        self.client
            .ready()
            .await
            .map_err(|e| tonic::Status::from_error(e.into()))?;

        let codec = DynamicCodec::new(response);
        let response = self.client.unary(request, path, codec).await?;

        Ok(response.into_inner())
    }
}

impl<S> UnaryChannel for GrpcClient<S>
where
    S: GrpcService<tonic::body::Body> + Send,
    S::Future: Send,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    fn unary(
        &mut self,
        path: http::uri::PathAndQuery,
        request: tonic::Request<DynamicMessage>,
        response: MessageDescriptor,
    ) -> impl Future<Output = Result<DynamicMessage, tonic::Status>> + Send {
        GrpcClient::unary(self, path, request, response)
    }
}
