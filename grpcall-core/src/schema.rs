//! # Schema Registry
//!
//! This module handles the loading and querying of Protobuf `FileDescriptorSet`s.
//! It acts as a database of schema definitions, allowing the invoker to
//! resolve service and method names into the `MethodDescriptor`s needed to
//! build requests and decode responses at runtime.
//!
//! ## Loading
//!
//! [`SchemaRegistry::load`] may be called several times to merge schemas. Files are keyed by
//! their name inside the descriptor set: a file that is already registered is skipped rather
//! than rejected, so a service's descriptor set and a shared set of common types (for example
//! the `google/protobuf/*.proto` well-known types) can both be loaded even though they overlap.
//!
//! ## Sharing
//!
//! Loading takes `&mut self`. Once every set is loaded the registry is only read, so it is
//! usually wrapped in an `Arc` and handed to one or more [`crate::client::Invoker`]s.
//! To pick up new schemas, build a fresh registry and swap the `Arc`.
use prost::Message;
use prost_reflect::{DescriptorPool, MessageDescriptor, MethodDescriptor, ServiceDescriptor};
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a descriptor set into the registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("Failed to read descriptor set file '{path}': '{source}'")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode file descriptor set: '{0}'")]
    Decode(#[from] prost::DecodeError),
    #[error("Failed to build descriptors from file descriptor set: '{0}'")]
    Descriptor(#[from] prost_reflect::DescriptorError),
}

/// Errors returned when a service or a method cannot be found in the registry.
///
/// These indicate a mismatch between the caller and the loaded schemas, not a transport problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),
    #[error("Method '{method}' not found in service '{service}'")]
    MethodNotFound { service: String, method: String },
}

/// A registry that holds loaded Protobuf definitions and allows looking up
/// services and methods by name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    pool: DescriptorPool,
    services: HashMap<String, ServiceDescriptor>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from a single encoded `FileDescriptorSet`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SchemaLoadError> {
        let mut registry = Self::new();
        registry.load(bytes)?;
        Ok(registry)
    }

    /// Decodes an encoded `FileDescriptorSet` and registers every file it contains
    /// that is not registered yet.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The set was merged into the registry.
    /// * `Err(SchemaLoadError)` - The bytes are not a descriptor set, or its files
    ///   reference types that are defined nowhere.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), SchemaLoadError> {
        let file_descriptor_set = FileDescriptorSet::decode(bytes)?;
        self.load_file_descriptor_set(file_descriptor_set)
    }

    /// Reads a binary descriptor set (as produced by `protoc --descriptor_set_out`) from disk
    /// and loads it.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), SchemaLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SchemaLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(&bytes)
    }

    /// Registers the files of an already decoded `FileDescriptorSet`.
    pub fn load_file_descriptor_set(
        &mut self,
        file_descriptor_set: FileDescriptorSet,
    ) -> Result<(), SchemaLoadError> {
        let files = self.unregistered_files(file_descriptor_set.file);

        if !files.is_empty() {
            self.pool.add_file_descriptor_protos(files)?;
        }

        self.reindex_services();
        Ok(())
    }

    /// Resolves a method by the fully qualified name of its service and its own name.
    ///
    /// # Returns
    ///
    /// * `Err(ResolveError::ServiceNotFound)` - No loaded file declares the service.
    /// * `Err(ResolveError::MethodNotFound)` - The service exists but has no such method.
    pub fn resolve(&self, service: &str, method: &str) -> Result<MethodDescriptor, ResolveError> {
        let service_descriptor = self
            .services
            .get(service)
            .ok_or_else(|| ResolveError::ServiceNotFound(service.to_string()))?;

        service_descriptor
            .methods()
            .find(|m| m.name() == method)
            .ok_or_else(|| ResolveError::MethodNotFound {
                service: service.to_string(),
                method: method.to_string(),
            })
    }

    /// Lists the fully qualified names of all registered services, in no particular order.
    pub fn list_services(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    /// Looks up a service by its fully qualified name.
    pub fn service(&self, name: &str) -> Option<ServiceDescriptor> {
        self.services.get(name).cloned()
    }

    /// Looks up a message type by its fully qualified name.
    pub fn message(&self, name: &str) -> Option<MessageDescriptor> {
        self.pool.get_message_by_name(name)
    }

    /// Whether a file with the given name (e.g. `google/protobuf/empty.proto`) is registered.
    pub fn contains_file(&self, name: &str) -> bool {
        self.pool.get_file_by_name(name).is_some()
    }

    /// Drops files that are already in the pool, or that appear twice in the same set.
    fn unregistered_files(&self, files: Vec<FileDescriptorProto>) -> Vec<FileDescriptorProto> {
        let mut seen = HashSet::new();

        files
            .into_iter()
            .filter(|file| {
                let name = file.name();
                if self.contains_file(name) || !seen.insert(name.to_string()) {
                    tracing::debug!(file = name, "skipping already registered schema file");
                    return false;
                }
                true
            })
            .collect()
    }

    fn reindex_services(&mut self) {
        self.services = self
            .pool
            .services()
            .map(|s| (s.full_name().to_string(), s))
            .collect();

        tracing::debug!(
            files = self.pool.files().len(),
            services = self.services.len(),
            "schema registry updated"
        );
    }
}
