use colored::*;
use grpcall_core::{
    client::CallError,
    grpc::client::ClientConnectError,
    json::{BuildError, FieldError},
    schema::SchemaLoadError,
};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct ServiceList(pub Vec<String>);

/// A JSON response body, as produced by the invoker.
pub struct JsonResponse(pub Vec<u8>);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<JsonResponse> for FormattedString {
    fn from(JsonResponse(bytes): JsonResponse) -> Self {
        FormattedString(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl From<CallError> for FormattedString {
    fn from(err: CallError) -> Self {
        match &err {
            CallError::Encode(BuildError::Validation(validation)) => FormattedString(format!(
                "{}\n\n{}",
                "Invalid Request:".red().bold(),
                field_errors(validation.errors())
            )),
            CallError::Resolve(_) => {
                FormattedString(format!("{}\n\n'{}'", "Lookup Failed:".red().bold(), err))
            }
            CallError::Transport(transport) => FormattedString(format!(
                "{} code={:?} message={:?}\n\n{}",
                "gRPC Failed:".red().bold(),
                transport.code(),
                transport.message(),
                transport
            )),
            _ => FormattedString(format!("{}\n\n'{}'", "Call Failed:".red().bold(), err)),
        }
    }
}

impl From<SchemaLoadError> for FormattedString {
    fn from(err: SchemaLoadError) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to load descriptor set:".red().bold(),
            err
        ))
    }
}

impl From<ClientConnectError> for FormattedString {
    fn from(err: ClientConnectError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Connection Error:".red().bold(), err))
    }
}

impl From<ServiceList> for FormattedString {
    fn from(ServiceList(services): ServiceList) -> Self {
        if services.is_empty() {
            return FormattedString("No services found.".yellow().to_string());
        }

        let mut out = String::new();
        out.push_str("Available Services:\n");
        for svc in services {
            out.push_str(&format!("  - {}\n", svc.green()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

fn field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| {
            format!(
                "  - {}: {} (expected {}, got {})",
                e.path.yellow(),
                e.message,
                e.expected,
                e.actual
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
