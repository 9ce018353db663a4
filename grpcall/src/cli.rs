//! # CLI
//!
//! This module defines the command-line interface of `grpcall` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring headers are `key:value`).
//! Descriptor sets are given before the subcommand, as many times as needed:
//!
//! ```bash
//! grpcall -f users.bin -f common.bin call http://localhost:50051 users.v1.UserService/GetUser --body '{"user_id": 42}'
//! ```
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "grpcall",
    version,
    about = "Unary gRPC calls with JSON bodies, driven by descriptor sets"
)]
pub struct Cli {
    /// Path to a descriptor set (.bin). Repeat to merge several sets.
    #[arg(short = 'f', long = "file-descriptor-set", required = true)]
    pub file_descriptor_sets: Vec<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Perform a unary gRPC call
    ///
    /// The body is validated against the method's input type before anything is sent.
    Call {
        /// The server URL to connect to (e.g. http://localhost:50051)
        url: String,

        /// Endpoint (package.Service/Method)
        #[arg(value_parser = parse_endpoint)]
        endpoint: (String, String),

        /// JSON object matching the method's input type
        #[arg(long, value_parser = parse_body, default_value = "{}")]
        body: serde_json::Value,

        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Call deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List the services found in the descriptor sets
    List,
}

fn parse_endpoint(value: &str) -> Result<(String, String), String> {
    let (service, method) = value.split_once('/').ok_or_else(|| {
        format!("Invalid endpoint format: '{value}'. Expected 'package.Service/Method'",)
    })?;

    if service.trim().is_empty() || method.trim().is_empty() {
        return Err("Service and Method names cannot be empty".to_string());
    }

    Ok((service.to_string(), method.to_string()))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| "Format must be 'key:value'".to_string())
}

fn parse_body(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn endpoint_is_split_on_the_slash() {
        assert_eq!(
            parse_endpoint("users.v1.UserService/GetUser"),
            Ok(("users.v1.UserService".to_string(), "GetUser".to_string()))
        );
        assert!(parse_endpoint("users.v1.UserService.GetUser").is_err());
        assert!(parse_endpoint("/GetUser").is_err());
        assert!(parse_endpoint("users.v1.UserService/ ").is_err());
    }

    #[test]
    fn header_is_trimmed() {
        assert_eq!(
            parse_header("authorization: Bearer abc"),
            Ok(("authorization".to_string(), "Bearer abc".to_string()))
        );
        assert!(parse_header("authorization").is_err());
    }

    #[test]
    fn body_must_be_json() {
        assert!(parse_body(r#"{"user_id": 42}"#).is_ok());
        assert!(parse_body("{user_id: 42}").is_err());
    }

    #[test]
    fn call_arguments() {
        let cli = Cli::try_parse_from([
            "grpcall",
            "-f",
            "a.bin",
            "-f",
            "b.bin",
            "call",
            "http://localhost:50051",
            "UserService/GetUser",
            "--body",
            r#"{"user_id": 42}"#,
            "-H",
            "x-id:7",
            "--timeout-ms",
            "1500",
        ])
        .unwrap();

        assert_eq!(
            cli.file_descriptor_sets,
            vec![PathBuf::from("a.bin"), PathBuf::from("b.bin")]
        );

        match cli.command {
            Commands::Call {
                url,
                endpoint,
                body,
                headers,
                timeout_ms,
            } => {
                assert_eq!(url, "http://localhost:50051");
                assert_eq!(endpoint.0, "UserService");
                assert_eq!(endpoint.1, "GetUser");
                assert_eq!(body, serde_json::json!({ "user_id": 42 }));
                assert_eq!(headers, vec![("x-id".to_string(), "7".to_string())]);
                assert_eq!(timeout_ms, Some(1500));
            }
            other => panic!("Expected a call command, got {other:?}"),
        }
    }

    #[test]
    fn descriptor_set_is_required() {
        assert!(Cli::try_parse_from(["grpcall", "list"]).is_err());
        assert!(Cli::try_parse_from(["grpcall", "-f", "a.bin", "list"]).is_ok());
    }
}
