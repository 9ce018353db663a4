//! # grpcall CLI Entry Point
//!
//! The main executable for the grpcall tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs the
//!    `tracing` subscriber (stderr, filtered by `RUST_LOG` or `-v`).
//! 2. **Schemas**: Loads every descriptor set into a `SchemaRegistry`.
//! 3. **Execution**: Connects to the server and delegates the call to an `Invoker`.
//! 4. **Presentation**: Formats and prints the resulting data or error to standard output/error.

mod cli;
mod formatter;

use clap::Parser;
use cli::{Cli, Commands};
use formatter::{FormattedString, JsonResponse, ServiceList};
use grpcall_core::client::{CallError, CallOptions, Invocation, Invoker};
use grpcall_core::grpc::client::GrpcClient;
use grpcall_core::json;
use grpcall_core::schema::{SchemaLoadError, SchemaRegistry};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let registry = or_exit(load_registry(&args.file_descriptor_sets));

    match args.command {
        Commands::Call {
            url,
            endpoint,
            body,
            headers,
            timeout_ms,
        } => {
            let (service, method) = endpoint;
            let mut options = CallOptions::new().with_headers(headers);
            if let Some(ms) = timeout_ms {
                options = options.with_timeout(Duration::from_millis(ms));
            }

            run_call(registry, &url, &service, &method, body, options).await;
        }
        Commands::List => {
            let mut services = registry.list_services();
            services.sort();
            println!("{}", FormattedString::from(ServiceList(services)));
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_registry(paths: &[PathBuf]) -> Result<SchemaRegistry, SchemaLoadError> {
    let mut registry = SchemaRegistry::new();
    for path in paths {
        registry.load_file(path)?;
        tracing::debug!(path = %path.display(), "loaded descriptor set");
    }
    Ok(registry)
}

async fn run_call(
    registry: SchemaRegistry,
    url: &str,
    service: &str,
    method: &str,
    body: serde_json::Value,
    options: CallOptions,
) {
    // Unknown methods and invalid bodies are reported before connecting.
    let invocation = or_exit(
        registry
            .resolve(service, method)
            .map(Invocation::new)
            .map_err(CallError::from),
    );
    let request = or_exit(
        json::from_value(&invocation.method().input(), &body).map_err(CallError::Encode),
    );

    let channel = or_exit(GrpcClient::connect(url).await);
    let mut invoker = Invoker::new(registry, channel);

    let response = or_exit(invoker.call(&invocation, request, &options).await);
    let output = or_exit(json::to_json(&response).map_err(CallError::Serialize));

    println!("{}", FormattedString::from(JsonResponse(output)));
}

fn or_exit<T, E>(result: Result<T, E>) -> T
where
    FormattedString: From<E>,
{
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}
