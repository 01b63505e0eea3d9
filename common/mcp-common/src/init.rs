//! Server initialization utilities
//!
//! Tracing setup plus the stdio runner behind the `serve_stdio!` macro.

use rmcp::{transport::stdio, ServerHandler, ServiceExt};
use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Output format of the stderr log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything other than `json` means text
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Initialize tracing for an MCP server
///
/// Logs go to stderr since stdout carries the protocol. `RUST_LOG` is
/// honored, with `<crate_name>=info` added as the default directive.
/// `LOG_FORMAT=json` selects structured JSON lines.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive: Directive = format!("{}=info", crate_name).parse()?;
    let filter = EnvFilter::from_default_env().add_directive(directive);
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?,
    }

    Ok(())
}

/// Serve `server` over stdin/stdout until the peer disconnects
pub async fn serve_stdio_server<S>(server: S) -> anyhow::Result<()>
where
    S: ServerHandler,
{
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running on stdio, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}

/// Generate `main` for a stdio MCP server
///
/// The generated `main` initializes tracing, builds the server with
/// `::new()` and serves it on stdio. A failure to start (logging or
/// transport) is logged and the process exits with status 1.
///
/// ```rust,ignore
/// mcp_common::serve_stdio!(MyMcpServer, "my_mcp");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr) => {
        #[tokio::main]
        async fn main() -> std::process::ExitCode {
            if let Err(e) = $crate::init_tracing($crate_name) {
                eprintln!("Failed to initialize logging: {:#}", e);
                return std::process::ExitCode::FAILURE;
            }

            tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

            let server = <$server_type>::new();
            match $crate::serve_stdio_server(server).await {
                Ok(()) => std::process::ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("Fatal error running server: {:#}", e);
                    std::process::ExitCode::FAILURE
                }
            }
        }
    };
}
