use anyhow::Result;
use chatgpt_mcp_agent::config::AutomationDelays;
use chatgpt_mcp_agent::utils::{init_logging, parse_log_level};
use chatgpt_mcp_agent::{ChatGptServer, OsaScriptRunner};
use clap::{Parser, ValueEnum};
use rmcp::{
    transport::stdio,
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    },
    ServiceExt,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ChatGPT MCP Server - Drive the ChatGPT desktop app via Model Context Protocol"
)]
struct Args {
    /// Transport mode to use
    #[arg(short, long, value_enum, default_value = "stdio")]
    transport: TransportMode,

    /// Port to listen on (only used for the HTTP transport)
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host to bind to (only used for the HTTP transport)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable CORS for the HTTP transport
    #[arg(long)]
    cors: bool,

    /// Default log level (error, warn, info, debug, trace); RUST_LOG directives still apply
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Wait after bringing ChatGPT to the foreground
    #[arg(long, default_value = "1000")]
    activate_delay_ms: u64,

    /// Wait after clicking a conversation in the sidebar
    #[arg(long, default_value = "1000")]
    conversation_delay_ms: u64,

    /// Wait after launching ChatGPT when it was not running
    #[arg(long, default_value = "2000")]
    launch_delay_ms: u64,

    /// Wait between typing the prompt and pressing return
    #[arg(long, default_value = "500")]
    keystroke_delay_ms: u64,

    /// Wait between submitting the prompt and reading the reply
    #[arg(long, default_value = "5000")]
    response_delay_ms: u64,
}

impl Args {
    fn delays(&self) -> AutomationDelays {
        AutomationDelays {
            activate: Duration::from_millis(self.activate_delay_ms),
            conversation_select: Duration::from_millis(self.conversation_delay_ms),
            launch_settle: Duration::from_millis(self.launch_delay_ms),
            keystroke_settle: Duration::from_millis(self.keystroke_delay_ms),
            response_settle: Duration::from_millis(self.response_delay_ms),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TransportMode {
    /// Standard I/O transport (default)
    Stdio,
    /// Streamable HTTP transport for HTTP-based clients
    Http,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(parse_log_level(&args.log_level))?;

    info!("Initializing ChatGPT MCP server...");
    info!("Transport mode: {:?}", args.transport);

    let delays = args.delays();
    info!(?delays, "automation delays");
    let server = ChatGptServer::with_runner(Arc::new(OsaScriptRunner::new()), delays);

    match args.transport {
        TransportMode::Stdio => {
            let service = server.serve(stdio()).await.inspect_err(|e| {
                error!("Serving error: {:?}", e);
            })?;
            info!("ChatGPT MCP Server running on stdio");

            service.waiting().await?;
        }
        TransportMode::Http => {
            let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
            info!("Starting streamable HTTP server on http://{}", addr);

            let service = StreamableHttpService::new(
                move || Ok(server.clone()),
                LocalSessionManager::default().into(),
                Default::default(),
            );

            let mut router = axum::Router::new()
                .route("/health", axum::routing::get(health_check))
                .nest_service("/mcp", service);
            if args.cors {
                router = router.layer(CorsLayer::permissive());
            }
            let tcp_listener = tokio::net::TcpListener::bind(addr).await?;

            eprintln!("Streamable HTTP server running on http://{addr}");
            eprintln!("Connect your MCP client to: http://{addr}/mcp");
            eprintln!("Health check available at: http://{addr}/health");
            eprintln!("Press Ctrl+C to stop");

            axum::serve(tcp_listener, router)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                })
                .await?;

            info!("Shutting down HTTP server");
        }
    }

    Ok(())
}

async fn health_check() -> impl axum::response::IntoResponse {
    (
        axum::http::StatusCode::OK,
        axum::Json(serde_json::json!({"status": "ok"})),
    )
}
