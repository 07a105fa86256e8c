//! a11y-tree MCP Server
//!
//! Exposes navigate / get_dom / click over the Model Context Protocol so an
//! MCP client can drive a browser through its enriched accessibility tree.

use a11y_tree::browser::{BrowserSession, ConnectionOptions, ExtractionOptions, LaunchOptions};
use a11y_tree::mcp::BrowserServer;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
    },
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    /// Standard input/output transport (default)
    Stdio,
    /// HTTP streamable transport
    Http,
}

#[derive(Parser)]
#[command(name = "a11y-tree-mcp")]
#[command(version)]
#[command(about = "Accessibility-tree browser automation MCP server", long_about = None)]
struct Cli {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Directory for the per-extraction JSON artifacts
    #[arg(long, value_name = "DIR", default_value = a11y_tree::browser::config::DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Don't write extraction artifacts
    #[arg(long)]
    no_artifacts: bool,

    /// Transport type to use
    #[arg(long, short = 't', value_enum, default_value = "stdio")]
    transport: Transport,

    /// Port for HTTP transport
    #[arg(long, short = 'p', default_value = "3000")]
    port: u16,

    /// HTTP streamable endpoint path
    #[arg(long, default_value = "/mcp")]
    http_path: String,
}

impl Cli {
    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new().headless(!self.headed);
        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path);
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir);
        }
        options
    }

    fn extraction_options(&self) -> ExtractionOptions {
        if self.no_artifacts {
            ExtractionOptions::new().without_artifacts()
        } else {
            ExtractionOptions::new().log_dir(&self.log_dir)
        }
    }

    fn server(&self) -> a11y_tree::Result<BrowserServer> {
        let session = match &self.ws_endpoint {
            Some(url) => BrowserSession::connect(ConnectionOptions::new(url))?,
            None => BrowserSession::launch(self.launch_options())?,
        };
        Ok(BrowserServer::with_session(session).with_extraction(self.extraction_options()))
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    log::info!("a11y-tree MCP Server v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Browser mode: {}", if cli.headed { "headed" } else { "headless" });

    match cli.transport {
        Transport::Stdio => {
            let service = cli.server().context("Failed to create browser server")?;
            log::info!("Ready to accept MCP connections via stdio");

            let server = service.serve(stdio()).await?;
            let quit_reason = server.waiting().await?;
            log::info!("Server quit with reason: {:?}", quit_reason);
        }
        Transport::Http => {
            let bind_addr = format!("127.0.0.1:{}", cli.port);
            let http_path = cli.http_path.clone();

            let service_factory = move || cli.server().map_err(std::io::Error::other);

            let http_service = StreamableHttpService::new(
                service_factory,
                LocalSessionManager::default().into(),
                Default::default(),
            );

            let router = axum::Router::new().nest_service(&http_path, http_service);

            log::info!("Ready to accept MCP connections at http://{}{}", bind_addr, http_path);

            let listener = tokio::net::TcpListener::bind(bind_addr).await?;
            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}
