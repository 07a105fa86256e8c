use crate::browser::{BrowserSession, ExtractionOptions, LaunchOptions};
use crate::error::Result as BrowserResult;
use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const INSTRUCTIONS: &str = "Browser automation for agents. Call browser_get_dom to read the page as an \
                            accessibility tree whose actionable nodes carry an `mmid`, then act on them \
                            with browser_click using the selector [mmid='N']. Options of a select menu are \
                            listed by browser_get_element_attributes. Fetch the DOM again after \
                            any action that changes the page.";

/// MCP server owning one browser session
#[derive(Clone)]
pub struct BrowserServer {
    session: Arc<Mutex<BrowserSession>>,
    extraction: ExtractionOptions,
    tool_router: ToolRouter<Self>,
}

impl BrowserServer {
    /// Launch a browser with default options
    pub fn new() -> BrowserResult<Self> {
        Self::with_options(LaunchOptions::default())
    }

    /// Launch a browser with `options`
    pub fn with_options(options: LaunchOptions) -> BrowserResult<Self> {
        Ok(Self::with_session(BrowserSession::launch(options)?))
    }

    /// Serve an existing session
    pub fn with_session(session: BrowserSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            extraction: ExtractionOptions::default(),
            tool_router: Self::tool_router(),
        }
    }

    /// Builder method: options used by `browser_get_dom`
    pub fn with_extraction(mut self, extraction: ExtractionOptions) -> Self {
        self.extraction = extraction;
        self
    }

    pub(crate) fn extraction(&self) -> &ExtractionOptions {
        &self.extraction
    }

    /// Lock the session. A tool that panicked mid-call leaves the page in an
    /// unknown state but the session itself is still usable.
    pub(crate) fn session(&self) -> MutexGuard<'_, BrowserSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[tool_handler]
impl ServerHandler for BrowserServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}
