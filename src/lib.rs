//! # a11y-tree
//!
//! Accessibility-tree extraction for LLM browser agents, over the Chrome DevTools Protocol (CDP).
//!
//! Each extraction cycle tags every DOM element with an `mmid` id, takes Chrome's accessibility
//! snapshot, enriches the snapshot nodes with DOM facts (tag, input type, labels, placeholders)
//! and prunes whatever an agent would read twice or cannot act on. The agent then targets
//! elements with `[mmid='N']`.
//!
//! ## Features
//!
//! - **MCP Server**: `browser_navigate`, `browser_get_dom`, `browser_click` and `browser_get_element_attributes` over the Model Context Protocol
//! - **Accessibility tree**: compact, id-carrying view of the page, optionally input fields only
//! - **Tool System**: typed tools behind a registry, callable with raw JSON
//! - **Debug artifacts**: raw and enriched trees written to a log directory per cycle
//!
//! ### Running the MCP Server
//!
//! ```bash
//! cargo run --features mcp-server --bin mcp-server
//!
//! # Run with visible browser (useful for debugging)
//! cargo run --features mcp-server --bin mcp-server -- --headed
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use a11y_tree::{BrowserSession, ExtractionOptions, LaunchOptions};
//!
//! # fn main() -> a11y_tree::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//! session.wait_for_navigation()?;
//!
//! if let Some(tree) = session.accessibility_tree(&ExtractionOptions::default())? {
//!     println!("{}", tree.to_json()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the Tool System
//!
//! ```rust,no_run
//! use a11y_tree::{BrowserSession, LaunchOptions};
//! use serde_json::json;
//!
//! # fn main() -> a11y_tree::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//!
//! session.execute_tool("navigate", json!({"url": "example.com"}))?;
//! let dom = session.execute_tool("get_dom", json!({"content_type": "input_fields"}))?;
//! println!("{:?}", dom.data);
//!
//! let clicked = session.execute_tool("click", json!({"selector": "[mmid='12']"}))?;
//! if !clicked.success {
//!     eprintln!("{}", clicked.error.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving the engine without Chrome
//!
//! The extraction engine only talks to the page through [`dom::PageBridge`], so any type
//! implementing it can be fed to [`dom::extract_accessibility_tree`].
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management and configuration
//! - [`dom`]: Id injection, accessibility snapshot, enrichment and pruning
//! - [`tools`]: Browser automation tools (navigate, get_dom, click, get_element_attributes)
//! - [`error`]: Error types and result aliases
//! - [`mcp`]: Model Context Protocol server (requires `mcp-handler` feature)

pub mod browser;
pub mod dom;
pub mod error;
pub mod tools;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use browser::{BrowserSession, ConnectionOptions, ExtractionOptions, LaunchOptions};
pub use dom::{AccessibilityNode, PageBridge, extract_accessibility_tree};
pub use error::{BrowserError, Result};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};

#[cfg(feature = "mcp-handler")]
pub use mcp::BrowserServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
