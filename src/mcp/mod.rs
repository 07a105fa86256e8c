//! MCP (Model Context Protocol) server exposing the browser tools
//!
//! Each MCP tool forwards its typed parameters to the session's tool registry.

pub mod handler;
pub use handler::BrowserServer;

use crate::tools::{ClickParams, GetDomParams, GetElementAttributesParams, NavigateParams, ToolResult};
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool, tool_router,
};
use serde::Serialize;

/// Convert a registry result into an MCP result.
///
/// A failed [`ToolResult`] becomes a tool-level error the agent can read and
/// recover from; only registry errors become protocol errors.
fn convert_result(result: ToolResult) -> Result<CallToolResult, McpError> {
    if result.success {
        let text = match result.data {
            Some(data) => serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string()),
            None => "Success".to_string(),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    } else {
        let error_msg = result.error.unwrap_or_else(|| "Unknown error".to_string());
        Ok(CallToolResult::error(vec![Content::text(error_msg)]))
    }
}

fn to_value<T: Serialize>(params: &T) -> Result<serde_json::Value, McpError> {
    serde_json::to_value(params).map_err(|e| McpError::invalid_params(e.to_string(), None))
}

#[tool_router]
impl BrowserServer {
    /// Navigate to a URL
    #[tool(description = "Navigate to a specified URL in the browser")]
    fn browser_navigate(&self, params: Parameters<NavigateParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("navigate", to_value(&params.0)?)
    }

    /// Get the enriched accessibility tree
    #[tool(
        description = "Get the current page as a compact accessibility tree. Every actionable node carries an `mmid`; target it with the selector [mmid='N']. Use content_type `input_fields` to see only inputs, buttons and text areas."
    )]
    fn browser_get_dom(&self, params: Parameters<GetDomParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("get_dom", to_value(&params.0)?)
    }

    /// Click on an element
    #[tool(
        description = "Click the element matching a query selector, e.g. [mmid='114']. Clicking an option of a select menu selects it."
    )]
    fn browser_click(&self, params: Parameters<ClickParams>) -> Result<CallToolResult, McpError> {
        self.run_tool("click", to_value(&params.0)?)
    }

    /// Read attributes of one element
    #[tool(
        description = "Read attributes of the element with the given mmid, e.g. value or href. For a select menu the result also lists its options with their own mmid; click [mmid='N'] of an option to pick it."
    )]
    fn browser_get_element_attributes(
        &self,
        params: Parameters<GetElementAttributesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_tool("get_element_attributes", to_value(&params.0)?)
    }
}

impl BrowserServer {
    fn run_tool(&self, name: &str, params: serde_json::Value) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let result = session
            .execute_tool_with(name, params, self.extraction().clone())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_carries_pretty_data() {
        let result = convert_result(ToolResult::success_with(json!({"role": "WebArea"}))).unwrap();
        assert_ne!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn test_router_lists_browser_tools() {
        let mut names: Vec<String> = BrowserServer::tool_router()
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec!["browser_click", "browser_get_dom", "browser_get_element_attributes", "browser_navigate"]
        );
    }

    #[test]
    fn test_failure_is_readable_not_protocol_error() {
        let failed = ToolResult::failure("Unable to click element with selector: \"#x\". Error: timeout");
        let result = convert_result(failed).unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
