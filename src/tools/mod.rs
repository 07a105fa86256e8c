//! Browser tools an agent can call.
//!
//! Each tool declares a typed parameter struct; the registry erases the type
//! so tools can be looked up by name and called with raw JSON from the MCP
//! layer or the CLI.

pub mod click;
pub mod get_dom;
pub mod get_element_attributes;
pub mod navigate;
pub mod utils;

pub use click::{ClickParams, ClickTool};
pub use get_dom::{ContentType, GetDomParams, GetDomTool};
pub use get_element_attributes::{GetElementAttributesParams, GetElementAttributesTool};
pub use navigate::{NavigateParams, NavigateTool};

use crate::browser::{BrowserSession, ExtractionOptions};
use crate::error::{BrowserError, Result};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one tool call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success() -> Self {
        Self { success: true, data: None, error: None }
    }

    pub fn success_with(data: Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    /// A failure the agent should read, not an `Err`
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

/// What a tool runs against
pub struct ToolContext<'a> {
    pub session: &'a BrowserSession,

    /// Used by tools that extract the accessibility tree
    pub extraction: ExtractionOptions,
}

impl<'a> ToolContext<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session, extraction: ExtractionOptions::default() }
    }

    pub fn with_extraction(mut self, extraction: ExtractionOptions) -> Self {
        self.extraction = extraction;
        self
    }
}

/// A browser operation with typed parameters
pub trait Tool: Send + Sync {
    type Params: DeserializeOwned + JsonSchema;

    fn name(&self) -> &str;

    /// JSON schema of [`Tool::Params`]
    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or(Value::Null)
    }

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// Parse raw JSON parameters and run the tool
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let params: Self::Params = serde_json::from_value(params)
            .map_err(|e| BrowserError::InvalidArgument(format!("Invalid parameters for '{}': {}", Tool::name(self), e)))?;
        self.execute_typed(params, context)
    }
}

/// Object-safe view of a [`Tool`]
trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn parameters_schema(&self) -> Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        Tool::execute(self, params, context)
    }
}

/// Tools by name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with navigate, get_dom, click and get_element_attributes
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NavigateTool);
        registry.register(GetDomTool);
        registry.register(ClickTool);
        registry.register(GetElementAttributesTool);
        registry
    }

    /// Add a tool, replacing any tool with the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn schema(&self, name: &str) -> Option<Value> {
        self.tools.get(name).map(|tool| tool.parameters_schema())
    }

    /// Run the tool called `name` with raw JSON parameters
    pub fn execute(&self, name: &str, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| BrowserError::InvalidArgument(format!("Unknown tool: {}", name)))?;

        log::info!("Executing tool '{}'", tool.name());
        tool.execute(params, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["navigate", "get_dom", "click", "get_element_attributes"]
        );
        assert!(registry.contains("click"));
        assert!(!registry.contains("screenshot"));
    }

    #[test]
    fn test_schemas_are_objects() {
        let registry = ToolRegistry::with_defaults();
        for name in ["navigate", "get_dom", "click", "get_element_attributes"] {
            assert!(registry.schema(name).unwrap().is_object(), "{} schema", name);
        }
        assert!(registry.schema("missing").is_none());
    }

    #[test]
    fn test_tool_result_shapes() {
        let ok = ToolResult::success_with(json!({"url": "about:blank"}));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true, "data": {"url": "about:blank"}}));

        let failed = ToolResult::failure("boom");
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"success": false, "error": "boom"}));

        assert!(ToolResult::success().data.is_none());
    }
}
