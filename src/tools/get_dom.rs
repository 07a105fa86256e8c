use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which part of the page the agent wants to see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// The whole enriched tree
    #[default]
    AllFields,
    /// Only inputs, buttons and text areas
    InputFields,
}

/// Parameters for the get_dom tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetDomParams {
    /// `all_fields` for the full tree, `input_fields` for form controls only
    #[serde(default)]
    pub content_type: ContentType,
}

/// Tool returning the enriched accessibility tree of the active tab
#[derive(Default)]
pub struct GetDomTool;

impl Tool for GetDomTool {
    type Params = GetDomParams;

    fn name(&self) -> &str {
        "get_dom"
    }

    fn execute_typed(&self, params: GetDomParams, context: &mut ToolContext) -> Result<ToolResult> {
        let options = context
            .extraction
            .clone()
            .only_input_fields(params.content_type == ContentType::InputFields);

        match context.session.accessibility_tree(&options)? {
            Some(tree) => Ok(ToolResult::success_with(serde_json::to_value(&tree)?)),
            None => Ok(ToolResult::failure(
                "Could not fetch the DOM of the current page. Try again once the page has finished loading.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_names() {
        let params: GetDomParams = serde_json::from_value(serde_json::json!({"content_type": "input_fields"})).unwrap();
        assert_eq!(params.content_type, ContentType::InputFields);

        let params: GetDomParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.content_type, ContentType::AllFields);

        let unknown: std::result::Result<GetDomParams, _> =
            serde_json::from_value(serde_json::json!({"content_type": "text_only"}));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_get_dom_tool_metadata() {
        let tool = GetDomTool;
        assert_eq!(tool.name(), "get_dom");
        assert!(tool.parameters_schema().is_object());
    }
}
