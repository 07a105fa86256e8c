use crate::dom::PageBridge;
use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the get_element_attributes tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetElementAttributesParams {
    /// `mmid` of the element, as shown in the tree (e.g. `"12"`)
    pub mmid: String,

    /// Attribute names to read, e.g. `["value", "href"]`. A select's options are always listed.
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Tool reading attributes the tree leaves out, including the options of a select menu
#[derive(Default)]
pub struct GetElementAttributesTool;

impl Tool for GetElementAttributesTool {
    type Params = GetElementAttributesParams;

    fn name(&self) -> &str {
        "get_element_attributes"
    }

    fn execute_typed(&self, params: GetElementAttributesParams, context: &mut ToolContext) -> Result<ToolResult> {
        let tab = context.session.tab()?;
        element_attributes(&*tab, &params.mmid, &params.attributes)
    }
}

/// Look up `attributes` on the element tagged `mmid`.
///
/// A malformed or unknown id is a failure the agent reads, not an `Err`.
pub fn element_attributes<P: PageBridge + ?Sized>(page: &P, mmid: &str, attributes: &[String]) -> Result<ToolResult> {
    let Ok(id) = mmid.trim().parse::<u64>() else {
        return Ok(ToolResult::failure(format!("\"{}\" is not an mmid; expected a number such as \"12\"", mmid)));
    };

    let names: Vec<&str> = attributes.iter().map(String::as_str).collect();
    log::debug!("Fetching attributes {:?} of mmid {}", names, id);

    match page.element_attributes(id, &names)? {
        Some(found) => Ok(ToolResult::success_with(serde_json::to_value(&found)?)),
        None => Ok(ToolResult::failure(format!(
            "No element with mmid {} on the current page. Fetch the DOM again to get fresh ids.",
            id
        ))),
    }
}
