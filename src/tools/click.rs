use crate::error::{BrowserError, Result};
use crate::tools::{Tool, ToolContext, ToolResult};
use headless_chrome::{Element, Tab};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the target gets to show up before the click is given up
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Picks an `<option>` through its parent `<select>` and fires `change`
const SELECT_OPTION_JS: &str = r#"
    function() {
        const select = this.parentElement;
        select.value = this.value;
        select.dispatchEvent(new Event('change', { bubbles: true }));
        return this.value;
    }
"#;

/// Parameters for the click tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClickParams {
    /// Query selector of the element to click, e.g. `[mmid='114']`
    pub selector: String,

    /// Seconds to wait before clicking, for pages still settling after the last action
    #[serde(default)]
    pub wait_before_execution: f64,
}

/// Tool for clicking an element, or picking an option of a select menu
#[derive(Default)]
pub struct ClickTool;

impl Tool for ClickTool {
    type Params = ClickParams;

    fn name(&self) -> &str {
        "click"
    }

    fn execute_typed(&self, params: ClickParams, context: &mut ToolContext) -> Result<ToolResult> {
        log::info!(
            "Executing click with \"{}\" as the selector. Wait time before execution: {} seconds.",
            params.selector,
            params.wait_before_execution
        );

        // Blocks this worker thread; the server runs a multi-thread runtime so
        // other requests keep being served meanwhile
        if let Some(wait) = wait_duration(params.wait_before_execution) {
            std::thread::sleep(wait);
        }

        let outcome = context.session.tab().and_then(|tab| do_click(&tab, &params.selector));

        match outcome {
            Ok(message) => Ok(ToolResult::success_with(serde_json::json!({
                "selector": params.selector,
                "message": message,
            }))),
            Err(e) => {
                let message = format!("Unable to click element with selector: \"{}\". Error: {}", params.selector, e);
                log::error!("{}", message);
                Ok(ToolResult::failure(message))
            }
        }
    }
}

/// Pause requested before clicking, `None` for zero or an unusable value
fn wait_duration(seconds: f64) -> Option<Duration> {
    match Duration::try_from_secs_f64(seconds) {
        Ok(wait) if !wait.is_zero() => Some(wait),
        Ok(_) => None,
        Err(_) => {
            log::warn!("Ignoring invalid wait of {} seconds", seconds);
            None
        }
    }
}

fn do_click(tab: &Tab, selector: &str) -> Result<String> {
    log::debug!("Waiting for element \"{}\"", selector);
    let element = tab
        .wait_for_element_with_custom_timeout(selector, ELEMENT_TIMEOUT)
        .map_err(|e| BrowserError::ElementNotFound(format!("'{}': {}", selector, e)))?;

    element.scroll_into_view().map_err(click_failed)?;

    let tag = tag_name(&element)?;
    let outer_html = element.get_content().map_err(click_failed)?;

    if tag == "option" {
        let selected = element
            .call_js_fn(SELECT_OPTION_JS, vec![], false)
            .map_err(click_failed)?
            .value
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();

        log::info!("Select menu option \"{}\" selected", selected);
        return Ok(format!(
            "Select menu option \"{}\" selected. The select element's outer HTML is: {}.",
            selected, outer_html
        ));
    }

    element.click().map_err(click_failed)?;
    log::info!("Successfully clicked element with selector: {}", selector);

    Ok(format!(
        "Successfully clicked element with selector: \"{}\". The clicked element's outer HTML is: {}.",
        selector, outer_html
    ))
}

fn tag_name(element: &Element<'_>) -> Result<String> {
    let tag = element
        .call_js_fn("function() { return this.tagName.toLowerCase(); }", vec![], false)
        .map_err(click_failed)?
        .value
        .and_then(|v| v.as_str().map(str::to_owned))
        .ok_or_else(|| BrowserError::EvaluationFailed("Element has no tag name".to_string()))?;

    Ok(tag)
}

fn click_failed(e: impl std::fmt::Display) -> BrowserError {
    BrowserError::ToolExecutionFailed {
        tool: "click".to_string(),
        reason: e.to_string(),
    }
}
