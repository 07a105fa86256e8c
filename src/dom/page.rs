//! The seam between the extraction engine and a live page.
//!
//! Every browser round trip the engine makes goes through [`PageBridge`], so
//! the resolver, enricher and pruner can be driven by an in-memory page in
//! tests and by a Chrome tab in production.

use crate::dom::node::AccessibilityNode;
use crate::dom::snapshot::{self, RawAxNode};
use crate::error::{BrowserError, Result};
use headless_chrome::Tab;
use headless_chrome::protocol::cdp::Accessibility;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Attribute carrying the injected element id
pub const MMID_ATTRIBUTE: &str = "mmid";

/// Accessibility-visible attribute the id is piggy-backed on
pub const SHORTCUT_ATTRIBUTE: &str = "aria-keyshortcuts";

/// Where a pre-existing shortcut value is parked while the id occupies it
pub const BACKUP_SHORTCUT_ATTRIBUTE: &str = "orig-aria-keyshortcuts";

/// Containers searched when an id has to be recovered from visible text
pub const TEXT_LOOKUP_SELECTOR: &str = "li[mmid], span[mmid], div[mmid]";

/// What one element-by-id query returns, before any ignore rule is applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementFacts {
    /// Lower-cased tag name
    pub tag: String,

    /// The element's `id` property, empty when unset
    #[serde(default)]
    pub element_id: String,

    /// `type` of an `<input>`, `None` for every other tag
    #[serde(default)]
    pub input_type: Option<String>,

    /// Requested attributes that have a non-empty value
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// `innerText`, only when it was asked for
    #[serde(default)]
    pub inner_text: Option<String>,
}

/// One `<option>` of a select menu
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    /// Injected id, `None` when the option was added after the last extraction
    #[serde(default)]
    pub mmid: Option<String>,
    pub value: String,
    pub text: String,
    #[serde(default)]
    pub selected: bool,
}

/// Attributes read from one element on demand, outside the tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementAttributes {
    /// Lower-cased tag name
    pub tag: String,

    /// Every requested attribute, `None` when the element doesn't carry it
    #[serde(default)]
    pub attributes: IndexMap<String, Option<String>>,

    /// Options of a `<select>`, which the tree never lists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

/// Live-page operations used by one extraction cycle
pub trait PageBridge {
    /// Tag every element in document order with ids `start + 1 ..`, writing
    /// both [`MMID_ATTRIBUTE`] and [`SHORTCUT_ATTRIBUTE`] and backing up any
    /// existing shortcut value. Returns the last id assigned.
    fn inject_mmids(&self, start: u64) -> Result<u64>;

    /// Accessibility snapshot restricted to interesting nodes
    fn accessibility_snapshot(&self) -> Result<Option<AccessibilityNode>>;

    /// Put every tagged element's shortcut attribute back the way it was.
    /// The id attribute itself stays so actions can target `[mmid='N']`.
    fn restore_keyshortcuts(&self) -> Result<()>;

    /// Id of the first container (in document order) whose trimmed text
    /// content equals `text`
    fn find_mmid_by_text(&self, text: &str) -> Result<Option<String>>;

    /// Facts about the element tagged `mmid`, `None` when it is gone
    fn element_facts(
        &self,
        mmid: u64,
        attributes: &[&str],
        with_inner_text: bool,
    ) -> Result<Option<ElementFacts>>;

    /// Raw values of `attributes` on the element tagged `mmid`, `None` when
    /// it is gone
    fn element_attributes(&self, mmid: u64, attributes: &[&str]) -> Result<Option<ElementAttributes>>;
}

/// Run one of the bundled page scripts with JSON arguments.
///
/// The scripts return `JSON.stringify(...)` so the result survives
/// `Runtime.evaluate` as a primitive string, which is then parsed here.
fn evaluate_script<T: DeserializeOwned>(tab: &Tab, script: &str, args: Value) -> Result<T> {
    let expression = format!("({})({})", script.trim(), args);

    let result = tab
        .evaluate(&expression, false)
        .map_err(|e| BrowserError::EvaluationFailed(e.to_string()))?;

    let value = result
        .value
        .ok_or_else(|| BrowserError::EvaluationFailed("No value returned from page script".to_string()))?;

    let json_str: String = serde_json::from_value(value)?;
    Ok(serde_json::from_str(&json_str)?)
}

impl PageBridge for Tab {
    fn inject_mmids(&self, start: u64) -> Result<u64> {
        evaluate_script(
            self,
            include_str!("js/inject_mmids.js"),
            json!({
                "start": start,
                "mmid": MMID_ATTRIBUTE,
                "shortcut": SHORTCUT_ATTRIBUTE,
                "backup": BACKUP_SHORTCUT_ATTRIBUTE,
            }),
        )
    }

    fn accessibility_snapshot(&self) -> Result<Option<AccessibilityNode>> {
        self.call_method(Accessibility::Enable(None))
            .map_err(|e| BrowserError::SnapshotFailed(format!("Failed to enable accessibility domain: {}", e)))?;

        let tree = self
            .call_method(Accessibility::GetFullAXTree {
                depth: None,
                frame_id: None,
            })
            .map_err(|e| BrowserError::SnapshotFailed(e.to_string()))?;

        // Round-trip through JSON so the reducer works on the wire shape and
        // not on one protocol revision's generated types
        let raw: Vec<RawAxNode> = serde_json::from_value(serde_json::to_value(&tree.nodes)?)?;
        log::debug!("Full accessibility tree has {} nodes", raw.len());

        Ok(snapshot::interesting_tree(raw))
    }

    fn restore_keyshortcuts(&self) -> Result<()> {
        let restored: u64 = evaluate_script(
            self,
            include_str!("js/restore_keyshortcuts.js"),
            json!({
                "mmid": MMID_ATTRIBUTE,
                "shortcut": SHORTCUT_ATTRIBUTE,
                "backup": BACKUP_SHORTCUT_ATTRIBUTE,
            }),
        )?;
        log::debug!("Restored shortcut attributes on {} elements", restored);
        Ok(())
    }

    fn find_mmid_by_text(&self, text: &str) -> Result<Option<String>> {
        evaluate_script(
            self,
            include_str!("js/find_mmid_by_text.js"),
            json!({
                "text": text,
                "selector": TEXT_LOOKUP_SELECTOR,
                "mmid": MMID_ATTRIBUTE,
            }),
        )
    }

    fn element_facts(
        &self,
        mmid: u64,
        attributes: &[&str],
        with_inner_text: bool,
    ) -> Result<Option<ElementFacts>> {
        evaluate_script(
            self,
            include_str!("js/element_facts.js"),
            json!({
                "mmid": mmid,
                "mmid_attribute": MMID_ATTRIBUTE,
                "attributes": attributes,
                "with_inner_text": with_inner_text,
            }),
        )
    }

    fn element_attributes(&self, mmid: u64, attributes: &[&str]) -> Result<Option<ElementAttributes>> {
        evaluate_script(
            self,
            include_str!("js/element_attributes.js"),
            json!({
                "mmid": mmid,
                "mmid_attribute": MMID_ATTRIBUTE,
                "attributes": attributes,
            }),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_facts_from_script_json() {
        let json = r#"{
            "tag": "input",
            "element_id": "q",
            "input_type": "search",
            "attributes": {"name": "q", "mmid": "12", "placeholder": "Search"},
            "inner_text": null
        }"#;

        let facts: ElementFacts = serde_json::from_str(json).unwrap();
        assert_eq!(facts.tag, "input");
        assert_eq!(facts.element_id, "q");
        assert_eq!(facts.input_type.as_deref(), Some("search"));
        let keys: Vec<_> = facts.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "mmid", "placeholder"]);
        assert!(facts.inner_text.is_none());
    }

    #[test]
    fn test_element_attributes_from_script_json() {
        let json = r#"{
            "tag": "select",
            "attributes": {"name": "country", "disabled": null},
            "options": [
                {"mmid": "7", "value": "fr", "text": "France", "selected": true},
                {"mmid": null, "value": "de", "text": "Germany", "selected": false}
            ]
        }"#;

        let found: ElementAttributes = serde_json::from_str(json).unwrap();
        assert_eq!(found.attributes["name"].as_deref(), Some("country"));
        assert_eq!(found.attributes["disabled"], None);
        assert_eq!(found.options[0].mmid.as_deref(), Some("7"));
        assert!(found.options[1].mmid.is_none());

        let plain = ElementAttributes { tag: "a".to_string(), ..ElementAttributes::default() };
        assert!(serde_json::to_value(&plain).unwrap().get("options").is_none());
    }

    #[test]
    fn test_missing_element_is_null() {
        let facts: Option<ElementFacts> = serde_json::from_str("null").unwrap();
        assert!(facts.is_none());
    }
}
