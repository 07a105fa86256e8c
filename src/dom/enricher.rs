//! Merge live DOM facts into accessibility nodes.
//!
//! Walks the snapshot bottom-up: children are enriched and settled before
//! their parent, so a parent sees the final shape of its child list. Each
//! resolved node gets one element query; the fetched attributes are merged
//! in and a fixed series of redundancy rules trims whatever the model would
//! read twice.

use crate::dom::node::AccessibilityNode;
use crate::dom::page::{ElementFacts, PageBridge};
use crate::dom::pruner::{self, Disposition};
use crate::dom::resolver;
use crate::error::Result;
use indexmap::IndexMap;
use serde_json::Value;

/// Attributes read from every resolved element
pub const FETCHED_ATTRIBUTES: &[&str] = &["name", "aria-label", "placeholder", "mmid", "id", "for", "data-testid"];

/// Elements that never show up in the enriched tree
pub const TAGS_TO_IGNORE: &[&str] = &[
    "head", "style", "script", "link", "meta", "noscript", "template", "iframe", "g", "main", "c-wiz", "svg", "path",
];

/// Overlays injected by browser extensions and the like
pub const IDS_TO_IGNORE: &[&str] = &["agentDriveAutoOverlay"];

/// Fields that only matter to assistive tech
pub const ATTRIBUTES_TO_STRIP: &[&str] = &["level", "multiline", "haspopup", "id", "for"];

pub const MODAL_HINT_KEY: &str = "important information";

pub const MODAL_HINT: &str = "This is a modal dialog. Please interact with this dialog and close it to be able to \
                              interact with the full page (e.g., by pressing the close button or selecting an option).";

/// Enrich `node` and its subtree against the live page
pub fn enrich_tree<P: PageBridge + ?Sized>(page: &P, mut node: AccessibilityNode) -> Result<Disposition> {
    // Decided on the snapshot's shape, not on what survives below
    let is_leaf = node.children.is_none();

    if let Some(children) = node.children.take() {
        let mut dispositions = Vec::with_capacity(children.len());
        for child in children {
            dispositions.push(enrich_tree(page, child)?);
        }
        node.children = Some(pruner::settle(dispositions));
    }

    if node.role_is("dialog") && node.attributes.get("modal") == Some(&Value::Bool(true)) {
        node.set_attr(MODAL_HINT_KEY, MODAL_HINT);
    }

    let Some(mmid) = resolver::resolve_mmid(page, &node)? else {
        return Ok(Disposition::Keep(node));
    };

    node.remove_attr("keyshortcuts");
    node.set_attr("mmid", mmid.to_string());

    let fetched = page
        .element_facts(mmid, FETCHED_ATTRIBUTES, is_leaf)?
        .and_then(|facts| fetched_attributes(facts, mmid));

    let Some(fetched) = fetched else {
        log::debug!("No usable element behind mmid {}, dropping node", mmid);
        return Ok(Disposition::Delete);
    };

    let structural_only = fetched.keys().all(|key| key == "tag" || key == "mmid");
    merge(&mut node, fetched);
    remove_redundancies(&mut node);

    if structural_only && is_wrapper(&node) {
        return Ok(Disposition::Unravel(node.children.take().unwrap_or_default()));
    }

    Ok(Disposition::Keep(node))
}

/// Apply the ignore lists and shape the facts into node attributes.
///
/// Returns `None` for elements the tree should not show.
pub fn fetched_attributes(facts: ElementFacts, mmid: u64) -> Option<IndexMap<String, Value>> {
    if IDS_TO_IGNORE.contains(&facts.element_id.as_str()) {
        log::debug!("Ignoring element with id {}", facts.element_id);
        return None;
    }

    // options are reachable through their select, not as nodes
    if TAGS_TO_IGNORE.contains(&facts.tag.as_str()) || facts.tag == "option" {
        return None;
    }

    let mut attributes = IndexMap::new();
    attributes.insert("tag".to_string(), Value::from(facts.tag.as_str()));
    attributes.insert("mmid".to_string(), Value::from(mmid.to_string()));

    if facts.tag == "input" {
        if let Some(input_type) = facts.input_type {
            attributes.insert("tag_type".to_string(), Value::from(input_type));
        }
    }

    for (key, value) in facts.attributes {
        if !value.is_empty() {
            attributes.insert(key, Value::from(value));
        }
    }

    if let Some(text) = facts.inner_text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        attributes.insert("description".to_string(), Value::from(text));
    }

    Some(attributes)
}

/// Fold fetched attributes into the node. A DOM `name` attribute replaces
/// the accessible name.
fn merge(node: &mut AccessibilityNode, fetched: IndexMap<String, Value>) {
    for (key, value) in fetched {
        if key == "name" {
            if let Value::String(name) = value {
                node.name = Some(name);
            }
        } else {
            node.attributes.insert(key, value);
        }
    }
}

/// The redundancy rules, in order. Each one is idempotent.
pub fn remove_redundancies(node: &mut AccessibilityNode) {
    if node.name.is_some() && node.name.as_deref() == node.mmid() && !node.role_is("textbox") {
        node.name = None;
    }

    if let (Some(name), Some(description)) = (node.name.as_deref(), node.attr_str("description")) {
        if description_repeats_name(name, description) {
            node.remove_attr("description");
        }
    }

    if let (Some(name), Some(label)) = (node.name.as_deref(), node.attr_str("aria-label")) {
        if name.contains(label) {
            node.remove_attr("aria-label");
        }
    }

    if node.name.is_some() && node.name.as_deref() == node.attr_str("text") {
        node.remove_attr("text");
    }

    if node.tag() == Some("select") {
        node.children = None;
        node.role = None;
        node.remove_attr("description");
    }

    if node.role.is_some() && node.role.as_deref() == node.tag() {
        node.role = None;
    }

    if let (Some(label), Some(placeholder)) = (node.attr_str("aria-label"), node.attr_str("placeholder")) {
        if !label.is_empty() && label == placeholder {
            node.remove_attr("aria-label");
        }
    }

    if node.role_is("link") {
        node.role = None;
        if let Some(description) = node.remove_attr("description") {
            if description.as_str().is_some_and(|d| !d.is_empty()) {
                node.set_attr("text", description);
            }
        }
    }

    for key in ATTRIBUTES_TO_STRIP {
        node.remove_attr(key);
    }
}

fn description_repeats_name(name: &str, description: &str) -> bool {
    name == description || name == description.replace('\n', " ") || name.contains(&description.replace('\n', ""))
}

/// A nameless generic container that adds nothing but nesting
fn is_wrapper(node: &AccessibilityNode) -> bool {
    (node.role_is("generic") || node.role_is("none"))
        && node.name.as_deref().is_none_or(str::is_empty)
        && node.children.is_some()
}
