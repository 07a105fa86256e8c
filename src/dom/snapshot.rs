//! Accessibility snapshot built from `Accessibility.getFullAXTree`.
//!
//! Chrome returns the whole accessibility tree as a flat list of nodes. This
//! module re-links it, keeps only the "interesting" nodes (what a screen
//! reader would stop on), lifts interesting descendants of dropped nodes into
//! their nearest kept ancestor, and serializes each node into the compact
//! role/name/properties shape the rest of the engine works on.

use crate::dom::node::AccessibilityNode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};

/// One node as it comes over the wire
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAxNode {
    pub node_id: String,

    #[serde(default)]
    pub ignored: bool,

    #[serde(default)]
    pub role: Option<RawAxValue>,

    #[serde(default)]
    pub name: Option<RawAxValue>,

    #[serde(default)]
    pub description: Option<RawAxValue>,

    #[serde(default)]
    pub value: Option<RawAxValue>,

    #[serde(default)]
    pub properties: Option<Vec<RawAxProperty>>,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub child_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAxValue {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAxProperty {
    pub name: String,
    pub value: RawAxValue,
}

const CONTROL_ROLES: &[&str] = &[
    "button",
    "checkbox",
    "ColorWell",
    "combobox",
    "DisclosureTriangle",
    "listbox",
    "menu",
    "menubar",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "radio",
    "scrollbar",
    "searchbox",
    "slider",
    "spinbutton",
    "switch",
    "tab",
    "textbox",
    "tree",
    "treeitem",
];

const TEXT_ONLY_ROLES: &[&str] = &["LineBreak", "text", "InlineTextBox", "StaticText"];

const ATOMIC_ROLES: &[&str] = &[
    "doc-cover",
    "graphics-symbol",
    "img",
    "Meter",
    "scrollbar",
    "slider",
    "separator",
    "progressbar",
];

const STRING_PROPERTIES: &[&str] = &["keyshortcuts", "roledescription", "valuetext"];

const BOOLEAN_PROPERTIES: &[&str] = &[
    "disabled",
    "expanded",
    "focused",
    "modal",
    "multiline",
    "multiselectable",
    "readonly",
    "required",
    "selected",
];

const TRISTATE_PROPERTIES: &[&str] = &["checked", "pressed"];

const NUMERIC_PROPERTIES: &[&str] = &["level", "valuemax", "valuemin"];

/// (CDP name, snapshot name)
const TOKEN_PROPERTIES: &[(&str, &str)] = &[
    ("autocomplete", "autocomplete"),
    ("hasPopup", "haspopup"),
    ("invalid", "invalid"),
    ("orientation", "orientation"),
];

/// Flat CDP nodes re-linked into a tree, indexed by position
struct AxArena {
    nodes: Vec<RawAxNode>,
    children: Vec<Vec<usize>>,
    root: usize,
}

impl AxArena {
    fn new(nodes: Vec<RawAxNode>) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }

        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.node_id.as_str(), i))
            .collect();

        let root = nodes
            .iter()
            .position(|node| {
                node.parent_id
                    .as_deref()
                    .is_none_or(|parent| !index.contains_key(parent))
            })
            .unwrap_or(0);

        // Breadth-first from the root; a node is attached to the first parent
        // that claims it, which keeps the result a tree even on odd input
        let mut children = vec![Vec::new(); nodes.len()];
        let mut claimed = vec![false; nodes.len()];
        claimed[root] = true;
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for child_id in nodes[current].child_ids.iter().flatten() {
                if let Some(&child) = index.get(child_id.as_str()) {
                    if !claimed[child] {
                        claimed[child] = true;
                        children[current].push(child);
                        queue.push_back(child);
                    }
                }
            }
        }

        drop(index);
        Some(Self { nodes, children, root })
    }

    fn role(&self, i: usize) -> &str {
        value_str(&self.nodes[i].role).unwrap_or("")
    }

    fn name(&self, i: usize) -> &str {
        value_str(&self.nodes[i].name).unwrap_or("")
    }

    fn property(&self, i: usize, name: &str) -> Option<&Value> {
        self.nodes[i]
            .properties
            .iter()
            .flatten()
            .find(|p| p.name == name)
            .and_then(|p| p.value.value.as_ref())
    }

    fn property_is_true(&self, i: usize, name: &str) -> bool {
        matches!(self.property(i, name), Some(Value::Bool(true)))
            || matches!(self.property(i, name), Some(Value::String(s)) if s == "true")
    }

    fn focusable(&self, i: usize) -> bool {
        self.property_is_true(i, "focusable")
    }

    fn richly_editable(&self, i: usize) -> bool {
        matches!(self.property(i, "editable"), Some(Value::String(s)) if s == "richtext")
    }

    fn is_control(&self, i: usize) -> bool {
        CONTROL_ROLES.contains(&self.role(i))
    }

    fn is_plain_text_field(&self, i: usize) -> bool {
        !self.richly_editable(i) && matches!(self.role(i), "textbox" | "searchbox")
    }

    fn has_focusable_descendant(&self, i: usize) -> bool {
        self.children[i]
            .iter()
            .any(|&c| self.focusable(c) || self.has_focusable_descendant(c))
    }

    fn is_leaf(&self, i: usize) -> bool {
        let role = self.role(i);

        if self.children[i].is_empty()
            || self.is_plain_text_field(i)
            || TEXT_ONLY_ROLES.contains(&role)
            || ATOMIC_ROLES.contains(&role)
        {
            return true;
        }

        if self.has_focusable_descendant(i) {
            return false;
        }

        let named = !self.name(i).is_empty();
        (self.focusable(i) && named) || (role == "heading" && named)
    }

    fn is_interesting(&self, i: usize, inside_control: bool) -> bool {
        let node = &self.nodes[i];
        if node.ignored || self.role(i) == "Ignored" || self.property_is_true(i, "hidden") {
            return false;
        }

        if self.focusable(i) || self.richly_editable(i) || self.is_control(i) {
            return true;
        }

        if inside_control {
            return false;
        }

        self.is_leaf(i) && !self.name(i).is_empty()
    }

    fn collect_interesting(&self, i: usize, inside_control: bool, found: &mut HashSet<usize>) {
        if self.is_interesting(i, inside_control) {
            found.insert(i);
        }

        if self.is_leaf(i) {
            return;
        }

        let inside_control = inside_control || self.is_control(i);
        for &child in &self.children[i] {
            self.collect_interesting(child, inside_control, found);
        }
    }

    fn serialize(&self, i: usize, keep: &HashSet<usize>) -> Vec<AccessibilityNode> {
        let children: Vec<AccessibilityNode> = self.children[i]
            .iter()
            .flat_map(|&child| self.serialize(child, keep))
            .collect();

        if !keep.contains(&i) {
            return children;
        }

        let mut node = self.to_node(i);
        if !children.is_empty() {
            node.children = Some(children);
        }
        vec![node]
    }

    fn to_node(&self, i: usize) -> AccessibilityNode {
        let raw = &self.nodes[i];
        let cdp_role = self.role(i);
        let role = match cdp_role {
            "RootWebArea" => "WebArea",
            "StaticText" => "text",
            other => other,
        };

        let mut node = AccessibilityNode::new(role).with_name(self.name(i));

        match raw.value.as_ref().and_then(|v| v.value.as_ref()) {
            Some(Value::String(s)) if !s.is_empty() => node.set_attr("value", s.as_str()),
            Some(n @ Value::Number(_)) => node.set_attr("value", n.clone()),
            _ => {}
        }

        if let Some(description) = value_str(&raw.description).filter(|s| !s.is_empty()) {
            node.set_attr("description", description);
        }

        for &key in STRING_PROPERTIES {
            if let Some(Value::String(s)) = self.property(i, key) {
                if !s.is_empty() {
                    node.set_attr(key, s.as_str());
                }
            }
        }

        for &key in BOOLEAN_PROPERTIES {
            if key == "focused" && cdp_role == "RootWebArea" {
                continue;
            }
            if self.property_is_true(i, key) {
                node.set_attr(key, true);
            }
        }

        for &key in TRISTATE_PROPERTIES {
            match self.property(i, key) {
                Some(Value::String(s)) if s == "mixed" => node.set_attr(key, "mixed"),
                Some(Value::String(s)) => node.set_attr(key, s == "true"),
                Some(Value::Bool(b)) => node.set_attr(key, *b),
                _ => {}
            }
        }

        for &key in NUMERIC_PROPERTIES {
            if let Some(n @ Value::Number(_)) = self.property(i, key) {
                node.set_attr(key, n.clone());
            }
        }

        for &(cdp_key, key) in TOKEN_PROPERTIES {
            if let Some(Value::String(s)) = self.property(i, cdp_key) {
                if s != "false" {
                    node.set_attr(key, s.as_str());
                }
            }
        }

        node
    }
}

fn value_str(value: &Option<RawAxValue>) -> Option<&str> {
    value.as_ref()?.value.as_ref()?.as_str()
}

/// Reduce Chrome's full accessibility tree to its interesting nodes.
///
/// The root is always kept. Returns `None` only for an empty node list.
pub fn interesting_tree(nodes: Vec<RawAxNode>) -> Option<AccessibilityNode> {
    let arena = AxArena::new(nodes)?;

    let mut keep = HashSet::new();
    arena.collect_interesting(arena.root, false, &mut keep);
    keep.insert(arena.root);

    arena.serialize(arena.root, &keep).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(nodes: Value) -> Vec<RawAxNode> {
        serde_json::from_value(nodes).unwrap()
    }

    fn string(v: &str) -> Value {
        json!({"type": "computedString", "value": v})
    }

    fn role(v: &str) -> Value {
        json!({"type": "role", "value": v})
    }

    fn prop(name: &str, kind: &str, value: Value) -> Value {
        json!({"name": name, "value": {"type": kind, "value": value}})
    }

    fn page_fixture() -> Vec<RawAxNode> {
        parse(json!([
            {
                "nodeId": "1", "ignored": false, "role": role("RootWebArea"), "name": string("Login"),
                "properties": [prop("focusable", "booleanOrUndefined", json!(true)),
                               prop("focused", "booleanOrUndefined", json!(true))],
                "childIds": ["2"]
            },
            {
                "nodeId": "2", "parentId": "1", "ignored": false, "role": role("generic"), "name": string(""),
                "childIds": ["3", "5", "7", "8"]
            },
            {
                "nodeId": "3", "parentId": "2", "ignored": false, "role": role("button"), "name": string("Send"),
                "properties": [prop("focusable", "booleanOrUndefined", json!(true)),
                               prop("keyshortcuts", "string", json!("3"))],
                "childIds": ["4"]
            },
            {
                "nodeId": "4", "parentId": "3", "ignored": false, "role": role("StaticText"), "name": string("Send"),
                "childIds": []
            },
            {
                "nodeId": "5", "parentId": "2", "ignored": false, "role": role("paragraph"), "name": string(""),
                "childIds": ["6"]
            },
            {
                "nodeId": "6", "parentId": "5", "ignored": false, "role": role("StaticText"), "name": string("Welcome back"),
                "childIds": []
            },
            {
                "nodeId": "7", "parentId": "2", "ignored": true, "role": role("none"),
                "childIds": []
            },
            {
                "nodeId": "8", "parentId": "2", "ignored": false, "role": role("textbox"), "name": string("Email"),
                "value": {"type": "string", "value": ""},
                "properties": [prop("focusable", "booleanOrUndefined", json!(true)),
                               prop("required", "boolean", json!(true)),
                               prop("invalid", "token", json!("false")),
                               prop("hasPopup", "token", json!("menu"))],
                "childIds": []
            }
        ]))
    }

    #[test]
    fn test_root_renamed_and_kept() {
        let tree = interesting_tree(page_fixture()).unwrap();
        assert!(tree.role_is("WebArea"));
        assert_eq!(tree.name.as_deref(), Some("Login"));
        // focused is not reported on the document root
        assert!(!tree.has_attr("focused"));
    }

    #[test]
    fn test_uninteresting_wrappers_lift_children() {
        let tree = interesting_tree(page_fixture()).unwrap();
        let roles: Vec<_> = tree
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.role.clone().unwrap())
            .collect();

        // generic, paragraph and the ignored node are gone; their interesting
        // descendants hang off the root directly
        assert_eq!(roles, vec!["button", "text", "textbox"]);
    }

    #[test]
    fn test_control_is_leaf() {
        let tree = interesting_tree(page_fixture()).unwrap();
        let button = &tree.children.as_ref().unwrap()[0];
        assert!(button.children.is_none());
        assert_eq!(button.attr_str("keyshortcuts"), Some("3"));
    }

    #[test]
    fn test_property_serialization() {
        let tree = interesting_tree(page_fixture()).unwrap();
        let textbox = &tree.children.as_ref().unwrap()[2];

        assert_eq!(textbox.attributes.get("required"), Some(&json!(true)));
        assert_eq!(textbox.attr_str("haspopup"), Some("menu"));
        assert!(!textbox.has_attr("invalid"));
        assert!(!textbox.has_attr("value"));
    }

    #[test]
    fn test_static_text_renamed() {
        let tree = interesting_tree(page_fixture()).unwrap();
        let text = &tree.children.as_ref().unwrap()[1];
        assert!(text.role_is("text"));
        assert_eq!(text.name.as_deref(), Some("Welcome back"));
        assert_eq!(text.field_count(), 2);
    }

    #[test]
    fn test_tristate_and_numeric() {
        let nodes = parse(json!([
            {
                "nodeId": "1", "role": role("RootWebArea"), "name": string(""), "childIds": ["2", "3"]
            },
            {
                "nodeId": "2", "parentId": "1", "role": role("checkbox"), "name": string("Agree"),
                "properties": [prop("checked", "tristate", json!("mixed"))]
            },
            {
                "nodeId": "3", "parentId": "1", "role": role("heading"), "name": string("Terms"),
                "properties": [prop("level", "integer", json!(2))],
                "childIds": ["4"]
            },
            {
                "nodeId": "4", "parentId": "3", "role": role("StaticText"), "name": string("Terms")
            }
        ]));

        let tree = interesting_tree(nodes).unwrap();
        let children = tree.children.unwrap();
        assert_eq!(children[0].attr_str("checked"), Some("mixed"));
        assert_eq!(children[1].attributes.get("level"), Some(&json!(2)));
        // a named heading is a leaf, its text child is not repeated
        assert!(children[1].children.is_none());
    }

    #[test]
    fn test_hidden_nodes_dropped() {
        let nodes = parse(json!([
            {"nodeId": "1", "role": role("RootWebArea"), "name": string(""), "childIds": ["2"]},
            {
                "nodeId": "2", "parentId": "1", "role": role("link"), "name": string("Skip"),
                "properties": [prop("focusable", "booleanOrUndefined", json!(true)),
                               prop("hidden", "boolean", json!(true))]
            }
        ]));

        let tree = interesting_tree(nodes).unwrap();
        assert!(tree.children.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(interesting_tree(Vec::new()).is_none());
    }

    #[test]
    fn test_cyclic_child_ids_terminate() {
        let nodes = parse(json!([
            {"nodeId": "1", "role": role("RootWebArea"), "name": string(""), "childIds": ["2"]},
            {"nodeId": "2", "parentId": "1", "role": role("button"), "name": string("Go"), "childIds": ["1"]}
        ]));

        let tree = interesting_tree(nodes).unwrap();
        assert_eq!(tree.count_nodes(), 2);
    }
}
