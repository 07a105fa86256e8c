use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node of the accessibility tree handed to the agent.
///
/// `role`, `name` and `children` are typed; everything else (snapshot
/// properties such as `keyshortcuts` or `modal`, and the DOM facts merged in
/// during enrichment such as `tag`, `mmid`, `placeholder`) lives in the open
/// `attributes` bag, which serializes flat next to the typed fields.
///
/// `children: None` and `children: Some(vec![])` are different states while
/// the tree is being enriched; the pruner collapses the latter into the former.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccessibilityNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AccessibilityNode>>,
}

impl AccessibilityNode {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Self::default()
        }
    }

    /// Builder method: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method: set one attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<AccessibilityNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn role_is(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }

    /// Attribute value if it is a JSON string
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the rest
    pub fn remove_attr(&mut self, key: &str) -> Option<Value> {
        self.attributes.shift_remove(key)
    }

    /// The `tag` fetched from the DOM, if this node was enriched
    pub fn tag(&self) -> Option<&str> {
        self.attr_str("tag")
    }

    /// The injected element id, if this node was enriched
    pub fn mmid(&self) -> Option<&str> {
        self.attr_str("mmid")
    }

    /// Number of fields this node would serialize
    pub fn field_count(&self) -> usize {
        usize::from(self.role.is_some())
            + usize::from(self.name.is_some())
            + usize::from(self.children.is_some())
            + self.attributes.len()
    }

    /// Count this node and all of its descendants
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(AccessibilityNode::count_nodes)
            .sum::<usize>()
    }

    /// Depth-first search by injected id
    pub fn find_by_mmid(&self, mmid: &str) -> Option<&AccessibilityNode> {
        if self.mmid() == Some(mmid) {
            return Some(self);
        }

        self.children
            .iter()
            .flatten()
            .find_map(|child| child.find_by_mmid(mmid))
    }

    /// Pretty JSON, the shape written to the artifact files and sent to the model
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attributes_serialize_flat() {
        let node = AccessibilityNode::new("button")
            .with_name("Send")
            .with_attribute("tag", "button")
            .with_attribute("mmid", "3");

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({"role": "button", "name": "Send", "tag": "button", "mmid": "3"})
        );
    }

    #[test]
    fn test_deserialize_snapshot_shape() {
        let raw = json!({
            "role": "WebArea",
            "name": "Page",
            "focused": true,
            "children": [{"role": "heading", "name": "Title", "level": 1}]
        });

        let node: AccessibilityNode = serde_json::from_value(raw).unwrap();
        assert!(node.role_is("WebArea"));
        assert_eq!(node.attributes.get("focused"), Some(&json!(true)));

        let children = node.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].attributes.get("level"), Some(&json!(1)));
        assert!(children[0].children.is_none());
    }

    #[test]
    fn test_empty_children_survive_round_trip() {
        let node = AccessibilityNode::new("list").with_children(vec![]);
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"children\":[]"));
    }

    #[test]
    fn test_field_count() {
        let text = AccessibilityNode::new("text").with_name("ok");
        assert_eq!(text.field_count(), 2);

        let text = text.with_attribute("mmid", "4");
        assert_eq!(text.field_count(), 3);
    }

    #[test]
    fn test_count_and_find() {
        let tree = AccessibilityNode::new("WebArea").with_children(vec![
            AccessibilityNode::new("button").with_attribute("mmid", "2"),
            AccessibilityNode::new("list").with_children(vec![
                AccessibilityNode::new("listitem").with_attribute("mmid", "7"),
            ]),
        ]);

        assert_eq!(tree.count_nodes(), 4);
        assert!(tree.find_by_mmid("7").unwrap().role_is("listitem"));
        assert!(tree.find_by_mmid("99").is_none());
    }

    #[test]
    fn test_remove_attr_keeps_order() {
        let mut node = AccessibilityNode::new("textbox")
            .with_attribute("tag", "input")
            .with_attribute("id", "q")
            .with_attribute("mmid", "5");

        node.remove_attr("id");
        let keys: Vec<_> = node.attributes.keys().cloned().collect();
        assert_eq!(keys, vec!["tag", "mmid"]);
    }
}
