//! Structural rewriting of the enriched tree.
//!
//! Enrichment decides each node's [`Disposition`]; [`settle`] turns a list of
//! dispositions back into plain children (dropping deleted nodes, splicing
//! unraveled ones), and [`prune_tree`] then applies the content rules
//! bottom-up.

use crate::dom::node::AccessibilityNode;

/// What enrichment decided for one node
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Keep(AccessibilityNode),
    /// Element vanished or is filtered out
    Delete,
    /// Wrapper without meaning of its own; replaced by these children
    Unravel(Vec<AccessibilityNode>),
}

/// Flatten child dispositions into the parent's child list, in order
pub fn settle(children: Vec<Disposition>) -> Vec<AccessibilityNode> {
    children
        .into_iter()
        .flat_map(|disposition| match disposition {
            Disposition::Keep(node) => vec![node],
            Disposition::Delete => Vec::new(),
            Disposition::Unravel(grandchildren) => grandchildren,
        })
        .collect()
}

/// Roles that only ever draw lines or breaks
const NOISE_ROLES: &[&str] = &["separator", "LineBreak"];

/// Tags kept when only input fields are wanted
const INPUT_TAGS: &[&str] = &["input", "button", "textarea"];

/// Prune `node` and its subtree. `None` means the node itself goes.
pub fn prune_tree(mut node: AccessibilityNode, only_input_fields: bool) -> Option<AccessibilityNode> {
    if let Some(children) = node.children.take() {
        let kept: Vec<AccessibilityNode> = children
            .into_iter()
            .filter_map(|child| prune_tree(child, only_input_fields))
            .collect();

        if !kept.is_empty() {
            node.children = Some(kept);
        }
    }

    if should_prune_node(&node, only_input_fields) {
        None
    } else {
        Some(node)
    }
}

/// Content rules, checked after the node's children were pruned
pub fn should_prune_node(node: &AccessibilityNode, only_input_fields: bool) -> bool {
    if only_input_fields && !node.role_is("WebArea") {
        let is_input = node.tag().is_some_and(|tag| INPUT_TAGS.contains(&tag)) || node.role_is("button");
        if !is_input {
            return true;
        }
    }

    if node.role_is("generic") && node.children.is_none() && node.name.as_deref().is_none_or(str::is_empty) {
        return true;
    }

    if node.role.as_deref().is_some_and(|role| NOISE_ROLES.contains(&role)) {
        return true;
    }

    // A bare role + name pair carries nothing to act on, except real text
    if node.field_count() == 2 && node.role.is_some() {
        if let Some(name) = node.name.as_deref() {
            let meaningful_text = node.role_is("text") && stripped_len(name) >= 3;
            return !meaningful_text;
        }
    }

    false
}

/// Length of `name` without commas, colons, newlines and outer whitespace
fn stripped_len(name: &str) -> usize {
    name.replace([',', ':', '\n'], "").trim().chars().count()
}
