//! Recover the injected element id behind an accessibility node.
//!
//! The id normally rides along in the node's `keyshortcuts` field (or, on
//! some pages, `description`). When it doesn't, the node's name is matched
//! against the trimmed text of `li`/`span`/`div` containers. That fallback
//! takes the first match in document order, so two containers with the same
//! text resolve to the first one; there is no tie-break.

use crate::dom::node::AccessibilityNode;
use crate::dom::page::PageBridge;
use crate::error::Result;

/// `true` for strings made only of digits and spaces, e.g. `"42"` or `"7 42"`
pub fn is_space_delimited_mmid(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == ' ')
}

/// Last space-separated token of an id-looking string
fn last_token(s: &str) -> Option<&str> {
    if is_space_delimited_mmid(s) {
        s.split(' ').next_back()
    } else {
        None
    }
}

/// Resolve the id for `node`, or `None` when it has no derivable id.
///
/// Only page errors are returned as `Err`; "no id" is an ordinary outcome.
pub fn resolve_mmid<P: PageBridge + ?Sized>(page: &P, node: &AccessibilityNode) -> Result<Option<u64>> {
    let shortcut = node
        .attr_str("keyshortcuts")
        .filter(|s| !s.is_empty())
        .or_else(|| node.attr_str("description"));

    let mut candidate = shortcut.and_then(last_token).map(str::to_owned);

    if candidate.as_deref().is_none_or(str::is_empty) {
        if let Some(name) = node.name.as_deref().filter(|n| !n.is_empty()) {
            candidate = page.find_mmid_by_text(name)?.map(|found| match last_token(&found) {
                Some(token) => token.to_owned(),
                None => found,
            });
        }
    }

    Ok(candidate
        .and_then(|c| c.trim().parse::<u64>().ok())
        .filter(|&mmid| mmid > 0))
}
