//! Accessibility-tree extraction
//!
//! This module turns a live page into the compact tree an agent reads. It
//! includes:
//! - AccessibilityNode: one node of the tree, typed role/name plus an open attribute bag
//! - PageBridge: every browser round trip the engine makes
//! - snapshot: reduction of the CDP accessibility tree to interesting nodes
//! - inject / resolver / enricher / pruner: the stages of one extraction cycle
//! - tree: the cycle itself and its debug artifacts

pub mod enricher;
pub mod inject;
pub mod node;
pub mod page;
pub mod pruner;
pub mod resolver;
pub mod snapshot;
pub mod tree;

pub use inject::{MmidCounter, cleanup_dom, inject_attributes};
pub use node::AccessibilityNode;
pub use page::{ElementAttributes, ElementFacts, PageBridge, SelectOption};
pub use pruner::Disposition;
pub use tree::{ENRICHED_ARTIFACT, RAW_ARTIFACT, extract_accessibility_tree};
