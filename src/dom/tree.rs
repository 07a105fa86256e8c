//! One end-to-end extraction cycle: inject ids, snapshot, clean up, enrich,
//! prune. Both the raw snapshot and the final tree are dumped to the log
//! directory for inspection.

use crate::browser::config::ExtractionOptions;
use crate::dom::enricher;
use crate::dom::inject::{MmidCounter, cleanup_dom, inject_attributes};
use crate::dom::node::AccessibilityNode;
use crate::dom::page::PageBridge;
use crate::dom::pruner::{self, Disposition};
use crate::error::{BrowserError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw snapshot, as the browser reported it
pub const RAW_ARTIFACT: &str = "json_accessibility_dom.json";

/// Tree after enrichment and pruning
pub const ENRICHED_ARTIFACT: &str = "json_accessibility_dom_enriched.json";

/// Build the agent's view of `page`.
///
/// Returns `Ok(None)` when the page has no snapshot or when enrichment
/// fails; the failure is logged. Injection and snapshot errors are returned,
/// after the shortcut attributes have been restored. Failing to write the
/// enriched artifact only logs a warning.
pub fn extract_accessibility_tree<P: PageBridge + ?Sized>(
    page: &P,
    options: &ExtractionOptions,
) -> Result<Option<AccessibilityNode>> {
    let mut counter = MmidCounter::new();
    if let Err(e) = inject_attributes(page, &mut counter) {
        // The script may have tagged part of the page before the round trip failed
        if let Err(cleanup) = cleanup_dom(page) {
            log::warn!("DOM cleanup after failed injection also failed: {}", cleanup);
        }
        return Err(e);
    }

    // The shortcut attributes must be restored whatever the snapshot did
    let snapshot = page.accessibility_snapshot();
    let cleanup = cleanup_dom(page);
    let snapshot = snapshot?;
    cleanup?;

    let Some(raw) = snapshot else {
        log::warn!("Page produced no accessibility snapshot");
        return Ok(None);
    };

    if let Some(dir) = options.log_dir.as_deref() {
        write_artifact(dir, RAW_ARTIFACT, &raw)?;
    }

    let enriched = match enrich_and_prune(page, raw, options.only_input_fields) {
        Ok(tree) => tree,
        Err(e) => {
            log::error!("Error while fetching DOM info: {:?}", e);
            return Ok(None);
        }
    };

    if let (Some(dir), Some(tree)) = (options.log_dir.as_deref(), enriched.as_ref()) {
        if let Err(e) = write_artifact(dir, ENRICHED_ARTIFACT, tree) {
            log::warn!("{}", e);
        }
    }

    Ok(enriched)
}

fn enrich_and_prune<P: PageBridge + ?Sized>(
    page: &P,
    raw: AccessibilityNode,
    only_input_fields: bool,
) -> Result<Option<AccessibilityNode>> {
    let before = raw.count_nodes();

    let root = match enricher::enrich_tree(page, raw)? {
        Disposition::Keep(root) => root,
        // The root itself can't be spliced anywhere
        Disposition::Delete => return Ok(None),
        Disposition::Unravel(children) => AccessibilityNode::default().with_children(children),
    };

    let pruned = pruner::prune_tree(root, only_input_fields);

    log::debug!(
        "Accessibility tree reduced from {} to {} nodes",
        before,
        pruned.as_ref().map_or(0, AccessibilityNode::count_nodes)
    );

    Ok(pruned)
}

/// Write `node` as pretty JSON to `dir/file_name`, creating `dir` if needed
pub fn write_artifact(dir: &Path, file_name: &str, node: &AccessibilityNode) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let io_error = |source: std::io::Error| BrowserError::ArtifactWrite {
        path: path.display().to_string(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_error)?;
    fs::write(&path, node.to_json()?).map_err(io_error)?;

    log::debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::page::testing::{MockPage, facts};

    fn button_page() -> MockPage {
        let mut button = facts("button");
        button.attributes.insert("mmid".to_string(), "2".to_string());
        button.inner_text = Some("Send".to_string());

        MockPage {
            snapshot: Some(AccessibilityNode::new("WebArea").with_name("Mail").with_children(vec![
                AccessibilityNode::new("button")
                    .with_name("Send")
                    .with_attribute("keyshortcuts", "2"),
            ])),
            ..MockPage::default()
        }
        .with_element(2, button)
    }

    #[test]
    fn test_cycle_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExtractionOptions::new().log_dir(dir.path());

        let tree = extract_accessibility_tree(&button_page(), &options).unwrap().unwrap();
        assert!(tree.find_by_mmid("2").is_some());

        let raw: AccessibilityNode =
            serde_json::from_str(&fs::read_to_string(dir.path().join(RAW_ARTIFACT)).unwrap()).unwrap();
        assert_eq!(raw.children.unwrap()[0].attr_str("keyshortcuts"), Some("2"));

        let enriched: AccessibilityNode =
            serde_json::from_str(&fs::read_to_string(dir.path().join(ENRICHED_ARTIFACT)).unwrap()).unwrap();
        assert_eq!(enriched, tree);
    }

    #[test]
    fn test_artifacts_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExtractionOptions::new().log_dir(dir.path()).without_artifacts();

        extract_accessibility_tree(&button_page(), &options).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_enrichment_failure_is_none() {
        let page = MockPage {
            fail_queries: true,
            ..button_page()
        };
        let options = ExtractionOptions::new().without_artifacts();

        assert!(extract_accessibility_tree(&page, &options).unwrap().is_none());
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let page = MockPage::default();
        let options = ExtractionOptions::new().without_artifacts();
        assert!(extract_accessibility_tree(&page, &options).unwrap().is_none());
    }

    #[test]
    fn test_enriched_artifact_failure_keeps_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(ENRICHED_ARTIFACT)).unwrap();
        let options = ExtractionOptions::new().log_dir(dir.path());

        let tree = extract_accessibility_tree(&button_page(), &options).unwrap();
        assert!(tree.unwrap().find_by_mmid("2").is_some());
        assert!(dir.path().join(RAW_ARTIFACT).is_file());
    }

    #[test]
    fn test_write_artifact_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("1");

        let path = write_artifact(&nested, RAW_ARTIFACT, &AccessibilityNode::new("WebArea")).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("\"role\": \"WebArea\""));
    }
}
