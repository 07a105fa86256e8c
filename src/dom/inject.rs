//! Tagging elements with ids before a snapshot, and undoing the shortcut
//! side effect afterwards.

use crate::dom::page::PageBridge;
use crate::error::{BrowserError, Result};

/// Last id handed out during one extraction cycle.
///
/// Owned by the caller and threaded through [`inject_attributes`]; a fresh
/// counter per cycle means ids start at 1 for every page state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MmidCounter {
    last: u64,
}

impl MmidCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last id assigned, 0 before any injection
    pub fn last(&self) -> u64 {
        self.last
    }

    fn advance_to(&mut self, last: u64) {
        self.last = last;
    }
}

/// Tag every element currently in the DOM, continuing from `counter`.
///
/// Returns how many elements were tagged.
pub fn inject_attributes<P: PageBridge + ?Sized>(page: &P, counter: &mut MmidCounter) -> Result<usize> {
    let start = counter.last();
    let last = page.inject_mmids(start)?;

    if last < start {
        return Err(BrowserError::EvaluationFailed(format!(
            "id injection went backwards: started after {}, ended at {}",
            start, last
        )));
    }

    counter.advance_to(last);
    let tagged = (last - start) as usize;
    log::debug!("Added mmid into {} elements", tagged);
    Ok(tagged)
}

/// Restore the shortcut attributes the injection overwrote
pub fn cleanup_dom<P: PageBridge + ?Sized>(page: &P) -> Result<()> {
    log::debug!("Cleaning up the DOM's previous injections");
    page.restore_keyshortcuts()?;
    log::debug!("DOM cleanup complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::page::testing::{MockPage, facts};

    #[test]
    fn test_counter_threads_through_injections() {
        let page = MockPage::default()
            .with_element(1, facts("html"))
            .with_element(2, facts("body"))
            .with_element(3, facts("button"));

        let mut counter = MmidCounter::new();
        assert_eq!(counter.last(), 0);

        assert_eq!(inject_attributes(&page, &mut counter).unwrap(), 3);
        assert_eq!(counter.last(), 3);

        // a second injection with the same counter continues, it doesn't reuse
        assert_eq!(inject_attributes(&page, &mut counter).unwrap(), 3);
        assert_eq!(counter.last(), 6);
    }

    #[test]
    fn test_fresh_counter_starts_over() {
        let page = MockPage::default().with_element(1, facts("html"));

        let mut first = MmidCounter::new();
        inject_attributes(&page, &mut first).unwrap();

        let mut second = MmidCounter::new();
        inject_attributes(&page, &mut second).unwrap();

        assert_eq!(first, second);
    }
}
