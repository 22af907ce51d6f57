//! Research value objects and structured-response parsing

pub mod parsing;

use serde::{Deserialize, Serialize};

/// One ranked result from a web search pass.
///
/// `href` is the deduplication key within a single search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub href: String,
    pub body: String,
}

/// Recursion-width and recursion-depth controls for the research engine.
///
/// Both shrink on recursion (breadth halves, depth decrements), which
/// guarantees termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchBounds {
    pub breadth: usize,
    pub depth: usize,
}

impl ResearchBounds {
    pub fn new(breadth: usize, depth: usize) -> Self {
        Self { breadth, depth }
    }

    /// Bounds for the next recursion level.
    pub fn narrowed(&self) -> Self {
        Self {
            breadth: self.breadth / 2,
            depth: self.depth.saturating_sub(1),
        }
    }
}

/// Append `items` to `acc`, skipping entries already present.
///
/// Set semantics with stable first-seen ordering, used for learnings and
/// visited URLs across the whole research recursion tree.
pub fn push_unique(acc: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !acc.contains(&item) {
            acc.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_shrink_to_zero() {
        let mut bounds = ResearchBounds::new(4, 3);
        let mut levels = 0;
        while bounds.depth > 0 && bounds.breadth > 0 {
            bounds = bounds.narrowed();
            levels += 1;
            assert!(levels < 10, "bounds must shrink");
        }
        assert_eq!(bounds.depth, 0);
    }

    #[test]
    fn test_push_unique_preserves_order() {
        let mut acc = vec!["a".to_string()];
        push_unique(
            &mut acc,
            ["b".to_string(), "a".to_string(), "c".to_string(), "b".to_string()],
        );
        assert_eq!(acc, vec!["a", "b", "c"]);
    }
}
