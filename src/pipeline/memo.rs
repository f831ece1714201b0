//! Memo of error texts already delivered during a failure streak.

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct ErrorMemo {
    seen: HashSet<String>,
}

impl ErrorMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    /// Remember a delivered text. Returns `false` if it was already known.
    pub fn record(&mut self, text: impl Into<String>) -> bool {
        self.seen.insert(text.into())
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
