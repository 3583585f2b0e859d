use std::collections::HashSet;

/// Set of keys already claimed during a run
///
/// Claiming is a single check-and-insert, so a key can only ever be claimed
/// once no matter how many pages discover it.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as visited; returns false if it already was
    pub fn claim(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string())
    }

    /// Number of keys claimed so far
    pub fn claimed(&self) -> usize {
        self.seen.len()
    }
}
