use std::collections::HashSet;

/// Identities already admitted to the clean sink during the current run.
///
/// Owned by a single processor and dropped with it; nothing persists across
/// runs. Growth is unbounded, which is fine for a bounded single-pass run —
/// continuous ingestion would need a windowed or external store instead.
#[derive(Debug, Default)]
pub struct IdempotencyTracker {
    seen: HashSet<String>,
}

impl IdempotencyTracker {
    pub fn new() -> IdempotencyTracker {
        IdempotencyTracker::default()
    }

    pub fn seen(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    pub fn record(&mut self, identity: String) {
        self.seen.insert(identity);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
