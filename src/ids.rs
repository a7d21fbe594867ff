//! Identifier generation for exported documents.

use uuid::Uuid;

/// Source of identifiers for exported documents.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random lowercase hyphenated v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic UUID-shaped identifiers: `00000000-0000-4000-8000-000000000001`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("00000000-0000-4000-8000-{:012x}", self.next)
    }
}
