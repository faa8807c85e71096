// ID Provider Port (for deterministic testing)
//
// Every invocation gets an id for log correlation; tests swap in the
// sequential provider to get predictable ids.

use std::sync::atomic::{AtomicU64, Ordering};

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique invocation ID
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Sequential provider (tests): ids come out as inv-1, inv-2, ...
#[derive(Default)]
pub struct SequentialIdProvider(AtomicU64);

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> String {
        format!("inv-{}", self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let provider = SequentialIdProvider::new();
        assert_eq!(provider.generate_id(), "inv-1");
        assert_eq!(provider.generate_id(), "inv-2");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let provider = UuidProvider;
        assert_ne!(provider.generate_id(), provider.generate_id());
    }
}
