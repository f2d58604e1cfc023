//! In-memory adapter variant

use super::{OpenStatus, OxStore, StoreHandle};
use crate::error::StoreResult;
use crate::storage::{MemoryQuadStore, QuadBackend};
use tracing::debug;

/// Adapter over a [`MemoryQuadStore`] created at construction
#[derive(Debug)]
pub struct MemoryOxStore {
    handle: StoreHandle<MemoryQuadStore>,
}

impl MemoryOxStore {
    pub fn new() -> Self {
        Self {
            handle: StoreHandle::Open(MemoryQuadStore::new()),
        }
    }
}

impl Default for MemoryOxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OxStore for MemoryOxStore {
    fn backend(&mut self) -> StoreResult<&mut dyn QuadBackend> {
        Ok(self.handle.get_mut()?)
    }

    /// Always valid. A closed store is reopened empty; an open one is kept.
    fn open(&mut self, _configuration: &str, _create: bool) -> StoreResult<OpenStatus> {
        if !self.handle.is_open() {
            debug!("Reopening in-memory store");
            self.handle.replace(MemoryQuadStore::new());
        }
        Ok(OpenStatus::Valid)
    }

    fn close(&mut self) -> StoreResult<()> {
        if self.handle.close().is_some() {
            debug!("Closed in-memory store");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::rdf::{Term, Triple, TriplePattern, DEFAULT_GRAPH};

    fn create_test_triple() -> Triple {
        Triple::new(
            Term::named_node("http://example.com/foo"),
            Term::named_node("http://example.com/p"),
            Term::literal("o"),
        )
    }

    #[test]
    fn test_usable_without_open() {
        let mut store = MemoryOxStore::new();
        store.add(&create_test_triple(), &DEFAULT_GRAPH, false).unwrap();
        assert_eq!(store.len(None).unwrap(), 1);
        assert_eq!(store.open("ignored", false).unwrap(), OpenStatus::Valid);
        assert_eq!(store.len(None).unwrap(), 1);
    }

    #[test]
    fn test_close() {
        let mut store = MemoryOxStore::new();
        store.add(&create_test_triple(), &DEFAULT_GRAPH, false).unwrap();
        store.close().unwrap();

        assert!(matches!(store.len(None), Err(StoreError::Closed)));
        assert!(matches!(
            store.triples(&TriplePattern::any(), None).err(),
            Some(StoreError::Closed)
        ));

        store.open("", true).unwrap();
        assert_eq!(store.len(None).unwrap(), 0);
    }

    #[test]
    fn test_destroy_is_not_implemented() {
        let mut store = MemoryOxStore::new();
        assert!(matches!(store.destroy(""), Err(StoreError::NotImplemented("destroy"))));
    }
}
