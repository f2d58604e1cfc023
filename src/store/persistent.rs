//! Persistent adapter variant

use super::{OpenStatus, OxStore, StoreHandle};
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::storage::{MemoryQuadStore, QuadBackend, RocksQuadStore};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Adapter over a [`RocksQuadStore`] opened from a configuration string
///
/// The configuration string is either the database directory or a YAML file
/// holding a [`StoreConfig`].
///
/// Using the adapter before [`open`](OxStore::open) does not fail: the first
/// access materializes a transient in-memory store, which later `open` calls
/// replace. After [`close`](OxStore::close) every access fails with
/// [`StoreError::Closed`](crate::StoreError::Closed) until the next `open`.
pub struct PersistentOxStore {
    handle: StoreHandle<Box<dyn QuadBackend>>,
    path: Option<PathBuf>,
}

impl PersistentOxStore {
    pub fn new() -> Self {
        Self {
            handle: StoreHandle::Unopened,
            path: None,
        }
    }

    /// Directory of the open RocksDB store, if any
    pub fn path(&self) -> Option<&Path> {
        match self.handle {
            StoreHandle::Open(_) => self.path.as_deref(),
            _ => None,
        }
    }

    /// Whether a store is open, including a transient fallback
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}

impl Default for PersistentOxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OxStore for PersistentOxStore {
    fn backend(&mut self) -> StoreResult<&mut dyn QuadBackend> {
        let backend = self.handle.get_or_open_with(|| {
            warn!("Store used before open, falling back to a transient in-memory store");
            Ok(Box::new(MemoryQuadStore::new()) as Box<dyn QuadBackend>)
        })?;
        Ok(&mut **backend)
    }

    /// Open the RocksDB store named by `configuration`
    ///
    /// Returns [`OpenStatus::NoStore`] when the directory does not exist,
    /// `create` is false and the configuration disables `create_if_missing`.
    ///
    /// The store held so far is kept until the new one opens. Reopening the
    /// same directory releases it first to free the database lock; if that
    /// open fails the adapter is left unopened, not closed.
    fn open(&mut self, configuration: &str, create: bool) -> StoreResult<OpenStatus> {
        let mut config = StoreConfig::from_configuration(configuration)?;
        if create {
            config.rocksdb.create_if_missing = true;
        }
        if !config.rocksdb.create_if_missing && !config.path.exists() {
            info!("No store at {:?}", config.path);
            return Ok(OpenStatus::NoStore);
        }

        if self.path() == Some(config.path.as_path()) {
            if let Some(previous) = self.handle.get() {
                previous.flush()?;
            }
            debug!("Releasing store at {:?} before reopening", config.path);
            self.handle.take();
            self.path = None;
        }

        let store = RocksQuadStore::open_with_config(&config)?;
        if let Some(previous) = self.handle.replace(Box::new(store)) {
            debug!("Releasing previously open store");
            if let Err(e) = previous.flush() {
                warn!("Failed to flush released store: {}", e);
            }
        }
        self.path = Some(config.path);
        Ok(OpenStatus::Valid)
    }

    fn close(&mut self) -> StoreResult<()> {
        if let Some(store) = self.handle.close() {
            store.flush()?;
        }
        self.path = None;
        Ok(())
    }

    /// Flushes the open store, if any
    fn gc(&mut self) -> StoreResult<()> {
        if let Some(store) = self.handle.get() {
            store.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RocksConfig;
    use crate::error::StoreError;
    use crate::rdf::{Context, Term, Triple, DEFAULT_GRAPH};
    use tempfile::TempDir;

    fn create_test_triple() -> Triple {
        Triple::new(
            Term::named_node("http://example.com/foo"),
            Term::named_node("http://example.com/p"),
            Term::literal("o"),
        )
    }

    #[test]
    fn test_lazy_fallback() {
        let mut store = PersistentOxStore::new();
        assert!(!store.is_open());

        store.add(&create_test_triple(), &DEFAULT_GRAPH, false).unwrap();
        assert!(store.is_open());
        assert_eq!(store.path(), None);
        assert_eq!(store.len(None).unwrap(), 1);
    }

    #[test]
    fn test_open_replaces_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = PersistentOxStore::new();
        store.add(&create_test_triple(), &DEFAULT_GRAPH, false).unwrap();

        let status = store.open(temp_dir.path().to_str().unwrap(), true).unwrap();
        assert_eq!(status, OpenStatus::Valid);
        assert_eq!(store.path(), Some(temp_dir.path()));
        assert_eq!(store.len(None).unwrap(), 0);
    }

    #[test]
    fn test_no_store_without_create() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("store.yaml");
        let config = StoreConfig {
            path: PathBuf::from("missing"),
            rocksdb: RocksConfig {
                create_if_missing: false,
                ..RocksConfig::default()
            },
        };
        std::fs::write(&config_file, serde_yaml::to_string(&config).unwrap()).unwrap();

        let mut store = PersistentOxStore::new();
        let status = store.open(config_file.to_str().unwrap(), false).unwrap();
        assert_eq!(status, OpenStatus::NoStore);
        assert!(!store.is_open());

        let status = store.open(config_file.to_str().unwrap(), true).unwrap();
        assert_eq!(status, OpenStatus::Valid);
        assert_eq!(store.path(), Some(temp_dir.path().join("missing").as_path()));
    }

    #[test]
    fn test_failed_open_keeps_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not_a_directory");
        std::fs::write(&file, "plain file").unwrap();

        let mut store = PersistentOxStore::new();
        assert!(store.open(file.to_str().unwrap(), true).is_err());
        assert!(!store.is_open());

        assert_eq!(store.len(None).unwrap(), 0);
        store.add(&create_test_triple(), &DEFAULT_GRAPH, false).unwrap();
        assert_eq!(store.len(None).unwrap(), 1);
    }

    #[test]
    fn test_failed_reopen_keeps_open_store() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not_a_directory");
        std::fs::write(&file, "plain file").unwrap();
        let db = temp_dir.path().join("db");

        let mut store = PersistentOxStore::new();
        store.open(db.to_str().unwrap(), true).unwrap();
        store.add(&create_test_triple(), &DEFAULT_GRAPH, false).unwrap();

        assert!(store.open(file.to_str().unwrap(), true).is_err());
        assert_eq!(store.path(), Some(db.as_path()));
        assert_eq!(store.len(None).unwrap(), 1);
    }

    #[test]
    fn test_reopen_same_directory() {
        let temp_dir = TempDir::new().unwrap();
        let location = temp_dir.path().to_str().unwrap();

        let mut store = PersistentOxStore::new();
        store.open(location, true).unwrap();
        store.add(&create_test_triple(), &DEFAULT_GRAPH, false).unwrap();

        assert_eq!(store.open(location, false).unwrap(), OpenStatus::Valid);
        assert_eq!(store.len(None).unwrap(), 1);
    }

    #[test]
    fn test_close_then_access() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = PersistentOxStore::new();
        store.open(temp_dir.path().to_str().unwrap(), true).unwrap();
        store.add(&create_test_triple(), &Context::named(Term::blank_node("g")), false).unwrap();
        store.gc().unwrap();
        store.close().unwrap();

        assert!(matches!(store.len(None), Err(StoreError::Closed)));
        assert!(matches!(
            store.add(&create_test_triple(), &DEFAULT_GRAPH, false),
            Err(StoreError::Closed)
        ));

        store.open(temp_dir.path().to_str().unwrap(), false).unwrap();
        assert_eq!(store.len(Some(&Context::named(Term::blank_node("g")))).unwrap(), 1);
    }
}
