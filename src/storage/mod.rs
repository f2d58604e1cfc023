//! Backing quad stores
//!
//! The adapter talks to its backing store only through [`QuadBackend`]:
//! insert a quad, remove a quad, scan a [`QuadPattern`]. Everything here works
//! on the store-native `oxrdf` model, where the default graph is
//! [`GraphName::DefaultGraph`].
//!
//! Two implementations are provided:
//! - [`MemoryQuadStore`]: indexed in-memory store
//! - [`RocksQuadStore`]: RocksDB-backed store with four quad orderings

mod memory;
mod rocks;

pub use memory::MemoryQuadStore;
pub use rocks::RocksQuadStore;

use oxrdf::{GraphName, NamedNode, Quad, Subject, Term};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Column family error
    #[error("Column family error: {0}")]
    ColumnFamily(String),

    /// A stored key does not decode to a quad
    #[error("Corrupt key in {0}")]
    CorruptKey(String),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Lazy sequence of quads produced by a scan
pub type QuadIter<'a> = Box<dyn Iterator<Item = StorageResult<Quad>> + 'a>;

/// Quad pattern in the store-native model (`None` = wildcard)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadPattern {
    /// Subject (None = variable)
    pub subject: Option<Subject>,
    /// Predicate (None = variable)
    pub predicate: Option<NamedNode>,
    /// Object (None = variable)
    pub object: Option<Term>,
    /// Graph (None = variable, Some(DefaultGraph) = default graph only)
    pub graph_name: Option<GraphName>,
}

impl QuadPattern {
    /// Pattern matching every quad
    pub fn any() -> Self {
        Self::default()
    }

    /// Pattern matching every quad of one graph
    pub fn graph(graph_name: GraphName) -> Self {
        Self {
            graph_name: Some(graph_name),
            ..Self::default()
        }
    }

    /// Check if a quad matches this pattern
    pub fn matches(&self, quad: &Quad) -> bool {
        if let Some(ref s) = self.subject {
            if s != &quad.subject {
                return false;
            }
        }
        if let Some(ref p) = self.predicate {
            if p != &quad.predicate {
                return false;
            }
        }
        if let Some(ref o) = self.object {
            if o != &quad.object {
                return false;
            }
        }
        if let Some(ref g) = self.graph_name {
            if g != &quad.graph_name {
                return false;
            }
        }
        true
    }

    /// Whether every position is a wildcard
    pub fn is_wildcard(&self) -> bool {
        self.subject.is_none()
            && self.predicate.is_none()
            && self.object.is_none()
            && self.graph_name.is_none()
    }
}

/// The primitives a backing store exposes to the adapter
///
/// Scans are lazy and are not snapshots. The returned iterator borrows the
/// store, so it cannot observe mutations made through this trait.
pub trait QuadBackend {
    /// Insert a quad. Returns `false` when it was already present.
    fn insert(&mut self, quad: &Quad) -> StorageResult<bool>;

    /// Remove a quad. Returns `false` when it was absent.
    fn remove(&mut self, quad: &Quad) -> StorageResult<bool>;

    /// Remove several quads, returning how many were present.
    ///
    /// Stores that can apply the removals atomically should override this.
    fn remove_all(&mut self, quads: &[Quad]) -> StorageResult<usize> {
        let mut removed = 0;
        for quad in quads {
            if self.remove(quad)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Scan the quads matching a pattern
    fn quads_for_pattern(&self, pattern: QuadPattern) -> QuadIter<'_>;

    /// Number of stored quads
    fn len(&self) -> StorageResult<usize>;

    /// Check if the store holds no quad
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Persist buffered writes. A no-op for stores without buffers.
    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }
}
