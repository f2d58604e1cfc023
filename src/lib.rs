//! Oxstore
//!
//! A context-aware RDF store adapter. A graph API stores and scans triples
//! through [`OxStore`] using its own term model ([`rdf`]), while the quads
//! themselves live in a pluggable backing store ([`storage`]) that speaks the
//! `oxrdf` model.
//!
//! # Architecture
//!
//! - [`codec`]: lossless term conversion between the two models
//! - [`pattern`]: triple pattern + context filter to quad pattern
//! - [`store`]: the adapter contract and its in-memory and persistent variants
//! - [`storage`]: backing quad stores (in-memory, RocksDB)
//! - [`io`]: bulk load and dump through the `rio` parsers
//!
//! # Contexts
//!
//! Every stored triple belongs to a graph. Operations that filter by graph take
//! an `Option<&Context>`: `None` matches every graph, while
//! `Some(&DEFAULT_GRAPH)` matches the default graph only.
//!
//! ## Example Usage
//!
//! ```rust
//! use oxstore::{Context, MemoryOxStore, OxStore, Term, Triple, TriplePattern, DEFAULT_GRAPH};
//!
//! let mut store = MemoryOxStore::new();
//! let triple = Triple::new(
//!     Term::named_node("http://example.com/foo"),
//!     Term::named_node("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
//!     Term::named_node("http://example.com/Entity"),
//! );
//! let g1 = Context::named(Term::named_node("http://example.com/g1"));
//!
//! store.add(&triple, &DEFAULT_GRAPH, false).unwrap();
//! store.add(&triple, &g1, false).unwrap();
//!
//! // Distinct triples across all graphs
//! assert_eq!(store.len(None).unwrap(), 1);
//! assert_eq!(store.len(Some(&g1)).unwrap(), 1);
//!
//! // Remove from one graph only
//! let pattern = TriplePattern::new(Some(triple.subject.clone()), None, None);
//! store.remove(&pattern, Some(&g1)).unwrap();
//! assert_eq!(store.len(Some(&g1)).unwrap(), 0);
//! assert_eq!(store.len(Some(&DEFAULT_GRAPH)).unwrap(), 1);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod error;
pub mod io;
pub mod pattern;
pub mod rdf;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use config::{Compression, RocksConfig, StoreConfig};

pub use error::{StoreError, StoreResult};

pub use io::{dump, load, LoadError, LoadResult, RdfFormat};

pub use rdf::{
    Context, Graph, Literal, Namespace, NamespaceManager, Quad, Term, Triple, TriplePattern,
    DEFAULT_GRAPH,
};

pub use storage::{
    MemoryQuadStore, QuadBackend, QuadPattern, RocksQuadStore, StorageError, StorageResult,
};

pub use store::{
    Capabilities, MemoryOxStore, OpenStatus, OxStore, PersistentOxStore, CAPABILITIES,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
