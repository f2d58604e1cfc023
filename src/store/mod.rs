//! Store adapter
//!
//! [`OxStore`] is the storage contract a graph API programs against. Every
//! provided method is built from three backing-store primitives (insert,
//! remove, pattern scan) plus the codec and the pattern translator, so a
//! variant only has to say where its backing store lives.
//!
//! Two variants are provided:
//! - [`MemoryOxStore`]: backing store created at construction
//! - [`PersistentOxStore`]: RocksDB store opened from a configuration string
//!
//! Scans are lazy and hold a borrow of the adapter until dropped. Results are
//! not snapshotted.

mod handle;
mod memory;
mod persistent;

pub use handle::StoreHandle;
pub use memory::MemoryOxStore;
pub use persistent::PersistentOxStore;

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::pattern;
use crate::rdf::{Context, Quad, Triple, TriplePattern};
use crate::storage::{QuadBackend, QuadPattern};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

/// Lazy sequence of decoded (triple, context) pairs
pub type TripleIter<'a> = Box<dyn Iterator<Item = StoreResult<(Triple, Context)>> + 'a>;

/// Lazy sequence of decoded quads
pub type QuadIter<'a> = Box<dyn Iterator<Item = StoreResult<Quad>> + 'a>;

/// Lazy sequence of distinct contexts
pub type ContextIter<'a> = Box<dyn Iterator<Item = StoreResult<Context>> + 'a>;

/// Capability flags advertised to the graph API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Triples are stored per named graph
    pub context_aware: bool,
    /// Quoted (formula) triples are supported
    pub formula_aware: bool,
    /// Commit and rollback have effect
    pub transaction_aware: bool,
    /// Empty graphs are tracked independently of their triples
    pub graph_aware: bool,
}

/// Flags shared by every adapter variant
pub const CAPABILITIES: Capabilities = Capabilities {
    context_aware: true,
    formula_aware: false,
    transaction_aware: false,
    graph_aware: false,
};

/// Result of opening a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpenStatus {
    /// The store is open and usable
    Valid,
    /// Nothing exists at the location and creation was not requested
    NoStore,
}

/// Storage contract of the graph API
pub trait OxStore {
    /// Backing store of this adapter
    ///
    /// Fails with [`StoreError::Closed`] after [`close`](Self::close).
    fn backend(&mut self) -> StoreResult<&mut dyn QuadBackend>;

    /// Open the store described by `configuration`
    fn open(&mut self, configuration: &str, create: bool) -> StoreResult<OpenStatus>;

    /// Release the backing store
    fn close(&mut self) -> StoreResult<()>;

    /// Delete the store at `configuration`
    fn destroy(&mut self, _configuration: &str) -> StoreResult<()> {
        Err(StoreError::NotImplemented("destroy"))
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    /// Add a triple to a context
    ///
    /// Adding a triple that is already present is a no-op. Quoted triples are
    /// rejected with [`StoreError::FormulaNotSupported`].
    fn add(&mut self, triple: &Triple, context: &Context, quoted: bool) -> StoreResult<()> {
        if quoted {
            return Err(StoreError::FormulaNotSupported);
        }
        let quad = pattern::build_quad(triple, context)?;
        if self.backend()?.insert(&quad)? {
            debug!("Added {} to {}", triple, context);
        }
        Ok(())
    }

    fn add_quad(&mut self, quad: &Quad) -> StoreResult<()> {
        self.add(&quad.triple, &quad.context, false)
    }

    /// Add every triple to one context, returning how many were processed
    fn add_all<I>(&mut self, triples: I, context: &Context) -> StoreResult<usize>
    where
        I: IntoIterator<Item = Triple>,
        Self: Sized,
    {
        let mut count = 0;
        for triple in triples {
            self.add(&triple, context, false)?;
            count += 1;
        }
        Ok(count)
    }

    /// Remove every quad matching the pattern, returning how many were removed
    ///
    /// `None` matches every graph; `Some(&DEFAULT_GRAPH)` only the default
    /// graph. Matches are collected before anything is removed.
    ///
    /// [`DEFAULT_GRAPH`]: crate::rdf::DEFAULT_GRAPH
    fn remove(&mut self, pattern: &TriplePattern, context: Option<&Context>) -> StoreResult<usize> {
        let quad_pattern = pattern::build_pattern(pattern, context)?;
        let backend = self.backend()?;
        let matches = backend
            .quads_for_pattern(quad_pattern)
            .collect::<Result<Vec<_>, _>>()?;
        let removed = backend.remove_all(&matches)?;
        debug!("Removed {} quads", removed);
        Ok(removed)
    }

    /// Scan the triples matching the pattern
    ///
    /// Yields one `(triple, context)` pair per stored quad, so a triple held
    /// in two graphs comes out twice when `context` is `None`.
    fn triples(&mut self, pattern: &TriplePattern, context: Option<&Context>) -> StoreResult<TripleIter<'_>> {
        let quad_pattern = pattern::build_pattern(pattern, context)?;
        let iter = self
            .backend()?
            .quads_for_pattern(quad_pattern)
            .map(|quad| codec::decode_quad(&quad?));
        Ok(Box::new(iter))
    }

    /// Scan the quads matching the pattern
    fn quads(&mut self, pattern: &TriplePattern, context: Option<&Context>) -> StoreResult<QuadIter<'_>> {
        Ok(Box::new(self.triples(pattern, context)?.map(|item| item.map(Quad::from))))
    }

    /// Distinct contexts holding at least one quad, or holding `triple`
    ///
    /// Contexts come out in first-occurrence order of the underlying scan.
    fn contexts(&mut self, triple: Option<&Triple>) -> StoreResult<ContextIter<'_>> {
        let quad_pattern = match triple {
            Some(triple) => pattern::build_pattern(&TriplePattern::from(triple), None)?,
            None => QuadPattern::any(),
        };
        let mut seen = FxHashSet::default();
        let iter = self
            .backend()?
            .quads_for_pattern(quad_pattern)
            .filter_map(move |quad| match quad {
                Ok(quad) => seen
                    .insert(quad.graph_name.clone())
                    .then(|| Ok(codec::decode_graph_name(&quad.graph_name))),
                Err(e) => Some(Err(StoreError::from(e))),
            });
        Ok(Box::new(iter))
    }

    /// Number of triples
    ///
    /// Without a context this counts distinct triples across all graphs, so a
    /// triple held in several graphs counts once. With a context it counts
    /// the quads of that graph.
    fn len(&mut self, context: Option<&Context>) -> StoreResult<usize> {
        match context {
            None => {
                let mut distinct = FxHashSet::default();
                for quad in self.backend()?.quads_for_pattern(QuadPattern::any()) {
                    let quad = quad?;
                    distinct.insert((quad.subject, quad.predicate, quad.object));
                }
                Ok(distinct.len())
            }
            Some(context) => {
                let quad_pattern = QuadPattern::graph(codec::encode_context(context)?);
                let mut count = 0;
                for quad in self.backend()?.quads_for_pattern(quad_pattern) {
                    quad?;
                    count += 1;
                }
                Ok(count)
            }
        }
    }

    fn is_empty(&mut self, context: Option<&Context>) -> StoreResult<bool> {
        let quad_pattern = match context {
            Some(context) => QuadPattern::graph(codec::encode_context(context)?),
            None => QuadPattern::any(),
        };
        let first = self.backend()?.quads_for_pattern(quad_pattern).next();
        Ok(first.transpose()?.is_none())
    }

    /// Evaluate a query. Needs a query engine the adapter does not have.
    fn query(&mut self, _query: &str) -> StoreResult<TripleIter<'_>> {
        Err(StoreError::NotImplemented("query"))
    }

    /// Evaluate an update. Needs a query engine the adapter does not have.
    fn update(&mut self, _update: &str) -> StoreResult<()> {
        Err(StoreError::NotImplemented("update"))
    }

    fn commit(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        Ok(())
    }

    /// Store-specific maintenance hook. Never needed for correctness.
    fn gc(&mut self) -> StoreResult<()> {
        Ok(())
    }
}
