//! Application-facing RDF model
//!
//! Terms, triples and contexts as the calling graph API sees them. Nothing in
//! this module knows about a backing store; the translation to the
//! store-native model lives in [`crate::codec`].
//!
//! # Example
//!
//! ```rust
//! use oxstore::rdf::{Context, Literal, Namespace, Term, Triple, DEFAULT_GRAPH};
//!
//! let ex = Namespace::new("ex", "http://example.com/");
//! let triple = Triple::new(
//!     ex.term("alice"),
//!     Term::named_node("http://xmlns.com/foaf/0.1/name"),
//!     Literal::new_language_tagged_literal("Alice", "en"),
//! );
//! assert!(matches!(triple.object, Term::Literal(_)));
//! assert_ne!(Context::named(ex.term("g1")), DEFAULT_GRAPH);
//! ```

mod context;
mod namespace;
mod term;
pub mod vocab;

pub use context::{Context, Graph, DEFAULT_GRAPH};
pub use namespace::{Namespace, NamespaceManager, PrefixError, PrefixResult};
pub use term::{Literal, Term, TermParseError, Triple, TriplePattern};

/// A triple together with the graph it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Quad {
    /// Triple
    pub triple: Triple,
    /// Graph name
    pub context: Context,
}

impl Quad {
    /// Create a new quad
    pub fn new(triple: Triple, context: Context) -> Self {
        Self { triple, context }
    }
}

impl From<(Triple, Context)> for Quad {
    fn from((triple, context): (Triple, Context)) -> Self {
        Self { triple, context }
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.context {
            Context::DefaultGraph => write!(f, "{}", self.triple),
            Context::Named(graph) => write!(
                f,
                "{} {} {} {} .",
                self.triple.subject, self.triple.predicate, self.triple.object, graph
            ),
        }
    }
}
