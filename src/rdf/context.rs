//! Contexts (graph names)
//!
//! A [`Context`] is either the default graph or a named graph. Call sites that
//! accept a context filter take `Option<&Context>`: `None` means "no filter"
//! and is never the same thing as [`DEFAULT_GRAPH`].

use super::term::Term;
use serde::Serialize;
use std::fmt;

/// Graph name of a quad
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Context {
    /// The unnamed default graph
    DefaultGraph,
    /// A graph named by a named node or blank node
    Named(Term),
}

/// The default graph sentinel
pub const DEFAULT_GRAPH: Context = Context::DefaultGraph;

impl Context {
    /// Create a named graph context
    pub fn named(identifier: impl Into<Term>) -> Self {
        Context::Named(identifier.into())
    }

    /// Check if this is the default graph
    pub fn is_default_graph(&self) -> bool {
        matches!(self, Context::DefaultGraph)
    }

    /// Identifying term of a named graph
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Context::DefaultGraph => None,
            Context::Named(term) => Some(term),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        DEFAULT_GRAPH
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::DefaultGraph => f.write_str("DEFAULT"),
            Context::Named(term) => write!(f, "{}", term),
        }
    }
}

impl From<Term> for Context {
    fn from(term: Term) -> Self {
        Context::Named(term)
    }
}

/// A graph object used as a context argument
///
/// Only its identifier takes part in store operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Graph {
    identifier: Context,
}

impl Graph {
    /// Graph with the given identifying term
    pub fn new(identifier: impl Into<Term>) -> Self {
        Self {
            identifier: Context::Named(identifier.into()),
        }
    }

    /// The default graph as a graph object
    pub fn default_graph() -> Self {
        Self {
            identifier: DEFAULT_GRAPH,
        }
    }

    /// Context identifying this graph
    pub fn identifier(&self) -> &Context {
        &self.identifier
    }
}

impl From<&Graph> for Context {
    fn from(graph: &Graph) -> Self {
        graph.identifier.clone()
    }
}

impl From<Graph> for Context {
    fn from(graph: Graph) -> Self {
        graph.identifier
    }
}
