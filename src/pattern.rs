//! Pattern translation
//!
//! Builds store-native [`QuadPattern`]s from a [`TriplePattern`] and an
//! optional context filter. The graph position follows three cases:
//!
//! | context                    | graph position              |
//! |----------------------------|-----------------------------|
//! | `None`                     | wildcard (any graph)        |
//! | `Some(&DEFAULT_GRAPH)`     | the default graph only      |
//! | `Some(&Context::Named(g))` | the graph named `g` only    |
//!
//! Inserts never go through a pattern: [`build_quad`] always yields a
//! concrete graph.
//!
//! [`DEFAULT_GRAPH`]: crate::rdf::DEFAULT_GRAPH

use crate::codec;
use crate::error::StoreResult;
use crate::rdf::{Context, Triple, TriplePattern};
use crate::storage::QuadPattern;
use oxrdf::Quad;

/// Build the scan/delete pattern for a triple pattern and a context filter
pub fn build_pattern(pattern: &TriplePattern, context: Option<&Context>) -> StoreResult<QuadPattern> {
    Ok(QuadPattern {
        subject: pattern.subject.as_ref().map(codec::encode_subject).transpose()?,
        predicate: pattern.predicate.as_ref().map(codec::encode_predicate).transpose()?,
        object: pattern.object.as_ref().map(codec::encode_term).transpose()?,
        graph_name: context.map(codec::encode_context).transpose()?,
    })
}

/// Build the quad written by an insert
pub fn build_quad(triple: &Triple, context: &Context) -> StoreResult<Quad> {
    codec::encode_quad(triple, context)
}
