//! Bulk load and dump
//!
//! Loads Turtle, N-Triples, N-Quads and TriG documents into an adapter and
//! dumps its quads as N-Quads, using the `rio` parsers and formatters.

use crate::error::{StoreError, StoreResult};
use crate::rdf::{Context, Literal, Term, Triple, TriplePattern};
use crate::store::OxStore;
use rio_api::formatter::QuadsFormatter;
use rio_api::model;
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{NQuadsFormatter, NQuadsParser, NTriplesParser, TriGParser, TurtleError, TurtleParser};
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Bulk I/O errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// Syntax error in the input document
    #[error("Parse error: {0}")]
    Parse(#[from] TurtleError),

    /// The adapter rejected a statement
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown RDF format: {0}")]
    UnknownFormat(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    Turtle,
    NTriples,
    NQuads,
    TriG,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            "nq" | "nquads" => Some(RdfFormat::NQuads),
            "trig" => Some(RdfFormat::TriG),
            _ => None,
        }
    }

    /// Guess the format from a file name
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether statements of this format carry their own graph name
    pub fn is_quads(&self) -> bool {
        matches!(self, RdfFormat::NQuads | RdfFormat::TriG)
    }
}

impl FromStr for RdfFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| LoadError::UnknownFormat(s.to_string()))
    }
}

/// Load a document into the store
///
/// Triple formats go into `context`. Quad formats go into the graph each
/// statement names, statements without one going into `context`. Returns the
/// number of statements read.
pub fn load<S, R>(store: &mut S, reader: R, format: RdfFormat, context: &Context) -> LoadResult<usize>
where
    S: OxStore + ?Sized,
    R: BufRead,
{
    let count = match format {
        RdfFormat::Turtle => load_triples(TurtleParser::new(reader, None), store, context)?,
        RdfFormat::NTriples => load_triples(NTriplesParser::new(reader), store, context)?,
        RdfFormat::NQuads => load_quads(NQuadsParser::new(reader), store, context)?,
        RdfFormat::TriG => load_quads(TriGParser::new(reader, None), store, context)?,
    };
    info!("Loaded {} statements as {:?}", count, format);
    Ok(count)
}

fn load_triples<P, S>(mut parser: P, store: &mut S, context: &Context) -> LoadResult<usize>
where
    P: TriplesParser,
    LoadError: From<P::Error>,
    S: OxStore + ?Sized,
{
    let mut count = 0;
    let result: LoadResult<()> = parser.parse_all(&mut |t| {
        let triple = convert_triple(&t.subject, &t.predicate, &t.object)?;
        store.add(&triple, context, false)?;
        count += 1;
        Ok(())
    });
    result.map(|_| count)
}

fn load_quads<P, S>(mut parser: P, store: &mut S, context: &Context) -> LoadResult<usize>
where
    P: QuadsParser,
    LoadError: From<P::Error>,
    S: OxStore + ?Sized,
{
    let mut count = 0;
    let result: LoadResult<()> = parser.parse_all(&mut |q| {
        let triple = convert_triple(&q.subject, &q.predicate, &q.object)?;
        match q.graph_name {
            Some(graph_name) => store.add(&triple, &convert_graph_name(graph_name), false)?,
            None => store.add(&triple, context, false)?,
        }
        count += 1;
        Ok(())
    });
    result.map(|_| count)
}

fn convert_triple(
    subject: &model::Subject<'_>,
    predicate: &model::NamedNode<'_>,
    object: &model::Term<'_>,
) -> StoreResult<Triple> {
    Ok(Triple::new(
        convert_subject(subject)?,
        Term::named_node(predicate.iri),
        convert_object(object)?,
    ))
}

fn convert_subject(s: &model::Subject<'_>) -> StoreResult<Term> {
    match s {
        model::Subject::NamedNode(n) => Ok(Term::named_node(n.iri)),
        model::Subject::BlankNode(b) => Ok(Term::blank_node(b.id)),
        other => Err(StoreError::UnsupportedTerm(other.to_string())),
    }
}

fn convert_object(o: &model::Term<'_>) -> StoreResult<Term> {
    match o {
        model::Term::NamedNode(n) => Ok(Term::named_node(n.iri)),
        model::Term::BlankNode(b) => Ok(Term::blank_node(b.id)),
        model::Term::Literal(l) => Ok(match *l {
            model::Literal::Simple { value } => Literal::new_simple_literal(value),
            model::Literal::LanguageTaggedString { value, language } => {
                Literal::new_language_tagged_literal(value, language)
            }
            model::Literal::Typed { value, datatype } => Literal::new_typed_literal(value, datatype.iri),
        }
        .into()),
        other => Err(StoreError::UnsupportedTerm(other.to_string())),
    }
}

fn convert_graph_name(g: model::GraphName<'_>) -> Context {
    match g {
        model::GraphName::NamedNode(n) => Context::named(Term::named_node(n.iri)),
        model::GraphName::BlankNode(b) => Context::named(Term::blank_node(b.id)),
    }
}

/// Write the quads of the store, or of one context, as N-Quads
///
/// Returns the number of quads written.
pub fn dump<S, W>(store: &mut S, writer: W, context: Option<&Context>) -> LoadResult<usize>
where
    S: OxStore + ?Sized,
    W: Write,
{
    let mut formatter = NQuadsFormatter::new(writer);
    let mut count = 0;
    for item in store.triples(&TriplePattern::any(), context)? {
        let (triple, graph) = item?;
        let subject = rio_subject(&triple.subject)?;
        let predicate = rio_predicate(&triple.predicate)?;
        let object = rio_term(&triple.object);
        let graph_name = rio_graph_name(&graph)?;
        formatter.format(&model::Quad {
            subject,
            predicate,
            object,
            graph_name,
        })?;
        count += 1;
    }
    formatter.finish()?;
    Ok(count)
}

fn rio_subject(term: &Term) -> StoreResult<model::Subject<'_>> {
    match term {
        Term::NamedNode(iri) => Ok(model::NamedNode { iri: iri.as_str() }.into()),
        Term::BlankNode(id) => Ok(model::BlankNode { id: id.as_str() }.into()),
        Term::Literal(_) => Err(StoreError::InvalidTerm(format!("literal {} cannot be a subject", term))),
    }
}

fn rio_predicate(term: &Term) -> StoreResult<model::NamedNode<'_>> {
    match term {
        Term::NamedNode(iri) => Ok(model::NamedNode { iri: iri.as_str() }),
        _ => Err(StoreError::InvalidTerm(format!("{} cannot be a predicate", term))),
    }
}

fn rio_term(term: &Term) -> model::Term<'_> {
    match term {
        Term::NamedNode(iri) => model::NamedNode { iri: iri.as_str() }.into(),
        Term::BlankNode(id) => model::BlankNode { id: id.as_str() }.into(),
        Term::Literal(lit) => rio_literal(lit).into(),
    }
}

fn rio_literal(lit: &Literal) -> model::Literal<'_> {
    match (lit.language(), lit.datatype()) {
        (Some(language), _) => model::Literal::LanguageTaggedString {
            value: lit.value(),
            language,
        },
        (None, Some(datatype)) => model::Literal::Typed {
            value: lit.value(),
            datatype: model::NamedNode { iri: datatype },
        },
        (None, None) => model::Literal::Simple { value: lit.value() },
    }
}

fn rio_graph_name(context: &Context) -> StoreResult<Option<model::GraphName<'_>>> {
    match context {
        Context::DefaultGraph => Ok(None),
        Context::Named(Term::NamedNode(iri)) => Ok(Some(model::NamedNode { iri: iri.as_str() }.into())),
        Context::Named(Term::BlankNode(id)) => Ok(Some(model::BlankNode { id: id.as_str() }.into())),
        Context::Named(term) => Err(StoreError::InvalidTerm(format!("literal {} cannot name a graph", term))),
    }
}
