//! Term codec
//!
//! Pure conversions between the application model in [`crate::rdf`] and the
//! store-native `oxrdf` model. Encoding checks that every term sits in a
//! position its kind may occupy; decoding rejects store-native kinds the
//! application model has no equivalent for.
//!
//! For every representable value `decode(encode(t)) == t`. Identifiers are
//! copied verbatim, never validated or normalized.

use crate::error::{StoreError, StoreResult};
use crate::rdf::{Context, Graph, Literal, Term, Triple};
use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, GraphName, NamedNode, Quad, Subject};

/// Encode a term in object position
pub fn encode_term(term: &Term) -> StoreResult<oxrdf::Term> {
    Ok(match term {
        Term::NamedNode(iri) => NamedNode::new_unchecked(iri.as_str()).into(),
        Term::BlankNode(id) => BlankNode::new_unchecked(id.as_str()).into(),
        Term::Literal(lit) => encode_literal(lit).into(),
    })
}

fn encode_literal(lit: &Literal) -> oxrdf::Literal {
    match (lit.language(), lit.datatype()) {
        (Some(language), _) => {
            oxrdf::Literal::new_language_tagged_literal_unchecked(lit.value(), language)
        }
        (None, Some(datatype)) => {
            oxrdf::Literal::new_typed_literal(lit.value(), NamedNode::new_unchecked(datatype))
        }
        (None, None) => oxrdf::Literal::new_simple_literal(lit.value()),
    }
}

/// Encode a term in subject position
pub fn encode_subject(term: &Term) -> StoreResult<Subject> {
    match term {
        Term::NamedNode(iri) => Ok(NamedNode::new_unchecked(iri.as_str()).into()),
        Term::BlankNode(id) => Ok(BlankNode::new_unchecked(id.as_str()).into()),
        Term::Literal(_) => Err(StoreError::InvalidTerm(format!(
            "literal {} cannot be a subject",
            term
        ))),
    }
}

/// Encode a term in predicate position
pub fn encode_predicate(term: &Term) -> StoreResult<NamedNode> {
    match term {
        Term::NamedNode(iri) => Ok(NamedNode::new_unchecked(iri.as_str())),
        Term::BlankNode(_) | Term::Literal(_) => Err(StoreError::InvalidTerm(format!(
            "{} cannot be a predicate",
            term
        ))),
    }
}

/// Encode a context as a graph name
pub fn encode_context(context: &Context) -> StoreResult<GraphName> {
    match context {
        Context::DefaultGraph => Ok(GraphName::DefaultGraph),
        Context::Named(Term::NamedNode(iri)) => Ok(NamedNode::new_unchecked(iri.as_str()).into()),
        Context::Named(Term::BlankNode(id)) => Ok(BlankNode::new_unchecked(id.as_str()).into()),
        Context::Named(term @ Term::Literal(_)) => Err(StoreError::InvalidTerm(format!(
            "literal {} cannot name a graph",
            term
        ))),
    }
}

/// Encode a graph object through its identifier
pub fn encode_graph(graph: &Graph) -> StoreResult<GraphName> {
    encode_context(graph.identifier())
}

pub fn encode_triple(triple: &Triple) -> StoreResult<oxrdf::Triple> {
    Ok(oxrdf::Triple::new(
        encode_subject(&triple.subject)?,
        encode_predicate(&triple.predicate)?,
        encode_term(&triple.object)?,
    ))
}

/// Encode a triple placed in a context as a concrete quad
pub fn encode_quad(triple: &Triple, context: &Context) -> StoreResult<Quad> {
    Ok(encode_triple(triple)?.in_graph(encode_context(context)?))
}

/// Decode a store-native term
pub fn decode_term(term: &oxrdf::Term) -> StoreResult<Term> {
    match term {
        oxrdf::Term::NamedNode(n) => Ok(Term::NamedNode(n.as_str().to_owned())),
        oxrdf::Term::BlankNode(b) => Ok(Term::BlankNode(b.as_str().to_owned())),
        oxrdf::Term::Literal(l) => Ok(Term::Literal(decode_literal(l))),
        #[allow(unreachable_patterns)]
        other => Err(StoreError::UnsupportedTerm(other.to_string())),
    }
}

fn decode_literal(lit: &oxrdf::Literal) -> Literal {
    match lit.language() {
        Some(language) => Literal::new_language_tagged_literal(lit.value(), language),
        None if lit.datatype() == xsd::STRING => Literal::new_simple_literal(lit.value()),
        None => Literal::new_typed_literal(lit.value(), lit.datatype().as_str()),
    }
}

pub fn decode_subject(subject: &Subject) -> StoreResult<Term> {
    match subject {
        Subject::NamedNode(n) => Ok(Term::NamedNode(n.as_str().to_owned())),
        Subject::BlankNode(b) => Ok(Term::BlankNode(b.as_str().to_owned())),
        #[allow(unreachable_patterns)]
        other => Err(StoreError::UnsupportedTerm(other.to_string())),
    }
}

pub fn decode_predicate(predicate: &NamedNode) -> Term {
    Term::NamedNode(predicate.as_str().to_owned())
}

/// Decode a graph name. The store's default graph marker becomes
/// [`Context::DefaultGraph`], never a named context.
pub fn decode_graph_name(graph_name: &GraphName) -> Context {
    match graph_name {
        GraphName::DefaultGraph => Context::DefaultGraph,
        GraphName::NamedNode(n) => Context::Named(Term::NamedNode(n.as_str().to_owned())),
        GraphName::BlankNode(b) => Context::Named(Term::BlankNode(b.as_str().to_owned())),
    }
}

pub fn decode_triple(triple: &oxrdf::Triple) -> StoreResult<Triple> {
    Ok(Triple {
        subject: decode_subject(&triple.subject)?,
        predicate: decode_predicate(&triple.predicate),
        object: decode_term(&triple.object)?,
    })
}

/// Decode a stored quad into its triple and context
pub fn decode_quad(quad: &Quad) -> StoreResult<(Triple, Context)> {
    let triple = Triple {
        subject: decode_subject(&quad.subject)?,
        predicate: decode_predicate(&quad.predicate),
        object: decode_term(&quad.object)?,
    };
    Ok((triple, decode_graph_name(&quad.graph_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::vocab::{RDF_LANG_STRING, XSD_STRING};
    use crate::rdf::DEFAULT_GRAPH;

    fn sample_terms() -> Vec<Term> {
        vec![
            Term::named_node("http://example.com/foo"),
            Term::named_node(""),
            Term::blank_node("b0"),
            Term::blank_node("f7a3"),
            Term::literal(""),
            Term::literal("Alice"),
            Literal::new_language_tagged_literal("Alice", "en").into(),
            Literal::new_language_tagged_literal("Grüße", "de-AT").into(),
            Literal::new_typed_literal("42", "http://www.w3.org/2001/XMLSchema#integer").into(),
            Literal::new_typed_literal("x", RDF_LANG_STRING).into(),
            Literal::new_typed_literal("odd", "not an iri").into(),
        ]
    }

    #[test]
    fn test_term_roundtrip() {
        for term in sample_terms() {
            let encoded = encode_term(&term).unwrap();
            assert_eq!(decode_term(&encoded).unwrap(), term, "{}", term);
        }
    }

    #[test]
    fn test_literal_encoding() {
        let encoded = encode_term(&Literal::new_language_tagged_literal("chat", "fr").into()).unwrap();
        match encoded {
            oxrdf::Term::Literal(lit) => {
                assert_eq!(lit.value(), "chat");
                assert_eq!(lit.language(), Some("fr"));
            }
            other => panic!("Expected a literal, got {}", other),
        }

        let encoded = encode_term(&Term::literal("plain")).unwrap();
        match encoded {
            oxrdf::Term::Literal(lit) => assert_eq!(lit.datatype().as_str(), XSD_STRING),
            other => panic!("Expected a literal, got {}", other),
        }
    }

    #[test]
    fn test_decode_xsd_string_is_plain() {
        let stored = oxrdf::Literal::new_typed_literal("Alice", xsd::STRING);
        assert_eq!(decode_term(&stored.into()).unwrap(), Term::literal("Alice"));
    }

    #[test]
    fn test_position_checks() {
        let literal = Term::literal("x");
        assert!(matches!(encode_subject(&literal), Err(StoreError::InvalidTerm(_))));
        assert!(matches!(encode_predicate(&literal), Err(StoreError::InvalidTerm(_))));
        assert!(matches!(
            encode_predicate(&Term::blank_node("p")),
            Err(StoreError::InvalidTerm(_))
        ));
        assert!(matches!(
            encode_context(&Context::named(literal)),
            Err(StoreError::InvalidTerm(_))
        ));
    }

    #[test]
    fn test_default_graph_marker() {
        assert_eq!(encode_context(&DEFAULT_GRAPH).unwrap(), GraphName::DefaultGraph);
        assert_eq!(decode_graph_name(&GraphName::DefaultGraph), DEFAULT_GRAPH);

        let empty_name = Context::named(Term::named_node(""));
        let encoded = encode_context(&empty_name).unwrap();
        assert_ne!(encoded, GraphName::DefaultGraph);
        assert_eq!(decode_graph_name(&encoded), empty_name);
    }

    #[test]
    fn test_graph_encodes_identifier() {
        let graph = Graph::new(Term::blank_node("g"));
        assert_eq!(
            encode_graph(&graph).unwrap(),
            GraphName::BlankNode(BlankNode::new_unchecked("g"))
        );
        assert_eq!(encode_graph(&Graph::default_graph()).unwrap(), GraphName::DefaultGraph);
    }

    #[test]
    fn test_quad_roundtrip() {
        let triple = Triple::new(
            Term::blank_node("s"),
            Term::named_node("http://example.com/p"),
            Literal::new_language_tagged_literal("hi", "en"),
        );
        for context in [DEFAULT_GRAPH, Context::named(Term::named_node("http://example.com/g1"))] {
            let quad = encode_quad(&triple, &context).unwrap();
            assert_eq!(decode_quad(&quad).unwrap(), (triple.clone(), context));
        }
        assert_eq!(decode_triple(&encode_triple(&triple).unwrap()).unwrap(), triple);
    }
}
