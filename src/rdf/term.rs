//! Application-facing RDF term model
//!
//! These values are independent of any backing store. Identifiers are opaque
//! strings compared by exact equality; position constraints (e.g. no literal
//! predicates) are checked when a term is encoded for a store, not here.

use super::vocab::XSD_STRING;
use crate::error::{StoreError, StoreResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Term parsing errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TermParseError {
    /// Input ended before the term was complete
    #[error("Unexpected end of term: {0}")]
    UnexpectedEnd(String),

    /// Input is not an IRI, blank node or literal
    #[error("Unrecognized term syntax: {0}")]
    Syntax(String),

    /// Unknown escape sequence inside a literal
    #[error("Invalid escape sequence in: {0}")]
    InvalidEscape(String),
}

/// RDF literal: a lexical value with at most one of a language tag or a datatype
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Literal {
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    datatype: Option<String>,
}

impl Literal {
    /// Create a literal from its parts
    ///
    /// Empty language tags and datatypes count as absent. A datatype of
    /// `xsd:string` is the plain literal and is dropped. Supplying both a
    /// language tag and a datatype fails with [`StoreError::InvalidTerm`].
    pub fn new(
        value: impl Into<String>,
        language: Option<String>,
        datatype: Option<String>,
    ) -> StoreResult<Self> {
        let value = value.into();
        let language = language.filter(|l| !l.is_empty());
        let datatype = datatype.filter(|d| !d.is_empty() && d != XSD_STRING);
        if language.is_some() && datatype.is_some() {
            return Err(StoreError::InvalidTerm(format!(
                "literal {:?} has both a language tag and a datatype",
                value
            )));
        }
        Ok(Self {
            value,
            language,
            datatype,
        })
    }

    /// Create a plain literal
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Create a literal with a language tag
    pub fn new_language_tagged_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            value: value.into(),
            language: (!language.is_empty()).then_some(language),
            datatype: None,
        }
    }

    /// Create a typed literal
    pub fn new_typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            value: value.into(),
            language: None,
            datatype: (!datatype.is_empty() && datatype != XSD_STRING).then_some(datatype),
        }
    }

    /// Lexical value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Language tag, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Datatype IRI, if any. Plain and language-tagged literals have none.
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// Whether this is a plain literal
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.is_none()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.value.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")?;
        match (&self.language, &self.datatype) {
            (Some(lang), _) => write!(f, "@{}", lang),
            (None, Some(datatype)) => write!(f, "^^<{}>", datatype),
            (None, None) => Ok(()),
        }
    }
}

/// RDF term (any RDF value)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// Named node (IRI)
    NamedNode(String),
    /// Blank node
    BlankNode(String),
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// Create a named node term
    pub fn named_node(iri: impl Into<String>) -> Self {
        Term::NamedNode(iri.into())
    }

    /// Create a blank node term from an identifier
    pub fn blank_node(id: impl Into<String>) -> Self {
        Term::BlankNode(id.into())
    }

    /// Create a blank node term with a fresh random identifier
    pub fn new_blank_node() -> Self {
        Term::BlankNode(oxrdf::BlankNode::default().as_str().to_owned())
    }

    /// Create a plain literal term
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::new_simple_literal(value))
    }

    /// IRI, blank node identifier or lexical value
    pub fn as_str(&self) -> &str {
        match self {
            Term::NamedNode(iri) => iri,
            Term::BlankNode(id) => id,
            Term::Literal(lit) => lit.value(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "_:{}", id),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// Parses the N-Triples term syntax produced by `Display`
impl FromStr for Term {
    type Err = TermParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix('<') {
            let iri = rest
                .strip_suffix('>')
                .ok_or_else(|| TermParseError::UnexpectedEnd(s.to_string()))?;
            return Ok(Term::NamedNode(iri.to_string()));
        }
        if let Some(id) = s.strip_prefix("_:") {
            if id.is_empty() {
                return Err(TermParseError::UnexpectedEnd(s.to_string()));
            }
            return Ok(Term::BlankNode(id.to_string()));
        }
        if s.starts_with('"') {
            return parse_literal(s).map(Term::Literal);
        }
        Err(TermParseError::Syntax(s.to_string()))
    }
}

fn parse_literal(s: &str) -> Result<Literal, TermParseError> {
    let mut value = String::new();
    let mut chars = s.char_indices().skip(1);
    let mut end = None;
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                end = Some(i);
                break;
            }
            '\\' => match chars.next().map(|(_, c)| c) {
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some('n') => value.push('\n'),
                Some('r') => value.push('\r'),
                Some('t') => value.push('\t'),
                Some(_) => return Err(TermParseError::InvalidEscape(s.to_string())),
                None => return Err(TermParseError::UnexpectedEnd(s.to_string())),
            },
            c => value.push(c),
        }
    }
    let end = end.ok_or_else(|| TermParseError::UnexpectedEnd(s.to_string()))?;
    let suffix = &s[end + 1..];
    if suffix.is_empty() {
        Ok(Literal::new_simple_literal(value))
    } else if let Some(lang) = suffix.strip_prefix('@') {
        Ok(Literal::new_language_tagged_literal(value, lang))
    } else if let Some(datatype) = suffix.strip_prefix("^^") {
        match Term::from_str(datatype)? {
            Term::NamedNode(iri) => Ok(Literal::new_typed_literal(value, iri)),
            _ => Err(TermParseError::Syntax(s.to_string())),
        }
    } else {
        Err(TermParseError::Syntax(s.to_string()))
    }
}

/// RDF triple (subject-predicate-object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Triple {
    /// Subject
    pub subject: Term,
    /// Predicate
    pub predicate: Term,
    /// Object
    pub object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Triple pattern for scans and deletes (`None` = wildcard)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    /// Subject (None = variable)
    pub subject: Option<Term>,
    /// Predicate (None = variable)
    pub predicate: Option<Term>,
    /// Object (None = variable)
    pub object: Option<Term>,
}

impl TriplePattern {
    /// Create a new triple pattern
    pub fn new(subject: Option<Term>, predicate: Option<Term>, object: Option<Term>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Pattern matching every triple
    pub fn any() -> Self {
        Self::default()
    }
}

impl From<&Triple> for TriplePattern {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: Some(triple.subject.clone()),
            predicate: Some(triple.predicate.clone()),
            object: Some(triple.object.clone()),
        }
    }
}

impl From<Triple> for TriplePattern {
    fn from(triple: Triple) -> Self {
        Self {
            subject: Some(triple.subject),
            predicate: Some(triple.predicate),
            object: Some(triple.object),
        }
    }
}

impl From<(Option<Term>, Option<Term>, Option<Term>)> for TriplePattern {
    fn from((subject, predicate, object): (Option<Term>, Option<Term>, Option<Term>)) -> Self {
        Self::new(subject, predicate, object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_exclusivity() {
        let result = Literal::new(
            "chat",
            Some("fr".to_string()),
            Some("http://example.com/dt".to_string()),
        );
        assert!(matches!(result, Err(StoreError::InvalidTerm(_))));

        let lit = Literal::new("chat", Some(String::new()), Some("http://example.com/dt".to_string())).unwrap();
        assert_eq!(lit.language(), None);
        assert_eq!(lit.datatype(), Some("http://example.com/dt"));
    }

    #[test]
    fn test_xsd_string_is_plain() {
        let lit = Literal::new_typed_literal("Alice", XSD_STRING);
        assert!(lit.is_plain());
        assert_eq!(lit, Literal::new_simple_literal("Alice"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Term::named_node("http://example.com/a").to_string(), "<http://example.com/a>");
        assert_eq!(Term::blank_node("b0").to_string(), "_:b0");
        assert_eq!(
            Term::from(Literal::new_language_tagged_literal("say \"hi\"", "en")).to_string(),
            "\"say \\\"hi\\\"\"@en"
        );
        assert_eq!(
            Term::from(Literal::new_typed_literal("1", "http://www.w3.org/2001/XMLSchema#integer")).to_string(),
            "\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_parse_terms() {
        assert_eq!("<http://example.com/a>".parse::<Term>().unwrap(), Term::named_node("http://example.com/a"));
        assert_eq!("_:x".parse::<Term>().unwrap(), Term::blank_node("x"));
        assert_eq!("\"a\\nb\"".parse::<Term>().unwrap(), Term::literal("a\nb"));
        assert_eq!(
            "\"chat\"@fr".parse::<Term>().unwrap(),
            Term::from(Literal::new_language_tagged_literal("chat", "fr"))
        );
        assert_eq!(
            "\"1\"^^<http://example.com/dt>".parse::<Term>().unwrap(),
            Term::from(Literal::new_typed_literal("1", "http://example.com/dt"))
        );
        assert!("\"open".parse::<Term>().is_err());
        assert!("plain".parse::<Term>().is_err());
        assert!("\"bad\\q\"".parse::<Term>().is_err());
    }

    #[test]
    fn test_display_parse_agree() {
        let terms = vec![
            Term::named_node("http://example.com/"),
            Term::blank_node("node1"),
            Term::literal("tab\there"),
            Term::from(Literal::new_language_tagged_literal("hallo", "de-at")),
        ];
        for term in terms {
            assert_eq!(term.to_string().parse::<Term>().unwrap(), term);
        }
    }
}
