//! RocksDB quad store
//!
//! Every quad is written under four key orderings, one column family each:
//! `spog`, `posg`, `ospg` and `gspo`. A key is the concatenation of the
//! bincode encodings of the quad's terms in that order, so a scan whose
//! leading positions are bound is a prefix scan over one column family.

use super::{QuadBackend, QuadIter, QuadPattern, StorageError, StorageResult};
use crate::config::{RocksConfig, StoreConfig};
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Quad, Subject, Term};
use rocksdb::{ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Term as written inside a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum StoredTerm {
    NamedNode(String),
    BlankNode(String),
    SimpleLiteral(String),
    LanguageTaggedLiteral { value: String, language: String },
    TypedLiteral { value: String, datatype: String },
    DefaultGraph,
}

impl StoredTerm {
    fn from_subject(subject: &Subject) -> Self {
        match subject {
            Subject::NamedNode(n) => StoredTerm::NamedNode(n.as_str().to_owned()),
            Subject::BlankNode(b) => StoredTerm::BlankNode(b.as_str().to_owned()),
            #[allow(unreachable_patterns)]
            other => StoredTerm::NamedNode(other.to_string()),
        }
    }

    fn from_term(term: &Term) -> Self {
        match term {
            Term::NamedNode(n) => StoredTerm::NamedNode(n.as_str().to_owned()),
            Term::BlankNode(b) => StoredTerm::BlankNode(b.as_str().to_owned()),
            Term::Literal(l) => match l.language() {
                Some(language) => StoredTerm::LanguageTaggedLiteral {
                    value: l.value().to_owned(),
                    language: language.to_owned(),
                },
                None if l.datatype() == oxrdf::vocab::xsd::STRING => {
                    StoredTerm::SimpleLiteral(l.value().to_owned())
                }
                None => StoredTerm::TypedLiteral {
                    value: l.value().to_owned(),
                    datatype: l.datatype().as_str().to_owned(),
                },
            },
            #[allow(unreachable_patterns)]
            other => StoredTerm::NamedNode(other.to_string()),
        }
    }

    fn from_graph_name(graph_name: &GraphName) -> Self {
        match graph_name {
            GraphName::NamedNode(n) => StoredTerm::NamedNode(n.as_str().to_owned()),
            GraphName::BlankNode(b) => StoredTerm::BlankNode(b.as_str().to_owned()),
            GraphName::DefaultGraph => StoredTerm::DefaultGraph,
        }
    }

    fn into_subject(self) -> Option<Subject> {
        match self {
            StoredTerm::NamedNode(iri) => Some(NamedNode::new_unchecked(iri).into()),
            StoredTerm::BlankNode(id) => Some(BlankNode::new_unchecked(id).into()),
            _ => None,
        }
    }

    fn into_predicate(self) -> Option<NamedNode> {
        match self {
            StoredTerm::NamedNode(iri) => Some(NamedNode::new_unchecked(iri)),
            _ => None,
        }
    }

    fn into_term(self) -> Option<Term> {
        match self {
            StoredTerm::NamedNode(iri) => Some(NamedNode::new_unchecked(iri).into()),
            StoredTerm::BlankNode(id) => Some(BlankNode::new_unchecked(id).into()),
            StoredTerm::SimpleLiteral(value) => Some(Literal::new_simple_literal(value).into()),
            StoredTerm::LanguageTaggedLiteral { value, language } => {
                Some(Literal::new_language_tagged_literal_unchecked(value, language).into())
            }
            StoredTerm::TypedLiteral { value, datatype } => {
                Some(Literal::new_typed_literal(value, NamedNode::new_unchecked(datatype)).into())
            }
            StoredTerm::DefaultGraph => None,
        }
    }

    fn into_graph_name(self) -> Option<GraphName> {
        match self {
            StoredTerm::NamedNode(iri) => Some(NamedNode::new_unchecked(iri).into()),
            StoredTerm::BlankNode(id) => Some(BlankNode::new_unchecked(id).into()),
            StoredTerm::DefaultGraph => Some(GraphName::DefaultGraph),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Subject,
    Predicate,
    Object,
    Graph,
}

/// One key ordering, stored in its own column family
#[derive(Debug, Clone, Copy)]
struct IndexOrder {
    name: &'static str,
    positions: [Position; 4],
}

const INDEXES: [IndexOrder; 4] = [
    IndexOrder {
        name: "spog",
        positions: [Position::Subject, Position::Predicate, Position::Object, Position::Graph],
    },
    IndexOrder {
        name: "posg",
        positions: [Position::Predicate, Position::Object, Position::Subject, Position::Graph],
    },
    IndexOrder {
        name: "ospg",
        positions: [Position::Object, Position::Subject, Position::Predicate, Position::Graph],
    },
    IndexOrder {
        name: "gspo",
        positions: [Position::Graph, Position::Subject, Position::Predicate, Position::Object],
    },
];

/// Quad with every position in key form
struct EncodedQuad {
    subject: StoredTerm,
    predicate: StoredTerm,
    object: StoredTerm,
    graph_name: StoredTerm,
}

impl EncodedQuad {
    fn new(quad: &Quad) -> Self {
        Self {
            subject: StoredTerm::from_subject(&quad.subject),
            predicate: StoredTerm::NamedNode(quad.predicate.as_str().to_owned()),
            object: StoredTerm::from_term(&quad.object),
            graph_name: StoredTerm::from_graph_name(&quad.graph_name),
        }
    }

    fn get(&self, position: Position) -> &StoredTerm {
        match position {
            Position::Subject => &self.subject,
            Position::Predicate => &self.predicate,
            Position::Object => &self.object,
            Position::Graph => &self.graph_name,
        }
    }

    fn key(&self, order: &IndexOrder) -> StorageResult<Vec<u8>> {
        let mut key = Vec::new();
        for position in order.positions {
            bincode::serialize_into(&mut key, self.get(position))?;
        }
        Ok(key)
    }
}

/// Prefix of the bound positions of `pattern` that lead `order`
fn pattern_prefix(pattern: &QuadPattern, order: &IndexOrder) -> StorageResult<(usize, Vec<u8>)> {
    let mut key = Vec::new();
    let mut bound = 0;
    for position in order.positions {
        let term = match position {
            Position::Subject => pattern.subject.as_ref().map(StoredTerm::from_subject),
            Position::Predicate => pattern
                .predicate
                .as_ref()
                .map(|p| StoredTerm::NamedNode(p.as_str().to_owned())),
            Position::Object => pattern.object.as_ref().map(StoredTerm::from_term),
            Position::Graph => pattern.graph_name.as_ref().map(StoredTerm::from_graph_name),
        };
        match term {
            Some(term) => {
                bincode::serialize_into(&mut key, &term)?;
                bound += 1;
            }
            None => break,
        }
    }
    Ok((bound, key))
}

fn decode_key(key: &[u8], order: &IndexOrder) -> StorageResult<Quad> {
    let corrupt = || StorageError::CorruptKey(order.name.to_string());
    let mut reader = key;
    let mut subject = None;
    let mut predicate = None;
    let mut object = None;
    let mut graph_name = None;
    for position in order.positions {
        let term: StoredTerm = bincode::deserialize_from(&mut reader)?;
        match position {
            Position::Subject => subject = term.into_subject(),
            Position::Predicate => predicate = term.into_predicate(),
            Position::Object => object = term.into_term(),
            Position::Graph => graph_name = term.into_graph_name(),
        }
    }
    if !reader.is_empty() {
        return Err(corrupt());
    }
    Ok(Quad {
        subject: subject.ok_or_else(corrupt)?,
        predicate: predicate.ok_or_else(corrupt)?,
        object: object.ok_or_else(corrupt)?,
        graph_name: graph_name.ok_or_else(corrupt)?,
    })
}

/// RocksDB-based persistent quad store
pub struct RocksQuadStore {
    /// RocksDB instance
    db: DB,
    /// Storage path
    path: PathBuf,
}

impl RocksQuadStore {
    /// Open or create a store with default tuning
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_config(&StoreConfig::new(path))
    }

    /// Open or create a store
    pub fn open_with_config(config: &StoreConfig) -> StorageResult<Self> {
        info!("Opening quad store at: {:?}", config.path);

        let opts = Self::db_options(&config.rocksdb);

        let mut cf_descriptors = vec![ColumnFamilyDescriptor::new("default", Options::default())];
        cf_descriptors.extend(
            INDEXES
                .iter()
                .map(|index| ColumnFamilyDescriptor::new(index.name, Self::index_cf_options(&config.rocksdb))),
        );

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)?;

        info!("Quad store opened successfully");

        Ok(Self {
            db,
            path: config.path.clone(),
        })
    }

    fn db_options(config: &RocksConfig) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);
        opts.create_missing_column_families(true);

        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_min_write_buffer_number_to_merge(1);
        opts.set_compression_type(config.compression.into());

        opts.set_wal_recovery_mode(rocksdb::DBRecoveryMode::PointInTime);
        opts
    }

    /// Column family options for the quad indexes
    fn index_cf_options(config: &RocksConfig) -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(config.compression.into());
        opts
    }

    /// Database directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cf(&self, name: &str) -> StorageResult<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamily(name.to_string()))
    }

    fn contains_key(&self, spog_key: &[u8]) -> StorageResult<bool> {
        Ok(self.db.get_pinned_cf(self.cf(INDEXES[0].name)?, spog_key)?.is_some())
    }

    fn write_quad(&self, batch: &mut WriteBatch, encoded: &EncodedQuad, delete: bool) -> StorageResult<()> {
        for index in &INDEXES {
            let cf = self.cf(index.name)?;
            let key = encoded.key(index)?;
            if delete {
                batch.delete_cf(cf, key);
            } else {
                batch.put_cf(cf, key, b"");
            }
        }
        Ok(())
    }

    /// Index whose leading positions cover most of the bound pattern positions
    fn choose_index(pattern: &QuadPattern) -> StorageResult<(&'static IndexOrder, Vec<u8>)> {
        let mut best = (&INDEXES[0], Vec::new());
        let mut best_bound = 0;
        for index in &INDEXES {
            let (bound, prefix) = pattern_prefix(pattern, index)?;
            if bound > best_bound {
                best_bound = bound;
                best = (index, prefix);
            }
        }
        Ok(best)
    }

    fn scan(&self, pattern: QuadPattern) -> StorageResult<QuadIter<'_>> {
        let (index, prefix) = Self::choose_index(&pattern)?;
        let cf = self.cf(index.name)?;
        debug!("Scanning {} with a {} byte prefix", index.name, prefix.len());

        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward))
            .take_while(move |item| match item {
                Ok((key, _)) => key.starts_with(&prefix),
                Err(_) => true,
            })
            .map(move |item| {
                let (key, _) = item?;
                decode_key(&key, index)
            })
            .filter(move |quad| match quad {
                Ok(quad) => pattern.matches(quad),
                Err(_) => true,
            });
        Ok(Box::new(iter))
    }
}

impl QuadBackend for RocksQuadStore {
    fn insert(&mut self, quad: &Quad) -> StorageResult<bool> {
        let encoded = EncodedQuad::new(quad);
        if self.contains_key(&encoded.key(&INDEXES[0])?)? {
            return Ok(false);
        }

        let mut batch = WriteBatch::default();
        self.write_quad(&mut batch, &encoded, false)?;
        self.db.write(batch)?;

        debug!("Inserted quad {}", quad);
        Ok(true)
    }

    fn remove(&mut self, quad: &Quad) -> StorageResult<bool> {
        Ok(self.remove_all(std::slice::from_ref(quad))? == 1)
    }

    /// Removes all present quads in a single write batch
    fn remove_all(&mut self, quads: &[Quad]) -> StorageResult<usize> {
        let mut batch = WriteBatch::default();
        let mut removed = 0;
        for quad in quads {
            let encoded = EncodedQuad::new(quad);
            if self.contains_key(&encoded.key(&INDEXES[0])?)? {
                self.write_quad(&mut batch, &encoded, true)?;
                removed += 1;
            }
        }
        if removed > 0 {
            self.db.write(batch)?;
            debug!("Removed {} quads", removed);
        }
        Ok(removed)
    }

    fn quads_for_pattern(&self, pattern: QuadPattern) -> QuadIter<'_> {
        match self.scan(pattern) {
            Ok(iter) => iter,
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }

    fn len(&self) -> StorageResult<usize> {
        let mut count = 0;
        for item in self.db.iterator_cf(self.cf(INDEXES[0].name)?, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    fn flush(&self) -> StorageResult<()> {
        self.db.flush()?;
        debug!("Flushed quad store to disk");
        Ok(())
    }
}

impl Drop for RocksQuadStore {
    fn drop(&mut self) {
        info!("Closing quad store at: {:?}", self.path);
    }
}
