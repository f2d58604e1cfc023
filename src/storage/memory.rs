//! In-memory quad store
//!
//! Quads live in a slab; every position has an index from term to the set of
//! slab slots holding it, so a scan walks the smallest candidate set among the
//! bound positions and filters the rest.

use super::{QuadBackend, QuadIter, QuadPattern, StorageResult};
use oxrdf::{GraphName, NamedNode, Quad, Subject, Term};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::hash::Hash;

type Slots = BTreeSet<usize>;

/// Indexed in-memory quad store
///
/// Implements:
/// - S index (Subject -> slots)
/// - P index (Predicate -> slots)
/// - O index (Object -> slots)
/// - G index (Graph name -> slots)
#[derive(Debug, Clone, Default)]
pub struct MemoryQuadStore {
    /// Quad slab (primary storage), `None` for freed slots
    quads: Vec<Option<Quad>>,
    /// Freed slots ready for reuse
    free: Vec<usize>,
    /// Quad -> slot
    slots: FxHashMap<Quad, usize>,

    subject_index: FxHashMap<Subject, Slots>,
    predicate_index: FxHashMap<NamedNode, Slots>,
    object_index: FxHashMap<Term, Slots>,
    graph_index: FxHashMap<GraphName, Slots>,
}

impl MemoryQuadStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate slots for a pattern: the smallest index set among the bound
    /// positions. `Some(None)` means no position is bound; `None` means a bound
    /// term is absent from the store.
    fn candidates(&self, pattern: &QuadPattern) -> Option<Option<&Slots>> {
        let mut best: Option<&Slots> = None;
        let lookups = [
            pattern.subject.as_ref().map(|s| self.subject_index.get(s)),
            pattern.predicate.as_ref().map(|p| self.predicate_index.get(p)),
            pattern.object.as_ref().map(|o| self.object_index.get(o)),
            pattern.graph_name.as_ref().map(|g| self.graph_index.get(g)),
        ];
        for lookup in lookups.into_iter().flatten() {
            let slots = lookup?;
            if best.map_or(true, |b| slots.len() < b.len()) {
                best = Some(slots);
            }
        }
        Some(best)
    }
}

fn index_insert<K: Eq + Hash>(index: &mut FxHashMap<K, Slots>, key: K, slot: usize) {
    index.entry(key).or_default().insert(slot);
}

fn index_remove<K: Eq + Hash>(index: &mut FxHashMap<K, Slots>, key: &K, slot: usize) {
    if let Some(slots) = index.get_mut(key) {
        slots.remove(&slot);
        if slots.is_empty() {
            index.remove(key);
        }
    }
}

impl QuadBackend for MemoryQuadStore {
    fn insert(&mut self, quad: &Quad) -> StorageResult<bool> {
        if self.slots.contains_key(quad) {
            return Ok(false);
        }

        let slot = match self.free.pop() {
            Some(slot) => {
                self.quads[slot] = Some(quad.clone());
                slot
            }
            None => {
                self.quads.push(Some(quad.clone()));
                self.quads.len() - 1
            }
        };
        self.slots.insert(quad.clone(), slot);

        index_insert(&mut self.subject_index, quad.subject.clone(), slot);
        index_insert(&mut self.predicate_index, quad.predicate.clone(), slot);
        index_insert(&mut self.object_index, quad.object.clone(), slot);
        index_insert(&mut self.graph_index, quad.graph_name.clone(), slot);

        Ok(true)
    }

    fn remove(&mut self, quad: &Quad) -> StorageResult<bool> {
        let Some(slot) = self.slots.remove(quad) else {
            return Ok(false);
        };

        self.quads[slot] = None;
        self.free.push(slot);

        index_remove(&mut self.subject_index, &quad.subject, slot);
        index_remove(&mut self.predicate_index, &quad.predicate, slot);
        index_remove(&mut self.object_index, &quad.object, slot);
        index_remove(&mut self.graph_index, &quad.graph_name, slot);

        Ok(true)
    }

    fn quads_for_pattern(&self, pattern: QuadPattern) -> QuadIter<'_> {
        match self.candidates(&pattern) {
            None => Box::new(std::iter::empty()),
            Some(None) => Box::new(self.quads.iter().flatten().cloned().map(Ok)),
            Some(Some(slots)) => Box::new(
                slots
                    .iter()
                    .filter_map(move |slot| self.quads[*slot].as_ref())
                    .filter(move |quad| pattern.matches(quad))
                    .cloned()
                    .map(Ok),
            ),
        }
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.slots.len())
    }
}
