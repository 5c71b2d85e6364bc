//! RDF triple store implementation
//!
//! This module provides an in-memory RDF store with per-position indexing.
//!
//! Triples are kept in insertion order, so every traversal is deterministic for a
//! given store instance. Two stores holding the same triples inserted in a
//! different order may list them differently; callers that need an order which
//! is independent of insertion use [`crate::projection::distinct_sorted`].
//!
//! Iterators borrow the store immutably and `insert` needs `&mut self`, so a
//! graph can never be modified while a traversal or query is in flight.

use super::types::{NamedNode, RdfObject, RdfPredicate, RdfSubject, Triple, TriplePattern};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use std::ops::Range;
use tracing::debug;

#[derive(Debug, Clone)]
enum Candidates<'a> {
    All(Range<usize>),
    Posting(std::slice::Iter<'a, usize>),
}

/// Lazy iterator over the triples matching a [`TriplePattern`]
///
/// Cloning the iterator restarts nothing and shares nothing: each clone walks
/// the same snapshot independently, and a fresh call to
/// [`RdfStore::statements_matching`] always starts from the beginning.
#[derive(Debug, Clone)]
pub struct TripleIterator<'a> {
    triples: &'a IndexSet<Triple>,
    candidates: Candidates<'a>,
    pattern: TriplePattern,
}

impl<'a> TripleIterator<'a> {
    fn new(triples: &'a IndexSet<Triple>, candidates: Candidates<'a>, pattern: TriplePattern) -> Self {
        Self {
            triples,
            candidates,
            pattern,
        }
    }
}

impl<'a> Iterator for TripleIterator<'a> {
    type Item = &'a Triple;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let position = match &mut self.candidates {
                Candidates::All(range) => range.next()?,
                Candidates::Posting(iter) => *iter.next()?,
            };
            if let Some(triple) = self.triples.get_index(position) {
                if self.pattern.matches(triple) {
                    return Some(triple);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.candidates {
            Candidates::All(range) => (0, Some(range.len())),
            Candidates::Posting(iter) => (0, Some(iter.len())),
        }
    }
}

/// In-memory RDF graph
///
/// Implements three position indices, each mapping a term to the positions of
/// the triples that carry it:
/// - subject index
/// - predicate index
/// - object index
///
/// A lookup scans the shortest posting list among the bound positions and
/// checks the remaining positions on each candidate.
#[derive(Debug, Clone, Default)]
pub struct RdfStore {
    /// All triples (primary storage, insertion ordered, deduplicated)
    triples: IndexSet<Triple>,

    /// Subject -> positions in `triples`
    subject_index: FxHashMap<RdfSubject, Vec<usize>>,

    /// Predicate -> positions in `triples`
    predicate_index: FxHashMap<RdfPredicate, Vec<usize>>,

    /// Object -> positions in `triples`
    object_index: FxHashMap<RdfObject, Vec<usize>>,
}

impl RdfStore {
    /// Create a new empty RDF store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-parsed triples; duplicates collapse
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut store = Self::new();
        let added = store.extend(triples);
        debug!("Imported {} distinct triples", added);
        store
    }

    /// Insert a triple into the store
    ///
    /// Returns `true` if the triple was not present before. Inserting a triple
    /// twice is a no-op.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }

        let position = self.triples.len();
        self.subject_index
            .entry(triple.subject.clone())
            .or_default()
            .push(position);
        self.predicate_index
            .entry(triple.predicate.clone())
            .or_default()
            .push(position);
        self.object_index
            .entry(triple.object.clone())
            .or_default()
            .push(position);
        self.triples.insert(triple);
        true
    }

    /// Insert many triples, returning how many were new
    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        let mut added = 0;
        for triple in triples {
            if self.insert(triple) {
                added += 1;
            }
        }
        added
    }

    /// Check if a triple exists in the store
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Get the total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Get an iterator over all triples, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Query triples matching a pattern
    pub fn query(&self, pattern: &TriplePattern) -> TripleIterator<'_> {
        let postings = [
            pattern
                .subject
                .as_ref()
                .map(|s| self.subject_index.get(s).map(Vec::as_slice).unwrap_or(&[])),
            pattern
                .predicate
                .as_ref()
                .map(|p| self.predicate_index.get(p).map(Vec::as_slice).unwrap_or(&[])),
            pattern
                .object
                .as_ref()
                .map(|o| self.object_index.get(o).map(Vec::as_slice).unwrap_or(&[])),
        ];

        let candidates = postings
            .into_iter()
            .flatten()
            .min_by_key(|positions| positions.len())
            .map(|positions| Candidates::Posting(positions.iter()))
            .unwrap_or(Candidates::All(0..self.triples.len()));

        TripleIterator::new(&self.triples, candidates, pattern.clone())
    }

    /// Triples matching the given components; `None` acts as a wildcard
    pub fn statements_matching(
        &self,
        subject: Option<&RdfSubject>,
        predicate: Option<&RdfPredicate>,
        object: Option<&RdfObject>,
    ) -> TripleIterator<'_> {
        self.query(&TriplePattern::new(
            subject.cloned(),
            predicate.cloned(),
            object.cloned(),
        ))
    }

    /// Get triples with a specific subject
    pub fn get_triples_with_subject(&self, subject: &RdfSubject) -> Vec<Triple> {
        self.statements_matching(Some(subject), None, None)
            .cloned()
            .collect()
    }

    /// Every distinct subject, in order of first occurrence
    pub fn subjects(&self) -> Vec<RdfSubject> {
        self.triples
            .iter()
            .map(|t| &t.subject)
            .collect::<IndexSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// The predicate of every triple, one entry per triple (not deduplicated)
    pub fn all_predicates(&self) -> Vec<RdfPredicate> {
        self.triples.iter().map(|t| t.predicate.clone()).collect()
    }

    /// Every distinct predicate, in order of first occurrence
    pub fn distinct_predicates(&self) -> Vec<RdfPredicate> {
        self.triples
            .iter()
            .map(|t| &t.predicate)
            .collect::<IndexSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// The object of every triple, one entry per triple (not deduplicated)
    pub fn all_objects(&self) -> Vec<RdfObject> {
        self.triples.iter().map(|t| t.object.clone()).collect()
    }

    /// Every distinct object, in order of first occurrence
    pub fn distinct_objects(&self) -> Vec<RdfObject> {
        self.triples
            .iter()
            .map(|t| &t.object)
            .collect::<IndexSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Objects that are IRIs, one entry per triple
    pub fn iri_objects(&self) -> Vec<NamedNode> {
        self.triples
            .iter()
            .filter_map(|t| t.object.as_named_node().cloned())
            .collect()
    }

    /// Objects of every triple with the given predicate
    pub fn objects_of_predicate(&self, predicate: &RdfPredicate) -> Vec<RdfObject> {
        self.statements_matching(None, Some(predicate), None)
            .map(|t| t.object.clone())
            .collect()
    }

    /// Two-hop walk: every `z` with `(x first y)` and `(y second z)`
    ///
    /// One entry per path, in the order the first hop is found. Intermediate
    /// nodes that are literals end the walk, since a literal cannot be a subject.
    pub fn walk(&self, first: &RdfPredicate, second: &RdfPredicate) -> Vec<RdfObject> {
        self.statements_matching(None, Some(first), None)
            .filter_map(|hop| RdfSubject::try_from(hop.object.clone()).ok())
            .flat_map(|middle| {
                self.statements_matching(Some(&middle), Some(second), None)
                    .map(|t| t.object.clone())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl FromIterator<Triple> for RdfStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self::from_triples(iter)
    }
}

impl<'a> IntoIterator for &'a RdfStore {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::types::{BlankNode, Literal, NamedNode};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    fn pred(s: &str) -> RdfPredicate {
        RdfPredicate::new(s).unwrap()
    }

    fn create_test_triple() -> Triple {
        let subject = iri("http://example.org/alice");
        let predicate = pred("http://xmlns.com/foaf/0.1/name");
        let object = Literal::new_simple_literal("Alice");

        Triple::new(subject.into(), predicate, object.into())
    }

    #[test]
    fn test_insert_and_query() {
        let mut store = RdfStore::new();
        let triple = create_test_triple();

        assert!(store.insert(triple.clone()));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&triple));
        assert_eq!(store.iter().next(), Some(&triple));
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut store = RdfStore::new();
        let triple = create_test_triple();

        assert!(store.insert(triple.clone()));
        assert!(!store.insert(triple));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all_predicates().len(), 1);
    }

    #[test]
    fn test_query_by_subject() {
        let mut store = RdfStore::new();
        let subject = iri("http://example.org/alice");

        // Insert multiple triples with same subject
        let triple1 = Triple::new(
            subject.clone().into(),
            pred("http://xmlns.com/foaf/0.1/name"),
            Literal::new_simple_literal("Alice").into(),
        );
        let triple2 = Triple::new(
            subject.clone().into(),
            pred("http://xmlns.com/foaf/0.1/age"),
            Literal::new_integer_literal(30).into(),
        );

        store.insert(triple1);
        store.insert(triple2);

        let results = store.get_triples_with_subject(&subject.into());
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_triple_pattern_query() {
        let mut store = RdfStore::new();
        let triple = create_test_triple();
        store.insert(triple.clone());

        // Query with pattern (all wildcards)
        let pattern = TriplePattern::new(None, None, None);
        assert_eq!(store.query(&pattern).count(), 1);

        // Query with specific subject
        let pattern = TriplePattern::new(Some(triple.subject.clone()), None, None);
        assert_eq!(store.query(&pattern).count(), 1);

        // Query with wrong subject
        let pattern = TriplePattern::new(Some(iri("http://example.org/bob").into()), None, None);
        assert_eq!(store.query(&pattern).count(), 0);
    }

    #[test]
    fn test_statements_matching_combines_positions() {
        let knows = pred("http://xmlns.com/foaf/0.1/knows");
        let alice: RdfSubject = iri("http://example.org/alice").into();
        let bob: RdfObject = iri("http://example.org/bob").into();
        let carol: RdfObject = iri("http://example.org/carol").into();

        let store = RdfStore::from_triples(vec![
            Triple::new(alice.clone(), knows.clone(), bob.clone()),
            Triple::new(alice.clone(), knows.clone(), carol.clone()),
            Triple::new(iri("http://example.org/dave").into(), knows.clone(), bob.clone()),
        ]);

        assert_eq!(store.statements_matching(Some(&alice), Some(&knows), None).count(), 2);
        assert_eq!(store.statements_matching(None, None, Some(&bob)).count(), 2);
        assert_eq!(store.statements_matching(Some(&alice), None, Some(&bob)).count(), 1);

        let unknown = pred("http://example.org/unknown");
        assert_eq!(store.statements_matching(None, Some(&unknown), None).count(), 0);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let store = RdfStore::from_triples(vec![create_test_triple()]);
        let iter = store.statements_matching(None, None, None);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_subjects_predicates_objects() {
        let alice = iri("http://example.org/alice");
        let bob = iri("http://example.org/bob");
        let name_pred = pred("http://xmlns.com/foaf/0.1/name");

        let store = RdfStore::from_triples(vec![
            Triple::new(
                alice.into(),
                name_pred.clone(),
                Literal::new_simple_literal("Alice").into(),
            ),
            Triple::new(
                bob.into(),
                name_pred,
                Literal::new_simple_literal("Bob").into(),
            ),
        ]);

        assert_eq!(store.subjects().len(), 2);
        assert_eq!(store.all_predicates().len(), 2);
        assert_eq!(store.distinct_predicates().len(), 1);
        assert_eq!(store.all_objects().len(), 2);
        assert!(store.iri_objects().is_empty());
    }

    #[test]
    fn test_objects_of_predicate_and_walk() {
        let has_pet = pred("https://fakeschema.org/hasPet");
        let rdf_type = pred("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
        let owner: RdfSubject = iri("https://example.org/owner").into();
        let rex = BlankNode::from_str("rex").unwrap();

        let store = RdfStore::from_triples(vec![
            Triple::new(owner.clone(), has_pet.clone(), rex.clone().into()),
            Triple::new(rex.into(), rdf_type.clone(), iri("https://fakeschema.org/Dog").into()),
            Triple::new(owner, has_pet.clone(), Literal::new_simple_literal("goldfish").into()),
        ]);

        assert_eq!(store.objects_of_predicate(&has_pet).len(), 2);
        assert!(store.objects_of_predicate(&pred("http://example.org/none")).is_empty());

        let types = store.walk(&has_pet, &rdf_type);
        assert_eq!(types, vec![RdfObject::from(iri("https://fakeschema.org/Dog"))]);
    }

    #[test]
    fn test_empty_store() {
        let store = RdfStore::new();
        assert!(store.is_empty());
        assert!(store.subjects().is_empty());
        assert!(store.all_predicates().is_empty());
        assert_eq!(store.statements_matching(None, None, None).count(), 0);
    }
}
