//! One-call fact extraction
//!
//! Each function answers one question about a store, either by walking the
//! graph directly or by running a query and shaping its solutions.

use crate::projection::{self, ProjectionError};
use crate::rdf::{
    JsonLdSerializerWrapper, NamedNode, ParseError, RdfError, RdfObject, RdfPredicate, RdfStore,
    RdfSubject, RdfsReasoner, ReasoningError, SerializeError,
};
use crate::sparql::{SparqlEngine, SparqlError, SparqlResults};
use indexmap::{IndexMap, IndexSet};
use oxrdf::vocab::rdf;
use thiserror::Error;
use tracing::debug;

/// Errors from any stage of fact extraction
#[derive(Error, Debug)]
pub enum FactError {
    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    Sparql(#[from] SparqlError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    /// The query returned a different kind of result than the caller needs
    #[error("Expected a {expected} query, got {found}")]
    WrongQueryForm {
        expected: &'static str,
        found: &'static str,
    },
}

pub type FactResult<T> = Result<T, FactError>;

/// IRIs that occur as subjects, each once, in first-occurrence order
pub fn extract_subjects(store: &RdfStore) -> Vec<NamedNode> {
    store
        .subjects()
        .into_iter()
        .filter_map(|s| match s {
            RdfSubject::NamedNode(n) => Some(n),
            RdfSubject::BlankNode(_) => None,
        })
        .collect()
}

/// The predicate of every triple, not deduplicated
pub fn extract_properties(store: &RdfStore) -> Vec<NamedNode> {
    store
        .all_predicates()
        .into_iter()
        .map(NamedNode::from)
        .collect()
}

/// Every distinct object
pub fn extract_objects(store: &RdfStore) -> Vec<RdfObject> {
    store.distinct_objects()
}

/// Every distinct object that is an IRI
pub fn extract_iri_objects(store: &RdfStore) -> Vec<NamedNode> {
    store
        .distinct_objects()
        .into_iter()
        .filter_map(|o| o.as_named_node().cloned())
        .collect()
}

/// Classes named by `rdf:type` statements, each once, in first-occurrence order
pub fn extract_types(store: &RdfStore) -> Vec<NamedNode> {
    store
        .objects_of_predicate(&RdfPredicate::from(rdf::TYPE))
        .into_iter()
        .filter_map(|o| o.as_named_node().cloned())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Types of the resources reached through `via`, without `exclude`, deduplicated and sorted
///
/// For `via = hasPet` this answers "what kinds of pets are there".
pub fn extract_related_types(
    store: &RdfStore,
    via: &RdfPredicate,
    exclude: &[NamedNode],
) -> Vec<NamedNode> {
    let types = store
        .walk(via, &RdfPredicate::from(rdf::TYPE))
        .into_iter()
        .filter_map(|o| o.as_named_node().cloned())
        .filter(|t| !exclude.contains(t));
    projection::distinct_sorted(types)
}

fn solutions_of(results: SparqlResults) -> FactResult<Vec<crate::sparql::QuerySolution>> {
    match results {
        SparqlResults::Bindings { solutions, .. } => Ok(solutions),
        other => Err(wrong_form("SELECT", &other)),
    }
}

fn wrong_form(expected: &'static str, found: &SparqlResults) -> FactError {
    let found = match found {
        SparqlResults::Bindings { .. } => "SELECT",
        SparqlResults::Boolean(_) => "ASK",
        SparqlResults::Graph(_) => "DESCRIBE",
    };
    FactError::WrongQueryForm { expected, found }
}

/// IRIs bound to `variable` by a SELECT query, in solution order
pub fn select_iris(store: &RdfStore, query: &str, variable: &str) -> FactResult<Vec<NamedNode>> {
    let solutions = solutions_of(SparqlEngine::new().query(store, query)?)?;
    Ok(projection::iri_column(&solutions, variable)?)
}

/// [`select_iris`] over the store expanded by `reasoner`
///
/// The store itself is left untouched.
pub fn select_iris_inferred(
    store: &RdfStore,
    reasoner: &RdfsReasoner,
    query: &str,
    variable: &str,
) -> FactResult<Vec<NamedNode>> {
    let expanded = reasoner.expand(store)?;
    debug!(
        "Querying {} triples ({} inferred)",
        expanded.len(),
        expanded.len() - store.len()
    );
    select_iris(&expanded, query, variable)
}

/// Map of string `key_var` to integer `value_var` from a SELECT query
///
/// When a key repeats, the later solution wins.
pub fn integer_report(
    store: &RdfStore,
    query: &str,
    key_var: &str,
    value_var: &str,
) -> FactResult<IndexMap<String, i64>> {
    let solutions = solutions_of(SparqlEngine::new().query(store, query)?)?;
    Ok(projection::keyed_integers(&solutions, key_var, value_var)?)
}

/// Answer of an ASK query
pub fn ask(store: &RdfStore, query: &str) -> FactResult<bool> {
    match SparqlEngine::new().query(store, query)? {
        SparqlResults::Boolean(answer) => Ok(answer),
        other => Err(wrong_form("ASK", &other)),
    }
}

/// Triples returned by a DESCRIBE query, as a new store
pub fn describe(store: &RdfStore, query: &str) -> FactResult<RdfStore> {
    match SparqlEngine::new().query(store, query)? {
        SparqlResults::Graph(triples) => Ok(RdfStore::from_triples(triples)),
        other => Err(wrong_form("DESCRIBE", &other)),
    }
}

/// Result of a DESCRIBE query as flat JSON-LD, ready for framing
pub fn describe_as_json_ld(store: &RdfStore, query: &str) -> FactResult<String> {
    let described = describe(store, query)?;
    let triples: Vec<_> = described.iter().cloned().collect();
    Ok(JsonLdSerializerWrapper::serialize(&triples)?)
}
