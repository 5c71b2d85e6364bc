//! In-memory RDF fact store
//!
//! This module implements the triple layer of factgraph:
//! - RDF terms and triples (subject-predicate-object)
//! - An indexed, duplicate-free triple store
//! - RDFS forward-chaining inference
//! - Namespace prefixes
//! - Serialization formats (Turtle, N-Triples, JSON-LD)
//!
//! # Example
//!
//! ```rust
//! use factgraph::rdf::{RdfStore, Triple, NamedNode, Literal, RdfPredicate};
//!
//! let mut store = RdfStore::new();
//!
//! // Create a triple
//! let subject = NamedNode::new("http://example.org/alice").unwrap();
//! let predicate = RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let object = Literal::new_simple_literal("Alice");
//!
//! let triple = Triple::new(subject.clone().into(), predicate, object.into());
//! assert!(store.insert(triple.clone()));
//! assert!(!store.insert(triple));
//!
//! // Query triples
//! let results = store.get_triples_with_subject(&subject.into());
//! assert_eq!(results.len(), 1);
//! ```

mod namespace;
mod schema;
mod serialization;
mod store;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfObject, RdfPredicate, RdfResult, RdfSubject,
    RdfTerm, Triple, TriplePattern,
};

pub use store::{RdfStore, TripleIterator};

pub use namespace::NamespaceManager;

pub use serialization::{
    JsonLdSerializerWrapper, ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer,
    SerializeError, SerializeResult,
};

pub use schema::{
    InferenceRule, RdfsReasoner, ReasoningError, ReasoningResult, ReasoningSummary,
    DEFAULT_MAX_ITERATIONS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_module_exports() {
        // Verify all main types are exported
        let _store: RdfStore = RdfStore::new();
        let _reasoner = RdfsReasoner::new();
        let _ns_mgr = NamespaceManager::new();
        let _pattern = TriplePattern::default();
    }
}
