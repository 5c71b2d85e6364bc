//! factgraph
//!
//! An in-memory RDF fact store with a SPARQL query subset and RDFS
//! forward-chaining inference, for pulling structured facts out of a graph
//! of subject-predicate-object statements.
//!
//! # Layout
//!
//! - [`rdf`]: terms, triples, the indexed [`RdfStore`](rdf::RdfStore), the
//!   [`RdfsReasoner`](rdf::RdfsReasoner), prefixes and text formats
//! - [`sparql`]: SELECT/ASK/DESCRIBE parsing and evaluation
//! - [`projection`]: shaping solutions into lists, maps and scalars
//! - [`facts`]: one-call extractors built on the above
//!
//! A store is only mutated through `&mut RdfStore` (insertion and inference).
//! Traversal and queries borrow it immutably, so any number of readers can
//! share one store across threads.
//!
//! ## Example Usage
//!
//! ```rust
//! use factgraph::rdf::{RdfFormat, RdfParser, RdfsReasoner};
//! use factgraph::sparql::SparqlEngine;
//!
//! let data = r#"
//!     @prefix fs: <https://fakeschema.org/> .
//!     @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
//!     fs:Cat rdfs:subClassOf fs:Mammal .
//!     fs:tom a fs:Cat .
//! "#;
//!
//! let mut store = RdfParser::parse_store(data, RdfFormat::Turtle).unwrap();
//! let engine = SparqlEngine::new();
//! let query = "ASK { <https://fakeschema.org/tom> a <https://fakeschema.org/Mammal> }";
//!
//! assert_eq!(engine.query(&store, query).unwrap().boolean(), Some(false));
//!
//! RdfsReasoner::new().reason(&mut store).unwrap();
//! assert_eq!(engine.query(&store, query).unwrap().boolean(), Some(true));
//! ```

pub mod facts;
pub mod projection;
pub mod rdf;
pub mod sparql;

pub use facts::{FactError, FactResult};
pub use projection::{ProjectionError, ProjectionResult};
pub use rdf::{RdfStore, RdfsReasoner, Triple};
pub use sparql::{SparqlEngine, SparqlError, SparqlResults};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RdfStore>();
        assert_send_sync::<SparqlEngine>();
    }
}
