//! SPARQL query support
//!
//! This module implements the pattern-matching query subset used to pull
//! facts out of an [`RdfStore`]:
//!
//! - SELECT, ASK and DESCRIBE query forms
//! - Basic graph patterns joined in written order
//! - FILTER expressions over the joined solutions
//! - DISTINCT, ORDER BY, LIMIT and OFFSET
//!
//! # Example
//!
//! ```rust
//! use factgraph::sparql::{SparqlEngine, SparqlResults};
//! use factgraph::rdf::{RdfStore, Triple, NamedNode, Literal, RdfPredicate};
//!
//! let mut store = RdfStore::new();
//! store.insert(Triple::new(
//!     NamedNode::new("http://example.org/alice").unwrap().into(),
//!     RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap(),
//!     Literal::new_simple_literal("Alice").into(),
//! ));
//!
//! let engine = SparqlEngine::new();
//! let query = r#"
//!     SELECT ?name WHERE {
//!         ?person foaf:name ?name .
//!     }
//! "#;
//!
//! let results = engine.query(&store, query).unwrap();
//! assert_eq!(results.solutions().map(|s| s.len()), Some(1));
//! ```

mod executor;
mod expression;
mod parser;
mod results;

pub use executor::{QueryExecution, SparqlExecutor};
pub use expression::{Builtin, Comparison, FilterExpression};
pub use parser::{
    DescribeTarget, OrderCondition, PatternTerm, PatternTriple, PreparedQuery, QueryForm,
    QueryPattern, SolutionModifiers, SparqlParser,
};
pub use results::{QuerySolution, SparqlResults};

use crate::rdf::{NamespaceManager, RdfError, RdfStore};
use oxiri::Iri;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// SPARQL errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparqlError {
    /// Syntax error
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// A projected variable is never bound by the pattern
    #[error("Projected variable ?{0} is not bound by the query pattern")]
    UnboundVariableProjection(String),

    /// Valid SPARQL outside the supported subset
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// RDF term error
    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),
}

pub type SparqlResult<T> = Result<T, SparqlError>;

/// Query configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Base IRI for resolving relative IRIs in queries
    pub base_iri: Option<String>,
    /// Whether the common prefixes (rdf, rdfs, xsd, ...) are predeclared
    pub default_prefixes: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            base_iri: None,
            default_prefixes: true,
        }
    }
}

impl QueryConfig {
    /// Set the base IRI, which must be absolute
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> SparqlResult<Self> {
        let base_iri = Iri::parse(base_iri.into())
            .map_err(|e| RdfError::InvalidIri(e.to_string()))?
            .into_inner();
        self.base_iri = Some(base_iri);
        Ok(self)
    }

    /// Require every prefix to be declared in the query
    pub fn without_default_prefixes(mut self) -> Self {
        self.default_prefixes = false;
        self
    }
}

/// SPARQL query engine
///
/// Holds no store: the same engine can query any number of stores, and
/// queries only ever borrow the store immutably.
#[derive(Debug, Clone, Default)]
pub struct SparqlEngine {
    config: QueryConfig,
    namespaces: NamespaceManager,
}

impl SparqlEngine {
    /// Create a new SPARQL engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            config,
            namespaces: NamespaceManager::new(),
        }
    }

    /// Replace the prefixes predeclared for every query
    pub fn with_namespaces(mut self, namespaces: NamespaceManager) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Parse and validate a query without running it
    pub fn prepare(&self, query: &str) -> SparqlResult<PreparedQuery> {
        let base_iri = self.config.base_iri.as_deref();
        if self.config.default_prefixes {
            let source = format!("{}{}", self.namespaces.sparql_prologue(), query);
            SparqlParser::parse_with_base(&source, base_iri)
        } else {
            SparqlParser::parse_with_base(query, base_iri)
        }
    }

    /// Run a prepared query against a store
    pub fn execute(&self, store: &RdfStore, query: &PreparedQuery) -> SparqlResult<SparqlResults> {
        SparqlExecutor::new(store).execute(query)
    }

    /// Execute a SPARQL query
    pub fn query(&self, store: &RdfStore, query: &str) -> SparqlResult<SparqlResults> {
        let prepared = self.prepare(query)?;
        let results = self.execute(store, &prepared)?;
        info!(
            "{} query over {} triples returned {}",
            prepared.form.name(),
            store.len(),
            describe_size(&results)
        );
        Ok(results)
    }
}

fn describe_size(results: &SparqlResults) -> String {
    match results {
        SparqlResults::Bindings { solutions, .. } => format!("{} solutions", solutions.len()),
        SparqlResults::Boolean(b) => b.to_string(),
        SparqlResults::Graph(triples) => format!("{} triples", triples.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode, RdfPredicate, Triple};

    fn store() -> RdfStore {
        let mut store = RdfStore::new();
        store.insert(Triple::new(
            NamedNode::new("http://example.org/alice").unwrap().into(),
            RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap(),
            Literal::new_simple_literal("Alice").into(),
        ));
        store
    }

    #[test]
    fn test_engine_creation() {
        let engine = SparqlEngine::new();
        assert!(engine.config().default_prefixes);
        assert_eq!(engine.config().base_iri, None);
    }

    #[test]
    fn test_query_with_default_prefixes() {
        let engine = SparqlEngine::new();
        let results = engine
            .query(&store(), "SELECT ?n WHERE { ?p foaf:name ?n }")
            .unwrap();
        assert_eq!(results.solutions().unwrap().len(), 1);
    }

    #[test]
    fn test_default_prefixes_can_be_disabled() {
        let engine = SparqlEngine::with_config(QueryConfig::default().without_default_prefixes());
        let err = engine
            .query(&store(), "SELECT ?n WHERE { ?p foaf:name ?n }")
            .unwrap_err();
        assert!(matches!(err, SparqlError::Syntax(_)));
    }

    #[test]
    fn test_declared_prefix_overrides_default() {
        let engine = SparqlEngine::new();
        let results = engine
            .query(
                &store(),
                "PREFIX foaf: <http://example.org/other/> ASK { ?p foaf:name ?n }",
            )
            .unwrap();
        assert_eq!(results.boolean(), Some(false));
    }

    #[test]
    fn test_custom_namespaces() {
        let mut namespaces = NamespaceManager::empty();
        namespaces.add_prefix("ex", "http://example.org/");
        let engine = SparqlEngine::new().with_namespaces(namespaces);

        let results = engine.query(&store(), "ASK { ex:alice ?p ?o }").unwrap();
        assert_eq!(results.boolean(), Some(true));
        // the common prefixes are gone
        assert!(matches!(
            engine.query(&store(), "ASK { ?p foaf:name ?n }"),
            Err(SparqlError::Syntax(_))
        ));
    }

    #[test]
    fn test_base_iri() {
        let config = QueryConfig::default()
            .with_base_iri("http://example.org/")
            .unwrap();
        let engine = SparqlEngine::with_config(config);
        let results = engine.query(&store(), "ASK { <alice> ?p ?o }").unwrap();
        assert_eq!(results.boolean(), Some(true));

        assert!(matches!(
            QueryConfig::default().with_base_iri("not absolute"),
            Err(SparqlError::Rdf(RdfError::InvalidIri(_)))
        ));
    }

    #[test]
    fn test_prepare_once_run_many() {
        let engine = SparqlEngine::new();
        let prepared = engine.prepare("ASK { ?s foaf:name \"Alice\" }").unwrap();
        assert_eq!(
            engine.execute(&store(), &prepared).unwrap(),
            SparqlResults::Boolean(true)
        );
        assert_eq!(
            engine.execute(&RdfStore::new(), &prepared).unwrap(),
            SparqlResults::Boolean(false)
        );
    }

    #[test]
    fn test_config_serde() {
        let config: QueryConfig =
            serde_json::from_str(r#"{ "base_iri": "http://example.org/" }"#).unwrap();
        assert!(config.default_prefixes);
        assert_eq!(config.base_iri.as_deref(), Some("http://example.org/"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("default_prefixes"));
    }
}
