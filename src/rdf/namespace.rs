//! RDF namespace and prefix management
//!
//! This module keeps the prefixes that are predeclared as `PREFIX` lines in
//! every query a [`crate::sparql::SparqlEngine`] prepares.

use indexmap::IndexMap;

/// Namespace manager with common prefixes
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    /// Prefix → IRI mappings, in registration order
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create a new namespace manager with common prefixes
    pub fn new() -> Self {
        let mut mgr = Self::empty();

        // Add common RDF/RDFS/OWL prefixes
        mgr.add_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        mgr.add_prefix("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
        mgr.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        mgr.add_prefix("owl", "http://www.w3.org/2002/07/owl#");
        mgr.add_prefix("foaf", "http://xmlns.com/foaf/0.1/");
        mgr.add_prefix("dc", "http://purl.org/dc/elements/1.1/");
        mgr.add_prefix("dcterms", "http://purl.org/dc/terms/");
        mgr.add_prefix("schema", "https://schema.org/");

        mgr
    }

    /// Create a namespace manager without any prefixes
    pub fn empty() -> Self {
        Self {
            prefixes: IndexMap::new(),
        }
    }

    /// Add a prefix, replacing an earlier mapping with the same name
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// `PREFIX` declarations for every registered namespace, one per line
    pub fn sparql_prologue(&self) -> String {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| format!("PREFIX {}: <{}>\n", prefix, iri))
            .collect()
    }

    /// Number of registered prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether no prefix is registered
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefixes() {
        let mgr = NamespaceManager::new();

        let prologue = mgr.sparql_prologue();

        assert_eq!(mgr.len(), 8);
        assert!(prologue
            .starts_with("PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n"));
        assert!(prologue.contains("PREFIX schema: <https://schema.org/>\n"));
        assert_eq!(prologue.lines().count(), 8);
    }

    #[test]
    fn test_add_prefix_replaces_in_place() {
        let mut mgr = NamespaceManager::empty();
        mgr.add_prefix("ex", "http://example.org/");
        mgr.add_prefix("pets", "http://example.org/pets/");
        mgr.add_prefix("ex", "http://example.com/");

        assert_eq!(mgr.len(), 2);
        assert_eq!(
            mgr.sparql_prologue(),
            "PREFIX ex: <http://example.com/>\nPREFIX pets: <http://example.org/pets/>\n"
        );
    }

    #[test]
    fn test_sparql_prologue() {
        let mut mgr = NamespaceManager::empty();
        assert!(mgr.is_empty());
        assert!(mgr.sparql_prologue().is_empty());

        mgr.add_prefix("ex", "http://example.org/");
        assert_eq!(mgr.sparql_prologue(), "PREFIX ex: <http://example.org/>\n");
        assert_eq!(mgr.len(), 1);
    }
}
