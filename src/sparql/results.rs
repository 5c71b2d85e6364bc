//! SPARQL query results

use crate::rdf::{JsonLdSerializerWrapper, RdfTerm, Triple};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Query solution (variable bindings)
///
/// Bindings keep the order in which the join bound them. A variable appears
/// at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySolution {
    bindings: IndexMap<String, RdfTerm>,
}

impl QuerySolution {
    /// Create a new query solution
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding
    pub fn get(&self, variable: &str) -> Option<&RdfTerm> {
        self.bindings.get(variable)
    }

    /// Add a binding, replacing an earlier value for the same variable
    pub fn bind(&mut self, variable: impl Into<String>, term: RdfTerm) {
        self.bindings.insert(variable.into(), term);
    }

    /// Whether the variable is bound
    pub fn contains(&self, variable: &str) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Bound variable names, in binding order
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Iterate over `(variable, term)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RdfTerm)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Keep only the given variables, in the given order
    pub fn project(&self, variables: &[String]) -> QuerySolution {
        variables
            .iter()
            .filter_map(|v| self.get(v).map(|term| (v.clone(), term.clone())))
            .collect()
    }

    /// Values of the given variables, `None` where unbound
    pub(crate) fn key(&self, variables: &[String]) -> Vec<Option<RdfTerm>> {
        variables.iter().map(|v| self.get(v).cloned()).collect()
    }

    pub(crate) fn remove_hidden(&mut self) {
        self.bindings.retain(|name, _| !is_hidden_variable(name));
    }
}

impl FromIterator<(String, RdfTerm)> for QuerySolution {
    fn from_iter<I: IntoIterator<Item = (String, RdfTerm)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Blank nodes in patterns join like variables but are never reported
pub(crate) fn is_hidden_variable(name: &str) -> bool {
    name.starts_with("_:")
}

/// SPARQL query results
#[derive(Debug, Clone, PartialEq)]
pub enum SparqlResults {
    /// Bindings from SELECT query
    Bindings {
        /// Variables
        variables: Vec<String>,
        /// Solutions
        solutions: Vec<QuerySolution>,
    },

    /// Boolean result from ASK query
    Boolean(bool),

    /// Graph from DESCRIBE query
    Graph(Vec<Triple>),
}

impl SparqlResults {
    /// Create empty bindings result
    pub fn empty() -> Self {
        SparqlResults::Bindings {
            variables: Vec::new(),
            solutions: Vec::new(),
        }
    }

    /// Solutions of a SELECT query
    pub fn solutions(&self) -> Option<&[QuerySolution]> {
        match self {
            SparqlResults::Bindings { solutions, .. } => Some(solutions),
            _ => None,
        }
    }

    /// Projected variables of a SELECT query
    pub fn variables(&self) -> Option<&[String]> {
        match self {
            SparqlResults::Bindings { variables, .. } => Some(variables),
            _ => None,
        }
    }

    /// Answer of an ASK query
    pub fn boolean(&self) -> Option<bool> {
        match self {
            SparqlResults::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Triples of a DESCRIBE query
    pub fn triples(&self) -> Option<&[Triple]> {
        match self {
            SparqlResults::Graph(triples) => Some(triples),
            _ => None,
        }
    }

    pub fn into_solutions(self) -> Vec<QuerySolution> {
        match self {
            SparqlResults::Bindings { solutions, .. } => solutions,
            _ => Vec::new(),
        }
    }

    pub fn into_triples(self) -> Vec<Triple> {
        match self {
            SparqlResults::Graph(triples) => triples,
            _ => Vec::new(),
        }
    }

    /// Render as SPARQL 1.1 JSON results (SELECT, ASK) or flat JSON-LD (DESCRIBE)
    pub fn to_json(&self) -> Value {
        match self {
            SparqlResults::Bindings {
                variables,
                solutions,
            } => {
                let bindings: Vec<Value> = solutions
                    .iter()
                    .map(|solution| {
                        let mut row = Map::new();
                        for (name, term) in solution.iter() {
                            row.insert(name.to_string(), term_json(term));
                        }
                        Value::Object(row)
                    })
                    .collect();
                json!({
                    "head": { "vars": variables },
                    "results": { "bindings": bindings },
                })
            }
            SparqlResults::Boolean(b) => json!({ "head": {}, "boolean": b }),
            SparqlResults::Graph(triples) => JsonLdSerializerWrapper::to_value(triples),
        }
    }
}

fn term_json(term: &RdfTerm) -> Value {
    match term {
        RdfTerm::NamedNode(n) => json!({ "type": "uri", "value": n.as_str() }),
        RdfTerm::BlankNode(b) => json!({ "type": "bnode", "value": b.as_str() }),
        RdfTerm::Literal(l) => {
            let mut value = json!({ "type": "literal", "value": l.value() });
            if let Some(lang) = l.language() {
                value["xml:lang"] = json!(lang);
            } else if !l.is_plain() {
                value["datatype"] = json!(l.datatype_str());
            }
            value
        }
    }
}
