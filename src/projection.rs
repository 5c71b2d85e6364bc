//! Shaping query solutions into plain values
//!
//! Helpers that turn [`QuerySolution`]s into lists, maps and scalars.

use crate::rdf::{NamedNode, RdfTerm};
use crate::sparql::QuerySolution;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// Projection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// Variable has no value in the solution
    #[error("Variable ?{0} is not bound")]
    Unbound(String),

    /// Value is an IRI or blank node where a literal was needed
    #[error("Value of ?{0} is not a literal: {1}")]
    NotALiteral(String, String),

    /// Literal does not hold an integer
    #[error("Value of ?{0} is not an integer: {1}")]
    NotAnInteger(String, String),

    /// Value is a literal or blank node where an IRI was needed
    #[error("Value of ?{0} is not an IRI: {1}")]
    NotAnIri(String, String),
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Deduplicate and sort into canonical order
///
/// Idempotent, and the result does not depend on input order.
pub fn distinct_sorted<T: Ord>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort();
    items.dedup();
    items
}

/// Values of one variable in solution order, skipping solutions where it is unbound
pub fn column(solutions: &[QuerySolution], variable: &str) -> Vec<RdfTerm> {
    solutions
        .iter()
        .filter_map(|s| s.get(variable).cloned())
        .collect()
}

/// IRI values of one variable in solution order, skipping solutions where it is unbound
pub fn iri_column(solutions: &[QuerySolution], variable: &str) -> ProjectionResult<Vec<NamedNode>> {
    solutions
        .iter()
        .filter_map(|s| s.get(variable))
        .map(|term| {
            term.as_named_node()
                .cloned()
                .ok_or_else(|| ProjectionError::NotAnIri(variable.to_string(), term.to_string()))
        })
        .collect()
}

/// How many solutions bind each value of `variable`, in first-seen order
pub fn count_by(solutions: &[QuerySolution], variable: &str) -> IndexMap<RdfTerm, usize> {
    let mut counts = IndexMap::new();
    for term in solutions.iter().filter_map(|s| s.get(variable)) {
        *counts.entry(term.clone()).or_insert(0) += 1;
    }
    counts
}

fn bound<'s>(solution: &'s QuerySolution, variable: &str) -> ProjectionResult<&'s RdfTerm> {
    solution
        .get(variable)
        .ok_or_else(|| ProjectionError::Unbound(variable.to_string()))
}

/// Lexical form of a literal value
pub fn string_value(solution: &QuerySolution, variable: &str) -> ProjectionResult<String> {
    let term = bound(solution, variable)?;
    term.as_literal()
        .map(|l| l.value().to_string())
        .ok_or_else(|| ProjectionError::NotALiteral(variable.to_string(), term.to_string()))
}

/// Integer parsed from the lexical form of a literal value
pub fn integer_value(solution: &QuerySolution, variable: &str) -> ProjectionResult<i64> {
    let term = bound(solution, variable)?;
    let literal = term
        .as_literal()
        .ok_or_else(|| ProjectionError::NotALiteral(variable.to_string(), term.to_string()))?;
    literal
        .value()
        .trim()
        .parse()
        .map_err(|_| ProjectionError::NotAnInteger(variable.to_string(), literal.to_string()))
}

/// Map the literal in `key_var` to the term in `value_var`, one entry per solution
///
/// Insertion-ordered. When a key repeats, the later solution wins.
pub fn keyed(
    solutions: &[QuerySolution],
    key_var: &str,
    value_var: &str,
) -> ProjectionResult<IndexMap<String, RdfTerm>> {
    keyed_by(solutions, key_var, |s| bound(s, value_var).cloned())
}

/// Like [`keyed`], with integer values
pub fn keyed_integers(
    solutions: &[QuerySolution],
    key_var: &str,
    value_var: &str,
) -> ProjectionResult<IndexMap<String, i64>> {
    keyed_by(solutions, key_var, |s| integer_value(s, value_var))
}

fn keyed_by<V, F>(
    solutions: &[QuerySolution],
    key_var: &str,
    value: F,
) -> ProjectionResult<IndexMap<String, V>>
where
    F: Fn(&QuerySolution) -> ProjectionResult<V>,
{
    let mut map = IndexMap::with_capacity(solutions.len());
    for solution in solutions {
        let key = string_value(solution, key_var)?;
        let value = value(solution)?;
        if map.insert(key.clone(), value).is_some() {
            debug!("Key {:?} repeated, keeping the later value", key);
        }
    }
    Ok(map)
}
